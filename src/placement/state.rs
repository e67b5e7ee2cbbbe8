use std::sync::Arc;

use bevy::prelude::*;

use super::PlacementTransform;
use crate::catalog::{EntryId, PrefabEntry, PrefabTemplate};
use crate::host::PlacementHost;

/// The transient stand-in for the selected template.
#[derive(Debug, Clone)]
pub struct PreviewInstance {
    pub entity: Entity,
    /// Entry the preview was created for
    pub entry: EntryId,
    /// Template the preview was created from, compared by pointer to detect swaps
    pub template: Arc<PrefabTemplate>,
}

/// Place mode, the live preview transform and the preview instance.
///
/// The preview is only ever destroyed and recreated, never patched: whenever the selected
/// entry, its template, place mode or the scene changes, a fresh copy replaces it.
#[derive(Debug, Default)]
pub struct PlacementState {
    place_mode: bool,
    transform: PlacementTransform,
    preview: Option<PreviewInstance>,
}

impl PlacementState {
    pub fn place_mode(&self) -> bool {
        self.place_mode
    }

    pub fn transform(&self) -> &PlacementTransform {
        &self.transform
    }

    pub fn preview(&self) -> Option<&PreviewInstance> {
        self.preview.as_ref()
    }

    pub fn has_preview(&self) -> bool {
        self.preview.is_some()
    }

    pub fn set_place_mode(
        &mut self,
        on: bool,
        entry: Option<&PrefabEntry>,
        host: &mut (impl PlacementHost + ?Sized),
    ) {
        self.place_mode = on;
        self.refresh_preview(entry, host);
    }

    /// Destroy the preview, then create a new one if place mode is on and `entry` has a
    /// template.
    pub fn refresh_preview(
        &mut self,
        entry: Option<&PrefabEntry>,
        host: &mut (impl PlacementHost + ?Sized),
    ) {
        self.destroy_preview(host);
        if !self.place_mode {
            return;
        }
        let Some((id, template)) = entry.and_then(|e| Some((e.id(), e.template()?.clone()))) else {
            return;
        };

        let entity = host.instantiate(&template);
        host.mark_transient(entity);
        debug!("Created preview for {} ({id})", template.name);
        self.preview = Some(PreviewInstance {
            entity,
            entry: id,
            template,
        });
        self.recompute_transform(host);
    }

    /// Refresh only if the preview no longer matches `entry` and place mode.
    pub fn sync_preview(
        &mut self,
        entry: Option<&PrefabEntry>,
        host: &mut (impl PlacementHost + ?Sized),
    ) {
        let wanted = entry
            .filter(|_| self.place_mode)
            .and_then(|e| Some((e.id(), e.template()?)));
        let up_to_date = match (&self.preview, wanted) {
            (None, None) => true,
            (Some(preview), Some((id, template))) => {
                preview.entry == id && Arc::ptr_eq(&preview.template, template)
            }
            _ => false,
        };
        if !up_to_date {
            self.refresh_preview(entry, host);
        }
    }

    pub fn destroy_preview(&mut self, host: &mut (impl PlacementHost + ?Sized)) {
        if let Some(preview) = self.preview.take() {
            host.destroy(preview.entity);
        }
    }

    /// Write the placement transform to the preview, keeping the preview's depth.
    pub fn recompute_transform(&mut self, host: &mut (impl PlacementHost + ?Sized)) {
        let Some(preview) = &self.preview else {
            return;
        };
        let depth = host.transform(preview.entity).translation.z;
        let transform = self
            .transform
            .to_transform(preview.template.base_scale(), depth);
        host.set_transform(preview.entity, transform);
    }

    pub fn move_to(&mut self, position: Vec2, host: &mut (impl PlacementHost + ?Sized)) {
        self.transform.position = position;
        self.recompute_transform(host);
    }

    pub fn rotate(&mut self, degrees: f32, host: &mut (impl PlacementHost + ?Sized)) {
        self.transform.rotate(degrees);
        self.recompute_transform(host);
    }

    pub fn add_scale(&mut self, delta: f32, host: &mut (impl PlacementHost + ?Sized)) {
        self.transform.add_scale(delta);
        self.recompute_transform(host);
    }

    pub fn toggle_mirror(&mut self, host: &mut (impl PlacementHost + ?Sized)) {
        self.transform.toggle_mirror();
        self.recompute_transform(host);
    }

    pub fn reset(&mut self, host: &mut (impl PlacementHost + ?Sized)) {
        self.transform.reset();
        self.recompute_transform(host);
    }
}
