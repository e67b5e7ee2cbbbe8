use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Marker on every node of the placement preview. Preview nodes are transient:
/// scene tools skip them and they are never saved.
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct PreviewNode;

/// Marker on the root of an instantiated prefab template.
#[derive(Component, Reflect, Serialize, Deserialize, Clone, Debug)]
#[reflect(Component, Serialize, Deserialize)]
pub struct TemplateInstance {
    /// Name of the template this instance was spawned from
    pub template: String,
}

/// Sorting layer and order of a sprite renderer.
#[derive(Component, Reflect, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[reflect(Component, Serialize, Deserialize)]
pub struct SpriteSorting {
    pub layer: u32,
    pub order: i32,
}

/// Sorting applied to a whole subtree; children are sorted as one unit.
#[derive(Component, Reflect, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[reflect(Component, Serialize, Deserialize)]
pub struct SortingGroup {
    pub layer: u32,
    pub order: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SortingLayer {
    pub id: u32,
    pub name: String,
}

impl SortingLayer {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Sorting layers the host offers for the layer overwrite.
#[derive(Resource, Clone, Debug)]
pub struct SortingLayers(pub Vec<SortingLayer>);

impl Default for SortingLayers {
    fn default() -> Self {
        Self(vec![
            SortingLayer::new(0, "Default"),
            SortingLayer::new(1, "Background"),
            SortingLayer::new(2, "Foreground"),
        ])
    }
}

impl SortingLayers {
    pub fn name_of(&self, id: u32) -> Option<&str> {
        self.0.iter().find(|l| l.id == id).map(|l| l.name.as_str())
    }
}
