use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::catalog::EntryId;
use crate::commands::{CommandHistory, RedoEvent, UndoEvent};
use crate::constants::{LIGHT_LAYOUT_PREF_KEY, colors};
use crate::editor::{ClearSceneCommand, PlacerRequest};
use crate::host::{PreferenceStore, PreviewNode, SortingLayers};
use crate::input::InputRouter;
use crate::placement::ObjectPlacer;
use crate::selection::{Selected, SelectionMode};
use crate::ui::PlacerPreferences;

const SWATCH_SIZE: f32 = 14.0;

/// Draw the "Object Placer" window
#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_placer_panel(
    mut contexts: EguiContexts,
    placer: Res<ObjectPlacer>,
    router: Res<InputRouter>,
    layers: Res<SortingLayers>,
    history: Res<CommandHistory>,
    mut preferences: ResMut<PlacerPreferences>,
    selected: Query<Entity, (With<Selected>, Without<PreviewNode>)>,
    names: Query<&Name>,
    mut undo: MessageWriter<UndoEvent>,
    mut redo: MessageWriter<RedoEvent>,
    mut commands: Commands,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    let light_layout = preferences.get_bool(LIGHT_LAYOUT_PREF_KEY, false);
    let mut requests: Vec<PlacerRequest> = Vec::new();

    egui::Window::new("Object Placer")
        .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
        .default_width(260.0)
        .resizable(false)
        .show(ctx, |ui| {
            // Mode
            ui.horizontal(|ui| {
                let label = if placer.place_mode() {
                    egui::RichText::new("Place mode: ON").color(to_egui(colors::PLACE_MODE_ON))
                } else {
                    egui::RichText::new("Place mode: off")
                };
                if ui.selectable_label(placer.place_mode(), label).clicked() {
                    requests.push(PlacerRequest::TogglePlaceMode);
                }
                let mut light = light_layout;
                if ui.checkbox(&mut light, "Light layout").changed() {
                    preferences.set_bool(LIGHT_LAYOUT_PREF_KEY, light);
                }
            });

            ui.horizontal(|ui| {
                if ui.button("Reload catalog").clicked() {
                    requests.push(PlacerRequest::ReloadCatalog);
                }
                if ui.button("Clear scene").clicked() {
                    commands.queue(ClearSceneCommand);
                }
            });
            ui.separator();

            // Catalog
            egui::ScrollArea::vertical()
                .max_height(320.0)
                .show(ui, |ui| {
                    if placer.catalog().groups().is_empty() {
                        ui.weak("Catalog is empty");
                    }
                    for (index, group) in placer.catalog().groups().iter().enumerate() {
                        egui::CollapsingHeader::new(format!("{} ({})", group.name, group.len()))
                            .id_salt(("placer_group", index))
                            .default_open(true)
                            .show(ui, |ui| {
                                let last = group.len().saturating_sub(1);
                                for (slot, entry) in group.entries().iter().enumerate() {
                                    let is_selected = placer.selected() == Some(entry.id());
                                    ui.horizontal(|ui| {
                                        if !light_layout {
                                            let color = entry
                                                .template()
                                                .and_then(|t| t.swatch_color())
                                                .unwrap_or(
                                                    colors::EMPTY_SWATCH.to_srgba().to_f32_array(),
                                                );
                                            draw_swatch(ui, color);
                                        }
                                        if ui
                                            .selectable_label(is_selected, entry.display_name())
                                            .clicked()
                                            && !is_selected
                                        {
                                            requests
                                                .push(PlacerRequest::SelectEntry(Some(entry.id())));
                                        }
                                        if light_layout {
                                            return;
                                        }
                                        if entry.template().is_none() {
                                            template_path_field(ui, entry.id(), &mut requests);
                                        }
                                        if ui.add_enabled(slot > 0, egui::Button::new("⏶").small()).clicked() {
                                            requests.push(PlacerRequest::MoveEntry {
                                                group: index,
                                                from: slot,
                                                to: slot - 1,
                                            });
                                        }
                                        if ui.add_enabled(slot < last, egui::Button::new("⏷").small()).clicked() {
                                            requests.push(PlacerRequest::MoveEntry {
                                                group: index,
                                                from: slot,
                                                to: slot + 1,
                                            });
                                        }
                                        if ui.small_button("✕").on_hover_text("Remove prefab").clicked() {
                                            requests.push(PlacerRequest::RemoveEntry(entry.id()));
                                        }
                                    });
                                }
                                ui.horizontal(|ui| {
                                    if !light_layout && ui.small_button("+ Prefab").clicked() {
                                        requests.push(PlacerRequest::AddEntry(index));
                                    }
                                    if ui.small_button("Remove group").clicked() {
                                        requests.push(PlacerRequest::RemoveGroup(index));
                                    }
                                });
                            });
                    }

                    ui.horizontal(|ui| {
                        let id = egui::Id::new("placer_new_group");
                        let mut name = ui.data_mut(|d| d.get_temp::<String>(id)).unwrap_or_default();
                        ui.add(
                            egui::TextEdit::singleline(&mut name)
                                .hint_text("Group name")
                                .desired_width(140.0),
                        );
                        if ui
                            .add_enabled(!name.trim().is_empty(), egui::Button::new("Add group"))
                            .clicked()
                        {
                            requests.push(PlacerRequest::AddGroup(name.trim().to_string()));
                            name.clear();
                        }
                        ui.data_mut(|d| d.insert_temp(id, name));
                    });
                });
            ui.separator();

            // Selection mode
            let mut mode = placer.selection_mode();
            egui::ComboBox::from_id_salt("placer_selection_mode")
                .selected_text(mode.label())
                .show_ui(ui, |ui| {
                    for option in SelectionMode::ALL {
                        ui.selectable_value(&mut mode, option, option.label());
                    }
                });
            if mode != placer.selection_mode() {
                requests.push(PlacerRequest::SetSelectionMode(mode));
            }

            // Sorting overwrite
            let settings = placer.settings();
            let mut overwrite = settings.overwrite_layer();
            if ui.checkbox(&mut overwrite, "Overwrite sorting").changed() {
                requests.push(PlacerRequest::SetOverwriteLayer(overwrite));
            }
            ui.add_enabled_ui(overwrite, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Layer");
                    let mut layer = settings.sorting_layer();
                    egui::ComboBox::from_id_salt("placer_sorting_layer")
                        .selected_text(layers.name_of(layer).unwrap_or("<missing>"))
                        .show_ui(ui, |ui| {
                            for option in &layers.0 {
                                ui.selectable_value(&mut layer, option.id, &option.name);
                            }
                        });
                    if layer != settings.sorting_layer() {
                        requests.push(PlacerRequest::SetSortingLayer(layer));
                    }

                    ui.label("Order");
                    let mut order = settings.sorting_order();
                    if ui.add(egui::DragValue::new(&mut order)).changed() {
                        requests.push(PlacerRequest::SetSortingOrder(order));
                    }
                });
            });

            // Parent
            ui.horizontal(|ui| {
                ui.label("Parent:");
                let parent_name = settings
                    .parent()
                    .map(|p| names.get(p).map(|n| n.to_string()).unwrap_or(format!("{p}")));
                ui.monospace(parent_name.as_deref().unwrap_or("None"));
            });
            ui.horizontal(|ui| {
                let candidate = selected.iter().next();
                if ui
                    .add_enabled(candidate.is_some(), egui::Button::new("Use selected"))
                    .clicked()
                {
                    requests.push(PlacerRequest::SetParent(candidate));
                }
                if ui
                    .add_enabled(settings.parent().is_some(), egui::Button::new("Clear"))
                    .clicked()
                {
                    requests.push(PlacerRequest::SetParent(None));
                }
            });
            ui.separator();

            // History
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(history.can_undo(), egui::Button::new("Undo"))
                    .on_hover_text(history.undo_description().unwrap_or_default())
                    .clicked()
                {
                    undo.write(UndoEvent);
                }
                if ui
                    .add_enabled(history.can_redo(), egui::Button::new("Redo"))
                    .on_hover_text(history.redo_description().unwrap_or_default())
                    .clicked()
                {
                    redo.write(RedoEvent);
                }
            });

            // Hints
            if !light_layout {
                let bindings = router.bindings();
                ui.add_space(4.0);
                for hint in [
                    format!("{:?}: toggle place mode", bindings.toggle_place_mode),
                    "Left click: place".to_string(),
                    "Ctrl+Scroll: rotate, Shift+Scroll: scale (Alt: fine)".to_string(),
                    "Ctrl+Middle click: mirror".to_string(),
                    "Right held + Scroll or Middle click: change prefab".to_string(),
                    format!("{:?}: reset, {:?}: leave", bindings.reset, bindings.cancel),
                ] {
                    ui.small(hint);
                }
            }
        });

    for request in requests {
        commands.queue(request);
    }
    Ok(())
}

/// Path field and "Load" button for an entry without a template.
fn template_path_field(ui: &mut egui::Ui, entry: EntryId, requests: &mut Vec<PlacerRequest>) {
    let id = egui::Id::new(("placer_template_path", entry));
    let mut path = ui.data_mut(|d| d.get_temp::<String>(id)).unwrap_or_default();
    ui.add(
        egui::TextEdit::singleline(&mut path)
            .hint_text("templates/….ron")
            .desired_width(100.0),
    );
    if ui
        .add_enabled(!path.trim().is_empty(), egui::Button::new("Load").small())
        .clicked()
    {
        requests.push(PlacerRequest::AssignTemplate {
            entry,
            path: path.trim().into(),
        });
    }
    ui.data_mut(|d| d.insert_temp(id, path));
}

fn draw_swatch(ui: &mut egui::Ui, color: [f32; 4]) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(SWATCH_SIZE, SWATCH_SIZE), egui::Sense::hover());
    ui.painter()
        .rect_filled(rect, egui::CornerRadius::same(3), rgba_to_egui(color));
}

fn rgba_to_egui([r, g, b, a]: [f32; 4]) -> egui::Color32 {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(channel(r), channel(g), channel(b), channel(a))
}

fn to_egui(color: Color) -> egui::Color32 {
    rgba_to_egui(color.to_srgba().to_f32_array())
}
