use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::config::{AppConfig, LabelKind, SaveConfigRequest, SetUndoDepthRequest};
use crate::constants::MAX_UNDO_HISTORY_LIMIT;
use crate::theme;

/// State for the settings dialog
#[derive(Resource, Default)]
pub struct SettingsDialogState {
    /// Whether the dialog is open
    pub is_open: bool,
    /// Edited undo depth
    pub undo_depth: usize,
    /// Labels marked for removal from the vocabularies
    pub removed: Vec<(LabelKind, String)>,
    /// Whether changes have been made
    pub has_changes: bool,
}

impl SettingsDialogState {
    /// Open the dialog initialized from the current config
    pub fn open(&mut self, config: &AppConfig) {
        self.is_open = true;
        self.undo_depth = config.data.effective_undo_depth();
        self.removed.clear();
        self.has_changes = false;
    }
}

/// Renders the settings dialog
pub fn settings_dialog_ui(
    mut contexts: EguiContexts,
    mut dialog_state: ResMut<SettingsDialogState>,
    mut config: ResMut<AppConfig>,
    mut depth_events: MessageWriter<SetUndoDepthRequest>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) -> Result {
    if !dialog_state.is_open {
        return Ok(());
    }

    let mut should_close = false;
    let mut should_save = false;
    let mut should_clear_recent = false;

    egui::Window::new("Settings")
        .collapsible(false)
        .resizable(true)
        .min_width(400.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.heading("Application Settings");
            ui.add_space(12.0);

            // Editing section
            ui.group(|ui| {
                ui.label(egui::RichText::new("Editing").strong());
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    ui.label("Undo depth:");
                    let response = ui.add(
                        egui::DragValue::new(&mut dialog_state.undo_depth)
                            .range(1..=MAX_UNDO_HISTORY_LIMIT),
                    );
                    if response.changed() {
                        dialog_state.has_changes = true;
                    }
                });
            });

            ui.add_space(12.0);

            // Vocabularies
            for kind in [LabelKind::Entity, LabelKind::Relation] {
                let title = match kind {
                    LabelKind::Entity => "Entity Types",
                    LabelKind::Relation => "Relation Types",
                };
                ui.group(|ui| {
                    ui.label(egui::RichText::new(title).strong());
                    ui.add_space(8.0);

                    egui::ScrollArea::vertical()
                        .id_salt(title)
                        .max_height(140.0)
                        .show(ui, |ui| {
                            for label in config.data.labels(kind) {
                                let removed = dialog_state
                                    .removed
                                    .iter()
                                    .any(|(k, l)| *k == kind && l == label);
                                ui.horizontal(|ui| {
                                    let color =
                                        theme::label_color(&config.data.label_colors, label);
                                    let (swatch, _) = ui.allocate_exact_size(
                                        egui::vec2(12.0, 12.0),
                                        egui::Sense::hover(),
                                    );
                                    ui.painter().rect_filled(swatch, 2.0, color);

                                    let text = if removed {
                                        egui::RichText::new(label).strikethrough().weak()
                                    } else {
                                        egui::RichText::new(label)
                                    };
                                    ui.label(text);

                                    if removed {
                                        if ui.small_button("Keep").clicked() {
                                            dialog_state
                                                .removed
                                                .retain(|(k, l)| !(*k == kind && l == label));
                                            dialog_state.has_changes = true;
                                        }
                                    } else if ui.small_button("Remove").clicked() {
                                        dialog_state.removed.push((kind, label.clone()));
                                        dialog_state.has_changes = true;
                                    }
                                });
                            }
                        });
                });
                ui.add_space(12.0);
            }

            // Recent files section
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Recent Files").strong());
                    if !config.data.recent_files.is_empty() && ui.small_button("Clear").clicked()
                    {
                        should_clear_recent = true;
                    }
                });
                ui.add_space(8.0);

                if config.data.recent_files.is_empty() {
                    ui.label(egui::RichText::new("No recent files").weak().italics());
                } else {
                    for (i, path) in config.data.recent_files.iter().enumerate() {
                        let display = path.to_string_lossy();
                        ui.label(format!("{}. {}", i + 1, display));
                    }
                }
            });

            ui.add_space(12.0);

            // Last file section (read-only display)
            ui.group(|ui| {
                ui.label(egui::RichText::new("Last Opened File").strong());
                ui.add_space(8.0);

                if let Some(ref path) = config.data.last_file_path {
                    let display = path.to_string_lossy();
                    ui.label(&*display);
                } else {
                    ui.label(egui::RichText::new("No file recorded").weak().italics());
                }
            });

            ui.add_space(16.0);

            // Action buttons
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(dialog_state.has_changes, egui::Button::new("Save"))
                    .clicked()
                {
                    should_save = true;
                }

                if ui.button("Cancel").clicked() {
                    should_close = true;
                }
            });
        });

    if should_clear_recent {
        config.data.recent_files.clear();
        config.data.last_file_path = None;
        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }

    // Handle save
    if should_save {
        let removed = std::mem::take(&mut dialog_state.removed);
        if !removed.is_empty() {
            for (kind, label) in &removed {
                let vocabulary = match kind {
                    LabelKind::Entity => &mut config.data.entity_types,
                    LabelKind::Relation => &mut config.data.relation_types,
                };
                vocabulary.retain(|l| l != label);
            }
            info!("Removed {} label(s) from the vocabularies", removed.len());
            config.dirty = true;
            save_events.write(SaveConfigRequest);
        }

        depth_events.write(SetUndoDepthRequest {
            depth: dialog_state.undo_depth,
        });

        dialog_state.has_changes = false;
        should_close = true;
    }

    // Handle close
    if should_close {
        dialog_state.is_open = false;
        dialog_state.removed.clear();
    }

    Ok(())
}
