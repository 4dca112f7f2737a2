use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::common::{StatusKind, StatusMessage};
use crate::config::{AppConfig, LabelKind};
use crate::history::{CommandHistory, RedoRequest, UndoRequest};
use crate::navigator::{
    DocumentNavigator, OpenCollectionRequest, SaveCollectionRequest, UnsavedChangesDialog,
};
use crate::theme;

use super::document_view::CanvasState;
use super::file_menu::{self, FileMenuState};
use super::settings_dialog::SettingsDialogState;
use super::stats_window::StatsWindowState;
use super::type_dialog::AddTypeDialog;

fn toolbar_button(ui: &mut egui::Ui, enabled: bool, text: &str, hint: &str) -> bool {
    ui.add_enabled(
        enabled,
        egui::Button::new(egui::RichText::new(text).size(14.0)).min_size(egui::vec2(0.0, 28.0)),
    )
    .on_hover_text(hint)
    .clicked()
}

/// Main toolbar: history, file and vocabulary actions
#[allow(clippy::too_many_arguments)]
pub fn toolbar_ui(
    mut contexts: EguiContexts,
    history: Res<CommandHistory>,
    navigator: Res<DocumentNavigator>,
    config: Res<AppConfig>,
    mut canvas: ResMut<CanvasState>,
    mut file_menu: ResMut<FileMenuState>,
    mut unsaved_dialog: ResMut<UnsavedChangesDialog>,
    mut add_type: ResMut<AddTypeDialog>,
    mut stats: ResMut<StatsWindowState>,
    mut settings: ResMut<SettingsDialogState>,
    mut undo_events: MessageWriter<UndoRequest>,
    mut redo_events: MessageWriter<RedoRequest>,
    mut save_events: MessageWriter<SaveCollectionRequest>,
    mut open_events: MessageWriter<OpenCollectionRequest>,
) -> Result {
    egui::TopBottomPanel::top("main_toolbar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 8)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                if toolbar_button(ui, history.can_undo(), "Undo", "Ctrl+Z") {
                    undo_events.write(UndoRequest);
                }
                if toolbar_button(ui, history.can_redo(), "Redo", "Ctrl+Y / Ctrl+Shift+Z") {
                    redo_events.write(RedoRequest);
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                if toolbar_button(ui, navigator.is_open(), "Save", "Ctrl+S") {
                    save_events.write(SaveCollectionRequest);
                }
                if toolbar_button(ui, true, "Open", "Ctrl+O") {
                    file_menu::spawn_browse(&mut file_menu);
                }
                ui.add_enabled_ui(!config.data.recent_files.is_empty(), |ui| {
                    ui.menu_button("Recent", |ui| {
                        for path in &config.data.recent_files {
                            let name = path
                                .file_name()
                                .map(|n| n.to_string_lossy().to_string())
                                .unwrap_or_else(|| path.to_string_lossy().to_string());
                            if ui
                                .button(name)
                                .on_hover_text(path.to_string_lossy().to_string())
                                .clicked()
                            {
                                file_menu::request_open(
                                    path.clone(),
                                    &navigator,
                                    &mut unsaved_dialog,
                                    &mut open_events,
                                );
                                ui.close();
                            }
                        }
                    });
                });

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                if toolbar_button(ui, true, "Add Entity Type", "Extend the entity vocabulary") {
                    add_type.open(LabelKind::Entity);
                }
                if toolbar_button(
                    ui,
                    true,
                    "Add Relation Type",
                    "Extend the relation vocabulary",
                ) {
                    add_type.open(LabelKind::Relation);
                }
                if toolbar_button(ui, navigator.is_open(), "Statistics", "Collection counts") {
                    stats.is_open = !stats.is_open;
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                ui.checkbox(&mut canvas.show_all_relations, "All relations")
                    .on_hover_text("Show every relation, not only those of the hovered entity");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .add(egui::Button::new("Settings").min_size(egui::vec2(0.0, 24.0)))
                        .clicked()
                    {
                        settings.open(&config);
                    }
                    if navigator.has_unsaved_changes() {
                        ui.colored_label(
                            theme::ui::UNSAVED_MARKER,
                            egui::RichText::new("\u{25CF} Unsaved").strong(),
                        );
                    }
                });
            });
        });
    Ok(())
}

/// Bottom status line
pub fn status_bar_ui(
    mut contexts: EguiContexts,
    status: Res<StatusMessage>,
    history: Res<CommandHistory>,
    navigator: Res<DocumentNavigator>,
) -> Result {
    let color = match status.kind {
        StatusKind::Info => egui::Color32::GRAY,
        StatusKind::Success => theme::ui::SUCCESS_TEXT,
        StatusKind::Warning => theme::ui::WARNING_TEXT,
        StatusKind::Error => theme::ui::ERROR_TEXT,
    };

    egui::TopBottomPanel::bottom("status_bar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 4)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&status.text).color(color));

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(path) = navigator.store().map(|s| s.path()) {
                        ui.label(egui::RichText::new(path.to_string_lossy()).weak().small());
                        ui.separator();
                    }
                    ui.label(
                        egui::RichText::new(format!(
                            "undo {} / redo {}",
                            history.undo_count(),
                            history.redo_count()
                        ))
                        .weak()
                        .small(),
                    );
                });
            });
        });
    Ok(())
}
