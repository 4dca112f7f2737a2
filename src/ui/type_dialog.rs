use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::config::{AppConfig, LabelKind, RegisterLabelsRequest};

/// "Add type" dialog for either vocabulary
#[derive(Resource, Default)]
pub struct AddTypeDialog {
    /// Vocabulary being extended, `None` while closed
    pub kind: Option<LabelKind>,
    pub name: String,
}

impl AddTypeDialog {
    pub fn open(&mut self, kind: LabelKind) {
        self.kind = Some(kind);
        self.name.clear();
    }

    pub fn is_open(&self) -> bool {
        self.kind.is_some()
    }
}

pub fn add_type_dialog_ui(
    mut contexts: EguiContexts,
    mut dialog: ResMut<AddTypeDialog>,
    config: Res<AppConfig>,
    mut label_events: MessageWriter<RegisterLabelsRequest>,
) -> Result {
    let Some(kind) = dialog.kind else {
        return Ok(());
    };

    let mut should_close = false;
    let mut should_add = false;

    let name = dialog.name.trim().to_string();
    let duplicate = config.data.labels(kind).iter().any(|l| *l == name);

    let title = match kind {
        LabelKind::Entity => "Add Entity Type",
        LabelKind::Relation => "Add Relation Type",
    };
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.label("Name:");
                let response = ui.text_edit_singleline(&mut dialog.name);
                response.request_focus();
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    should_add = true;
                }
            });

            if duplicate {
                ui.label(
                    egui::RichText::new(format!("'{}' already exists", name))
                        .color(crate::theme::ui::WARNING_TEXT)
                        .small(),
                );
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(
                        !name.is_empty() && !duplicate,
                        egui::Button::new("Add"),
                    )
                    .clicked()
                {
                    should_add = true;
                }
                if ui.button("Cancel").clicked() {
                    should_close = true;
                }
            });

            if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                should_close = true;
            }
        });

    if should_add && !name.is_empty() && !duplicate {
        label_events.write(RegisterLabelsRequest {
            kind,
            labels: vec![name],
        });
        should_close = true;
    }

    if should_close {
        dialog.kind = None;
        dialog.name.clear();
    }

    Ok(())
}
