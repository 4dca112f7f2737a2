use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::annotation::Span;
use crate::config::{AppConfig, LabelKind, RegisterLabelsRequest};
use crate::history::EditRequest;
use crate::interaction::{InteractionState, TypePrompt};
use crate::navigator::DocumentNavigator;
use crate::theme;

use super::document_view::CanvasState;

/// Free-text entry of the type prompt
#[derive(Resource, Default)]
pub struct TypePromptState {
    pub custom: String,
    focus_requested: bool,
}

/// Type picker shown under a fresh selection or at the end of a relation drag
#[allow(clippy::too_many_arguments)]
pub fn type_prompt_ui(
    mut contexts: EguiContexts,
    mut interaction: ResMut<InteractionState>,
    mut prompt_state: ResMut<TypePromptState>,
    canvas: Res<CanvasState>,
    navigator: Res<DocumentNavigator>,
    config: Res<AppConfig>,
    mut edit_events: MessageWriter<EditRequest>,
    mut label_events: MessageWriter<RegisterLabelsRequest>,
) -> Result {
    let Some(prompt) = interaction.pending_prompt.clone() else {
        prompt_state.custom.clear();
        prompt_state.focus_requested = false;
        return Ok(());
    };
    let ctx = contexts.ctx_mut()?;

    let (kind, title, subject) = match &prompt {
        TypePrompt::Entity { span, .. } => (
            LabelKind::Entity,
            "Entity type",
            navigator
                .document()
                .map(|d| d.span_text(*span))
                .unwrap_or_default(),
        ),
        TypePrompt::Relation { source, target, .. } => {
            let text = |span: Span| {
                navigator
                    .document()
                    .map(|d| d.span_text(span))
                    .unwrap_or_default()
            };
            (
                LabelKind::Relation,
                "Relation type",
                format!("{} \u{2192} {}", text(*source), text(*target)),
            )
        }
    };

    let anchor = prompt.anchor();
    let position = canvas.origin() + egui::vec2(anchor.x, anchor.y);

    let mut chosen: Option<String> = None;
    let mut cancelled = ctx.input(|i| i.key_pressed(egui::Key::Escape));
    let mut delete_tokens = false;

    egui::Window::new(title)
        .id(egui::Id::new("type_prompt"))
        .collapsible(false)
        .resizable(false)
        .fixed_pos(position)
        .constrain(true)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(subject).strong());
            ui.add_space(6.0);

            egui::ScrollArea::vertical()
                .max_height(240.0)
                .show(ui, |ui| {
                    for label in config.data.labels(kind) {
                        let color = theme::label_color(&config.data.label_colors, label);
                        ui.horizontal(|ui| {
                            let (swatch, _) = ui.allocate_exact_size(
                                egui::vec2(12.0, 12.0),
                                egui::Sense::hover(),
                            );
                            ui.painter().rect_filled(swatch, 2.0, color);
                            if ui.selectable_label(false, label).clicked() {
                                chosen = Some(label.clone());
                            }
                        });
                    }
                });

            ui.separator();

            let response = ui.add(
                egui::TextEdit::singleline(&mut prompt_state.custom)
                    .desired_width(180.0)
                    .hint_text(format!("New {} type", kind.noun())),
            );
            if !prompt_state.focus_requested {
                response.request_focus();
                prompt_state.focus_requested = true;
            }
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                chosen = Some(prompt_state.custom.clone());
            }

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let has_text = !prompt_state.custom.trim().is_empty();
                if ui.add_enabled(has_text, egui::Button::new("OK")).clicked() {
                    chosen = Some(prompt_state.custom.clone());
                }
                if ui.button("Cancel").clicked() {
                    cancelled = true;
                }
                if kind == LabelKind::Entity
                    && ui
                        .button("Delete tokens")
                        .on_hover_text("Remove the selected tokens from the document (D)")
                        .clicked()
                {
                    delete_tokens = true;
                }
            });
        });

    if let Some(label) = chosen
        && let Some(request) = interaction.confirm_prompt(&label)
    {
        label_events.write(RegisterLabelsRequest {
            kind,
            labels: vec![label.trim().to_string()],
        });
        edit_events.write(request);
        prompt_state.custom.clear();
        prompt_state.focus_requested = false;
    } else if delete_tokens {
        if let Some(request) = interaction.delete_selection() {
            edit_events.write(request);
        }
        prompt_state.custom.clear();
        prompt_state.focus_requested = false;
    } else if cancelled {
        interaction.cancel_prompt();
        prompt_state.custom.clear();
        prompt_state.focus_requested = false;
    }

    Ok(())
}
