use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::navigator::{DocumentNavigator, NavigateRequest};

/// Text of the "go to" box
#[derive(Resource, Default)]
pub struct NavBarState {
    pub goto_text: String,
    pub focus_requested: bool,
}

/// Parse a 1-based document number typed by the user
pub fn parse_goto(text: &str, total: usize) -> Option<usize> {
    let number: usize = text.trim().parse().ok()?;
    (1..=total).contains(&number).then(|| number - 1)
}

/// Document navigation strip: previous/next, progress and direct jump
pub fn nav_bar_ui(
    mut contexts: EguiContexts,
    mut state: ResMut<NavBarState>,
    navigator: Res<DocumentNavigator>,
    mut navigate_events: MessageWriter<NavigateRequest>,
) -> Result {
    let Some((position, total)) = navigator.progress() else {
        return Ok(());
    };
    let id = navigator
        .document()
        .map(|d| d.id.clone())
        .unwrap_or_default();

    egui::TopBottomPanel::top("nav_bar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 6)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(position > 1, egui::Button::new("\u{25C0} Prev"))
                    .on_hover_text("Left arrow, Ctrl+Left jumps back 10")
                    .clicked()
                {
                    navigate_events.write(NavigateRequest::Previous);
                }
                if ui
                    .add_enabled(position < total, egui::Button::new("Next \u{25B6}"))
                    .on_hover_text("Right arrow, Ctrl+Right jumps ahead 10")
                    .clicked()
                {
                    navigate_events.write(NavigateRequest::Next);
                }

                ui.add_space(8.0);
                ui.add(
                    egui::ProgressBar::new(position as f32 / total as f32)
                        .desired_width(200.0)
                        .text(format!("{} / {}", position, total)),
                );
                ui.label(egui::RichText::new(&id).strong());

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let target = parse_goto(&state.goto_text, total)
                        .or_else(|| navigator.find_index(state.goto_text.trim()));
                    if ui
                        .add_enabled(target.is_some(), egui::Button::new("Go"))
                        .clicked()
                        && let Some(index) = target
                    {
                        navigate_events.write(NavigateRequest::GoTo(index));
                        state.goto_text.clear();
                    }

                    let response = ui.add(
                        egui::TextEdit::singleline(&mut state.goto_text)
                            .desired_width(60.0)
                            .hint_text("# or id"),
                    );
                    if state.focus_requested {
                        response.request_focus();
                        state.focus_requested = false;
                    }
                    if response.lost_focus()
                        && ui.input(|i| i.key_pressed(egui::Key::Enter))
                        && let Some(index) = target
                    {
                        navigate_events.write(NavigateRequest::GoTo(index));
                        state.goto_text.clear();
                    }
                    ui.label("Go to:");
                });
            });
        });

    Ok(())
}

/// Ctrl+G focuses the "go to" box
pub fn handle_goto_shortcut(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut state: ResMut<NavBarState>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    if ctrl && keyboard.just_pressed(KeyCode::KeyG) {
        state.focus_requested = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_goto_is_one_based() {
        assert_eq!(parse_goto("1", 5), Some(0));
        assert_eq!(parse_goto(" 5 ", 5), Some(4));
    }

    #[test]
    fn test_parse_goto_rejects_out_of_range() {
        assert_eq!(parse_goto("0", 5), None);
        assert_eq!(parse_goto("6", 5), None);
        assert_eq!(parse_goto("abc", 5), None);
        assert_eq!(parse_goto("", 5), None);
    }
}
