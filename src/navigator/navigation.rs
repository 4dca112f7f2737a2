//! Document navigation system and keyboard shortcuts.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::common::StatusMessage;
use crate::constants::NAVIGATION_JUMP;

use super::messages::{DocumentSwitched, NavigateRequest};
use super::state::DocumentNavigator;

/// Applies navigation requests to the navigator
pub fn navigate_system(
    mut events: MessageReader<NavigateRequest>,
    mut navigator: ResMut<DocumentNavigator>,
    mut status: ResMut<StatusMessage>,
    mut switched_events: MessageWriter<DocumentSwitched>,
) {
    for request in events.read() {
        let result = match *request {
            NavigateRequest::Next => navigator.next(),
            NavigateRequest::Previous => navigator.previous(),
            NavigateRequest::Jump(delta) => navigator.jump(delta),
            NavigateRequest::First => navigator.first(),
            NavigateRequest::Last => navigator.last(),
            NavigateRequest::GoTo(index) => navigator.go_to(index),
        };

        match result {
            Ok(true) => {
                if let (Some((position, total)), Some(document)) =
                    (navigator.progress(), navigator.document())
                {
                    status.info(format!("Document {}/{}: {}", position, total, document.id));
                }
                switched_events.write(DocumentSwitched);
            }
            Ok(false) => {}
            Err(e) => {
                error!("Navigation failed: {}", e);
                status.error(format!("Could not switch document: {}", e));
            }
        }
    }
}

/// Arrow keys, Ctrl+arrows, Home and End
pub fn handle_navigation_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    navigator: Res<DocumentNavigator>,
    mut contexts: EguiContexts,
    mut events: MessageWriter<NavigateRequest>,
) {
    if !navigator.is_open() {
        return;
    }

    // Text fields keep their arrow keys
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);

    let request = if keyboard.just_pressed(KeyCode::ArrowRight) {
        Some(if ctrl {
            NavigateRequest::Jump(NAVIGATION_JUMP)
        } else {
            NavigateRequest::Next
        })
    } else if keyboard.just_pressed(KeyCode::ArrowLeft) {
        Some(if ctrl {
            NavigateRequest::Jump(-NAVIGATION_JUMP)
        } else {
            NavigateRequest::Previous
        })
    } else if keyboard.just_pressed(KeyCode::Home) {
        Some(NavigateRequest::First)
    } else if keyboard.just_pressed(KeyCode::End) {
        Some(NavigateRequest::Last)
    } else {
        None
    };

    if let Some(request) = request {
        events.write(request);
    }
}
