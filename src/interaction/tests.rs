//! Unit tests for the interaction state machine.

use bevy::prelude::*;

use crate::annotation::Span;
use crate::history::EditRequest;
use crate::layout::{EntityHit, TokenHit};

use super::state::{Gesture, InteractionState, TypePrompt};

fn token(global: usize) -> TokenHit {
    let x = 10.0 + global as f32 * 20.0;
    TokenHit {
        global,
        rect: Rect::new(x, 10.0, x + 16.0, 30.0),
    }
}

fn entity(start: usize, end: usize) -> EntityHit {
    let x = 10.0 + start as f32 * 20.0;
    let rect = Rect::new(x, 10.0, 10.0 + end as f32 * 20.0 + 16.0, 30.0);
    EntityHit {
        index: 0,
        span: Span::new(start, end),
        rect,
        centroid: rect.center(),
    }
}

fn token_rect(global: usize) -> Option<Rect> {
    Some(token(global).rect)
}

#[test]
fn test_token_selection_opens_entity_prompt() {
    let mut state = InteractionState::default();

    state.primary_down(Some(token(3)), None);
    assert_eq!(
        state.gesture,
        Gesture::SelectingTokens {
            anchor: 3,
            current: 3
        }
    );
    assert_eq!(state.selected_tokens, Some(Span::single(3)));

    // Dragging backwards orders the span
    state.pointer_moved(Some(token(1)), Vec2::ZERO);
    assert_eq!(state.selected_tokens, Some(Span::new(1, 3)));

    state.pointer_up(None, Vec2::new(50.0, 20.0), token_rect);
    assert_eq!(state.gesture, Gesture::Idle);
    assert_eq!(
        state.pending_prompt,
        Some(TypePrompt::Entity {
            span: Span::new(1, 3),
            anchor: Vec2::new(30.0, 40.0),
        })
    );
}

#[test]
fn test_confirm_entity_prompt_emits_add_entity() {
    let mut state = InteractionState::default();
    state.primary_down(Some(token(0)), None);
    state.pointer_moved(Some(token(1)), Vec2::ZERO);
    state.pointer_up(None, Vec2::ZERO, token_rect);

    // Blank answers keep the prompt
    assert!(state.confirm_prompt("  ").is_none());
    assert!(state.pending_prompt.is_some());

    let request = state.confirm_prompt("Method");
    assert_eq!(
        request,
        Some(EditRequest::AddEntity {
            span: Span::new(0, 1),
            label: "Method".to_string(),
        })
    );
    assert!(state.pending_prompt.is_none());
    assert!(state.selected_tokens.is_none());
}

#[test]
fn test_cancel_entity_prompt_keeps_tokens() {
    let mut state = InteractionState::default();
    state.primary_down(Some(token(2)), None);
    state.pointer_up(None, Vec2::ZERO, token_rect);

    state.cancel_prompt();
    assert!(state.pending_prompt.is_none());
    assert_eq!(state.selected_tokens, Some(Span::single(2)));
    assert!(state.is_idle());
}

#[test]
fn test_delete_tokens_after_cancelled_prompt() {
    let mut state = InteractionState::default();
    state.primary_down(Some(token(1)), None);
    state.pointer_moved(Some(token(3)), Vec2::ZERO);
    state.pointer_up(None, Vec2::ZERO, token_rect);
    state.cancel_prompt();

    assert_eq!(
        state.delete_selection(),
        Some(EditRequest::DeleteTokens {
            span: Span::new(1, 3)
        })
    );
    assert!(state.selected_tokens.is_none());
}

#[test]
fn test_delete_dismisses_open_entity_prompt() {
    let mut state = InteractionState::default();
    state.primary_down(Some(token(0)), None);
    state.pointer_moved(Some(token(1)), Vec2::ZERO);
    state.pointer_up(None, Vec2::ZERO, token_rect);

    assert_eq!(
        state.delete_selection(),
        Some(EditRequest::DeleteTokens {
            span: Span::new(0, 1)
        })
    );
    assert!(state.pending_prompt.is_none());
    assert!(state.is_idle());
}

#[test]
fn test_delete_ignored_while_relation_prompt_open() {
    let mut state = InteractionState {
        selected_tokens: Some(Span::new(4, 5)),
        ..Default::default()
    };
    state.secondary_down(Some(entity(0, 0)), Vec2::ZERO);
    state.pointer_up(Some(entity(2, 2)), Vec2::ZERO, token_rect);
    assert!(matches!(
        state.pending_prompt,
        Some(TypePrompt::Relation { .. })
    ));

    assert_eq!(state.delete_selection(), None);
    assert_eq!(state.selected_tokens, Some(Span::new(4, 5)));
}

#[test]
fn test_relation_drag_to_other_entity() {
    let mut state = InteractionState::default();
    let source = entity(0, 1);

    state.secondary_down(Some(source), Vec2::new(20.0, 20.0));
    state.pointer_moved(None, Vec2::new(90.0, 25.0));
    assert_eq!(
        state.gesture,
        Gesture::DraggingRelation {
            source: source.span,
            origin: source.centroid,
            pointer: Vec2::new(90.0, 25.0),
        }
    );

    state.pointer_up(Some(entity(4, 4)), Vec2::new(95.0, 20.0), token_rect);
    assert_eq!(state.gesture, Gesture::Idle);

    let request = state.confirm_prompt("Used-For");
    assert_eq!(
        request,
        Some(EditRequest::AddRelation {
            source: Span::new(0, 1),
            target: Span::new(4, 4),
            label: "Used-For".to_string(),
        })
    );
}

#[test]
fn test_relation_drag_cancelled_on_same_entity_or_empty_space() {
    let mut state = InteractionState::default();

    state.secondary_down(Some(entity(0, 1)), Vec2::ZERO);
    state.pointer_up(Some(entity(0, 1)), Vec2::ZERO, token_rect);
    assert!(state.pending_prompt.is_none());
    assert!(state.is_idle());

    state.secondary_down(Some(entity(0, 1)), Vec2::ZERO);
    state.pointer_up(None, Vec2::ZERO, token_rect);
    assert!(state.pending_prompt.is_none());
    assert!(state.is_idle());
}

#[test]
fn test_secondary_on_empty_space_does_nothing() {
    let mut state = InteractionState::default();
    state.secondary_down(None, Vec2::ZERO);
    assert_eq!(state, InteractionState::default());
}

#[test]
fn test_entity_click_toggles_selection() {
    let mut state = InteractionState::default();
    state.selected_tokens = Some(Span::new(5, 6));

    state.primary_down(Some(token(0)), Some(entity(0, 1)));
    assert_eq!(state.selected_entity, Some(Span::new(0, 1)));
    assert!(state.selected_tokens.is_none());
    assert_eq!(state.gesture, Gesture::Idle);

    // Another entity replaces the selection
    state.primary_down(None, Some(entity(3, 3)));
    assert_eq!(state.selected_entity, Some(Span::new(3, 3)));

    // Clicking the selected one clears it
    state.primary_down(None, Some(entity(3, 3)));
    assert!(state.selected_entity.is_none());
}

#[test]
fn test_pointer_ignored_while_prompt_pending() {
    let mut state = InteractionState::default();
    state.primary_down(Some(token(1)), None);
    state.pointer_up(None, Vec2::ZERO, token_rect);
    let pending = state.pending_prompt.clone();

    state.primary_down(Some(token(4)), None);
    state.secondary_down(Some(entity(0, 0)), Vec2::ZERO);
    assert_eq!(state.gesture, Gesture::Idle);
    assert_eq!(state.pending_prompt, pending);
    assert_eq!(state.selected_tokens, Some(Span::single(1)));
}

#[test]
fn test_delete_prefers_selected_entity() {
    let mut state = InteractionState {
        selected_entity: Some(Span::new(0, 1)),
        selected_tokens: Some(Span::new(4, 5)),
        ..Default::default()
    };

    assert_eq!(
        state.delete_selection(),
        Some(EditRequest::DeleteEntity {
            span: Span::new(0, 1)
        })
    );
    assert_eq!(
        state.delete_selection(),
        Some(EditRequest::DeleteTokens {
            span: Span::new(4, 5)
        })
    );
    assert_eq!(state.delete_selection(), None);
}

#[test]
fn test_delete_ignored_mid_gesture() {
    let mut state = InteractionState::default();
    state.primary_down(Some(token(2)), None);
    assert_eq!(state.delete_selection(), None);
}

#[test]
fn test_reset_clears_everything() {
    let mut state = InteractionState::default();
    state.primary_down(None, Some(entity(0, 1)));
    state.secondary_down(Some(entity(0, 1)), Vec2::ZERO);

    state.reset();
    assert_eq!(state, InteractionState::default());
}
