//! Pointer and keyboard gesture state for the document canvas.

use bevy::prelude::*;

use crate::annotation::Span;
use crate::history::EditRequest;
use crate::layout::{EntityHit, TokenHit};

/// Gap between a selection and the type prompt opened under it
const PROMPT_OFFSET: f32 = 10.0;

/// The gesture in progress
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Primary button held after pressing on a free token
    SelectingTokens { anchor: usize, current: usize },
    /// Secondary button held after pressing on an entity
    DraggingRelation {
        source: Span,
        origin: Vec2,
        pointer: Vec2,
    },
}

/// Type picker waiting for the user, positioned in canvas coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum TypePrompt {
    Entity { span: Span, anchor: Vec2 },
    Relation {
        source: Span,
        target: Span,
        anchor: Vec2,
    },
}

impl TypePrompt {
    pub fn anchor(&self) -> Vec2 {
        match self {
            TypePrompt::Entity { anchor, .. } | TypePrompt::Relation { anchor, .. } => *anchor,
        }
    }
}

/// Everything the canvas remembers between frames
#[derive(Resource, Debug, Default, PartialEq)]
pub struct InteractionState {
    pub gesture: Gesture,
    pub selected_entity: Option<Span>,
    pub selected_tokens: Option<Span>,
    pub pending_prompt: Option<TypePrompt>,
}

impl InteractionState {
    /// Pointer input is ignored while a prompt waits for an answer
    fn accepts_pointer(&self) -> bool {
        self.pending_prompt.is_none()
    }

    /// Primary press: toggles an entity, or starts a token selection
    pub fn primary_down(&mut self, token: Option<TokenHit>, entity: Option<EntityHit>) {
        if !self.accepts_pointer() || self.gesture != Gesture::Idle {
            return;
        }

        if let Some(entity) = entity {
            self.selected_tokens = None;
            self.selected_entity = if self.selected_entity == Some(entity.span) {
                None
            } else {
                Some(entity.span)
            };
            return;
        }

        if let Some(token) = token {
            self.selected_entity = None;
            self.selected_tokens = Some(Span::single(token.global));
            self.gesture = Gesture::SelectingTokens {
                anchor: token.global,
                current: token.global,
            };
        }
    }

    /// Secondary press on an entity starts dragging a relation from it
    pub fn secondary_down(&mut self, entity: Option<EntityHit>, pointer: Vec2) {
        if !self.accepts_pointer() || self.gesture != Gesture::Idle {
            return;
        }
        if let Some(entity) = entity {
            self.gesture = Gesture::DraggingRelation {
                source: entity.span,
                origin: entity.centroid,
                pointer,
            };
        }
    }

    pub fn pointer_moved(&mut self, token: Option<TokenHit>, pointer: Vec2) {
        match &mut self.gesture {
            Gesture::SelectingTokens { anchor, current } => {
                if let Some(token) = token {
                    *current = token.global;
                    self.selected_tokens = Some(Span::new(*anchor, token.global));
                }
            }
            Gesture::DraggingRelation { pointer: end, .. } => *end = pointer,
            Gesture::Idle => {}
        }
    }

    /// Release ends the gesture and may open a type prompt.
    ///
    /// `token_rect` looks up the box of a token so the entity prompt can sit
    /// under the first selected token.
    pub fn pointer_up(
        &mut self,
        entity: Option<EntityHit>,
        pointer: Vec2,
        token_rect: impl Fn(usize) -> Option<Rect>,
    ) {
        match std::mem::take(&mut self.gesture) {
            Gesture::SelectingTokens { anchor, current } => {
                let span = Span::new(anchor, current);
                self.selected_tokens = Some(span);
                let anchor = token_rect(span.start)
                    .map(|rect| Vec2::new(rect.min.x, rect.max.y + PROMPT_OFFSET))
                    .unwrap_or(pointer);
                self.pending_prompt = Some(TypePrompt::Entity { span, anchor });
            }
            Gesture::DraggingRelation { source, .. } => match entity {
                Some(target) if target.span != source => {
                    self.pending_prompt = Some(TypePrompt::Relation {
                        source,
                        target: target.span,
                        anchor: pointer,
                    });
                }
                _ => debug!("Relation drag from {} cancelled", source),
            },
            Gesture::Idle => {}
        }
    }

    /// Answer the pending prompt with `label`.
    ///
    /// Returns the edit to apply; blank labels leave the prompt open.
    pub fn confirm_prompt(&mut self, label: &str) -> Option<EditRequest> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        let request = match self.pending_prompt.take()? {
            TypePrompt::Entity { span, .. } => {
                self.selected_tokens = None;
                EditRequest::AddEntity {
                    span,
                    label: label.to_string(),
                }
            }
            TypePrompt::Relation { source, target, .. } => EditRequest::AddRelation {
                source,
                target,
                label: label.to_string(),
            },
        };
        Some(request)
    }

    /// Close the prompt without an edit; a token selection stays selected
    pub fn cancel_prompt(&mut self) {
        self.pending_prompt = None;
    }

    /// The delete key: the selected entity first, else the selected tokens.
    ///
    /// An open entity prompt is dismissed in favour of deleting its tokens.
    pub fn delete_selection(&mut self) -> Option<EditRequest> {
        if self.gesture != Gesture::Idle {
            return None;
        }
        match self.pending_prompt {
            None => {}
            Some(TypePrompt::Entity { .. }) => self.pending_prompt = None,
            Some(TypePrompt::Relation { .. }) => return None,
        }
        if let Some(span) = self.selected_entity.take() {
            return Some(EditRequest::DeleteEntity { span });
        }
        self.selected_tokens
            .take()
            .map(|span| EditRequest::DeleteTokens { span })
    }

    /// Drop any gesture, prompt and selection
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_idle(&self) -> bool {
        self.gesture == Gesture::Idle && self.pending_prompt.is_none()
    }
}
