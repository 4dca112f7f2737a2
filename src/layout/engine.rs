//! Word-wrapping token layout and entity box derivation.

use bevy::prelude::*;
use std::collections::BTreeMap;

use crate::annotation::{Document, Span};
use crate::constants::{
    BOTTOM_PADDING, LINE_PADDING, MARGIN_LEFT, MARGIN_RIGHT, MARGIN_TOP, SENTENCE_GAP, TOKEN_GAP,
    TOKEN_PADDING, VIEWPORT_BUFFER,
};

use super::geometry::Geometry;
use super::relations::{place_relations, RelationGeometry};
use super::{FontMetrics, Viewport};

/// Screen box of one rendered token
#[derive(Debug, Clone, PartialEq)]
pub struct TokenBox {
    pub global: usize,
    pub sentence: usize,
    pub position: usize,
    /// Visual row, counted from the top of the document
    pub row: usize,
    pub rect: Rect,
}

/// Screen geometry of one entity with at least one visible token
#[derive(Debug, Clone, PartialEq)]
pub struct EntityBox {
    /// Position in `Document::entities`
    pub index: usize,
    pub span: Span,
    pub label: String,
    pub geometry: Geometry,
}

/// Full-document geometry for one (document, viewport, scroll) triple.
///
/// Coordinates are relative to the viewport's top-left corner, so anything
/// above the visible area has a negative y.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    pub viewport: Viewport,
    pub scroll_y: f32,
    pub line_height: f32,
    /// Rendered tokens in ascending global order
    pub tokens: Vec<TokenBox>,
    /// Entities in document list order
    pub entities: Vec<EntityBox>,
    /// Non-dangling relations in document list order
    pub relations: Vec<RelationGeometry>,
    /// Height of the whole document, independent of scroll
    pub content_height: f32,
}

/// Largest useful scroll offset for a document of `content_height`
pub fn max_scroll(content_height: f32, viewport_height: f32) -> f32 {
    (content_height - viewport_height).max(0.0)
}

impl LayoutResult {
    pub fn max_scroll(&self) -> f32 {
        max_scroll(self.content_height, self.viewport.height)
    }

    pub fn token_box(&self, global: usize) -> Option<&TokenBox> {
        self.tokens
            .binary_search_by_key(&global, |t| t.global)
            .ok()
            .map(|i| &self.tokens[i])
    }

    pub fn entity_box(&self, span: Span) -> Option<&EntityBox> {
        self.entities.iter().find(|e| e.span == span)
    }

    /// Whether a vertical extent falls in the viewport plus the draw buffer
    pub fn is_visible(&self, top: f32, bottom: f32) -> bool {
        bottom >= -VIEWPORT_BUFFER && top <= self.viewport.height + VIEWPORT_BUFFER
    }

    pub fn visible_tokens(&self) -> impl Iterator<Item = &TokenBox> {
        self.tokens
            .iter()
            .filter(|t| self.is_visible(t.rect.min.y, t.rect.max.y))
    }

    pub fn visible_entities(&self) -> impl Iterator<Item = &EntityBox> {
        self.entities
            .iter()
            .filter(|e| self.is_visible(e.geometry.top(), e.geometry.bottom()))
    }

    pub fn visible_relations(&self) -> impl Iterator<Item = &RelationGeometry> {
        self.relations.iter().filter(|r| {
            let (top, bottom) = r.vertical_extent();
            self.is_visible(top, bottom)
        })
    }
}

/// Lay out a whole document.
///
/// Tokens flow left to right and wrap when they would cross the right
/// margin, unless they are the first token on their line. Every sentence
/// after the first starts a new line after an extra gap. Empty tokens get
/// no box but keep their global index.
pub fn layout(
    document: &Document,
    viewport: Viewport,
    scroll_y: f32,
    metrics: &impl FontMetrics,
) -> LayoutResult {
    let font_height = metrics.line_height();
    let line_height = font_height + LINE_PADDING;
    let token_height = font_height + LINE_PADDING / 2.0;
    let wrap_limit = viewport.width - MARGIN_RIGHT;

    let mut tokens = Vec::with_capacity(document.token_count());
    let mut x = MARGIN_LEFT;
    let mut y = MARGIN_TOP - scroll_y;
    let mut row = 0;
    let mut line_has_tokens = false;
    let mut global = 0;

    for (sentence, words) in document.sentences.iter().enumerate() {
        if sentence > 0 {
            x = MARGIN_LEFT;
            y += line_height + SENTENCE_GAP;
            row += 1;
            line_has_tokens = false;
        }

        for (position, text) in words.iter().enumerate() {
            let index = global;
            global += 1;
            if text.is_empty() {
                continue;
            }

            let width = metrics.text_width(text) + TOKEN_PADDING;
            if line_has_tokens && x + width > wrap_limit {
                x = MARGIN_LEFT;
                y += line_height;
                row += 1;
            }

            tokens.push(TokenBox {
                global: index,
                sentence,
                position,
                row,
                rect: Rect::new(x, y, x + width, y + token_height),
            });
            x += width + TOKEN_GAP;
            line_has_tokens = true;
        }
    }

    let entities = entity_boxes(document, &tokens);
    let relations = place_relations(document, &entities, viewport, metrics);
    let content_height = y + scroll_y + line_height + BOTTOM_PADDING;

    LayoutResult {
        viewport,
        scroll_y,
        line_height,
        tokens,
        entities,
        relations,
        content_height,
    }
}

/// Group each entity's token boxes by row and bound each row tightly
fn entity_boxes(document: &Document, tokens: &[TokenBox]) -> Vec<EntityBox> {
    document
        .entities
        .iter()
        .enumerate()
        .filter_map(|(index, entity)| {
            let first = tokens.partition_point(|t| t.global < entity.span.start);
            let mut rows: BTreeMap<usize, Rect> = BTreeMap::new();
            for token in tokens[first..]
                .iter()
                .take_while(|t| t.global <= entity.span.end)
            {
                rows.entry(token.row)
                    .and_modify(|r| *r = r.union(token.rect))
                    .or_insert(token.rect);
            }
            let geometry = Geometry::from_rows(rows.into_values().collect())?;
            Some(EntityBox {
                index,
                span: entity.span,
                label: entity.label.clone(),
                geometry,
            })
        })
        .collect()
}
