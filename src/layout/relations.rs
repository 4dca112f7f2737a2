//! Relation arrow anchors, curve control points and label placement.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::annotation::{Document, RelationKey, Span};
use crate::constants::{
    ARROW_SIZE, CURVE_FLAT_THRESHOLD, CURVE_MAX_HEIGHT, CURVE_MIN_HEIGHT, CURVE_SEGMENTS,
    LABEL_MIN_TOP, LABEL_OFFSET, LABEL_PADDING, VIEWPORT_INSET,
};

use super::engine::EntityBox;
use super::geometry::{arrow_head, bezier_points, rects_overlap, Geometry};
use super::{FontMetrics, Viewport};

/// How far the transient drag curve bows upward
const DRAG_CURVE_HEIGHT: f32 = 50.0;

/// Alternative label offsets tried, in multiples of the label height
const LABEL_NUDGES: [f32; 5] = [0.0, -1.0, 1.0, -2.0, 2.0];

/// Screen geometry of one non-dangling relation
#[derive(Debug, Clone, PartialEq)]
pub struct RelationGeometry {
    /// Position in `Document::relations`
    pub index: usize,
    pub key: RelationKey,
    pub label: String,
    /// Centroid of the source entity
    pub source: Vec2,
    /// Centroid of the target entity
    pub target: Vec2,
    /// Inner Bézier control points
    pub controls: [Vec2; 2],
    pub label_rect: Rect,
}

impl RelationGeometry {
    pub fn label_anchor(&self) -> Vec2 {
        self.label_rect.center()
    }

    pub fn curve(&self) -> Vec<Vec2> {
        bezier_points(
            self.source,
            self.controls[0],
            self.controls[1],
            self.target,
            CURVE_SEGMENTS,
        )
    }

    pub fn arrow_head(&self) -> [Vec2; 3] {
        arrow_head(self.controls[1], self.target, ARROW_SIZE)
    }

    /// Topmost and bottommost y touched by the arrow or its label
    pub fn vertical_extent(&self) -> (f32, f32) {
        let ys = [
            self.source.y,
            self.target.y,
            self.controls[0].y,
            self.controls[1].y,
            self.label_rect.min.y,
            self.label_rect.max.y,
        ];
        let top = ys.iter().copied().fold(f32::INFINITY, f32::min);
        let bottom = ys.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        (top, bottom)
    }

    pub fn involves(&self, span: Span) -> bool {
        self.key.source == span || self.key.target == span
    }
}

/// Curve for a relation being dragged from `origin` to the pointer
pub fn drag_curve(origin: Vec2, pointer: Vec2) -> Vec<Vec2> {
    let delta = pointer - origin;
    bezier_points(
        origin,
        Vec2::new(origin.x + delta.x * 0.25, origin.y - DRAG_CURVE_HEIGHT),
        Vec2::new(origin.x + delta.x * 0.75, pointer.y - DRAG_CURVE_HEIGHT),
        pointer,
        CURVE_SEGMENTS,
    )
}

/// Inner control points for an arrow between two centroids.
///
/// Endpoints on roughly the same line get an upward bow that grows with
/// distance; others get control points along the straight line. Both are
/// kept inside the viewport.
pub fn control_points(source: Vec2, target: Vec2, viewport: Viewport) -> [Vec2; 2] {
    let delta = target - source;
    let max_x = (viewport.width - VIEWPORT_INSET).max(VIEWPORT_INSET);
    let max_y = (viewport.height - VIEWPORT_INSET).max(VIEWPORT_INSET);
    let clamp_x = |x: f32| x.clamp(VIEWPORT_INSET, max_x);
    let clamp_y = |y: f32| y.clamp(VIEWPORT_INSET, max_y);

    let x1 = clamp_x(source.x + delta.x * 0.25);
    let x2 = clamp_x(source.x + delta.x * 0.75);

    if delta.y.abs() < CURVE_FLAT_THRESHOLD {
        let room = source.y.min(target.y) - VIEWPORT_INSET;
        let bow = (delta.length() / 4.0)
            .min(CURVE_MAX_HEIGHT)
            .min(room.max(CURVE_MIN_HEIGHT));
        [
            Vec2::new(x1, (source.y - bow).max(VIEWPORT_INSET)),
            Vec2::new(x2, (target.y - bow).max(VIEWPORT_INSET)),
        ]
    } else {
        [
            Vec2::new(x1, clamp_y(source.y + delta.y * 0.25)),
            Vec2::new(x2, clamp_y(source.y + delta.y * 0.75)),
        ]
    }
}

/// Preferred label centre: above the higher endpoint, or between the two
/// when the entities do not share any vertical extent.
fn label_anchor(source: &Geometry, target: &Geometry) -> Vec2 {
    let source_center = source.centroid();
    let target_center = target.centroid();
    let x = (source_center.x + target_center.x) / 2.0;

    let separated = source.top() > target.bottom() || target.top() > source.bottom();
    let y = if separated {
        (source_center.y + target_center.y) / 2.0
    } else {
        source.top().min(target.top()) - LABEL_OFFSET
    };
    Vec2::new(x, y)
}

/// Geometry for every relation whose endpoints both have visible entities.
///
/// Labels are placed in list order; a label that would overlap one already
/// placed is nudged up or down by its own height. Label centres stay at
/// least `LABEL_MIN_TOP` below the viewport top and label boxes stay inside
/// the viewport bottom.
pub(super) fn place_relations(
    document: &Document,
    entities: &[EntityBox],
    viewport: Viewport,
    metrics: &impl FontMetrics,
) -> Vec<RelationGeometry> {
    let mut by_span: HashMap<Span, &Geometry> = HashMap::with_capacity(entities.len());
    for entity in entities {
        by_span.entry(entity.span).or_insert(&entity.geometry);
    }

    let label_height = metrics.line_height() + 2.0;
    let mut placed_labels: Vec<Rect> = Vec::new();
    let mut relations = Vec::new();

    for (index, relation) in document.relations.iter().enumerate() {
        if document.is_dangling(relation) {
            continue;
        }
        let (Some(source_geometry), Some(target_geometry)) =
            (by_span.get(&relation.source), by_span.get(&relation.target))
        else {
            continue;
        };

        let source = source_geometry.centroid();
        let target = target_geometry.centroid();
        let anchor = label_anchor(source_geometry, target_geometry);

        let size = Vec2::new(
            metrics.text_width(&relation.label) + LABEL_PADDING * 2.0,
            label_height,
        );
        let half_width = size.x / 2.0;
        let anchor_x = if viewport.width > size.x + VIEWPORT_INSET * 2.0 {
            anchor
                .x
                .clamp(VIEWPORT_INSET + half_width, viewport.width - VIEWPORT_INSET - half_width)
        } else {
            anchor.x
        };

        let max_y = (viewport.height - VIEWPORT_INSET - label_height / 2.0).max(LABEL_MIN_TOP);
        let candidate = |nudge: f32| {
            let y = (anchor.y + nudge * label_height).clamp(LABEL_MIN_TOP, max_y);
            Rect::from_center_size(Vec2::new(anchor_x, y), size)
        };
        let label_rect = LABEL_NUDGES
            .iter()
            .map(|&nudge| candidate(nudge))
            .find(|rect| !placed_labels.iter().any(|placed| rects_overlap(*rect, *placed)))
            .unwrap_or_else(|| candidate(0.0));
        placed_labels.push(label_rect);

        relations.push(RelationGeometry {
            index,
            key: relation.key(),
            label: relation.label.clone(),
            source,
            target,
            controls: control_points(source, target, viewport),
            label_rect,
        });
    }

    relations
}
