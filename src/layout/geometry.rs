//! Geometry shapes and curve helpers shared by layout, hit testing and rendering.

use bevy::prelude::*;

/// Half-open containment: `min <= p < max` on both axes
pub fn rect_contains(rect: Rect, point: Vec2) -> bool {
    point.x >= rect.min.x && point.x < rect.max.x && point.y >= rect.min.y && point.y < rect.max.y
}

/// Strict overlap of two rectangles (touching edges do not count)
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && b.min.x < a.max.x && a.min.y < b.max.y && b.min.y < a.max.y
}

/// On-screen shape of one entity.
///
/// An entity whose tokens sit on one visual row gets a single box; one that
/// wraps gets a box per row, ordered top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Single(Rect),
    Multi(Vec<Rect>),
}

impl Geometry {
    /// Build from per-row boxes; `None` when there are none
    pub fn from_rows(mut rows: Vec<Rect>) -> Option<Self> {
        match rows.len() {
            0 => None,
            1 => rows.pop().map(Geometry::Single),
            _ => Some(Geometry::Multi(rows)),
        }
    }

    pub fn rects(&self) -> &[Rect] {
        match self {
            Geometry::Single(rect) => std::slice::from_ref(rect),
            Geometry::Multi(rects) => rects,
        }
    }

    /// Mean of the row box centres
    pub fn centroid(&self) -> Vec2 {
        match self {
            Geometry::Single(rect) => rect.center(),
            Geometry::Multi(rects) => {
                let sum: Vec2 = rects.iter().map(|r| r.center()).sum();
                sum / rects.len().max(1) as f32
            }
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Geometry::Single(rect) => *rect,
            Geometry::Multi(rects) => rects
                .iter()
                .copied()
                .reduce(|acc, r| acc.union(r))
                .unwrap_or_default(),
        }
    }

    pub fn top(&self) -> f32 {
        self.bounds().min.y
    }

    pub fn bottom(&self) -> f32 {
        self.bounds().max.y
    }

    /// Whether any row box contains the point
    pub fn contains(&self, point: Vec2) -> bool {
        match self {
            Geometry::Single(rect) => rect_contains(*rect, point),
            Geometry::Multi(rects) => rects.iter().any(|r| rect_contains(*r, point)),
        }
    }
}

/// Sample a cubic Bézier curve at `segments + 1` evenly spaced parameters
pub fn bezier_points(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, segments: usize) -> Vec<Vec2> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            let u = 1.0 - t;
            p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
        })
        .collect()
}

/// Triangle for an arrow head at `tip`, pointing away from `from`
pub fn arrow_head(from: Vec2, tip: Vec2, size: f32) -> [Vec2; 3] {
    let direction = (tip - from).normalize_or_zero();
    if direction == Vec2::ZERO {
        return [tip; 3];
    }
    let normal = direction.perp();
    let base = tip - direction * size;
    [tip, base + normal * size * 0.5, base - normal * size * 0.5]
}
