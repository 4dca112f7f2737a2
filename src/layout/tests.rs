//! Unit tests for layout and hit testing.

use bevy::prelude::*;

use super::*;
use crate::annotation::{Document, Span};

fn doc(sentences: &[&[&str]]) -> Document {
    Document::new(
        "doc",
        sentences
            .iter()
            .map(|s| s.iter().map(|t| t.to_string()).collect())
            .collect(),
    )
}

fn metrics() -> MonospaceMetrics {
    MonospaceMetrics::default()
}

#[test]
fn test_layout_is_deterministic() {
    let mut document = doc(&[&["alpha", "beta", "gamma", "delta"], &["epsilon", "zeta"]]);
    document.add_entity(Span::new(1, 2), "X");
    document.add_entity(Span::single(4), "Y");
    document.add_relation(Span::new(1, 2), Span::single(4), "R");

    let first = layout(&document, Viewport::new(120.0, 400.0), 0.0, &metrics());
    let second = layout(&document, Viewport::new(120.0, 400.0), 0.0, &metrics());
    assert_eq!(first, second);
}

#[test]
fn test_tokens_wrap_at_right_margin() {
    let document = doc(&[&["aaaa", "bbbb", "cccc"]]);
    let result = layout(&document, Viewport::new(100.0, 400.0), 0.0, &metrics());

    let rows: Vec<usize> = result.tokens.iter().map(|t| t.row).collect();
    assert_eq!(rows, vec![0, 0, 1]);
    assert_eq!(result.tokens[2].rect.min.x, 10.0);
    assert_eq!(result.tokens[2].rect.min.y, 34.0);
}

#[test]
fn test_over_wide_token_placed_without_wrapping() {
    let document = doc(&[&["aaaaaaaaaa", "bbbbbbbbbb"]]);
    let result = layout(&document, Viewport::new(50.0, 400.0), 0.0, &metrics());

    assert_eq!(result.tokens[0].row, 0);
    assert_eq!(result.tokens[0].rect.min.x, 10.0);
    assert_eq!(result.tokens[1].row, 1);
}

#[test]
fn test_sentence_break_adds_gap() {
    let document = doc(&[&["a"], &["b"]]);
    let result = layout(&document, Viewport::new(400.0, 400.0), 0.0, &metrics());

    assert_eq!(result.tokens[0].rect.min.y, 10.0);
    assert_eq!(result.tokens[1].rect.min.y, 44.0);
    assert_eq!(result.tokens[1].rect.min.x, 10.0);
}

#[test]
fn test_empty_token_keeps_global_index() {
    let document = doc(&[&["a", "", "b"]]);
    let result = layout(&document, Viewport::new(400.0, 400.0), 0.0, &metrics());

    let globals: Vec<usize> = result.tokens.iter().map(|t| t.global).collect();
    assert_eq!(globals, vec![0, 2]);
}

#[test]
fn test_entity_on_one_row_is_single_tight_box() {
    let mut document = doc(&[&["aaaa", "bbbb", "cccc"]]);
    document.add_entity(Span::new(0, 1), "X");
    let result = layout(&document, Viewport::new(100.0, 400.0), 0.0, &metrics());

    let expected = result.tokens[0].rect.union(result.tokens[1].rect);
    assert_eq!(result.entities[0].geometry, Geometry::Single(expected));
}

#[test]
fn test_entity_across_wrap_has_box_per_row() {
    let mut document = doc(&[&["aaaa", "bbbb", "cccc"]]);
    document.add_entity(Span::new(1, 2), "X");
    let result = layout(&document, Viewport::new(100.0, 400.0), 0.0, &metrics());

    match &result.entities[0].geometry {
        Geometry::Multi(rects) => {
            assert_eq!(rects.len(), 2);
            assert_eq!(rects[0], result.tokens[1].rect);
            assert_eq!(rects[1], result.tokens[2].rect);
        }
        Geometry::Single(_) => panic!("expected a multi-row entity"),
    }
}

#[test]
fn test_multi_geometry_bounds() {
    let rows = Geometry::Multi(vec![
        Rect::new(40.0, 10.0, 90.0, 30.0),
        Rect::new(10.0, 44.0, 30.0, 64.0),
    ]);
    assert_eq!(rows.bounds(), Rect::new(10.0, 10.0, 90.0, 64.0));
    assert_eq!(Geometry::Multi(Vec::new()).bounds(), Rect::default());
}

#[test]
fn test_entity_without_visible_tokens_has_no_geometry() {
    let mut document = doc(&[&["a", "", "b"]]);
    document.add_entity(Span::single(1), "X");
    let result = layout(&document, Viewport::new(400.0, 400.0), 0.0, &metrics());
    assert!(result.entities.is_empty());
}

#[test]
fn test_content_height_ignores_scroll() {
    let document = doc(&[&["a"]]);
    let unscrolled = layout(&document, Viewport::new(400.0, 20.0), 0.0, &metrics());
    let scrolled = layout(&document, Viewport::new(400.0, 20.0), 30.0, &metrics());

    assert_eq!(unscrolled.content_height, 54.0);
    assert_eq!(scrolled.content_height, 54.0);
    assert_eq!(scrolled.tokens[0].rect.min.y, -20.0);
    assert_eq!(unscrolled.max_scroll(), 34.0);
}

#[test]
fn test_max_scroll_never_negative() {
    assert_eq!(max_scroll(50.0, 400.0), 0.0);
    assert_eq!(max_scroll(500.0, 100.0), 400.0);
}

#[test]
fn test_visible_tokens_bounded_by_buffer() {
    let sentences: Vec<Vec<String>> = (0..100).map(|i| vec![format!("t{}", i)]).collect();
    let document = Document::new("doc", sentences);
    let result = layout(&document, Viewport::new(400.0, 100.0), 0.0, &metrics());

    assert_eq!(result.tokens.len(), 100);
    assert_eq!(result.visible_tokens().count(), 9);
}

#[test]
fn test_dangling_relation_is_skipped() {
    let mut document = doc(&[&["a", "b", "c"]]);
    document.add_entity(Span::single(0), "X");
    document.add_relation(Span::single(0), Span::single(2), "R");
    let result = layout(&document, Viewport::new(400.0, 400.0), 0.0, &metrics());

    assert!(result.relations.is_empty());
}

#[test]
fn test_relation_label_clamped_below_top() {
    let mut document = doc(&[&["a", "b", "c"]]);
    document.add_entity(Span::single(0), "X");
    document.add_entity(Span::single(2), "Y");
    document.add_relation(Span::single(0), Span::single(2), "R");
    let result = layout(&document, Viewport::new(400.0, 400.0), 0.0, &metrics());

    let relation = &result.relations[0];
    let source = result.tokens[0].rect.center();
    let target = result.tokens[2].rect.center();
    assert_eq!(relation.source, source);
    assert_eq!(relation.target, target);
    assert_eq!(relation.label_anchor().x, (source.x + target.x) / 2.0);
    assert_eq!(relation.label_anchor().y, 25.0);
}

#[test]
fn test_relation_label_between_separated_entities() {
    let mut document = doc(&[&["a"], &["b"], &["c"]]);
    document.add_entity(Span::single(0), "X");
    document.add_entity(Span::single(2), "Y");
    document.add_relation(Span::single(0), Span::single(2), "R");
    let result = layout(&document, Viewport::new(400.0, 400.0), 0.0, &metrics());

    let relation = &result.relations[0];
    assert_eq!(
        relation.label_anchor().y,
        (relation.source.y + relation.target.y) / 2.0
    );
}

#[test]
fn test_relation_label_clamped_to_viewport_bottom() {
    let sentences = vec![&["a"][..]; 8];
    let mut document = doc(&sentences);
    document.add_entity(Span::single(0), "X");
    document.add_entity(Span::single(7), "Y");
    document.add_relation(Span::single(0), Span::single(7), "R");
    let result = layout(&document, Viewport::new(400.0, 100.0), 0.0, &metrics());

    let label = result.relations[0].label_rect;
    assert!(label.max.y <= 100.0 - crate::constants::VIEWPORT_INSET);
    assert!(label.center().y >= crate::constants::LABEL_MIN_TOP);
}

#[test]
fn test_separated_label_clamped_below_viewport_top() {
    let mut document = doc(&[&["a"], &["b"], &["c"], &["d"], &["e"]]);
    document.add_entity(Span::single(0), "X");
    document.add_entity(Span::single(2), "Y");
    document.add_relation(Span::single(0), Span::single(2), "R");
    // Both entities scrolled above the top edge
    let result = layout(&document, Viewport::new(400.0, 400.0), 150.0, &metrics());

    let relation = &result.relations[0];
    assert!(relation.target.y < 0.0);
    assert_eq!(relation.label_anchor().y, crate::constants::LABEL_MIN_TOP);
}

#[test]
fn test_overlapping_labels_are_nudged_apart() {
    let mut document = doc(&[&["a", "b", "c"]]);
    document.add_entity(Span::single(0), "X");
    document.add_entity(Span::single(2), "Y");
    document.add_relation(Span::single(0), Span::single(2), "R");
    document.add_relation(Span::single(2), Span::single(0), "S");
    let result = layout(&document, Viewport::new(400.0, 400.0), 0.0, &metrics());

    let first = result.relations[0].label_rect;
    let second = result.relations[1].label_rect;
    assert!(!geometry::rects_overlap(first, second));
}

#[test]
fn test_control_points_stay_inside_viewport() {
    let mut document = doc(&[&["a", "b", "c"]]);
    document.add_entity(Span::single(0), "X");
    document.add_entity(Span::single(2), "Y");
    document.add_relation(Span::single(0), Span::single(2), "R");
    let result = layout(&document, Viewport::new(400.0, 400.0), 0.0, &metrics());

    for control in result.relations[0].controls {
        assert!(control.y >= 10.0);
        assert!(control.x >= 10.0 && control.x <= 390.0);
    }
}

#[test]
fn test_bezier_endpoints() {
    let points = geometry::bezier_points(
        Vec2::ZERO,
        Vec2::new(10.0, -10.0),
        Vec2::new(20.0, -10.0),
        Vec2::new(30.0, 0.0),
        30,
    );
    assert_eq!(points.len(), 31);
    assert_eq!(points[0], Vec2::ZERO);
    assert_eq!(points[30], Vec2::new(30.0, 0.0));
}

#[test]
fn test_hit_test_finds_token_and_misses_gap() {
    let document = doc(&[&["aaaa", "bbbb", "cccc"]]);
    let result = layout(&document, Viewport::new(100.0, 400.0), 0.0, &metrics());
    let index = HitTestIndex::build(&result);

    let inside = result.tokens[1].rect.center();
    assert_eq!(index.token_at(inside).map(|t| t.global), Some(1));

    // Between the two tokens on the first row
    let gap = Vec2::new(result.tokens[0].rect.max.x + 1.0, inside.y);
    assert!(index.token_at(gap).is_none());

    // Between rows
    let between_rows = Vec2::new(20.0, result.tokens[0].rect.max.y + 1.0);
    assert!(index.token_at(between_rows).is_none());
}

#[test]
fn test_hit_test_checks_every_row_of_multi_row_entity() {
    let mut document = doc(&[&["aaaa", "bbbb", "cccc"]]);
    document.add_entity(Span::new(1, 2), "X");
    let result = layout(&document, Viewport::new(100.0, 400.0), 0.0, &metrics());
    let index = HitTestIndex::build(&result);

    let second_row = result.tokens[2].rect.center();
    let hit = index.entity_at(second_row).unwrap();
    assert_eq!(hit.span, Span::new(1, 2));
    assert_eq!(hit.centroid, result.entities[0].geometry.centroid());
}

#[test]
fn test_hit_test_first_entity_in_document_order_wins() {
    let mut document = doc(&[&["aaaa", "bbbb", "cccc"]]);
    document.add_entity(Span::single(1), "Inner");
    document.add_entity(Span::new(0, 1), "Outer");
    let result = layout(&document, Viewport::new(400.0, 400.0), 0.0, &metrics());
    let index = HitTestIndex::build(&result);

    let hit = index.entity_at(result.tokens[1].rect.center()).unwrap();
    assert_eq!(hit.index, 0);
    assert_eq!(hit.span, Span::single(1));

    let hit = index.entity_at(result.tokens[0].rect.center()).unwrap();
    assert_eq!(hit.span, Span::new(0, 1));
}
