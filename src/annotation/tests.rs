//! Unit tests for the annotation model.

use std::collections::BTreeSet;

use super::*;

fn sentence(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

/// Two sentences: "A B C D" and "E F G H I"
fn sample_document() -> Document {
    Document::new(
        "doc",
        vec![
            sentence(&["A", "B", "C", "D"]),
            sentence(&["E", "F", "G", "H", "I"]),
        ],
    )
}

fn indices(items: &[usize]) -> BTreeSet<usize> {
    items.iter().copied().collect()
}

#[test]
fn test_global_index_continuity() {
    let doc = sample_document();
    let globals: Vec<usize> = doc.tokens().map(|t| t.global).collect();
    assert_eq!(globals, (0..doc.token_count()).collect::<Vec<_>>());
}

#[test]
fn test_locate_and_global_index_agree() {
    let doc = sample_document();
    for token in doc.tokens() {
        assert_eq!(doc.locate(token.global), Some((token.sentence, token.position)));
        assert_eq!(
            doc.global_index(token.sentence, token.position),
            Some(token.global)
        );
    }
    assert_eq!(doc.locate(9), None);
    assert_eq!(doc.global_index(1, 5), None);
}

#[test]
fn test_span_text_joins_tokens() {
    let doc = sample_document();
    assert_eq!(doc.span_text(Span::new(3, 5)), "D E F");
}

#[test]
fn test_add_entity_overwrites_label_on_same_span() {
    let mut doc = sample_document();
    assert_eq!(doc.add_entity(Span::new(0, 1), "X"), None);
    assert_eq!(doc.add_entity(Span::new(0, 1), "Y"), Some("X".to_string()));

    assert_eq!(doc.entities.len(), 1);
    assert_eq!(doc.entities[0].label, "Y");
}

#[test]
fn test_remove_entity_absent_is_noop() {
    let mut doc = sample_document();
    doc.add_entity(Span::new(0, 1), "X");
    assert!(doc.remove_entity(Span::new(2, 3)).is_none());
    assert_eq!(doc.entities.len(), 1);
}

#[test]
fn test_add_relation_without_entities() {
    let mut doc = sample_document();
    assert_eq!(doc.add_relation(Span::new(0, 1), Span::single(2), "R"), None);
    assert_eq!(doc.relations.len(), 1);
    assert!(doc.is_dangling(&doc.relations[0]));
}

#[test]
fn test_cascade_delete_scenario() {
    let mut doc = sample_document();
    doc.add_entity(Span::new(0, 1), "X");
    doc.add_entity(Span::single(2), "Y");
    doc.add_relation(Span::new(0, 1), Span::single(2), "R");

    let removal = doc.delete_entity_cascade(Span::new(0, 1)).unwrap();

    assert_eq!(removal.relations.len(), 1);
    assert_eq!(doc.entities, vec![NamedEntity::new(Span::single(2), "Y")]);
    assert!(doc.relations.is_empty());
}

#[test]
fn test_cascade_delete_removes_every_reference() {
    let mut doc = sample_document();
    let hub = Span::new(0, 1);
    doc.add_entity(hub, "X");
    doc.add_entity(Span::single(2), "Y");
    doc.add_entity(Span::single(5), "Z");
    doc.add_relation(hub, Span::single(2), "R1");
    doc.add_relation(Span::single(5), hub, "R2");
    doc.add_relation(Span::single(2), Span::single(5), "R3");

    doc.delete_entity_cascade(hub).unwrap();

    assert!(doc.relations.iter().all(|r| !r.involves(hub)));
    assert_eq!(doc.relations.len(), 1);
    assert_eq!(doc.relations[0].label, "R3");
}

#[test]
fn test_cascade_delete_missing_entity_removes_nothing() {
    let mut doc = sample_document();
    doc.add_relation(Span::new(0, 1), Span::single(2), "R");
    assert!(doc.delete_entity_cascade(Span::new(0, 1)).is_none());
    assert_eq!(doc.relations.len(), 1);
}

#[test]
fn test_restore_entity_removal_restores_order() {
    let mut doc = sample_document();
    doc.add_entity(Span::single(0), "A");
    doc.add_entity(Span::single(1), "B");
    doc.add_entity(Span::single(2), "C");
    doc.add_relation(Span::single(0), Span::single(2), "R1");
    doc.add_relation(Span::single(1), Span::single(2), "R2");
    doc.add_relation(Span::single(0), Span::single(1), "R3");
    let before = doc.clone();

    let removal = doc.delete_entity_cascade(Span::single(1)).unwrap();
    doc.restore_entity_removal(&removal);

    assert_eq!(doc, before);
}

#[test]
fn test_delete_token_inside_entity_drops_it() {
    let mut doc = sample_document();
    doc.add_entity(Span::new(2, 5), "X");

    let removal = doc.delete_token_range(&indices(&[3]));

    assert!(doc.entities.is_empty());
    assert_eq!(removal.entities.len(), 1);
    assert_eq!(removal.processed(), 1);
}

#[test]
fn test_delete_token_after_entity_leaves_it_unchanged() {
    let mut doc = sample_document();
    doc.add_entity(Span::new(2, 5), "X");

    doc.delete_token_range(&indices(&[7]));

    assert_eq!(doc.entities[0].span, Span::new(2, 5));
    assert_eq!(doc.token_count(), 8);
}

#[test]
fn test_delete_token_before_entity_shifts_it() {
    let mut doc = sample_document();
    doc.add_entity(Span::new(5, 6), "X");
    doc.add_entity(Span::single(8), "Y");
    doc.add_relation(Span::new(5, 6), Span::single(8), "R");

    doc.delete_token_range(&indices(&[0, 4]));

    assert_eq!(doc.entities[0].span, Span::new(3, 4));
    assert_eq!(doc.entities[1].span, Span::single(6));
    assert_eq!(doc.relations[0].source, Span::new(3, 4));
    assert_eq!(doc.relations[0].target, Span::single(6));
    assert_eq!(doc.sentences[0], sentence(&["B", "C", "D"]));
    assert_eq!(doc.sentences[1], sentence(&["F", "G", "H", "I"]));
}

#[test]
fn test_delete_token_drops_relation_with_deleted_endpoint() {
    let mut doc = sample_document();
    doc.add_entity(Span::single(1), "X");
    doc.add_entity(Span::single(6), "Y");
    doc.add_relation(Span::single(1), Span::single(6), "R");

    let removal = doc.delete_token_range(&indices(&[6]));

    assert!(doc.relations.is_empty());
    assert_eq!(removal.relations.len(), 1);
    assert_eq!(doc.entities.len(), 1);
}

#[test]
fn test_delete_unresolvable_indices_reports_processed() {
    let mut doc = sample_document();
    let removal = doc.delete_token_range(&indices(&[1, 40, 99]));

    assert_eq!(removal.requested, 3);
    assert_eq!(removal.processed(), 1);
    assert_eq!(doc.token_count(), 8);
}

#[test]
fn test_delete_nothing_resolvable_is_noop() {
    let mut doc = sample_document();
    doc.add_entity(Span::new(0, 1), "X");
    let before = doc.clone();

    let removal = doc.delete_token_range(&indices(&[50]));

    assert!(removal.is_empty());
    assert_eq!(doc, before);
}

#[test]
fn test_restore_token_removal_is_exact_inverse() {
    let mut doc = sample_document();
    doc.add_entity(Span::new(0, 1), "X");
    doc.add_entity(Span::new(2, 5), "Y");
    doc.add_entity(Span::single(7), "Z");
    doc.add_relation(Span::new(0, 1), Span::new(2, 5), "R1");
    doc.add_relation(Span::new(0, 1), Span::single(7), "R2");
    let before = doc.clone();

    let removal = doc.delete_token_range(&indices(&[3, 4, 8]));
    let report = doc.restore_token_removal(&removal);

    assert!(report.is_clean());
    assert_eq!(report.tokens_restored, 3);
    assert_eq!(doc, before);
}

#[test]
fn test_restore_token_removal_skips_taken_span() {
    let mut doc = sample_document();
    doc.add_entity(Span::new(0, 1), "Kept");

    let mut removal = doc.delete_token_range(&indices(&[3]));
    removal.entities.push(Removed {
        index: 0,
        value: NamedEntity::new(Span::new(0, 1), "Stale"),
    });
    let report = doc.restore_token_removal(&removal);

    assert_eq!(report.skipped_entities, vec![Span::new(0, 1)]);
    assert_eq!(report.entities_restored, 0);
    assert_eq!(doc.entity(Span::new(0, 1)).unwrap().label, "Kept");
}
