//! Unit tests for the history module.

use crate::annotation::{Document, Span};
use crate::constants::{MAX_UNDO_HISTORY, MAX_UNDO_HISTORY_LIMIT};

use super::command_history::CommandHistory;
use super::commands::EditCommand;
use super::execute::{apply_edit, execute_redo, execute_undo};
use super::messages::EditRequest;

fn sentence(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

/// "A B C D" / "E F G H I" with entities X [0-1], Y [3-5], Z [7-8]
/// and relations X -> Z, Y -> X
fn annotated_document() -> Document {
    let mut doc = Document::new(
        "doc",
        vec![
            sentence(&["A", "B", "C", "D"]),
            sentence(&["E", "F", "G", "H", "I"]),
        ],
    );
    doc.add_entity(Span::new(0, 1), "X");
    doc.add_entity(Span::new(3, 5), "Y");
    doc.add_entity(Span::new(7, 8), "Z");
    doc.add_relation(Span::new(0, 1), Span::new(7, 8), "Used-For");
    doc.add_relation(Span::new(3, 5), Span::new(0, 1), "Part-Of");
    doc
}

fn add_entity(span: Span, label: &str) -> EditRequest {
    EditRequest::AddEntity {
        span,
        label: label.to_string(),
    }
}

fn dummy_command(index: usize) -> EditCommand {
    let mut doc = Document::new("d", vec![sentence(&["t"])]);
    apply_edit(&add_entity(Span::single(0), &format!("L{}", index)), &mut doc).unwrap()
}

#[test]
fn test_command_history_push() {
    let mut history = CommandHistory::default();
    assert!(!history.can_undo());

    history.push(dummy_command(0));
    assert!(history.can_undo());
    assert_eq!(history.undo_count(), 1);
}

#[test]
fn test_command_history_push_clears_redo() {
    let mut history = CommandHistory::default();
    history.push(dummy_command(0));
    history.push(dummy_command(1));

    let command = history.pop_undo().unwrap();
    history.push_redo(command);
    assert!(history.can_redo());

    history.push(dummy_command(2));
    assert!(!history.can_redo());
    assert_eq!(history.undo_count(), 2);
}

#[test]
fn test_command_history_max_size() {
    let mut history = CommandHistory::default();
    for i in 0..(MAX_UNDO_HISTORY + 25) {
        history.push(dummy_command(i));
    }
    assert_eq!(history.undo_count(), MAX_UNDO_HISTORY);

    // The oldest commands were evicted
    let newest = history.pop_undo().unwrap();
    assert_eq!(newest, dummy_command(MAX_UNDO_HISTORY + 24));
}

#[test]
fn test_set_max_depth_trims_and_clamps() {
    let mut history = CommandHistory::default();
    for i in 0..10 {
        history.push(dummy_command(i));
    }

    history.set_max_depth(4);
    assert_eq!(history.undo_count(), 4);

    history.set_max_depth(0);
    assert_eq!(history.max_depth(), 1);
    assert_eq!(history.undo_count(), 1);

    history.set_max_depth(100_000);
    assert_eq!(history.max_depth(), MAX_UNDO_HISTORY_LIMIT);
}

#[test]
fn test_undo_on_empty_history() {
    let mut history = CommandHistory::default();
    let mut doc = annotated_document();
    assert!(history.undo(&mut doc).is_none());
    assert!(history.redo(&mut doc).is_none());
    assert_eq!(doc, annotated_document());
}

#[test]
fn test_undo_is_exact_inverse() {
    let requests = vec![
        add_entity(Span::new(2, 2), "New"),
        add_entity(Span::new(0, 1), "Relabelled"),
        EditRequest::AddRelation {
            source: Span::new(7, 8),
            target: Span::new(3, 5),
            label: "Compare".to_string(),
        },
        EditRequest::AddRelation {
            source: Span::new(0, 1),
            target: Span::new(7, 8),
            label: "Hyponym-Of".to_string(),
        },
        EditRequest::DeleteEntity {
            span: Span::new(0, 1),
        },
        EditRequest::DeleteTokens {
            span: Span::new(3, 4),
        },
    ];

    for request in requests {
        let original = annotated_document();
        let mut doc = original.clone();

        let command = apply_edit(&request, &mut doc).unwrap();
        assert_ne!(doc, original, "{:?} changed nothing", request);

        let outcome = execute_undo(&command, &mut doc);
        assert!(outcome.unresolved.is_none());
        assert_eq!(doc, original, "undo of {:?}", request);
    }
}

#[test]
fn test_redo_reapplies_forward_edit() {
    let requests = vec![
        add_entity(Span::new(0, 1), "Relabelled"),
        EditRequest::DeleteEntity {
            span: Span::new(3, 5),
        },
        EditRequest::DeleteTokens {
            span: Span::new(0, 2),
        },
    ];

    for request in requests {
        let mut history = CommandHistory::default();
        let mut doc = annotated_document();

        history.push(apply_edit(&request, &mut doc).unwrap());
        let after_edit = doc.clone();

        history.undo(&mut doc).unwrap();
        assert_eq!(doc, annotated_document());

        history.redo(&mut doc).unwrap();
        assert_eq!(doc, after_edit, "redo of {:?}", request);

        // The fresh record undoes just as well
        history.undo(&mut doc).unwrap();
        assert_eq!(doc, annotated_document());
    }
}

#[test]
fn test_relation_then_undo_scenario() {
    let mut history = CommandHistory::default();
    let mut doc = Document::new("doc", vec![sentence(&["A", "B", "C", "D"])]);
    doc.add_entity(Span::new(0, 1), "Method");
    doc.add_entity(Span::new(3, 3), "Task");
    let before = doc.clone();

    let request = EditRequest::AddRelation {
        source: Span::new(0, 1),
        target: Span::new(3, 3),
        label: "Used-For".to_string(),
    };
    history.push(apply_edit(&request, &mut doc).unwrap());
    assert_eq!(doc.relations.len(), 1);

    let (description, _) = history.undo(&mut doc).unwrap();
    assert!(description.contains("Used-For"));
    assert!(doc.relations.is_empty());
    assert_eq!(doc, before);
    assert!(history.can_redo());
    assert!(!history.can_undo());
}

#[test]
fn test_noop_requests_are_not_journaled() {
    let mut doc = annotated_document();

    assert!(apply_edit(&add_entity(Span::new(0, 1), "X"), &mut doc).is_none());
    assert!(
        apply_edit(
            &EditRequest::DeleteEntity {
                span: Span::new(2, 2)
            },
            &mut doc
        )
        .is_none()
    );
    assert!(
        apply_edit(
            &EditRequest::DeleteTokens {
                span: Span::new(40, 42)
            },
            &mut doc
        )
        .is_none()
    );
    assert_eq!(doc, annotated_document());
}

#[test]
fn test_delete_tokens_undo_restores_dropped_annotations() {
    let mut doc = annotated_document();
    let command = apply_edit(
        &EditRequest::DeleteTokens {
            span: Span::new(3, 4),
        },
        &mut doc,
    )
    .unwrap();

    // Y overlapped the deleted tokens, Z shifted left by two
    assert!(doc.entity(Span::new(3, 5)).is_none());
    assert!(doc.entity(Span::new(5, 6)).is_some());
    assert_eq!(doc.relations.len(), 1);

    execute_undo(&command, &mut doc);
    assert_eq!(doc, annotated_document());
}

#[test]
fn test_redo_of_vanished_entity_is_dropped() {
    let mut doc = annotated_document();
    let command = apply_edit(
        &EditRequest::DeleteEntity {
            span: Span::new(7, 8),
        },
        &mut doc,
    )
    .unwrap();

    // Already gone, so redo has nothing to record
    assert!(execute_redo(&command, &mut doc).is_none());
}

#[test]
fn test_command_descriptions() {
    let mut doc = annotated_document();
    let relabel = apply_edit(&add_entity(Span::new(0, 1), "W"), &mut doc).unwrap();
    assert_eq!(relabel.description(), "relabel entity [0-1] X -> W");

    let delete = apply_edit(
        &EditRequest::DeleteTokens {
            span: Span::new(0, 2),
        },
        &mut doc,
    )
    .unwrap();
    assert_eq!(delete.description(), "delete 3 token(s)");
}
