//! Line-delimited JSON record form of a document.
//!
//! One object per line:
//! `{"doc_id", "sentences": [[tok]], "ner": [[[s, e, type]]], "relations": [[[ss, se, ts, te, type]]]}`.
//! Entity and relation tuples are grouped in per-sentence buckets on disk and
//! flattened in memory. Labels are normalized here and nowhere else.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::model::{Document, NamedEntity, Relation};
use super::span::Span;

/// Label used when a type field is an empty list
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Wire shape of one document line
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DocumentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,

    #[serde(default)]
    pub sentences: Vec<Vec<String>>,

    #[serde(default)]
    pub ner: Vec<Value>,

    #[serde(default)]
    pub relations: Vec<Value>,

    /// Any other top-level fields, written back untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Flatten a type field to a single label.
///
/// Strings pass through, lists yield their first element, an empty list
/// yields `"Unknown"`.
pub fn normalize_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .first()
            .map(normalize_label)
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
        Value::Null => UNKNOWN_LABEL.to_string(),
        other => other.to_string(),
    }
}

fn index_at(items: &[Value], i: usize) -> Option<usize> {
    items.get(i)?.as_u64().map(|v| v as usize)
}

fn span_at(items: &[Value], i: usize) -> Option<Span> {
    let start = index_at(items, i)?;
    let end = index_at(items, i + 1)?;
    (start <= end).then_some(Span { start, end })
}

fn parse_entity(tuple: &Value, bucket: usize) -> Option<NamedEntity> {
    let items = tuple.as_array()?;
    let span = span_at(items, 0)?;
    let label = normalize_label(items.get(2)?);
    Some(NamedEntity {
        span,
        label,
        bucket,
    })
}

fn parse_relation(tuple: &Value, bucket: usize) -> Option<Relation> {
    let items = tuple.as_array()?;
    let source = span_at(items, 0)?;
    let target = span_at(items, 2)?;
    let label = normalize_label(items.get(4)?);
    Some(Relation {
        source,
        target,
        label,
        bucket,
    })
}

/// Parse every tuple in every bucket, skipping the malformed ones
fn parse_buckets<T>(
    buckets: &[Value],
    doc_id: &str,
    kind: &str,
    parse: impl Fn(&Value, usize) -> Option<T>,
) -> Vec<T> {
    let mut parsed = Vec::new();
    for (bucket, tuples) in buckets.iter().enumerate() {
        let Some(tuples) = tuples.as_array() else {
            warn!("{}: {} bucket {} is not a list, skipped", doc_id, kind, bucket);
            continue;
        };
        for tuple in tuples {
            match parse(tuple, bucket) {
                Some(item) => parsed.push(item),
                None => warn!("{}: malformed {} entry {} skipped", doc_id, kind, tuple),
            }
        }
    }
    parsed
}

impl DocumentRecord {
    /// Convert into a document; `index` is its position in the collection and
    /// names documents without a `doc_id`.
    pub fn into_document(self, index: usize) -> Document {
        let record_id = self.doc_id;
        let id = record_id
            .clone()
            .unwrap_or_else(|| format!("doc_{}", index));
        let entities = parse_buckets(&self.ner, &id, "entity", parse_entity);
        let relations = parse_buckets(&self.relations, &id, "relation", parse_relation);
        Document {
            id,
            record_id,
            sentences: self.sentences,
            entities,
            relations,
            extra: self.extra,
        }
    }

    pub fn from_document(document: &Document) -> Self {
        let highest_bucket = document
            .entities
            .iter()
            .map(|e| e.bucket + 1)
            .chain(document.relations.iter().map(|r| r.bucket + 1))
            .max()
            .unwrap_or(0);
        let bucket_count = document.sentences.len().max(highest_bucket);

        let mut ner = vec![Vec::new(); bucket_count];
        for entity in &document.entities {
            ner[entity.bucket].push(json!([entity.span.start, entity.span.end, entity.label]));
        }

        let mut relations = vec![Vec::new(); bucket_count];
        for relation in &document.relations {
            relations[relation.bucket].push(json!([
                relation.source.start,
                relation.source.end,
                relation.target.start,
                relation.target.end,
                relation.label
            ]));
        }

        Self {
            doc_id: document.record_id.clone(),
            sentences: document.sentences.clone(),
            ner: ner.into_iter().map(Value::Array).collect(),
            relations: relations.into_iter().map(Value::Array).collect(),
            extra: document.extra.clone(),
        }
    }
}

/// Parse one line of a collection file
pub fn parse_line(line: &str, index: usize) -> serde_json::Result<Document> {
    let record: DocumentRecord = serde_json::from_str(line)?;
    Ok(record.into_document(index))
}

/// Serialize a document as one line (no trailing newline)
pub fn to_line(document: &Document) -> serde_json::Result<String> {
    serde_json::to_string(&DocumentRecord::from_document(document))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_label_variants() {
        assert_eq!(normalize_label(&json!("Task")), "Task");
        assert_eq!(normalize_label(&json!(["Method", "Task"])), "Method");
        assert_eq!(normalize_label(&json!([])), "Unknown");
        assert_eq!(normalize_label(&Value::Null), "Unknown");
    }

    #[test]
    fn test_parse_line_flattens_buckets() {
        let line = r#"{"doc_id":"d1","sentences":[["A","B"],["C"]],"ner":[[[0,1,"X"]],[[2,2,["Y"]]]],"relations":[[[0,1,2,2,"R"]],[]]}"#;
        let doc = parse_line(line, 0).unwrap();

        assert_eq!(doc.id, "d1");
        assert_eq!(doc.entities.len(), 2);
        assert_eq!(doc.entities[1].label, "Y");
        assert_eq!(doc.entities[1].bucket, 1);
        assert_eq!(doc.relations.len(), 1);
        assert_eq!(doc.relations[0].target, Span::single(2));
    }

    #[test]
    fn test_missing_doc_id_uses_index() {
        let doc = parse_line(r#"{"sentences":[["A"]]}"#, 7).unwrap();
        assert_eq!(doc.id, "doc_7");
        assert_eq!(doc.record_id, None);
        assert!(doc.entities.is_empty());
    }

    #[test]
    fn test_generated_doc_id_is_not_written() {
        let doc = parse_line(r#"{"sentences":[["A"]],"ner":[[]],"relations":[[]]}"#, 2).unwrap();
        let written: Value = serde_json::from_str(&to_line(&doc).unwrap()).unwrap();
        assert!(written.get("doc_id").is_none());

        let doc = parse_line(r#"{"doc_id":"x","sentences":[["A"]]}"#, 2).unwrap();
        assert_eq!(doc.record_id.as_deref(), Some("x"));
        let written: Value = serde_json::from_str(&to_line(&doc).unwrap()).unwrap();
        assert_eq!(written["doc_id"], json!("x"));
    }

    #[test]
    fn test_malformed_tuples_are_skipped() {
        let line = r#"{"doc_id":"d","sentences":[["A","B","C"]],"ner":[[[0,1,"X"],[2],"junk",[3,1,"Z"]]],"relations":[[[0,1]]]}"#;
        let doc = parse_line(line, 0).unwrap();
        assert_eq!(doc.entities.len(), 1);
        assert_eq!(doc.entities[0].span, Span::new(0, 1));
        assert!(doc.relations.is_empty());
    }

    #[test]
    fn test_extra_fields_survive_round_trip() {
        let line = r#"{"doc_id":"d","sentences":[["A"]],"ner":[[]],"relations":[[]],"source":"acl","year":2019}"#;
        let doc = parse_line(line, 0).unwrap();
        let written: Value = serde_json::from_str(&to_line(&doc).unwrap()).unwrap();

        assert_eq!(written["source"], json!("acl"));
        assert_eq!(written["year"], json!(2019));
    }

    #[test]
    fn test_buckets_padded_to_sentence_count() {
        let mut doc = Document::new("d", vec![vec!["A".into()], vec!["B".into()], vec!["C".into()]]);
        doc.add_entity(Span::new(0, 0), "X");

        let record = DocumentRecord::from_document(&doc);
        assert_eq!(record.ner.len(), 3);
        assert_eq!(record.relations.len(), 3);
        assert_eq!(record.ner[0], json!([[0, 0, "X"]]));
        assert_eq!(record.ner[2], json!([]));
    }

    #[test]
    fn test_entity_creation_scenario_serializes() {
        let mut doc = Document::new("d", vec![vec!["A".into(), "B".into(), "C".into()]]);
        doc.add_entity(Span::new(0, 1), "X");

        let record = DocumentRecord::from_document(&doc);
        assert_eq!(Value::Array(record.ner), json!([[[0, 1, "X"]]]));
    }
}
