//! In-memory document model and the entity/relation mutations.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

use super::span::{RelationKey, Span};

/// A labelled token span.
///
/// `bucket` is the sentence slot the entity was read from. It only matters
/// when writing the record back out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedEntity {
    pub span: Span,
    pub label: String,
    pub bucket: usize,
}

impl NamedEntity {
    pub fn new(span: Span, label: impl Into<String>) -> Self {
        Self {
            span,
            label: label.into(),
            bucket: 0,
        }
    }
}

/// A directed, labelled link between two entity spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub source: Span,
    pub target: Span,
    pub label: String,
    pub bucket: usize,
}

impl Relation {
    pub fn new(source: Span, target: Span, label: impl Into<String>) -> Self {
        Self {
            source,
            target,
            label: label.into(),
            bucket: 0,
        }
    }

    pub fn key(&self) -> RelationKey {
        RelationKey {
            source: self.source,
            target: self.target,
        }
    }

    /// Whether either endpoint is exactly `span`
    pub fn involves(&self, span: Span) -> bool {
        self.source == span || self.target == span
    }
}

/// An item removed from a list together with the position it occupied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removed<T> {
    pub index: usize,
    pub value: T,
}

/// Everything `delete_entity_cascade` took out of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRemoval {
    pub entity: Removed<NamedEntity>,
    /// Cascade-deleted relations in ascending original position
    pub relations: Vec<Removed<Relation>>,
}

/// Borrowed view of one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRef<'a> {
    pub global: usize,
    pub sentence: usize,
    pub position: usize,
    pub text: &'a str,
}

/// One annotated document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Unique within the open collection
    pub id: String,
    /// `doc_id` exactly as the record carries it, `None` when absent
    pub record_id: Option<String>,
    pub sentences: Vec<Vec<String>>,
    pub entities: Vec<NamedEntity>,
    pub relations: Vec<Relation>,
    /// Record fields this editor does not interpret, kept for round-tripping
    pub extra: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, sentences: Vec<Vec<String>>) -> Self {
        let id = id.into();
        Self {
            record_id: Some(id.clone()),
            id,
            sentences,
            ..Default::default()
        }
    }

    pub fn token_count(&self) -> usize {
        self.sentences.iter().map(Vec::len).sum()
    }

    /// Resolve a global index to `(sentence, position)`
    pub fn locate(&self, global: usize) -> Option<(usize, usize)> {
        let mut offset = 0;
        for (sentence, tokens) in self.sentences.iter().enumerate() {
            if global < offset + tokens.len() {
                return Some((sentence, global - offset));
            }
            offset += tokens.len();
        }
        None
    }

    /// Global index of the token at `(sentence, position)`
    pub fn global_index(&self, sentence: usize, position: usize) -> Option<usize> {
        let tokens = self.sentences.get(sentence)?;
        if position >= tokens.len() {
            return None;
        }
        let offset: usize = self.sentences[..sentence].iter().map(Vec::len).sum();
        Some(offset + position)
    }

    /// All tokens in document order with their global indices
    pub fn tokens(&self) -> impl Iterator<Item = TokenRef<'_>> {
        self.sentences
            .iter()
            .enumerate()
            .flat_map(|(sentence, tokens)| {
                tokens
                    .iter()
                    .enumerate()
                    .map(move |(position, text)| (sentence, position, text.as_str()))
            })
            .enumerate()
            .map(|(global, (sentence, position, text))| TokenRef {
                global,
                sentence,
                position,
                text,
            })
    }

    pub fn token_text(&self, global: usize) -> Option<&str> {
        let (sentence, position) = self.locate(global)?;
        Some(self.sentences[sentence][position].as_str())
    }

    /// Space-joined text of the tokens a span covers
    pub fn span_text(&self, span: Span) -> String {
        span.indices()
            .filter_map(|i| self.token_text(i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn entity(&self, span: Span) -> Option<&NamedEntity> {
        self.entities.iter().find(|e| e.span == span)
    }

    pub fn relation(&self, key: RelationKey) -> Option<&Relation> {
        self.relations.iter().find(|r| r.key() == key)
    }

    /// A relation is dangling when either endpoint has no entity
    pub fn is_dangling(&self, relation: &Relation) -> bool {
        self.entity(relation.source).is_none() || self.entity(relation.target).is_none()
    }

    pub fn entity_labels(&self) -> BTreeSet<&str> {
        self.entities.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn relation_labels(&self) -> BTreeSet<&str> {
        self.relations.iter().map(|r| r.label.as_str()).collect()
    }

    /// Add an entity, or relabel the one already on `span`.
    ///
    /// Returns the label that was overwritten.
    pub fn add_entity(&mut self, span: Span, label: impl Into<String>) -> Option<String> {
        let label = label.into();
        if let Some(existing) = self.entities.iter_mut().find(|e| e.span == span) {
            return Some(std::mem::replace(&mut existing.label, label));
        }
        self.entities.push(NamedEntity::new(span, label));
        None
    }

    pub fn remove_entity(&mut self, span: Span) -> Option<NamedEntity> {
        let index = self.entities.iter().position(|e| e.span == span)?;
        Some(self.entities.remove(index))
    }

    /// Remove the entity on `span` and every relation that touches it.
    ///
    /// Nothing is removed when no entity sits on `span`.
    pub fn delete_entity_cascade(&mut self, span: Span) -> Option<EntityRemoval> {
        let entity_index = self.entities.iter().position(|e| e.span == span)?;

        let relation_indices: Vec<usize> = self
            .relations
            .iter()
            .enumerate()
            .filter(|(_, r)| r.involves(span))
            .map(|(i, _)| i)
            .collect();

        let mut relations: Vec<Removed<Relation>> = relation_indices
            .iter()
            .rev()
            .map(|&index| Removed {
                index,
                value: self.relations.remove(index),
            })
            .collect();
        relations.reverse();

        let entity = Removed {
            index: entity_index,
            value: self.entities.remove(entity_index),
        };

        Some(EntityRemoval { entity, relations })
    }

    /// Put back what `delete_entity_cascade` removed, at the original positions
    pub fn restore_entity_removal(&mut self, removal: &EntityRemoval) {
        let index = removal.entity.index.min(self.entities.len());
        self.entities.insert(index, removal.entity.value.clone());
        for relation in &removal.relations {
            let index = relation.index.min(self.relations.len());
            self.relations.insert(index, relation.value.clone());
        }
    }

    /// Add a relation, or relabel the one already linking the same spans.
    ///
    /// Endpoints are not checked against the entity list.
    pub fn add_relation(
        &mut self,
        source: Span,
        target: Span,
        label: impl Into<String>,
    ) -> Option<String> {
        let label = label.into();
        let key = RelationKey { source, target };
        if let Some(existing) = self.relations.iter_mut().find(|r| r.key() == key) {
            return Some(std::mem::replace(&mut existing.label, label));
        }
        self.relations.push(Relation::new(source, target, label));
        None
    }

    pub fn remove_relation(&mut self, source: Span, target: Span) -> Option<Relation> {
        let key = RelationKey { source, target };
        let index = self.relations.iter().position(|r| r.key() == key)?;
        Some(self.relations.remove(index))
    }

    /// Set the label of an existing entity without touching its position
    pub(crate) fn relabel_entity(&mut self, span: Span, label: &str) -> bool {
        match self.entities.iter_mut().find(|e| e.span == span) {
            Some(entity) => {
                entity.label = label.to_string();
                true
            }
            None => false,
        }
    }

    pub(crate) fn relabel_relation(&mut self, key: RelationKey, label: &str) -> bool {
        match self.relations.iter_mut().find(|r| r.key() == key) {
            Some(relation) => {
                relation.label = label.to_string();
                true
            }
            None => false,
        }
    }
}
