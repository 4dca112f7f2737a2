//! Token deletion with global index renumbering, and its inverse.

use bevy::prelude::*;
use std::collections::BTreeSet;

use super::model::{Document, NamedEntity, Relation, Removed};
use super::span::{RelationKey, Span};

/// A token taken out of a sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedToken {
    /// Global index before the deletion
    pub global: usize,
    pub sentence: usize,
    pub position: usize,
    pub text: String,
}

/// Everything needed to undo a `delete_token_range` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenRemoval {
    /// Removed tokens in ascending global order
    pub tokens: Vec<RemovedToken>,
    /// Entities dropped because they overlapped a deleted token
    pub entities: Vec<Removed<NamedEntity>>,
    /// Relations dropped because an endpoint overlapped a deleted token
    pub relations: Vec<Removed<Relation>>,
    /// How many indices the caller asked for
    pub requested: usize,
}

impl TokenRemoval {
    /// How many requested indices resolved to a token
    pub fn processed(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Deleted global indices, ascending
    pub fn deleted_indices(&self) -> BTreeSet<usize> {
        self.tokens.iter().map(|t| t.global).collect()
    }
}

/// Outcome of undoing a token deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub tokens_restored: usize,
    pub entities_restored: usize,
    pub relations_restored: usize,
    /// Dropped entities not re-added because their span was taken
    pub skipped_entities: Vec<Span>,
    /// Dropped relations not re-added because their key was taken
    pub skipped_relations: Vec<RelationKey>,
}

impl RestoreReport {
    pub fn is_clean(&self) -> bool {
        self.skipped_entities.is_empty() && self.skipped_relations.is_empty()
    }
}

/// Whether any of the sorted `deleted` indices falls inside `span`
fn overlaps(deleted: &[usize], span: Span) -> bool {
    let first = deleted.partition_point(|&d| d < span.start);
    first < deleted.len() && deleted[first] <= span.end
}

impl Document {
    /// Delete the tokens at the given global indices and renumber every
    /// surviving entity and relation.
    ///
    /// Indices that do not resolve to a token are ignored; the returned
    /// record tells how many were processed.
    pub fn delete_token_range(&mut self, indices: &BTreeSet<usize>) -> TokenRemoval {
        let old_count = self.token_count();

        // Resolve every position before anything shifts
        let tokens: Vec<RemovedToken> = indices
            .iter()
            .filter_map(|&global| {
                let (sentence, position) = self.locate(global)?;
                Some(RemovedToken {
                    global,
                    sentence,
                    position,
                    text: self.sentences[sentence][position].clone(),
                })
            })
            .collect();

        let mut removal = TokenRemoval {
            requested: indices.len(),
            ..Default::default()
        };
        if tokens.is_empty() {
            return removal;
        }

        for token in tokens.iter().rev() {
            self.sentences[token.sentence].remove(token.position);
        }

        let deleted: Vec<usize> = tokens.iter().map(|t| t.global).collect();
        let remap = |old: usize| -> Option<usize> {
            if old >= old_count || deleted.binary_search(&old).is_ok() {
                return None;
            }
            Some(old - deleted.partition_point(|&d| d < old))
        };

        let mut kept_entities = Vec::with_capacity(self.entities.len());
        for (index, entity) in std::mem::take(&mut self.entities).into_iter().enumerate() {
            let span = if overlaps(&deleted, entity.span) {
                None
            } else {
                entity.span.remap(remap)
            };
            match span {
                Some(span) => kept_entities.push(NamedEntity { span, ..entity }),
                None => removal.entities.push(Removed {
                    index,
                    value: entity,
                }),
            }
        }
        self.entities = kept_entities;

        let mut kept_relations = Vec::with_capacity(self.relations.len());
        for (index, relation) in std::mem::take(&mut self.relations)
            .into_iter()
            .enumerate()
        {
            let endpoints = if overlaps(&deleted, relation.source)
                || overlaps(&deleted, relation.target)
            {
                None
            } else {
                relation.source.remap(remap).zip(relation.target.remap(remap))
            };
            match endpoints {
                Some((source, target)) => kept_relations.push(Relation {
                    source,
                    target,
                    ..relation
                }),
                None => removal.relations.push(Removed {
                    index,
                    value: relation,
                }),
            }
        }
        self.relations = kept_relations;

        if removal.processed() < removal.requested {
            debug!(
                "Token deletion resolved {} of {} indices",
                removal.processed(),
                removal.requested
            );
        }

        removal.tokens = tokens;
        removal
    }

    /// Reinsert deleted tokens and re-add what the deletion dropped.
    ///
    /// Surviving spans are mapped back to their pre-deletion indices first.
    /// A dropped entity or relation whose key is already in use is skipped
    /// and listed in the report.
    pub fn restore_token_removal(&mut self, removal: &TokenRemoval) -> RestoreReport {
        let mut report = RestoreReport::default();

        for token in &removal.tokens {
            let Some(sentence) = self.sentences.get_mut(token.sentence) else {
                warn!(
                    "Cannot restore token '{}': sentence {} no longer exists",
                    token.text, token.sentence
                );
                continue;
            };
            let position = token.position.min(sentence.len());
            sentence.insert(position, token.text.clone());
            report.tokens_restored += 1;

            // Ascending order puts each token back at its old index unless
            // the sentence changed in between
            if self.global_index(token.sentence, position) != Some(token.global) {
                warn!(
                    "Token '{}' restored away from its original index {}",
                    token.text, token.global
                );
            }
        }

        let deleted: Vec<usize> = removal.tokens.iter().map(|t| t.global).collect();
        let unmap = |new: usize| -> Option<usize> {
            let mut old = new;
            for &d in &deleted {
                if d <= old {
                    old += 1;
                }
            }
            Some(old)
        };

        for entity in &mut self.entities {
            if let Some(span) = entity.span.remap(unmap) {
                entity.span = span;
            }
        }
        for relation in &mut self.relations {
            if let Some((source, target)) =
                relation.source.remap(unmap).zip(relation.target.remap(unmap))
            {
                relation.source = source;
                relation.target = target;
            }
        }

        for dropped in &removal.entities {
            if self.entity(dropped.value.span).is_some() {
                warn!(
                    "Skipping restore of entity {}: span already annotated",
                    dropped.value.span
                );
                report.skipped_entities.push(dropped.value.span);
                continue;
            }
            let index = dropped.index.min(self.entities.len());
            self.entities.insert(index, dropped.value.clone());
            report.entities_restored += 1;
        }

        for dropped in &removal.relations {
            let key = dropped.value.key();
            if self.relation(key).is_some() {
                warn!("Skipping restore of relation {}: already present", key);
                report.skipped_relations.push(key);
                continue;
            }
            let index = dropped.index.min(self.relations.len());
            self.relations.insert(index, dropped.value.clone());
            report.relations_restored += 1;
        }

        report
    }
}
