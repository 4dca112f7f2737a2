//! Collection-wide counts and label histograms.

use std::collections::BTreeMap;

use crate::annotation::Document;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub documents: usize,
    pub sentences: usize,
    pub tokens: usize,
    pub entities: usize,
    pub relations: usize,
    /// Documents with no entity at all
    pub unannotated_documents: usize,
    pub entity_labels: BTreeMap<String, usize>,
    pub relation_labels: BTreeMap<String, usize>,
}

impl CollectionStats {
    pub fn from_documents<'a>(documents: impl IntoIterator<Item = &'a Document>) -> Self {
        let mut stats = Self::default();
        for document in documents {
            stats.documents += 1;
            stats.sentences += document.sentences.len();
            stats.tokens += document.token_count();
            stats.entities += document.entities.len();
            stats.relations += document.relations.len();
            if document.entities.is_empty() {
                stats.unannotated_documents += 1;
            }
            for entity in &document.entities {
                *stats.entity_labels.entry(entity.label.clone()).or_default() += 1;
            }
            for relation in &document.relations {
                *stats.relation_labels.entry(relation.label.clone()).or_default() += 1;
            }
        }
        stats
    }

    /// Labels sorted by descending count, then name
    pub fn ranked(histogram: &BTreeMap<String, usize>) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> =
            histogram.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        ranked
    }
}
