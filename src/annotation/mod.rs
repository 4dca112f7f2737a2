//! Annotation model: sentences, entity spans and relations.
//!
//! Tokens are addressed only by their global index (position across all
//! sentences). Entities and relations refer to spans of global indices and
//! relations refer to entities by span value, not by pointer.
//!
//! ## Module Structure
//!
//! - [`span`] - `Span` and `RelationKey` identity types
//! - [`model`] - `Document` plus entity/relation mutations
//! - [`tokens`] - token deletion with renumbering and its inverse
//! - [`record`] - line-delimited JSON wire form

mod model;
pub mod record;
mod span;
mod tokens;

#[cfg(test)]
mod tests;

pub use model::{Document, EntityRemoval, NamedEntity, Relation, Removed};
pub use span::{RelationKey, Span};
pub use tokens::{RestoreReport, TokenRemoval};
