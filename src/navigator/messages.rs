//! Message types for collection and navigation operations.

use bevy::prelude::*;
use std::path::PathBuf;

#[derive(Message)]
pub struct OpenCollectionRequest {
    pub path: PathBuf,
}

#[derive(Message)]
pub struct SaveCollectionRequest;

/// Move to another document in the open collection
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateRequest {
    Next,
    Previous,
    Jump(isize),
    First,
    Last,
    /// Zero-based position
    GoTo(usize),
}

/// Sent after the active document was replaced (open or navigation)
#[derive(Message)]
pub struct DocumentSwitched;
