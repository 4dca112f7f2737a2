//! Types shared by the navigator, history and UI modules.

use bevy::prelude::*;

/// Severity of the status bar message
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum StatusKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// The one-line message shown in the status bar
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl Default for StatusMessage {
    fn default() -> Self {
        Self {
            text: "Ready - press Ctrl+O to open a collection".to_string(),
            kind: StatusKind::Info,
        }
    }
}

impl StatusMessage {
    pub fn set(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.text = text.into();
        self.kind = kind;
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.set(StatusKind::Info, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.set(StatusKind::Success, text);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.set(StatusKind::Warning, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.set(StatusKind::Error, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_default_is_info() {
        let status = StatusMessage::default();
        assert_eq!(status.kind, StatusKind::Info);
        assert!(status.text.contains("Ctrl+O"));
    }

    #[test]
    fn test_status_set_replaces_kind_and_text() {
        let mut status = StatusMessage::default();
        status.error("Save failed");
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(status.text, "Save failed");
        status.success("Saved");
        assert_eq!(status.kind, StatusKind::Success);
    }
}
