//! Label prompt and status line state.

use crate::model::AnnotationId;

/// Modal prompt asking for an annotation's label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelPrompt {
    target: AnnotationId,
    text: String,
}

impl LabelPrompt {
    /// Open a prompt for `target`, prefilled with its current label.
    pub fn new(target: AnnotationId, current: Option<&str>) -> Self {
        Self {
            target,
            text: current.unwrap_or_default().to_string(),
        }
    }

    pub fn target(&self) -> &AnnotationId {
        &self.target
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// The label to apply, or `None` if the text is blank.
    pub fn label(&self) -> Option<&str> {
        let trimmed = self.text.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// User-visible outcome of the last save or export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}
