// Core types for the edit session

use super::error::ErrorKind;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An image in transport form: base64 content plus its media type.
///
/// Values are never mutated; every edit produces a new instance. The
/// content buffer is shared, so clones are cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub name: String,
    pub content: Arc<str>,
    pub media_type: String,
}

impl EncodedImage {
    pub fn new(
        name: impl Into<String>,
        content: impl Into<Arc<str>>,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            media_type: media_type.into(),
        }
    }

    /// Build the session entry for a service result, keeping the source name
    pub fn from_edit(source: &EncodedImage, edited: EditedImage) -> Self {
        Self {
            name: source.name.clone(),
            content: edited.content.into(),
            media_type: edited.media_type,
        }
    }
}

/// Raw result of an edit service call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditedImage {
    pub content: String,
    pub media_type: String,
}

/// Display language for the prompt catalog
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fa,
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "fa" | "persian" | "farsi" => Ok(Language::Fa),
            other => Err(format!("unknown language: {}", other)),
        }
    }
}

/// Result of a completed `request_edit` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The result is now the pending edit
    Proposed,
    /// The service failed; `last_error` is set
    Failed(String),
    /// The session moved on while the request was in flight; result dropped
    Discarded,
}

/// Captured state of an edit request, handed to the service
#[derive(Debug, Clone)]
pub struct EditTicket {
    pub request_id: u64,
    pub generation: u64,
    pub source: EncodedImage,
    pub instruction: String,
}

/// Observable view of the session, published after every transaction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub displayed: Option<EncodedImage>,
    pub position: usize,
    pub len: usize,
    pub has_pending: bool,
    pub can_undo: bool,
    pub can_redo: bool,
    pub is_generating: bool,
    pub last_error: Option<ErrorKind>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parsing() {
        assert_eq!("en".parse::<Language>(), Ok(Language::En));
        assert_eq!("Persian".parse::<Language>(), Ok(Language::Fa));
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn test_edit_result_keeps_source_name() {
        let source = EncodedImage::new("cat.png", "AAAA", "image/png");
        let edited = EditedImage {
            content: "BBBB".to_string(),
            media_type: "image/jpeg".to_string(),
        };
        let image = EncodedImage::from_edit(&source, edited);
        assert_eq!(image.name, "cat.png");
        assert_eq!(&*image.content, "BBBB");
        assert_eq!(image.media_type, "image/jpeg");
    }

    #[test]
    fn test_clones_share_content() {
        let image = EncodedImage::new("a.png", "AAAA", "image/png");
        let copy = image.clone();
        assert!(Arc::ptr_eq(&image.content, &copy.content));
    }
}
