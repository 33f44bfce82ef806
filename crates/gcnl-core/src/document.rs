//! Documents submitted to the Natural Language API.
//!
//! A [`Document`] is the exact text sent for analysis. Every offset the
//! service returns refers to the UTF-8 bytes of [`Document::content`], so the
//! content is fixed once the document is built.

use serde::{Deserialize, Serialize};

/// Language tag sent when the caller does not pick one.
pub const LANGUAGE_ENGLISH: &str = "en";

/// Content type tag embedded in the wire form of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    #[serde(rename = "TYPE_UNSPECIFIED")]
    Unspecified,
    PlainText,
    Html,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unspecified => "TYPE_UNSPECIFIED",
            Self::PlainText => "PLAIN_TEXT",
            Self::Html => "HTML",
        }
    }
}

/// Text encoding the service should use when computing offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Encoding {
    None,
    #[default]
    Utf8,
    Utf16,
    Utf32,
}

/// A document to analyse: plain text or HTML, plus a language tag.
///
/// Serialises to `{"type": ..., "language": ..., "content": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    #[serde(rename = "type")]
    content_type: ContentType,
    language: String,
    content: String,
}

impl Document {
    /// Build a plain-text document in the default language.
    pub fn plain_text(content: impl Into<String>) -> Self {
        Self::new(ContentType::PlainText, content)
    }

    /// Build an HTML document in the default language.
    ///
    /// The markup is sent as-is; the service strips tags itself but reports
    /// offsets into the raw markup.
    pub fn html(content: impl Into<String>) -> Self {
        Self::new(ContentType::Html, content)
    }

    fn new(content_type: ContentType, content: impl Into<String>) -> Self {
        Self {
            content_type,
            language: LANGUAGE_ENGLISH.to_string(),
            content: content.into(),
        }
    }

    /// Replace the language tag.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}
