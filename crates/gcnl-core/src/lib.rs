//! Core types for the Cloud Natural Language entities API and mention highlighting.

pub mod annotate;
pub mod document;
pub mod entity;

pub use annotate::{annotate, annotate_document};
pub use document::{ContentType, Document, Encoding, LANGUAGE_ENGLISH};
pub use entity::{Entity, EntityGroups, EntityType, Mention, TextSpan, UnknownEntityType};
