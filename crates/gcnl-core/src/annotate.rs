//! Mention highlighting: wrap every entity mention in an inline `<span>`.
//!
//! The scan walks the content once, left to right, copying it through and
//! inserting markers at mention boundaries. Offsets are UTF-8 byte offsets
//! (the service is always asked for `encodingType: UTF8`).
//!
//! # Rules
//!
//! - Mention begin offsets are indexed up front. When two mentions share an
//!   offset the entity visited last (in [`EntityGroups`] order) owns it.
//! - Only one span is open at a time. A mention that begins inside an open
//!   span is dropped.
//! - A mention that begins exactly where the previous span closes is opened.
//! - Empty mentions, negative offsets, offsets past the end and offsets inside
//!   a multi-byte character never open a span.
//! - A span whose length ends inside a multi-byte character is stretched to
//!   the end of that character, and a span running past the end of the content
//!   is closed at the end.
//!
//! Removing every marker from the output gives back the input unchanged.

use std::collections::HashMap;

use crate::document::Document;
use crate::entity::{Entity, EntityGroups};

/// Emitted after the last byte of a mention.
pub const CLOSE_MARKER: &str = "</span>";

/// Opening marker for a mention of `entity`.
///
/// `<span class="type-LOCATION" data-toggle="tooltip" title="LOCATION (0.900000)">`
pub fn open_marker(entity: &Entity) -> String {
    format!(
        r#"<span class="type-{ty}" data-toggle="tooltip" title="{ty} ({salience:.6})">"#,
        ty = entity.entity_type,
        salience = entity.salience,
    )
}

/// Highlight the mentions in `doc` using the analysis result `groups`.
pub fn annotate_document(doc: &Document, groups: &EntityGroups) -> String {
    annotate(doc.content(), groups)
}

/// Highlight the mentions of `groups` in `content`.
pub fn annotate(content: &str, groups: &EntityGroups) -> String {
    let index = index_mentions(groups);
    if index.is_empty() {
        return content.to_string();
    }

    let len = content.len();
    let mut out = String::with_capacity(len + index.len() * 96);
    // Start of the content not yet copied to `out`.
    let mut copied = 0;
    // Bytes left in the open span; zero when no span is open.
    let mut remaining = 0usize;
    let mut opened = 0usize;

    // One step past the end so a span covering the last byte still closes.
    for i in 0..=len {
        if remaining > 0 {
            remaining -= 1;
            if remaining == 0 {
                out.push_str(&content[copied..i]);
                out.push_str(CLOSE_MARKER);
                copied = i;
            }
        }

        if remaining == 0
            && i < len
            && content.is_char_boundary(i)
            && let Some(entity) = index.get(&i)
            && let Some(mention) = entity.mention_at(i)
            && !mention.text_span.is_empty()
        {
            out.push_str(&content[copied..i]);
            out.push_str(&open_marker(entity));
            copied = i;
            remaining = span_end(content, i, mention.text_span.len()) - i;
            opened += 1;
        }
    }
    out.push_str(&content[copied..]);

    tracing::debug!(
        indexed = index.len(),
        opened,
        bytes = len,
        "annotated document"
    );
    out
}

/// Map each mention's begin offset to its owning entity. Later entries win.
fn index_mentions(groups: &EntityGroups) -> HashMap<usize, &Entity> {
    let mut index = HashMap::new();
    for entity in groups.entities() {
        for mention in &entity.mentions {
            if let Ok(offset) = usize::try_from(mention.text_span.begin_offset) {
                index.insert(offset, entity);
            }
        }
    }
    index
}

/// End of a span of `span_len` bytes starting at `start`, clamped to the
/// content and rounded up to a character boundary.
fn span_end(content: &str, start: usize, span_len: usize) -> usize {
    let mut end = start.saturating_add(span_len).min(content.len());
    while !content.is_char_boundary(end) {
        end += 1;
    }
    end
}
