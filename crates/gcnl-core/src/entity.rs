//! Entities returned by `documents:analyzeEntities`.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification the service assigns to an entity.
///
/// Declaration order is also the iteration order of [`EntityGroups`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Unknown,
    Person,
    Location,
    Organization,
    Event,
    WorkOfArt,
    ConsumerGood,
    Other,
}

impl EntityType {
    pub const ALL: [EntityType; 8] = [
        Self::Unknown,
        Self::Person,
        Self::Location,
        Self::Organization,
        Self::Event,
        Self::WorkOfArt,
        Self::ConsumerGood,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Person => "PERSON",
            Self::Location => "LOCATION",
            Self::Organization => "ORGANIZATION",
            Self::Event => "EVENT",
            Self::WorkOfArt => "WORK_OF_ART",
            Self::ConsumerGood => "CONSUMER_GOOD",
            Self::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown entity type: {0}")]
pub struct UnknownEntityType(pub String);

impl FromStr for EntityType {
    type Err = UnknownEntityType;

    /// Accepts wire names case-insensitively (`person`, `WORK_OF_ART`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == upper)
            .ok_or_else(|| UnknownEntityType(s.to_string()))
    }
}

/// Location of one mention: the matched text and its byte offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpan {
    pub content: String,
    /// Zero-based UTF-8 byte offset into the analysed document.
    pub begin_offset: i64,
}

impl TextSpan {
    /// Byte length of the matched text.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// One occurrence of an entity in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    #[serde(rename = "text")]
    pub text_span: TextSpan,
}

/// A named thing recognised in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// Knowledge-graph ids, Wikipedia URLs and the like.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Importance within the document, in `[0, 1]`.
    pub salience: f64,
    #[serde(default)]
    pub mentions: Vec<Mention>,
}

impl Entity {
    /// First mention that begins at `offset`.
    pub fn mention_at(&self, offset: usize) -> Option<&Mention> {
        self.mentions
            .iter()
            .find(|m| usize::try_from(m.text_span.begin_offset) == Ok(offset))
    }
}

/// Entities keyed by type, in the order the service returned them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityGroups {
    groups: BTreeMap<EntityType, Vec<Entity>>,
}

impl EntityGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Partition a flat entity list by type.
    pub fn from_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let mut groups = Self::new();
        for entity in entities {
            groups.push(entity);
        }
        groups
    }

    pub fn push(&mut self, entity: Entity) {
        self.groups
            .entry(entity.entity_type)
            .or_default()
            .push(entity);
    }

    pub fn get(&self, entity_type: EntityType) -> &[Entity] {
        self.groups
            .get(&entity_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Groups in type order. Types with no entities are skipped.
    pub fn iter(&self) -> impl Iterator<Item = (EntityType, &[Entity])> {
        self.groups.iter().map(|(ty, list)| (*ty, list.as_slice()))
    }

    /// All entities, flattened in [`iter`](Self::iter) order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.groups.values().flatten()
    }

    /// Total number of entities across all types.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of distinct types present.
    pub fn type_count(&self) -> usize {
        self.groups.len()
    }
}

impl FromIterator<Entity> for EntityGroups {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        Self::from_entities(iter)
    }
}
