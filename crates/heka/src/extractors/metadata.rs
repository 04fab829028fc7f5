// ABOUTME: Metadata extraction strategies driven by each source adapter's MetadataSpec.
// ABOUTME: Picks one structured-data entity and normalizes it into Metadata with sentinel fallbacks.

//! Metadata extraction.
//!
//! Publishers embed article metadata differently. Some pages carry many
//! structured-data blocks and the article is found by its `@type`; others
//! keep it as the first element of a structured-data array. Both strategies
//! converge on [`Metadata`]: exactly one entity is used (first match wins,
//! fragments are never merged), a list of authors contributes its first
//! name, a missing description falls back to the page's meta description,
//! and anything still missing gets its sentinel.

use scraper::Html;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::article::{
    Metadata, AUTHOR_NOT_FOUND, DATE_MODIFIED_NOT_FOUND, DATE_PUBLISHED_NOT_FOUND,
    DESCRIPTION_NOT_FOUND, TITLE_NOT_FOUND,
};
use crate::error::ExtractFault;
use crate::extractors::fields::{normalize_whitespace, page_description};
use crate::extractors::jsonld::{block_entities, has_any_type, structured_data_blocks};

/// Produces an article's metadata from a parsed page.
pub trait MetadataExtractor {
    /// Returns `ExtractFault::MetadataNotFound` when no usable structured data exists.
    fn extract_metadata(&self, doc: &Html) -> Result<Metadata, ExtractFault>;
}

/// How a source stores its article metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum MetadataSpec {
    /// First structured-data entity whose `@type` is one of `types`.
    Typed { types: Vec<String> },
    /// First element of the first structured-data array, whatever its type.
    FirstInArray,
}

impl MetadataExtractor for MetadataSpec {
    fn extract_metadata(&self, doc: &Html) -> Result<Metadata, ExtractFault> {
        let blocks = structured_data_blocks(doc);
        let mut parsed = Vec::with_capacity(blocks.len());
        for (position, block) in blocks.into_iter().enumerate() {
            match block {
                Ok(value) => parsed.push(value),
                Err(fault) => debug!(position, error = %fault, "skipping structured-data block"),
            }
        }

        let entity = match self {
            MetadataSpec::Typed { types } => parsed
                .iter()
                .flat_map(block_entities)
                .find(|entity| has_any_type(entity, types)),
            MetadataSpec::FirstInArray => parsed.iter().find_map(first_entity),
        };

        entity
            .map(|e| metadata_from_entity(e, doc))
            .ok_or(ExtractFault::MetadataNotFound)
    }
}

/// The first element of an array block. A lone object counts as a
/// one-element array.
fn first_entity(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.first().filter(|v| v.is_object()),
        Value::Object(_) => Some(value),
        _ => None,
    }
}

/// Normalizes one structured-data entity into [`Metadata`].
pub fn metadata_from_entity(entity: &Value, doc: &Html) -> Metadata {
    let title = string_field(entity, "headline").or_else(|| string_field(entity, "name"));
    let description = string_field(entity, "description").or_else(|| page_description(doc));

    Metadata {
        title: title.unwrap_or_else(|| TITLE_NOT_FOUND.to_string()),
        author: first_author(entity).unwrap_or_else(|| AUTHOR_NOT_FOUND.to_string()),
        description: description.unwrap_or_else(|| DESCRIPTION_NOT_FOUND.to_string()),
        date_published: string_field(entity, "datePublished")
            .unwrap_or_else(|| DATE_PUBLISHED_NOT_FOUND.to_string()),
        date_modified: string_field(entity, "dateModified")
            .unwrap_or_else(|| DATE_MODIFIED_NOT_FOUND.to_string()),
    }
}

fn string_field(entity: &Value, key: &str) -> Option<String> {
    entity
        .get(key)
        .and_then(Value::as_str)
        .map(normalize_whitespace)
        .filter(|s| !s.is_empty())
}

/// The author's name; for a list of authors, the first entry's.
fn first_author(entity: &Value) -> Option<String> {
    fn author_name(author: &Value) -> Option<String> {
        let name = match author {
            Value::String(s) => Some(normalize_whitespace(s)),
            Value::Object(_) => string_field(author, "name"),
            _ => None,
        };
        name.filter(|s| !s.is_empty())
    }

    match entity.get("author")? {
        Value::Array(authors) => authors.first().and_then(author_name),
        other => author_name(other),
    }
}
