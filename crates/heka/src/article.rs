// ABOUTME: The canonical article schema shared by every source adapter and the bias pairing step.
// ABOUTME: Holds Metadata (with sentinel values), ordered ContentBlocks, Annotations and the annotated view.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const TITLE_NOT_FOUND: &str = "Title not found";
pub const AUTHOR_NOT_FOUND: &str = "Author not found";
pub const DESCRIPTION_NOT_FOUND: &str = "Description not found";
pub const DATE_PUBLISHED_NOT_FOUND: &str = "Publish date not found";
pub const DATE_MODIFIED_NOT_FOUND: &str = "Modified date not found";

/// Report line used when the bias service flagged nothing.
pub const NO_BIAS_DETECTED: &str = "No obvious bias detected.";

/// Article metadata. Fields that could not be determined hold their sentinel
/// string (see the `*_NOT_FOUND` constants), never an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub title: String,
    pub author: String,
    pub description: String,
    pub date_published: String,
    pub date_modified: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self::not_found()
    }
}

impl Metadata {
    /// Metadata with every field set to its sentinel.
    pub fn not_found() -> Self {
        Self {
            title: TITLE_NOT_FOUND.to_string(),
            author: AUTHOR_NOT_FOUND.to_string(),
            description: DESCRIPTION_NOT_FOUND.to_string(),
            date_published: DATE_PUBLISHED_NOT_FOUND.to_string(),
            date_modified: DATE_MODIFIED_NOT_FOUND.to_string(),
        }
    }

    pub fn has_title(&self) -> bool {
        self.title != TITLE_NOT_FOUND
    }

    pub fn has_author(&self) -> bool {
        self.author != AUTHOR_NOT_FOUND
    }

    pub fn has_description(&self) -> bool {
        self.description != DESCRIPTION_NOT_FOUND
    }

    /// True when every field is its sentinel.
    pub fn is_not_found(&self) -> bool {
        *self == Self::not_found()
    }

    /// Publication date parsed as UTC, if present and parseable.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        if self.date_published == DATE_PUBLISHED_NOT_FOUND {
            return None;
        }
        parse_date(&self.date_published)
    }

    /// Modification date parsed as UTC, if present and parseable.
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        if self.date_modified == DATE_MODIFIED_NOT_FOUND {
            return None;
        }
        parse_date(&self.date_modified)
    }
}

/// Parse a date string, trying RFC3339 first then falling back to dateparser.
fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Date-only forms are pinned to midnight UTC so the day never shifts.
    const LOOSE_PATTERNS: &[&str] = &["%Y-%m-%d", "%B %e, %Y", "%e %B %Y", "%b %e, %Y", "%e %b %Y"];
    for pat in LOOSE_PATTERNS {
        if let Ok(date) = NaiveDate::parse_from_str(s, pat) {
            let naive_dt = date.and_hms_opt(0, 0, 0)?;
            return Some(DateTime::<Utc>::from_naive_utc_and_offset(naive_dt, Utc));
        }
    }

    dateparser::parse(s).ok().map(|dt| dt.with_timezone(&Utc))
}

/// The semantic role of a content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Heading,
    Subheading,
    Paragraph,
    Quote,
    ListItem,
    Caption,
}

/// One classified element of the article body.
///
/// `index` is the block's position in document order and the join key for
/// annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub index: usize,
    pub kind: BlockKind,
    pub text: String,
}

/// Assigns contiguous indices to emitted blocks. Rejected text does not
/// consume an index.
#[derive(Debug, Default)]
pub(crate) struct BlockSequence {
    blocks: Vec<ContentBlock>,
}

impl BlockSequence {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends a block unless `text` is blank. Returns whether it was kept.
    pub(crate) fn push(&mut self, kind: BlockKind, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let index = self.blocks.len();
        self.blocks.push(ContentBlock {
            index,
            kind,
            text: text.to_string(),
        });
        true
    }

    pub(crate) fn finish(self) -> Vec<ContentBlock> {
        self.blocks
    }
}

/// A normalized article: one Metadata plus its blocks in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    metadata: Metadata,
    blocks: Vec<ContentBlock>,
}

impl Article {
    pub(crate) fn new(metadata: Metadata, blocks: Vec<ContentBlock>) -> Self {
        Self { metadata, blocks }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    /// Returns false when extraction found no article text at all.
    pub fn has_content(&self) -> bool {
        !self.blocks.is_empty()
    }

    /// The paragraph blocks, which are what gets sent for classification.
    pub fn paragraphs(&self) -> impl Iterator<Item = &ContentBlock> {
        self.blocks
            .iter()
            .filter(|b| b.kind == BlockKind::Paragraph)
    }

    /// Block texts separated by blank lines.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Pairs annotations with the paragraph blocks they reference by `index`.
    ///
    /// Only paragraphs are sent for classification, so an annotation whose
    /// index is negative, out of range, or names a non-paragraph block is
    /// dropped. If two annotations share an index the first one is kept.
    pub fn annotate(&self, annotations: Vec<Annotation>) -> AnnotatedArticle {
        let mut slots: Vec<Option<Annotation>> = vec![None; self.blocks.len()];

        for annotation in annotations {
            let position = usize::try_from(annotation.index).ok().filter(|&i| {
                self.blocks
                    .get(i)
                    .is_some_and(|b| b.index == i && b.kind == BlockKind::Paragraph)
            });
            let Some(position) = position else {
                debug!(index = annotation.index, "dropping annotation with no matching paragraph");
                continue;
            };
            let slot = &mut slots[position];
            if slot.is_some() {
                debug!(index = annotation.index, "dropping duplicate annotation");
                continue;
            }
            *slot = Some(annotation);
        }

        let blocks = self
            .blocks
            .iter()
            .cloned()
            .zip(slots)
            .map(|(block, annotation)| AnnotatedBlock { block, annotation })
            .collect();

        AnnotatedArticle {
            metadata: self.metadata.clone(),
            blocks,
        }
    }
}

/// A bias flag returned by the bias service for one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Block index as returned by the service; may be negative or out of range.
    pub index: i64,
    pub text: String,
    pub label: String,
    pub reason: String,
}

/// A block together with its annotation, if the service flagged it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedBlock {
    #[serde(flatten)]
    pub block: ContentBlock,
    pub annotation: Option<Annotation>,
}

/// An article after pairing. Block order is unchanged from the source article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedArticle {
    pub metadata: Metadata,
    pub blocks: Vec<AnnotatedBlock>,
}

impl AnnotatedArticle {
    /// Blocks that carry an annotation, in document order.
    pub fn flagged(&self) -> impl Iterator<Item = (&ContentBlock, &Annotation)> {
        self.blocks
            .iter()
            .filter_map(|b| b.annotation.as_ref().map(|a| (&b.block, a)))
    }

    /// Render the bias report as plain text.
    pub fn format_text(&self) -> String {
        let entries: Vec<String> = self
            .flagged()
            .map(|(_, a)| {
                format!(
                    "\"{}\"\nType: {}\nReason: {}",
                    a.text.trim(),
                    a.label,
                    a.reason
                )
            })
            .collect();

        if entries.is_empty() {
            NO_BIAS_DETECTED.to_string()
        } else {
            entries.join("\n\n")
        }
    }
}
