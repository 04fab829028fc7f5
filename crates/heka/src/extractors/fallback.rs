// ABOUTME: Source-agnostic fallback body extraction for unregistered sources or empty adapter results.
// ABOUTME: Tries generic article containers in priority order and collects their paragraphs.

use scraper::Html;

use crate::article::{BlockKind, BlockSequence, ContentBlock};
use crate::error::ExtractFault;
use crate::extractors::compiled::get_or_compile;
use crate::extractors::content::{locate_container, ContentExtractor};
use crate::extractors::fields::element_text;

/// Generic article containers, most specific first.
pub const FALLBACK_CONTAINERS: &[&str] = &[
    "main article",
    "main [data-component='article-body']",
    "article",
    "[data-component='text-block']",
];

const PARAGRAPH_SELECTOR: &str = "p";

/// Heuristic extractor: every non-empty paragraph inside the first generic
/// container that exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackExtractor {
    containers: Vec<String>,
}

impl Default for FallbackExtractor {
    fn default() -> Self {
        Self::with_containers(FALLBACK_CONTAINERS.iter().map(|s| s.to_string()).collect())
    }
}

impl FallbackExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom container priority list.
    pub fn with_containers(containers: Vec<String>) -> Self {
        Self { containers }
    }

    pub fn containers(&self) -> &[String] {
        &self.containers
    }
}

impl ContentExtractor for FallbackExtractor {
    fn extract_blocks(&self, doc: &Html) -> Result<Vec<ContentBlock>, ExtractFault> {
        let container =
            locate_container(doc, &self.containers).ok_or(ExtractFault::ContentContainerNotFound)?;
        let Some(paragraphs) = get_or_compile(PARAGRAPH_SELECTOR) else {
            return Ok(Vec::new());
        };

        let mut blocks = BlockSequence::new();
        for p in container.select(&paragraphs) {
            blocks.push(BlockKind::Paragraph, &element_text(&p));
        }
        Ok(blocks.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(blocks: &[ContentBlock]) -> Vec<(usize, &str)> {
        blocks.iter().map(|b| (b.index, b.text.as_str())).collect()
    }

    #[test]
    fn collects_nested_paragraphs_and_drops_empty() {
        let doc = Html::parse_document(
            r#"<body><main><article>
                <header><p>  Kicker </p></header>
                <div><div><p>Deep paragraph</p></div></div>
                <p> </p>
                <p>Last</p>
            </article></main></body>"#,
        );
        let blocks = FallbackExtractor::new().extract_blocks(&doc).unwrap();
        assert_eq!(texts(&blocks), vec![(0, "Kicker"), (1, "Deep paragraph"), (2, "Last")]);
        assert!(blocks.iter().all(|b| b.kind == BlockKind::Paragraph));
    }

    #[test]
    fn prefers_article_inside_main_over_earlier_article() {
        let doc = Html::parse_document(
            r#"<body>
                <article><p>Promo teaser</p></article>
                <main><article><p>Real story</p></article></main>
            </body>"#,
        );
        let blocks = FallbackExtractor::new().extract_blocks(&doc).unwrap();
        assert_eq!(texts(&blocks), vec![(0, "Real story")]);
    }

    #[test]
    fn text_block_is_last_resort() {
        let doc = Html::parse_document(
            r#"<body><div data-component="text-block"><p>Only block</p></div></body>"#,
        );
        let blocks = FallbackExtractor::new().extract_blocks(&doc).unwrap();
        assert_eq!(texts(&blocks), vec![(0, "Only block")]);
    }

    #[test]
    fn no_container_is_not_found() {
        let doc = Html::parse_document("<body><div><p>Loose text</p></div></body>");
        assert!(matches!(
            FallbackExtractor::new().extract_blocks(&doc),
            Err(ExtractFault::ContentContainerNotFound)
        ));
    }

    #[test]
    fn custom_containers() {
        let doc = Html::parse_document(r#"<body><div id="story"><p>Custom</p></div></body>"#);
        let fallback = FallbackExtractor::with_containers(vec!["#story".to_string()]);
        assert_eq!(fallback.containers().to_vec(), vec!["#story".to_string()]);
        let blocks = fallback.extract_blocks(&doc).unwrap();
        assert_eq!(texts(&blocks), vec![(0, "Custom")]);
    }
}
