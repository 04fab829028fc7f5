// ABOUTME: Source adapter records and the registry that dispatches extraction by source.
// ABOUTME: Runs an adapter's metadata and content extractors and falls back to generic blocks when empty.

//! Source adapters.
//!
//! An adapter pairs a [`MetadataSpec`] with a [`ContentSpec`] for one
//! publisher. Adapters are plain data so the built-in set can be loaded from
//! embedded JSON (see [`crate::extractors::loader`]).

use std::collections::HashMap;

use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::article::{Article, ContentBlock, Metadata};
use crate::extractors::content::{ContentExtractor, ContentSpec};
use crate::extractors::fallback::FallbackExtractor;
use crate::extractors::metadata::{MetadataExtractor, MetadataSpec};
use crate::sources::SourceId;

/// The extractor pair for one publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAdapter {
    pub source: SourceId,
    pub metadata: MetadataSpec,
    pub content: ContentSpec,
}

impl SourceAdapter {
    pub fn metadata_extractor(&self) -> &dyn MetadataExtractor {
        &self.metadata
    }

    pub fn content_extractor(&self) -> &dyn ContentExtractor {
        &self.content
    }
}

/// Registry for looking up source adapters.
#[derive(Debug, Clone, Default)]
pub struct AdapterRegistry {
    map: HashMap<SourceId, SourceAdapter>,
    fallback: FallbackExtractor,
}

impl AdapterRegistry {
    /// Creates an empty registry with the default fallback extractor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an adapter, replacing any previous one for the same source.
    pub fn register(&mut self, adapter: SourceAdapter) {
        self.map.insert(adapter.source, adapter);
    }

    /// Replaces the fallback extractor.
    pub fn with_fallback(mut self, fallback: FallbackExtractor) -> Self {
        self.fallback = fallback;
        self
    }

    /// Looks up the adapter for a source.
    pub fn select(&self, source: SourceId) -> Option<&SourceAdapter> {
        self.map.get(&source)
    }

    /// Registered sources, in [`SourceId::ALL`] order.
    pub fn sources(&self) -> Vec<SourceId> {
        SourceId::ALL
            .into_iter()
            .filter(|s| self.map.contains_key(s))
            .collect()
    }

    pub fn fallback(&self) -> &FallbackExtractor {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Extracts an article from a parsed page.
    ///
    /// The adapter for `source` supplies metadata and blocks. When there is
    /// no adapter, or the adapter finds no blocks, the fallback extractor
    /// supplies the blocks; metadata is never taken from the fallback.
    /// Extraction faults are logged and degrade to sentinel metadata or an
    /// empty block list.
    #[instrument(level = "debug", skip(self, doc))]
    pub fn extract(&self, doc: &Html, source: Option<SourceId>) -> Article {
        let adapter = source.and_then(|s| self.select(s));
        if adapter.is_none() {
            if let Some(source) = source {
                warn!(%source, "no adapter registered for source");
            }
        }

        let metadata = adapter
            .map(|a| extract_metadata(a.metadata_extractor(), doc))
            .unwrap_or_else(Metadata::not_found);

        let mut blocks = adapter
            .map(|a| extract_blocks(a.content_extractor(), doc))
            .unwrap_or_default();

        if blocks.is_empty() {
            debug!("adapter produced no blocks; using fallback extractor");
            blocks = extract_blocks(&self.fallback, doc);
        }
        if blocks.is_empty() {
            warn!("no article text found");
        }

        Article::new(metadata, blocks)
    }
}

fn extract_metadata(extractor: &dyn MetadataExtractor, doc: &Html) -> Metadata {
    extractor.extract_metadata(doc).unwrap_or_else(|fault| {
        debug!(%fault, "metadata unavailable; using sentinels");
        Metadata::not_found()
    })
}

fn extract_blocks(extractor: &dyn ContentExtractor, doc: &Html) -> Vec<ContentBlock> {
    extractor.extract_blocks(doc).unwrap_or_else(|fault| {
        debug!(%fault, "content unavailable");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::{BlockKind, TITLE_NOT_FOUND};
    use pretty_assertions::assert_eq;

    fn guardian_like() -> SourceAdapter {
        SourceAdapter {
            source: SourceId::Guardian,
            metadata: MetadataSpec::Typed {
                types: vec!["NewsArticle".to_string()],
            },
            content: ContentSpec {
                containers: vec!["div.article-body".to_string()],
                roles: Vec::new(),
                unwrap: Vec::new(),
            },
        }
    }

    const PAGE: &str = r#"<html><head>
        <script type="application/ld+json">{"@type":"NewsArticle","headline":"Headline"}</script>
        </head><body>
        <main><article><p>Fallback paragraph</p></article></main>
        <div class="article-body"><h2>Sub</h2><p>Adapter paragraph</p></div>
        </body></html>"#;

    #[test]
    fn registry_lookup() {
        let mut registry = AdapterRegistry::new();
        assert!(registry.is_empty());
        registry.register(guardian_like());
        assert_eq!(registry.len(), 1);
        assert!(registry.select(SourceId::Guardian).is_some());
        assert!(registry.select(SourceId::Bbc).is_none());
        assert_eq!(registry.sources(), vec![SourceId::Guardian]);

        registry.register(guardian_like());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn extract_uses_adapter_pair() {
        let mut registry = AdapterRegistry::new();
        registry.register(guardian_like());
        let doc = Html::parse_document(PAGE);
        let article = registry.extract(&doc, Some(SourceId::Guardian));

        assert_eq!(article.metadata().title, "Headline");
        let blocks: Vec<(BlockKind, &str)> = article
            .blocks()
            .iter()
            .map(|b| (b.kind, b.text.as_str()))
            .collect();
        assert_eq!(
            blocks,
            vec![
                (BlockKind::Subheading, "Sub"),
                (BlockKind::Paragraph, "Adapter paragraph")
            ]
        );
    }

    #[test]
    fn empty_adapter_content_falls_back_but_keeps_metadata() {
        let mut registry = AdapterRegistry::new();
        let mut adapter = guardian_like();
        adapter.content.containers = vec!["div.missing".to_string()];
        registry.register(adapter);

        let doc = Html::parse_document(PAGE);
        let article = registry.extract(&doc, Some(SourceId::Guardian));
        assert_eq!(article.metadata().title, "Headline");
        assert_eq!(article.blocks().len(), 1);
        assert_eq!(article.blocks()[0].text, "Fallback paragraph");
    }

    #[test]
    fn unregistered_source_gets_sentinels_and_fallback() {
        let registry = AdapterRegistry::new();
        let doc = Html::parse_document(PAGE);
        for source in [None, Some(SourceId::Cbs)] {
            let article = registry.extract(&doc, source);
            assert_eq!(article.metadata().title, TITLE_NOT_FOUND);
            assert!(article.metadata().is_not_found());
            assert_eq!(article.blocks()[0].text, "Fallback paragraph");
        }
    }

    #[test]
    fn registered_adapter_without_structured_data_gets_sentinels() {
        let mut registry = AdapterRegistry::new();
        registry.register(guardian_like());
        let doc = Html::parse_document(
            r#"<html><head><meta name="description" content="Page summary"></head><body>
            <div class="article-body"><p>Adapter paragraph</p></div>
            </body></html>"#,
        );

        let article = registry.extract(&doc, Some(SourceId::Guardian));
        assert_eq!(article.metadata(), &Metadata::not_found());
        assert_eq!(article.blocks().len(), 1);
        assert_eq!(article.blocks()[0].text, "Adapter paragraph");
    }

    #[test]
    fn nothing_found_is_an_empty_article() {
        let registry = AdapterRegistry::new();
        let doc = Html::parse_document("<html><body><div>nothing here</div></body></html>");
        let article = registry.extract(&doc, None);
        assert!(!article.has_content());
        assert!(article.metadata().is_not_found());
    }

    #[test]
    fn custom_fallback_is_used() {
        let registry = AdapterRegistry::new()
            .with_fallback(FallbackExtractor::with_containers(vec!["#story".to_string()]));
        let doc = Html::parse_document(r#"<body><div id="story"><p>Custom</p></div></body>"#);
        assert_eq!(registry.extract(&doc, None).blocks()[0].text, "Custom");
    }

    #[test]
    fn adapter_deserializes_from_json() {
        let json = r#"{
            "source": "guardian",
            "metadata": {"strategy": "typed", "types": ["NewsArticle"]},
            "content": {"containers": ["div.article-body"]}
        }"#;
        let adapter: SourceAdapter = serde_json::from_str(json).unwrap();
        assert_eq!(adapter, guardian_like());
    }
}
