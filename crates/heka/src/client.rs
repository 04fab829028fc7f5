// ABOUTME: The main Client for Heka: source-aware article extraction plus the bias service round-trip.
// ABOUTME: Provides extract() for pages, classify() for blocks and analyze() for the whole pipeline.

use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::article::{AnnotatedArticle, Annotation, Article, ContentBlock};
use crate::error::HekaError;
use crate::extractors::adapter::AdapterRegistry;
use crate::extractors::loader::load_builtin_registry;
use crate::options::{ClientBuilder, Options};
use crate::sources::SourceId;

/// One block as sent to the bias service. The index travels with the text
/// so annotations can be paired back even if the service reorders them.
#[derive(Debug, Serialize)]
struct ParagraphPayload<'a> {
    index: usize,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    paragraphs: Vec<ParagraphPayload<'a>>,
}

/// The service has answered both with a bare array and with a wrapped object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnalyzeResponse {
    Bare(Vec<Annotation>),
    Wrapped { annotations: Vec<Annotation> },
}

impl AnalyzeResponse {
    fn into_annotations(self) -> Vec<Annotation> {
        match self {
            AnalyzeResponse::Bare(annotations) => annotations,
            AnalyzeResponse::Wrapped { annotations } => annotations,
        }
    }
}

/// The main Heka client.
pub struct Client {
    opts: Options,
    http_client: reqwest::Client,
    registry: AdapterRegistry,
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    pub fn new(opts: Options) -> Self {
        let http_client = opts.http_client.clone().unwrap_or_else(|| {
            reqwest::Client::builder()
                .user_agent(&opts.user_agent)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .expect("failed to build HTTP client")
        });

        let registry = opts.registry.clone().unwrap_or_else(load_builtin_registry);

        Self {
            opts,
            http_client,
            registry,
        }
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Extract an article from page HTML.
    pub fn extract(&self, html: &str, source: Option<SourceId>) -> Article {
        let doc = Html::parse_document(html);
        self.extract_document(&doc, source)
    }

    /// Extract an article from an already parsed page.
    pub fn extract_document(&self, doc: &Html, source: Option<SourceId>) -> Article {
        self.registry.extract(doc, source)
    }

    /// Send blocks to the bias service in one request and return its
    /// annotations as received.
    ///
    /// An empty slice returns no annotations without contacting the service.
    /// Transport failures, non-success statuses and undecodable bodies are
    /// all `AnalysisUnavailable`; nothing is retried.
    #[instrument(level = "info", skip_all, fields(blocks = blocks.len()))]
    pub async fn classify(&self, blocks: &[ContentBlock]) -> Result<Vec<Annotation>, HekaError> {
        if blocks.is_empty() {
            debug!("nothing to classify");
            return Ok(Vec::new());
        }

        let url = self.opts.analyze_url();
        let body = AnalyzeRequest {
            paragraphs: blocks
                .iter()
                .map(|b| ParagraphPayload {
                    index: b.index,
                    text: &b.text,
                })
                .collect(),
        };

        let mut request = self.http_client.post(&url).json(&body);
        for (key, value) in &self.opts.headers {
            request = request.header(key, value);
        }
        if let Some(timeout) = self.opts.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "bias service unreachable");
            HekaError::analysis_unavailable(&url, "Classify", Some(anyhow::Error::new(e)))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "bias service returned an error status");
            return Err(HekaError::analysis_unavailable(
                &url,
                "Classify",
                Some(anyhow::anyhow!("unexpected status {}", status)),
            ));
        }

        let parsed: AnalyzeResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "bias service response could not be decoded");
            HekaError::analysis_unavailable(&url, "Classify", Some(anyhow::Error::new(e)))
        })?;

        let annotations = parsed.into_annotations();
        info!(annotations = annotations.len(), "bias analysis complete");
        Ok(annotations)
    }

    /// Extract, classify the paragraph blocks, and pair the annotations.
    ///
    /// Returns `NoContent` when the page yields no blocks at all.
    #[instrument(level = "info", skip(self, html))]
    pub async fn analyze(
        &self,
        html: &str,
        source: Option<SourceId>,
    ) -> Result<AnnotatedArticle, HekaError> {
        let article = self.extract(html, source);
        if !article.has_content() {
            let target = source.map(|s| s.to_string()).unwrap_or_default();
            return Err(HekaError::no_content(target, "Analyze"));
        }
        self.analyze_article(&article).await
    }

    /// Classify an already extracted article's paragraphs and pair the
    /// annotations with them.
    pub async fn analyze_article(&self, article: &Article) -> Result<AnnotatedArticle, HekaError> {
        let paragraphs: Vec<ContentBlock> = article.paragraphs().cloned().collect();
        let annotations = self.classify(&paragraphs).await?;
        Ok(article.annotate(annotations))
    }
}
