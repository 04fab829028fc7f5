// ABOUTME: Main library entry point for Heka, a news-article extractor with bias annotation.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, Article, AnnotatedArticle, HekaError, SourceId.

//! Heka - turns a CBS, Guardian or BBC article page into a normalized
//! [`Article`] and pairs it with bias annotations from a remote service.
//!
//! Extraction is synchronous and never fails: missing metadata becomes
//! sentinel strings and missing body text becomes an empty block list.
//! Only the bias service round-trip can fail.
//!
//! # Example
//!
//! ```no_run
//! use unbiased_heka::{Client, HekaError, SourceId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), HekaError> {
//!     let html = std::fs::read_to_string("story.html").unwrap();
//!     let client = Client::builder().build();
//!     let report = client.analyze(&html, Some(SourceId::Bbc)).await?;
//!     println!("{}", report.format_text());
//!     Ok(())
//! }
//! ```

pub mod article;
pub mod client;
pub mod error;
pub mod extractors;
pub mod options;
pub mod resource;
pub mod sources;

pub use crate::article::{
    AnnotatedArticle, AnnotatedBlock, Annotation, Article, BlockKind, ContentBlock, Metadata,
};
pub use crate::client::Client;
pub use crate::error::{ErrorCode, ExtractFault, HekaError};
pub use crate::extractors::adapter::{AdapterRegistry, SourceAdapter};
pub use crate::extractors::content::{ContentExtractor, ContentSpec, RoleRule};
pub use crate::extractors::fallback::FallbackExtractor;
pub use crate::extractors::loader::load_builtin_registry;
pub use crate::extractors::metadata::{MetadataExtractor, MetadataSpec};
pub use crate::options::{ClientBuilder, Options};
pub use crate::sources::{SourceId, UnknownSource};
