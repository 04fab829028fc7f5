// ABOUTME: Extraction strategies that turn a parsed news page into an Article.
// ABOUTME: Per-source adapters (metadata + content), the generic fallback and their shared helpers.

//! Content extraction module.
//!
//! Submodules:
//! - `adapter`: source adapter records and the dispatching registry.
//! - `metadata` / `jsonld`: structured-data metadata extraction.
//! - `content`: container-and-role body extraction.
//! - `fallback`: source-agnostic paragraph scraping.
//! - `loader`: the built-in adapters embedded as JSON.

pub mod adapter;
pub mod compiled;
pub mod content;
pub mod fallback;
pub mod fields;
pub mod jsonld;
pub mod loader;
pub mod metadata;
