// ABOUTME: Pre-compiled CSS selector cache shared by every extractor.
// ABOUTME: Adapter selectors are parsed once; invalid ones are cached as "never matches".

//! Selector caching for repeated DOM queries.
//!
//! Every extraction pass runs the same handful of adapter and fallback
//! selectors, so they are compiled once and reused.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use scraper::Selector;
use tracing::debug;

static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Option<Selector>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Gets or compiles a CSS selector, caching the result.
///
/// Returns `None` for an invalid selector; callers treat that as no match.
pub fn get_or_compile(css: &str) -> Option<Selector> {
    {
        let cache = SELECTOR_CACHE.read().unwrap_or_else(|e| e.into_inner());
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
    }

    let compiled = compile(css);
    let mut cache = SELECTOR_CACHE.write().unwrap_or_else(|e| e.into_inner());
    // Another thread may have inserted while we compiled.
    if let Some(cached) = cache.get(css) {
        return cached.clone();
    }
    cache.insert(css.to_string(), compiled.clone());
    compiled
}

/// Precompiles a batch of selectors into the cache.
pub fn precompile_selectors<I, S>(selectors: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cache = SELECTOR_CACHE.write().unwrap_or_else(|e| e.into_inner());
    for css in selectors {
        let css = css.as_ref();
        if !cache.contains_key(css) {
            cache.insert(css.to_string(), compile(css));
        }
    }
}

fn compile(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            debug!(selector = css, error = %e, "ignoring invalid selector");
            None
        }
    }
}
