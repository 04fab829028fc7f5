// ABOUTME: Loader for the built-in source adapters embedded as JSON data.
// ABOUTME: Provides load_builtin_registry() to initialize the default AdapterRegistry.

use crate::extractors::adapter::{AdapterRegistry, SourceAdapter};
use crate::extractors::compiled::precompile_selectors;

/// Embedded JSON containing the CBS, Guardian and BBC adapters.
const BUILTIN_ADAPTERS_JSON: &str = include_str!("../../data/sources.json");

/// Parses the embedded adapter definitions.
///
/// # Panics
///
/// Panics if the embedded JSON is malformed or cannot be deserialized.
pub fn builtin_adapters() -> Vec<SourceAdapter> {
    serde_json::from_str(BUILTIN_ADAPTERS_JSON).expect("failed to parse builtin adapters")
}

/// Loads the builtin adapter registry and warms the selector cache with
/// every selector it uses.
///
/// # Panics
///
/// Panics if the embedded JSON is malformed or cannot be deserialized.
pub fn load_builtin_registry() -> AdapterRegistry {
    let mut registry = AdapterRegistry::new();
    for adapter in builtin_adapters() {
        precompile_selectors(adapter.content.selectors());
        registry.register(adapter);
    }
    precompile_selectors(registry.fallback().containers());
    registry
}
