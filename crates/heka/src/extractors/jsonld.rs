// ABOUTME: Structured-data (JSON-LD) scanning over a parsed page.
// ABOUTME: Yields every ld+json block in document order and matches schema.org @type values.

use scraper::Html;
use serde_json::Value;

use crate::error::ExtractFault;
use crate::extractors::compiled::get_or_compile;

const LD_JSON_SELECTOR: &str = "script[type='application/ld+json']";

/// Parses every structured-data block in document order.
///
/// Each block is parsed on its own, so a malformed payload only affects its
/// own entry.
pub fn structured_data_blocks(doc: &Html) -> Vec<Result<Value, ExtractFault>> {
    let Some(selector) = get_or_compile(LD_JSON_SELECTOR) else {
        return Vec::new();
    };

    doc.select(&selector)
        .map(|script| {
            let text = script.text().collect::<String>();
            serde_json::from_str::<Value>(text.trim()).map_err(ExtractFault::from)
        })
        .collect()
}

/// The objects a block describes: the block itself, the items of a top-level
/// array, or the items of an `@graph`.
pub fn block_entities(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().flat_map(block_entities).collect(),
        Value::Object(map) => match map.get("@graph") {
            Some(Value::Array(graph)) => graph.iter().filter(|v| v.is_object()).collect(),
            _ => vec![value],
        },
        _ => Vec::new(),
    }
}

/// True if `@type` is `expected` or an array containing it (case-insensitive).
pub fn matches_type(value: &Value, expected: &str) -> bool {
    match value {
        Value::String(s) => s.eq_ignore_ascii_case(expected),
        Value::Array(arr) => arr.iter().any(|v| matches_type(v, expected)),
        _ => false,
    }
}

/// True if the entity's `@type` matches any of `types`.
pub fn has_any_type(entity: &Value, types: &[String]) -> bool {
    entity
        .get("@type")
        .is_some_and(|t| types.iter().any(|expected| matches_type(t, expected)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blocks_keep_document_order_and_isolate_parse_errors() {
        let doc = Html::parse_document(
            r#"<html><head>
            <script type="application/ld+json">{"@type":"WebSite"}</script>
            <script type="application/ld+json">{ broken</script>
            <script type="application/ld+json">[{"@type":"NewsArticle"}]</script>
            <script type="text/javascript">var x = 1;</script>
            </head></html>"#,
        );
        let blocks = structured_data_blocks(&doc);
        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].is_ok());
        assert!(matches!(
            blocks[1],
            Err(ExtractFault::MalformedStructuredData(_))
        ));
        assert!(blocks[2].as_ref().unwrap().is_array());
    }

    #[test]
    fn no_blocks_on_plain_page() {
        let doc = Html::parse_document("<html><body><p>hi</p></body></html>");
        assert!(structured_data_blocks(&doc).is_empty());
    }

    #[test]
    fn entities_flatten_arrays_and_graphs() {
        let graph = json!({"@context": "https://schema.org", "@graph": [
            {"@type": "WebPage"}, {"@type": "NewsArticle"}, "stray"
        ]});
        assert_eq!(block_entities(&graph).len(), 2);

        let array = json!([{"@type": "A"}, {"@graph": [{"@type": "B"}]}]);
        let entities = block_entities(&array);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[1]["@type"], "B");

        assert!(block_entities(&json!("scalar")).is_empty());
    }

    #[test]
    fn type_matching() {
        assert!(matches_type(&json!("NewsArticle"), "newsarticle"));
        assert!(matches_type(&json!(["Thing", "NewsArticle"]), "NewsArticle"));
        assert!(!matches_type(&json!({"name": "NewsArticle"}), "NewsArticle"));

        let types = vec!["NewsArticle".to_string(), "ReportageNewsArticle".to_string()];
        assert!(has_any_type(&json!({"@type": "ReportageNewsArticle"}), &types));
        assert!(!has_any_type(&json!({"@type": "VideoObject"}), &types));
        assert!(!has_any_type(&json!({"headline": "x"}), &types));
    }
}
