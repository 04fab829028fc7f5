// ABOUTME: Host-side page loading: HTTP fetching and local file reading for the heka binary.
// ABOUTME: Enforces http(s) URLs and a content-length limit, and decodes bodies by charset or detection.

use std::path::Path;

use bytes::Bytes;
use tracing::{debug, instrument};

use crate::error::HekaError;

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Result of a successful fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decode the body as text, using the content-type charset when present.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Decode body bytes to a String using charset from content-type header or detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(encoding) = content_type
        .and_then(extract_charset)
        .and_then(|charset| encoding_rs::Encoding::for_label(charset.as_bytes()))
    {
        let (decoded, _, _) = encoding.decode(body);
        return decoded.into_owned();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .to_lowercase()
        .split(';')
        .find_map(|part| {
            part.trim()
                .strip_prefix("charset=")
                .map(|c| c.trim_matches('"').trim_matches('\'').to_string())
        })
}

fn too_large(target: &str, op: &str) -> HekaError {
    HekaError::fetch(target, op, Some(anyhow::anyhow!("content too large")))
}

/// Fetch a page over HTTP(S).
///
/// Non-success statuses and bodies over [`MAX_CONTENT_LENGTH`] are errors.
#[instrument(level = "debug", skip(client))]
pub async fn fetch(client: &reqwest::Client, url: &str) -> Result<FetchResult, HekaError> {
    if url.is_empty() {
        return Err(HekaError::invalid_input(
            url,
            "Fetch",
            Some(anyhow::anyhow!("empty URL")),
        ));
    }

    let parsed_url = url::Url::parse(url).map_err(|e| {
        HekaError::invalid_input(url, "Fetch", Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;

    let scheme = parsed_url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(HekaError::invalid_input(
            url,
            "Fetch",
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }

    let response = client.get(parsed_url).send().await.map_err(|e| {
        HekaError::fetch(url, "Fetch", Some(anyhow::anyhow!("request failed: {}", e)))
    })?;

    if let Some(len) = response.content_length() {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(too_large(url, "Fetch"));
        }
    }

    let status = response.status();
    if !status.is_success() {
        return Err(HekaError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("HTTP status {}", status.as_u16())),
        ));
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    let body = response.bytes().await.map_err(|e| {
        HekaError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("failed to read body: {}", e)),
        )
    })?;

    if body.len() > MAX_CONTENT_LENGTH {
        return Err(too_large(url, "Fetch"));
    }

    debug!(bytes = body.len(), %final_url, "fetched page");
    Ok(FetchResult {
        status: status.as_u16(),
        url: url.to_string(),
        final_url,
        content_type,
        body,
    })
}

/// Read a saved page from disk and decode it.
pub fn load_file(path: &Path) -> Result<String, HekaError> {
    let target = path.display().to_string();
    let bytes = std::fs::read(path)
        .map_err(|e| HekaError::invalid_input(&target, "LoadFile", Some(anyhow::Error::new(e))))?;
    if bytes.len() > MAX_CONTENT_LENGTH {
        return Err(too_large(&target, "LoadFile"));
    }
    Ok(decode_body(&bytes, None))
}
