// ABOUTME: Configuration options for the Heka client: bias service endpoint, HTTP settings and adapters.
// ABOUTME: ClientBuilder provides a fluent API for constructing Client instances with custom settings.

use std::collections::HashMap;
use std::time::Duration;

use crate::client::Client;
use crate::extractors::adapter::AdapterRegistry;

/// Base URL of the hosted bias service.
pub const DEFAULT_ENDPOINT: &str = "https://unbiased-heka.onrender.com";

/// Path of the classification route, relative to the endpoint.
pub const ANALYZE_PATH: &str = "/api/analyze-bias";

/// Configuration options for the Heka client.
#[derive(Debug, Clone)]
pub struct Options {
    /// Base URL of the bias service.
    pub endpoint: String,
    /// Request timeout. `None` leaves the policy to the caller.
    pub timeout: Option<Duration>,
    pub user_agent: String,
    pub headers: HashMap<String, String>,
    pub http_client: Option<reqwest::Client>,
    pub registry: Option<AdapterRegistry>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
            user_agent: format!("Heka/{}", env!("CARGO_PKG_VERSION")),
            headers: HashMap::new(),
            http_client: None,
            registry: None,
        }
    }
}

impl Options {
    /// Full URL of the classification route.
    pub fn analyze_url(&self) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), ANALYZE_PATH)
    }
}

/// Builder for constructing Client instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the bias service base URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.opts.endpoint = endpoint.into();
        self
    }

    /// Set a request timeout for the bias service call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = Some(timeout);
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Add a custom header to every bias service request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Set a custom adapter registry.
    pub fn registry(mut self, reg: AdapterRegistry) -> Self {
        self.opts.registry = Some(reg);
        self
    }

    /// Build the Client with the configured options.
    pub fn build(self) -> Client {
        Client::new(self.opts)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_no_timeout() {
        let opts = Options::default();
        assert_eq!(opts.endpoint, DEFAULT_ENDPOINT);
        assert!(opts.timeout.is_none());
        assert!(opts.user_agent.starts_with("Heka/"));
    }

    #[test]
    fn analyze_url_joins_without_double_slash() {
        let mut opts = Options::default();
        opts.endpoint = "http://localhost:8080/".to_string();
        assert_eq!(opts.analyze_url(), "http://localhost:8080/api/analyze-bias");
        opts.endpoint = "http://localhost:8080".to_string();
        assert_eq!(opts.analyze_url(), "http://localhost:8080/api/analyze-bias");
    }
}
