//! Client configuration.

use std::time::Duration;
use webling_core::API_VERSION;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for one Webling account.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Account subdomain (`{subdomain}.webling.ch`).
    pub subdomain: String,
    /// API key, sent as `apikey` query parameter.
    pub api_key: String,
    /// API version.
    pub api_version: u32,
    /// Base URL overriding the one derived from the subdomain.
    pub base_url: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent header.
    pub user_agent: String,
}

impl ClientConfig {
    /// Creates a configuration for an account.
    pub fn new(subdomain: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            subdomain: subdomain.into(),
            api_key: api_key.into(),
            api_version: API_VERSION,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("webling-rs/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Sets the API version.
    pub fn with_api_version(mut self, version: u32) -> Self {
        self.api_version = version;
        self
    }

    /// Overrides the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the API root, always ending in `/`.
    pub fn base_uri(&self) -> String {
        match &self.base_url {
            Some(url) if url.ends_with('/') => url.clone(),
            Some(url) => format!("{url}/"),
            None => format!(
                "https://{}.webling.ch/api/{}/",
                self.subdomain, self.api_version
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_base_uri() {
        let config = ClientConfig::new("demo", "secret");
        assert_eq!(config.base_uri(), "https://demo.webling.ch/api/1/");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.user_agent.starts_with("webling-rs/"));
    }

    #[test]
    fn builder_pattern() {
        let config = ClientConfig::new("demo", "secret")
            .with_api_version(2)
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("tests");

        assert_eq!(config.base_uri(), "https://demo.webling.ch/api/2/");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "tests");
    }

    #[test]
    fn base_url_override() {
        let config =
            ClientConfig::new("demo", "secret").with_base_url("http://localhost:8080/api/1");
        assert_eq!(config.base_uri(), "http://localhost:8080/api/1/");
    }
}
