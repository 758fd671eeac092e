//! Blocking HTTP client backed by `reqwest`.

use crate::config::ClientConfig;
use crate::http::{HttpClient, HttpRequest, HttpResponse, HttpTransport};
use webling_core::{EntityManager, Method, WeblingError, WeblingResult};

/// Manager type returned by [`manager_for_account`].
pub type AccountManager = EntityManager<HttpTransport<ReqwestClient>>;

/// [`HttpClient`] using a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Builds a client honoring the timeout and user agent of `config`.
    pub fn new(config: &ClientConfig) -> WeblingResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| WeblingError::transport(format!("http client: {e}")))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Put => self.client.put(&request.url),
            Method::Delete => self.client.delete(&request.url),
        };
        let builder = match request.body {
            Some(body) => builder.header("Content-Type", "application/json").body(body),
            None => builder,
        };

        let response = builder.send().map_err(|e| e.to_string())?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| format!("read body: {e}"))?;
        Ok(HttpResponse { status, body })
    }
}

/// Creates an entity manager for `config`.
pub fn connect(config: &ClientConfig) -> WeblingResult<AccountManager> {
    let client = ReqwestClient::new(config)?;
    Ok(EntityManager::new(HttpTransport::new(config, client)))
}

/// Creates an entity manager for a Webling account using the current API
/// version.
pub fn manager_for_account(
    subdomain: impl Into<String>,
    api_key: impl Into<String>,
) -> WeblingResult<AccountManager> {
    connect(&ClientConfig::new(subdomain, api_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_account_manager() {
        let manager = manager_for_account("demo", "secret").unwrap();
        assert_eq!(manager.transport().base_uri(), "https://demo.webling.ch/api/1/");
        assert!(manager.cache().is_empty());
    }
}
