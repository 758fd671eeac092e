//! HTTP transport implementation.
//!
//! The raw exchange is abstracted behind [`HttpClient`] so any HTTP library,
//! or a scripted client in tests, can carry the requests.

use crate::config::ClientConfig;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, warn};
use webling_core::{Method, Transport, WeblingError, WeblingResult};

/// A request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Method.
    pub method: Method,
    /// Absolute URL including the query string.
    pub url: String,
    /// JSON body for POST and PUT.
    pub body: Option<String>,
}

/// A received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// HTTP client abstraction.
///
/// Implementations send the request as is and return any response received,
/// whatever its status. `Err` is reserved for failures without a response.
pub trait HttpClient: Send + Sync {
    /// Sends a request.
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, String>;
}

/// Transport talking to the Webling REST API.
pub struct HttpTransport<C: HttpClient> {
    base_uri: String,
    api_key: String,
    client: C,
    last_error: RwLock<Option<String>>,
}

impl<C: HttpClient> HttpTransport<C> {
    /// Creates a transport for the account in `config`.
    pub fn new(config: &ClientConfig, client: C) -> Self {
        Self {
            base_uri: config.base_uri(),
            api_key: config.api_key.clone(),
            client,
            last_error: RwLock::new(None),
        }
    }

    /// Returns the API root.
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the HTTP client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns the message of the last failed request.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    /// Builds the request URL for `path` with the API key and `query`.
    ///
    /// A key in `query` overrides the default parameter of the same name.
    pub fn build_url(&self, path: &str, query: &[(&str, &str)]) -> String {
        let mut params: Vec<(&str, &str)> = Vec::with_capacity(query.len() + 1);
        if !query.iter().any(|(key, _)| *key == "apikey") {
            params.push(("apikey", self.api_key.as_str()));
        }
        params.extend_from_slice(query);

        let query_string = params
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&");

        format!(
            "{}{}?{}",
            self.base_uri,
            path.trim_start_matches('/'),
            query_string
        )
    }

    fn exchange(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> WeblingResult<String> {
        let request = HttpRequest {
            method,
            url: self.build_url(path, query),
            body: body.map(serde_json::to_string).transpose()?,
        };

        debug!("{} {}", method, path);
        let response = self
            .client
            .send(request)
            .map_err(|e| self.fail(WeblingError::transport(e)))?;

        if response.status != method.expected_status() {
            return Err(self.fail(convert_response(&response)));
        }

        *self.last_error.write() = None;
        Ok(response.body)
    }

    fn fail(&self, err: WeblingError) -> WeblingError {
        warn!("Request failed: {}", err);
        *self.last_error.write() = Some(err.to_string());
        err
    }
}

/// Converts an unexpected response to an error.
///
/// A JSON body with a non-empty `error` message becomes
/// [`WeblingError::NotFound`] for status 404 and [`WeblingError::ApiError`]
/// otherwise. Any other body becomes [`WeblingError::HttpStatus`].
pub fn convert_response(response: &HttpResponse) -> WeblingError {
    let message = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|body| match body.get("error") {
            Some(Value::String(message)) if !message.is_empty() => Some(message.clone()),
            Some(Value::Null) | Some(Value::Bool(false)) | None => None,
            Some(Value::String(_)) => None,
            Some(other) => Some(other.to_string()),
        });

    match message {
        Some(message) if response.status == 404 => WeblingError::not_found(message),
        Some(message) => WeblingError::api(response.status, message),
        None => WeblingError::http_status(response.status, response.body.clone()),
    }
}

impl<C: HttpClient> Transport for HttpTransport<C> {
    fn get(&self, path: &str, query: &[(&str, &str)]) -> WeblingResult<Value> {
        let body = self.exchange(Method::Get, path, query, None)?;
        serde_json::from_str(&body).map_err(|e| self.fail(WeblingError::from(e)))
    }

    fn post(&self, path: &str, body: &Value) -> WeblingResult<String> {
        self.exchange(Method::Post, path, &[], Some(body))
    }

    fn put(&self, path: &str, body: &Value) -> WeblingResult<String> {
        self.exchange(Method::Put, path, &[], Some(body))
    }

    fn delete(&self, path: &str) -> WeblingResult<String> {
        self.exchange(Method::Delete, path, &[], None)
    }
}

impl<C: HttpClient> std::fmt::Debug for HttpTransport<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_uri", &self.base_uri)
            .finish_non_exhaustive()
    }
}
