//! Transport abstraction for the remote store.

use crate::error::{WeblingError, WeblingResult};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// HTTP method of a remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read.
    Get,
    /// Create.
    Post,
    /// Update.
    Put,
    /// Delete.
    Delete,
}

impl Method {
    /// Returns the method name.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// Returns the status a successful response carries.
    pub fn expected_status(self) -> u16 {
        match self {
            Method::Get => 200,
            Method::Post => 201,
            Method::Put | Method::Delete => 204,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Carries requests to the remote store.
///
/// Paths are relative to the API root and start with `/`. Implementations
/// map failures to [`WeblingError::NotFound`], [`WeblingError::ApiError`],
/// [`WeblingError::Parse`] or [`WeblingError::HttpStatus`].
pub trait Transport: Send + Sync {
    /// Reads a JSON document.
    fn get(&self, path: &str, query: &[(&str, &str)]) -> WeblingResult<Value>;

    /// Creates a resource and returns the raw response body.
    fn post(&self, path: &str, body: &Value) -> WeblingResult<String>;

    /// Updates a resource and returns the raw response body.
    fn put(&self, path: &str, body: &Value) -> WeblingResult<String>;

    /// Deletes a resource and returns the raw response body.
    fn delete(&self, path: &str) -> WeblingResult<String>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, path: &str, query: &[(&str, &str)]) -> WeblingResult<Value> {
        (**self).get(path, query)
    }

    fn post(&self, path: &str, body: &Value) -> WeblingResult<String> {
        (**self).post(path, body)
    }

    fn put(&self, path: &str, body: &Value) -> WeblingResult<String> {
        (**self).put(path, body)
    }

    fn delete(&self, path: &str) -> WeblingResult<String> {
        (**self).delete(path)
    }
}

/// A request seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// Method.
    pub method: Method,
    /// Path.
    pub path: String,
    /// Query parameters.
    pub query: Vec<(String, String)>,
    /// Request body.
    pub body: Option<Value>,
}

impl RecordedRequest {
    /// Returns the value of a query parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A mock transport for testing.
///
/// Responses are registered per method and path and returned for every
/// matching request. Unregistered routes fail with a not found error.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), WeblingResult<Value>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    /// Creates a mock transport without routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a response. Write methods return strings verbatim and any
    /// other JSON serialized.
    pub fn respond(&self, method: Method, path: impl Into<String>, response: WeblingResult<Value>) {
        self.routes.lock().insert((method, path.into()), response);
    }

    /// Registers a successful GET response.
    pub fn on_get(&self, path: impl Into<String>, body: Value) {
        self.respond(Method::Get, path, Ok(body));
    }

    /// Registers a successful POST response.
    pub fn on_post(&self, path: impl Into<String>, body: impl Into<String>) {
        self.respond(Method::Post, path, Ok(Value::String(body.into())));
    }

    /// Registers a successful PUT response.
    pub fn on_put(&self, path: impl Into<String>) {
        self.respond(Method::Put, path, Ok(Value::String(String::new())));
    }

    /// Registers a successful DELETE response.
    pub fn on_delete(&self, path: impl Into<String>) {
        self.respond(Method::Delete, path, Ok(Value::String(String::new())));
    }

    /// Returns all requests seen so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Returns the number of requests seen so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Returns the number of requests for one method and path.
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Returns the most recent request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().last().cloned()
    }

    fn call(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> WeblingResult<Value> {
        self.requests.lock().push(RecordedRequest {
            method,
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            body: body.cloned(),
        });

        self.routes
            .lock()
            .get(&(method, path.to_string()))
            .cloned()
            .unwrap_or_else(|| {
                Err(WeblingError::not_found(format!(
                    "no mock route for {method} {path}"
                )))
            })
    }

    fn call_text(&self, method: Method, path: &str, body: Option<&Value>) -> WeblingResult<String> {
        Ok(match self.call(method, path, &[], body)? {
            Value::String(text) => text,
            other => other.to_string(),
        })
    }
}

impl Transport for MockTransport {
    fn get(&self, path: &str, query: &[(&str, &str)]) -> WeblingResult<Value> {
        self.call(Method::Get, path, query, None)
    }

    fn post(&self, path: &str, body: &Value) -> WeblingResult<String> {
        self.call_text(Method::Post, path, Some(body))
    }

    fn put(&self, path: &str, body: &Value) -> WeblingResult<String> {
        self.call_text(Method::Put, path, Some(body))
    }

    fn delete(&self, path: &str) -> WeblingResult<String> {
        self.call_text(Method::Delete, path, None)
    }
}
