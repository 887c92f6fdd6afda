//! Request descriptor consumed by the request executor.

use crate::errors::{OmadaResult, RequestError};
use crate::transport::HttpMethod;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Everything needed to describe one logical API call.
///
/// The executor only ever borrows a descriptor; authentication headers are
/// added to a per-attempt copy of the header map.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path relative to the controller base URL, already percent-encoded.
    pub path: String,
    /// Query parameters.
    pub query: BTreeMap<String, String>,
    /// Extra headers. `Authorization`, `Content-Type` and `Accept` are
    /// always overwritten by the executor.
    pub headers: HeaderMap,
    /// JSON body.
    pub body: Option<Value>,
    /// Per-call timeout, falling back to the configured default.
    pub timeout: Option<Duration>,
}

impl RequestDescriptor {
    /// Creates a descriptor with no parameters, headers or body.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: BTreeMap::new(),
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Creates a GET descriptor.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST descriptor.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Creates a PUT descriptor.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// Creates a PATCH descriptor.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    /// Creates a DELETE descriptor.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Adds a query parameter, replacing any previous value for `key`.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.insert(key.into(), value.to_string());
        self
    }

    /// Adds several query parameters.
    pub fn queries<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Adds a header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets a JSON body from any serializable value.
    pub fn json<B: Serialize>(mut self, body: &B) -> OmadaResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| RequestError::Serialization(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Sets the per-call timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
