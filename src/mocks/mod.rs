//! Mock implementations for testing.
//!
//! Provides an in-memory transport and credential provider so the request
//! engine can be exercised without a controller.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

use crate::auth::{AccessToken, AuthProvider};
use crate::errors::{AuthenticationError, TransportError};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

/// Mock HTTP transport for testing.
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<MockResponse, TransportError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// A recorded request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute request URL.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
    /// Request body.
    pub body: Option<Bytes>,
    /// Request timeout.
    pub timeout: Option<Duration>,
}

impl RecordedRequest {
    /// Parses the body as JSON.
    pub fn json_body(&self) -> Option<Value> {
        self.body
            .as_ref()
            .and_then(|body| serde_json::from_slice(body).ok())
    }

    /// Returns a header value as a string.
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    /// Returns a query parameter value.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

/// A mock response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl MockResponse {
    /// Creates a JSON response with the given status.
    pub fn json(status: u16, value: &Value) -> Self {
        Self {
            status,
            body: serde_json::to_vec(value).unwrap_or_default(),
        }
    }

    /// Creates a response with a raw body.
    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.as_bytes().to_vec(),
        }
    }
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queues a response.
    pub fn queue_response(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queues a JSON response with the given status.
    pub fn queue(&self, status: u16, value: &Value) {
        self.queue_response(MockResponse::json(status, value));
    }

    /// Queues a 200 JSON response.
    pub fn queue_json(&self, value: &Value) {
        self.queue(200, value);
    }

    /// Queues a transport failure.
    pub fn queue_failure(&self, error: TransportError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: request.method,
            url: request.url,
            headers: request.headers,
            body: request.body,
            timeout: request.timeout,
        });

        let next = self.responses.lock().unwrap().pop_front();
        let response = match next {
            Some(Ok(response)) => response,
            Some(Err(error)) => return Err(error),
            None => MockResponse::raw(500, "No mock response configured"),
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(HttpResponse::new(
            StatusCode::from_u16(response.status).unwrap(),
            headers,
            Bytes::from(response.body),
        ))
    }
}

/// Mock credential provider handing out `token-1`, `token-2`, ...
///
/// Each `invalidate` moves on to the next token.
pub struct MockAuthProvider {
    generation: AtomicUsize,
    token_calls: AtomicUsize,
    invalidations: AtomicUsize,
    fail_with: Mutex<Option<String>>,
}

impl MockAuthProvider {
    /// Creates a new mock auth provider.
    pub fn new() -> Self {
        Self {
            generation: AtomicUsize::new(1),
            token_calls: AtomicUsize::new(0),
            invalidations: AtomicUsize::new(0),
            fail_with: Mutex::new(None),
        }
    }

    /// Makes every subsequent token request fail.
    pub fn fail_with(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
    }

    /// Number of `invalidate` calls.
    pub fn invalidations(&self) -> usize {
        self.invalidations.load(Ordering::SeqCst)
    }

    /// Number of `get_access_token` calls.
    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn get_access_token(&self) -> Result<AccessToken, AuthenticationError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(AuthenticationError::TokenUnavailable(message));
        }
        let generation = self.generation.load(Ordering::SeqCst);
        Ok(AccessToken::new(
            format!("token-{}", generation),
            Utc::now() + ChronoDuration::hours(2),
        ))
    }

    async fn invalidate(&self) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for MockAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAuthProvider").finish()
    }
}
