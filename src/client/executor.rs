//! Authenticated request engine.
//!
//! Every controller call goes through [`RequestExecutor`]. It attaches the
//! current access token, sends exactly one HTTP exchange per attempt,
//! unwraps the `{errorCode, msg, result}` envelope and recovers from one
//! kind of failure locally: a stale token. When the controller signals an
//! expired or invalid token, the credential provider is invalidated and
//! the call is repeated once with a fresh token. Every other failure is
//! returned to the caller as is.

use crate::auth::expiry::{self, AuthSignal};
use crate::auth::{join_path, AccessToken, AuthProvider};
use crate::config::OmadaConfig;
use crate::errors::{
    AuthenticationError, OmadaError, OmadaResult, ProtocolError, RemoteError, RequestError,
};
use crate::pagination::{Page, PageIterator};
use crate::sanitize::{public_params, sanitize, sanitize_headers, sanitize_params};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::types::{Envelope, RequestDescriptor};
use bytes::Bytes;
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Whether a call may be repeated after an authentication failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthRetry {
    /// Invalidate the token and retry once.
    #[default]
    Once,
    /// Fail on the first authentication failure.
    Never,
}

/// Position of an attempt within one logical call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    First,
    Retry,
}

impl Attempt {
    fn number(self) -> u8 {
        match self {
            Attempt::First => 1,
            Attempt::Retry => 2,
        }
    }
}

/// Result of a single attempt that received a response.
enum Outcome<T> {
    Done(T),
    AuthFailure(AuthSignal),
}

/// Request executor that handles authentication, envelope unwrapping and
/// error mapping.
pub struct RequestExecutor {
    config: OmadaConfig,
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
}

impl RequestExecutor {
    /// Creates a new request executor.
    pub fn new(
        config: OmadaConfig,
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            config,
            transport,
            auth,
        }
    }

    /// Gets the configuration.
    pub fn config(&self) -> &OmadaConfig {
        &self.config
    }

    /// Executes a call, retrying once after an authentication failure.
    ///
    /// An absent or null `result` is decoded from JSON `null`, so `()`,
    /// `Option<_>` and `Value` yield their empty value. Types that cannot
    /// be built from `null` fail with [`ProtocolError::UnexpectedResult`].
    pub async fn execute<T: DeserializeOwned>(
        &self,
        descriptor: &RequestDescriptor,
    ) -> OmadaResult<T> {
        self.execute_with(descriptor, AuthRetry::Once).await
    }

    /// Executes a call with an explicit authentication retry policy.
    pub async fn execute_with<T: DeserializeOwned>(
        &self,
        descriptor: &RequestDescriptor,
        retry: AuthRetry,
    ) -> OmadaResult<T> {
        let mut attempt = Attempt::First;

        loop {
            let signal = match self.attempt(descriptor, attempt).await? {
                Outcome::Done(value) => return Ok(value),
                Outcome::AuthFailure(signal) => signal,
            };

            match (attempt, retry) {
                (Attempt::First, AuthRetry::Once) => {
                    warn!(
                        method = %descriptor.method,
                        path = %descriptor.path,
                        reason = %signal,
                        "Access token rejected, invalidating and retrying once"
                    );
                    self.auth.invalidate().await;
                    attempt = Attempt::Retry;
                }
                _ => {
                    return Err(AuthenticationError::Rejected {
                        path: descriptor.path.clone(),
                        reason: signal.to_string(),
                    }
                    .into());
                }
            }
        }
    }

    /// Fetches every record of a paged collection.
    ///
    /// `page` and `pageSize` are set by the executor and override any
    /// values in `params`.
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &BTreeMap<String, String>,
    ) -> OmadaResult<Vec<T>> {
        let page_size = self.config.page_size;

        let mut pages = PageIterator::new(|page: u32| {
            let descriptor = RequestDescriptor::get(path)
                .queries(params.clone())
                .query("page", page)
                .query("pageSize", page_size);
            async move {
                self.execute::<Option<Page<T>>>(&descriptor)
                    .await
                    .map(Option::unwrap_or_default)
            }
        });

        let records = pages.collect_all().await?;

        info!(
            path = %path,
            pages = pages.pages_fetched(),
            records = records.len(),
            "Fetched paged collection"
        );

        Ok(records)
    }

    /// Builds the absolute URL for a path and query parameters.
    pub fn build_url(&self, path: &str, query: &BTreeMap<String, String>) -> OmadaResult<Url> {
        if path.contains(|c: char| c == '?' || c == '#') {
            return Err(RequestError::InvalidUrl(format!(
                "path must not contain a query or fragment: {}",
                path
            ))
            .into());
        }

        let mut url = join_path(&self.config.base_url, path);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }

    async fn attempt<T: DeserializeOwned>(
        &self,
        descriptor: &RequestDescriptor,
        attempt: Attempt,
    ) -> OmadaResult<Outcome<T>> {
        let token = self.auth.get_access_token().await?;
        let request = self.build_request(descriptor, &token)?;

        info!(
            method = %descriptor.method,
            path = %descriptor.path,
            attempt = attempt.number(),
            params = %public_params(&descriptor.query),
            "Sending request"
        );
        if self.config.verbose_logging {
            let body = descriptor
                .body
                .as_ref()
                .map(sanitize)
                .unwrap_or(Value::Null);
            debug!(
                headers = %sanitize_headers(&request.headers),
                params = %sanitize_params(&descriptor.query),
                body = %body,
                "Request detail"
            );
        }

        let response = self.transport.send(request).await?;
        self.interpret(descriptor, response)
    }

    fn build_request(
        &self,
        descriptor: &RequestDescriptor,
        token: &AccessToken,
    ) -> OmadaResult<HttpRequest> {
        let url = self.build_url(&descriptor.path, &descriptor.query)?;

        let mut authorization = HeaderValue::from_str(&token.authorization_header())
            .map_err(|e| RequestError::InvalidHeader(format!("authorization: {}", e)))?;
        authorization.set_sensitive(true);

        // Engine headers replace caller headers of the same name.
        let mut headers = descriptor.headers.clone();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let body = descriptor
            .body
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| RequestError::Serialization(e.to_string()))?
            .map(Bytes::from);

        Ok(HttpRequest {
            method: descriptor.method,
            url,
            headers,
            body,
            timeout: Some(descriptor.timeout.unwrap_or(self.config.timeout)),
        })
    }

    fn interpret<T: DeserializeOwned>(
        &self,
        descriptor: &RequestDescriptor,
        response: HttpResponse,
    ) -> OmadaResult<Outcome<T>> {
        let status = response.status;
        let path = &descriptor.path;

        let envelope = match parse_envelope(&response.body) {
            Ok((envelope, raw)) => {
                info!(
                    path = %path,
                    status = status.as_u16(),
                    error_code = envelope.error_code,
                    "Received response"
                );
                if self.config.verbose_logging {
                    debug!(response = %sanitize(&raw), "Response detail");
                }
                envelope
            }
            Err(parse_error) => {
                info!(path = %path, status = status.as_u16(), "Received response without envelope");
                if status == StatusCode::UNAUTHORIZED {
                    return Ok(Outcome::AuthFailure(AuthSignal::Unauthorized));
                }
                if !status.is_success() {
                    return Err(status_error(path, &response));
                }
                return Err(OmadaError::protocol(
                    path.as_str(),
                    status.as_u16(),
                    parse_error.to_string(),
                ));
            }
        };

        if let Some(signal) = expiry::detect(&envelope) {
            return Ok(Outcome::AuthFailure(signal));
        }

        if !status.is_success() {
            return Err(status_error(path, &response));
        }

        if !envelope.is_success() {
            return Err(RemoteError::Code {
                path: path.clone(),
                code: envelope.error_code,
                message: envelope.message().to_string(),
            }
            .into());
        }

        let result = envelope.result.unwrap_or(Value::Null);
        serde_json::from_value(result)
            .map(Outcome::Done)
            .map_err(|e| {
                ProtocolError::UnexpectedResult {
                    path: path.clone(),
                    message: e.to_string(),
                }
                .into()
            })
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("config", &self.config)
            .finish()
    }
}

fn parse_envelope(body: &[u8]) -> Result<(Envelope<Value>, Value), serde_json::Error> {
    let raw: Value = serde_json::from_slice(body)?;
    let envelope = serde_json::from_value(raw.clone())?;
    Ok((envelope, raw))
}

fn status_error(path: &str, response: &HttpResponse) -> OmadaError {
    RemoteError::Status {
        path: path.to_string(),
        status: response.status.as_u16(),
        body: String::from_utf8_lossy(&response.body).into_owned(),
    }
    .into()
}
