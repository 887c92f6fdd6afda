//! Credential providers for the Omada OpenAPI.
//!
//! The request executor only needs two things from a provider: a current
//! token, and a way to say "that token was rejected". Providers own the
//! token lifecycle; the executor never caches tokens itself.
//!
//! # Example
//!
//! ```no_run
//! use integrations_omada::auth::{AuthProvider, ClientCredentialsProvider};
//! use integrations_omada::transport::{ReqwestTransport, TlsMode};
//! use secrecy::SecretString;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(ReqwestTransport::with_settings(
//!     TlsMode::AcceptInvalidCerts,
//!     Duration::from_secs(10),
//!     "example/1.0",
//! )?);
//!
//! let provider = ClientCredentialsProvider::new(
//!     url::Url::parse("https://omada.local:8043")?,
//!     "omadac-id",
//!     "client-id",
//!     SecretString::new("client-secret".to_string()),
//!     transport,
//! );
//!
//! let token = provider.get_access_token().await?;
//! # Ok(())
//! # }
//! ```

pub mod expiry;

pub use expiry::{AuthFailureCode, AuthSignal};

use crate::errors::AuthenticationError;
use crate::transport::{HttpMethod, HttpRequest, HttpTransport};
use crate::types::Envelope;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};
use url::Url;

/// Path of the token authority, relative to the controller base URL.
pub const TOKEN_PATH: &str = "openapi/authorize/token";

/// Token expiry buffer (5 minutes) - refresh tokens proactively before expiry.
pub const TOKEN_EXPIRY_BUFFER_SECONDS: i64 = 300;

/// Prefix of the controller's `Authorization` header value.
pub const AUTHORIZATION_SCHEME: &str = "AccessToken=";

/// Authentication provider abstraction.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Get an access token for API requests.
    async fn get_access_token(&self) -> Result<AccessToken, AuthenticationError>;

    /// Mark the current token as stale so the next call fetches a new one.
    ///
    /// Must be safe to call concurrently with `get_access_token`.
    async fn invalidate(&self);
}

/// Access token with metadata.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// The token string.
    pub token: SecretString,

    /// Expiration time.
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Creates a new access token.
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: SecretString::new(token.into()),
            expires_at,
        }
    }

    /// Checks if the token is expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Checks if the token needs proactive refresh (within 5 minutes of expiry).
    pub fn needs_refresh(&self) -> bool {
        let threshold = self.expires_at - ChronoDuration::seconds(TOKEN_EXPIRY_BUFFER_SECONDS);
        Utc::now() >= threshold
    }

    /// Returns the authorization header value, `AccessToken=<token>`.
    pub fn authorization_header(&self) -> String {
        format!("{}{}", AUTHORIZATION_SCHEME, self.token.expose_secret())
    }
}

/// Client-credentials provider backed by the controller's token authority.
///
/// Tokens are cached until five minutes before expiry or until
/// [`AuthProvider::invalidate`] is called. Refresh is single-flight: callers
/// that find the cache empty queue on one lock and re-check the cache after
/// acquiring it, so a burst of concurrent callers results in one token
/// request.
pub struct ClientCredentialsProvider {
    token_url: Url,
    controller_id: String,
    client_id: String,
    client_secret: SecretString,
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
    cached_token: RwLock<Option<AccessToken>>,
    refresh_lock: Mutex<()>,
    token_requests: AtomicU64,
}

impl ClientCredentialsProvider {
    /// Creates a new provider for the controller at `base_url`.
    pub fn new(
        base_url: Url,
        controller_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: SecretString,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let token_url = join_path(&base_url, TOKEN_PATH);
        Self {
            token_url,
            controller_id: controller_id.into(),
            client_id: client_id.into(),
            client_secret,
            transport,
            timeout: Duration::from_secs(30),
            cached_token: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            token_requests: AtomicU64::new(0),
        }
    }

    /// Sets the timeout for token requests.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Number of token requests sent to the authority so far.
    pub fn token_requests(&self) -> u64 {
        self.token_requests.load(Ordering::Relaxed)
    }

    async fn cached(&self) -> Option<AccessToken> {
        let cached = self.cached_token.read().await;
        cached
            .as_ref()
            .filter(|token| !token.needs_refresh())
            .cloned()
    }

    async fn request_token(&self) -> Result<AccessToken, AuthenticationError> {
        #[derive(Serialize)]
        struct TokenRequest<'a> {
            #[serde(rename = "omadacId")]
            omadac_id: &'a str,
            client_id: &'a str,
            client_secret: &'a str,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct TokenResult {
            access_token: String,
            expires_in: i64,
        }

        let body = serde_json::to_vec(&TokenRequest {
            omadac_id: &self.controller_id,
            client_id: &self.client_id,
            client_secret: self.client_secret.expose_secret(),
        })
        .map_err(|e| AuthenticationError::TokenUnavailable(format!("Invalid token request: {}", e)))?;

        let mut url = self.token_url.clone();
        url.query_pairs_mut()
            .append_pair("grant_type", "client_credentials");

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        self.token_requests.fetch_add(1, Ordering::Relaxed);
        let response = self
            .transport
            .send(HttpRequest {
                method: HttpMethod::Post,
                url,
                headers,
                body: Some(Bytes::from(body)),
                timeout: Some(self.timeout),
            })
            .await
            .map_err(|e| AuthenticationError::TokenUnavailable(format!("Token request failed: {}", e)))?;

        let envelope: Envelope<TokenResult> =
            serde_json::from_slice(&response.body).map_err(|e| {
                AuthenticationError::TokenUnavailable(format!(
                    "Unexpected token response (HTTP {}): {}",
                    response.status.as_u16(),
                    e
                ))
            })?;

        if !envelope.is_success() {
            warn!(
                error_code = envelope.error_code,
                message = envelope.message(),
                "Token authority rejected client credentials"
            );
            return Err(AuthenticationError::CredentialsRejected {
                code: envelope.error_code,
                message: envelope.message().to_string(),
            });
        }

        let result = envelope.result.ok_or_else(|| {
            AuthenticationError::TokenUnavailable("Token response has no result".to_string())
        })?;

        debug!(expires_in = result.expires_in, "Obtained access token");

        let expires_at = ChronoDuration::try_seconds(result.expires_in)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| {
                AuthenticationError::TokenUnavailable(format!(
                    "Token lifetime out of range: {} seconds",
                    result.expires_in
                ))
            })?;
        Ok(AccessToken::new(result.access_token, expires_at))
    }
}

#[async_trait]
impl AuthProvider for ClientCredentialsProvider {
    async fn get_access_token(&self) -> Result<AccessToken, AuthenticationError> {
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited.
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let token = self.request_token().await?;
        *self.cached_token.write().await = Some(token.clone());
        Ok(token)
    }

    async fn invalidate(&self) {
        debug!("Invalidating cached access token");
        *self.cached_token.write().await = None;
    }
}

impl std::fmt::Debug for ClientCredentialsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentialsProvider")
            .field("token_url", &self.token_url.as_str())
            .field("controller_id", &self.controller_id)
            .field("client_id", &"[REDACTED]")
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Provider for a token managed outside this crate.
///
/// `invalidate` has nothing to refresh, so a rejected static token surfaces
/// as an authentication error after the executor's single retry.
pub struct StaticTokenProvider {
    token: AccessToken,
}

impl StaticTokenProvider {
    /// Creates a provider that always returns `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(token, DateTime::<Utc>::MAX_UTC),
        }
    }
}

#[async_trait]
impl AuthProvider for StaticTokenProvider {
    async fn get_access_token(&self) -> Result<AccessToken, AuthenticationError> {
        Ok(self.token.clone())
    }

    async fn invalidate(&self) {
        debug!("Static token provider cannot refresh its token");
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Joins a relative path onto a base URL, keeping any base path segment.
pub(crate) fn join_path(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    let base_path = base.path().trim_end_matches('/');
    url.set_path(&format!("{}/{}", base_path, path.trim_start_matches('/')));
    url
}
