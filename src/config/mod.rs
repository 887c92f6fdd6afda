//! Configuration for the Omada client.

use crate::auth::AuthProvider;
use crate::errors::{ConfigurationError, OmadaError, OmadaResult};
use crate::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::transport::TlsMode;
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Configuration for the Omada client.
#[derive(Clone)]
pub struct OmadaConfig {
    /// Controller base URL, e.g. `https://omada.local:8043`.
    pub base_url: Url,

    /// Controller ID (`omadacId`) used in every OpenAPI path.
    pub controller_id: String,

    /// Client ID of the OpenAPI application.
    pub client_id: Option<String>,

    /// Client secret of the OpenAPI application.
    pub client_secret: Option<SecretString>,

    /// Explicit credential provider, used instead of the client credentials.
    pub auth_provider: Option<Arc<dyn AuthProvider>>,

    /// Timeout for a single HTTP exchange.
    pub timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Certificate verification policy.
    pub tls: TlsMode,

    /// Log sanitized headers, parameters and bodies at debug level.
    pub verbose_logging: bool,

    /// Page size requested by `fetch_all`.
    pub page_size: u32,

    /// User agent string.
    pub user_agent: String,
}

impl OmadaConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> OmadaConfigBuilder {
        OmadaConfigBuilder::new()
    }

    /// Builds a configuration from `OMADA_*` environment variables.
    ///
    /// Required: `OMADA_BASE_URL`, `OMADA_CONTROLLER_ID`, `OMADA_CLIENT_ID`,
    /// `OMADA_CLIENT_SECRET`. Optional: `OMADA_VERIFY_SSL` (default true),
    /// `OMADA_TIMEOUT` in seconds, `OMADA_VERBOSE_LOGGING`. Flags accept
    /// `true`/`false`, `1`/`0`, `yes`/`no` or `on`/`off`; anything else is an error.
    pub fn from_env() -> OmadaResult<Self> {
        let mut builder = OmadaConfigBuilder::new()
            .base_url(required_env("OMADA_BASE_URL")?)
            .controller_id(required_env("OMADA_CONTROLLER_ID")?)
            .client_credentials(
                required_env("OMADA_CLIENT_ID")?,
                SecretString::new(required_env("OMADA_CLIENT_SECRET")?),
            );

        if let Ok(verify) = std::env::var("OMADA_VERIFY_SSL") {
            if !parse_flag("OMADA_VERIFY_SSL", &verify)? {
                builder = builder.tls(TlsMode::AcceptInvalidCerts);
            }
        }

        if let Ok(timeout_str) = std::env::var("OMADA_TIMEOUT") {
            if let Ok(timeout_secs) = timeout_str.parse::<u64>() {
                builder = builder.timeout(Duration::from_secs(timeout_secs));
            }
        }

        if let Ok(verbose) = std::env::var("OMADA_VERBOSE_LOGGING") {
            builder = builder.verbose_logging(parse_flag("OMADA_VERBOSE_LOGGING", &verbose)?);
        }

        builder.build()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> OmadaResult<()> {
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(OmadaError::configuration(
                "Base URL must use http or https",
            ));
        }

        if self.controller_id.trim().is_empty() {
            return Err(ConfigurationError::MissingSetting(
                "controller_id must not be empty".to_string(),
            )
            .into());
        }

        if self.auth_provider.is_none()
            && (self.client_id.is_none() || self.client_secret.is_none())
        {
            return Err(ConfigurationError::MissingCredentials(
                "client_id and client_secret are required without an auth provider".to_string(),
            )
            .into());
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(OmadaError::configuration(format!(
                "page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        if self.timeout.is_zero() {
            return Err(OmadaError::configuration("timeout must be non-zero"));
        }

        Ok(())
    }
}

impl std::fmt::Debug for OmadaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OmadaConfig")
            .field("base_url", &self.base_url.as_str())
            .field("controller_id", &self.controller_id)
            .field("client_id", &self.client_id.as_ref().map(|_| "[REDACTED]"))
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("auth_provider", &self.auth_provider.is_some())
            .field("timeout", &self.timeout)
            .field("tls", &self.tls)
            .field("verbose_logging", &self.verbose_logging)
            .field("page_size", &self.page_size)
            .finish()
    }
}

/// Builder for OmadaConfig.
pub struct OmadaConfigBuilder {
    base_url: Option<String>,
    controller_id: Option<String>,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    auth_provider: Option<Arc<dyn AuthProvider>>,
    timeout: Duration,
    connect_timeout: Duration,
    tls: TlsMode,
    verbose_logging: bool,
    page_size: u32,
    user_agent: Option<String>,
}

impl OmadaConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            controller_id: None,
            client_id: None,
            client_secret: None,
            auth_provider: None,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            tls: TlsMode::Verify,
            verbose_logging: false,
            page_size: DEFAULT_PAGE_SIZE,
            user_agent: None,
        }
    }

    /// Sets the controller base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the controller ID.
    pub fn controller_id(mut self, id: impl Into<String>) -> Self {
        self.controller_id = Some(id.into());
        self
    }

    /// Sets the OpenAPI client credentials.
    pub fn client_credentials(mut self, client_id: impl Into<String>, secret: SecretString) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(secret);
        self
    }

    /// Sets the authentication provider.
    pub fn auth_provider<A: AuthProvider + 'static>(mut self, provider: A) -> Self {
        self.auth_provider = Some(Arc::new(provider));
        self
    }

    /// Sets the authentication provider from an Arc.
    pub fn auth_provider_arc(mut self, provider: Arc<dyn AuthProvider>) -> Self {
        self.auth_provider = Some(provider);
        self
    }

    /// Sets the per-exchange timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the certificate verification policy.
    pub fn tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }

    /// Enables or disables verbose request logging.
    pub fn verbose_logging(mut self, enabled: bool) -> Self {
        self.verbose_logging = enabled;
        self
    }

    /// Sets the page size used by `fetch_all`.
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Sets the user agent string.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> OmadaResult<OmadaConfig> {
        let raw_url = self.base_url.ok_or_else(|| {
            ConfigurationError::MissingSetting("base_url is required".to_string())
        })?;
        let base_url = Url::parse(&raw_url).map_err(|e| {
            OmadaError::configuration(format!("Invalid base URL {}: {}", raw_url, e))
        })?;

        let controller_id = self.controller_id.ok_or_else(|| {
            ConfigurationError::MissingSetting("controller_id is required".to_string())
        })?;

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("integrations-omada/{}", env!("CARGO_PKG_VERSION")));

        let config = OmadaConfig {
            base_url,
            controller_id,
            client_id: self.client_id,
            client_secret: self.client_secret,
            auth_provider: self.auth_provider,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            tls: self.tls,
            verbose_logging: self.verbose_logging,
            page_size: self.page_size,
            user_agent,
        };

        config.validate()?;

        Ok(config)
    }
}

impl Default for OmadaConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn required_env(name: &str) -> OmadaResult<String> {
    std::env::var(name).map_err(|_| {
        ConfigurationError::MissingSetting(format!("{} environment variable not set", name)).into()
    })
}

fn parse_flag(name: &str, value: &str) -> OmadaResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigurationError::InvalidConfiguration(format!(
            "{} must be true or false, got {:?}",
            name, value
        ))
        .into()),
    }
}
