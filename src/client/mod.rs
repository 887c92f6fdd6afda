//! Omada OpenAPI client implementation.

use crate::auth::{AuthProvider, ClientCredentialsProvider};
use crate::config::{OmadaConfig, OmadaConfigBuilder};
use crate::errors::{ConfigurationError, OmadaError, OmadaResult};
use crate::services::*;
use crate::transport::{HttpTransport, ReqwestTransport, TlsMode};
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;

mod executor;
pub use executor::{AuthRetry, RequestExecutor};

/// Omada OpenAPI client.
///
/// This is the main entry point. It wires the configuration into a
/// transport, a credential provider and the request executor, and exposes
/// one service per controller resource.
pub struct OmadaClient {
    config: OmadaConfig,
    auth: Arc<dyn AuthProvider>,
    executor: Arc<RequestExecutor>,
}

impl OmadaClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use integrations_omada::{OmadaClient, OmadaConfig, TlsMode};
    /// use secrecy::SecretString;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = OmadaConfig::builder()
    ///     .base_url("https://omada.local:8043")
    ///     .controller_id("omadac-id")
    ///     .client_credentials("client-id", SecretString::new("client-secret".to_string()))
    ///     .tls(TlsMode::AcceptInvalidCerts)
    ///     .build()?;
    ///
    /// let client = OmadaClient::new(config)?;
    /// let sites = client.sites().list().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: OmadaConfig) -> OmadaResult<Self> {
        let transport = ReqwestTransport::with_settings(
            config.tls,
            config.connect_timeout,
            &config.user_agent,
        )
        .map_err(|e| OmadaError::configuration(format!("Failed to create transport: {}", e)))?;

        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a client that sends every request, token requests included,
    /// through `transport`.
    pub fn with_transport(
        config: OmadaConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> OmadaResult<Self> {
        config.validate()?;

        let auth: Arc<dyn AuthProvider> = match &config.auth_provider {
            Some(provider) => provider.clone(),
            None => Arc::new(credentials_provider(&config, transport.clone())?),
        };

        let executor = Arc::new(RequestExecutor::new(
            config.clone(),
            transport,
            auth.clone(),
        ));

        Ok(Self {
            config,
            auth,
            executor,
        })
    }

    /// Creates a client from `OMADA_*` environment variables.
    pub fn from_env() -> OmadaResult<Self> {
        Self::new(OmadaConfig::from_env()?)
    }

    /// Creates a new client builder.
    pub fn builder() -> OmadaClientBuilder {
        OmadaClientBuilder::new()
    }

    /// Access the sites service.
    pub fn sites(&self) -> SitesService {
        SitesService::new(self.executor.clone())
    }

    /// Access the devices service.
    pub fn devices(&self) -> DevicesService {
        DevicesService::new(self.executor.clone())
    }

    /// Access the connected clients service.
    pub fn clients(&self) -> ClientsService {
        ClientsService::new(self.executor.clone())
    }

    /// Access the threat management service.
    pub fn threats(&self) -> ThreatsService {
        ThreatsService::new(self.executor.clone())
    }

    /// Gets the configuration.
    pub fn config(&self) -> &OmadaConfig {
        &self.config
    }

    /// Gets the credential provider.
    pub fn auth(&self) -> &Arc<dyn AuthProvider> {
        &self.auth
    }

    /// Gets the request executor, for calls without a typed service.
    pub fn executor(&self) -> &Arc<RequestExecutor> {
        &self.executor
    }
}

impl std::fmt::Debug for OmadaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OmadaClient")
            .field("config", &self.config)
            .finish()
    }
}

fn credentials_provider(
    config: &OmadaConfig,
    transport: Arc<dyn HttpTransport>,
) -> OmadaResult<ClientCredentialsProvider> {
    match (&config.client_id, &config.client_secret) {
        (Some(client_id), Some(client_secret)) => Ok(ClientCredentialsProvider::new(
            config.base_url.clone(),
            config.controller_id.clone(),
            client_id.clone(),
            client_secret.clone(),
            transport,
        )
        .with_timeout(config.timeout)),
        _ => Err(ConfigurationError::MissingCredentials(
            "client_id and client_secret are required without an auth provider".to_string(),
        )
        .into()),
    }
}

/// Builder for OmadaClient.
pub struct OmadaClientBuilder {
    config_builder: OmadaConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl OmadaClientBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config_builder: OmadaConfig::builder(),
            transport: None,
        }
    }

    /// Sets the controller base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(url);
        self
    }

    /// Sets the controller ID.
    pub fn controller_id(mut self, id: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.controller_id(id);
        self
    }

    /// Sets the OpenAPI client credentials.
    pub fn client_credentials(mut self, client_id: impl Into<String>, secret: SecretString) -> Self {
        self.config_builder = self.config_builder.client_credentials(client_id, secret);
        self
    }

    /// Sets the authentication provider.
    pub fn auth_provider<A: AuthProvider + 'static>(mut self, provider: A) -> Self {
        self.config_builder = self.config_builder.auth_provider(provider);
        self
    }

    /// Sets the authentication provider from an Arc.
    pub fn auth_provider_arc(mut self, provider: Arc<dyn AuthProvider>) -> Self {
        self.config_builder = self.config_builder.auth_provider_arc(provider);
        self
    }

    /// Sets the per-exchange timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.connect_timeout(timeout);
        self
    }

    /// Sets the certificate verification policy.
    pub fn tls(mut self, tls: TlsMode) -> Self {
        self.config_builder = self.config_builder.tls(tls);
        self
    }

    /// Enables or disables verbose request logging.
    pub fn verbose_logging(mut self, enabled: bool) -> Self {
        self.config_builder = self.config_builder.verbose_logging(enabled);
        self
    }

    /// Sets the page size used for paged collections.
    pub fn page_size(mut self, size: u32) -> Self {
        self.config_builder = self.config_builder.page_size(size);
        self
    }

    /// Sets the user agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.user_agent(ua);
        self
    }

    /// Uses a custom transport instead of reqwest.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the client.
    pub fn build(self) -> OmadaResult<OmadaClient> {
        let config = self.config_builder.build()?;
        match self.transport {
            Some(transport) => OmadaClient::with_transport(config, transport),
            None => OmadaClient::new(config),
        }
    }
}

impl Default for OmadaClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
