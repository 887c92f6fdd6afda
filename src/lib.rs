//! Omada Controller Integration Module
//!
//! This module provides a type-safe, async client for the OpenAPI of TP-Link
//! Omada SDN controllers. At its core is an authenticated request engine
//! that every typed operation goes through.
//!
//! # Features
//!
//! - **Token lifecycle**: client-credentials tokens are cached, refreshed
//!   before expiry, and refreshed once more when the controller rejects them
//! - **Envelope handling**: the `{errorCode, msg, result}` wrapper is
//!   unwrapped into typed results or mapped to typed errors
//! - **Pagination**: numbered pages are fetched until the collection is
//!   exhausted, tolerating missing or changing `totalRows`
//! - **Log sanitization**: tokens, secrets and passwords are masked before
//!   anything reaches `tracing`
//! - **Self-signed controllers**: certificate verification is a per-client
//!   setting, never a process-wide toggle
//!
//! # Example
//!
//! ```no_run
//! use integrations_omada::{OmadaClient, ThreatQuery};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads OMADA_BASE_URL, OMADA_CONTROLLER_ID, OMADA_CLIENT_ID, ...
//! let client = OmadaClient::from_env()?;
//!
//! for site in client.sites().list().await? {
//!     let devices = client.devices().list(&site.site_id).await?;
//!     let threats = client
//!         .threats()
//!         .list(&site.site_id, &ThreatQuery::new().archived(false))
//!         .await?;
//!     println!("{}: {} devices, {} threats", site.name, devices.len(), threats.len());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

// Core modules
pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod pagination;
pub mod sanitize;
pub mod services;
pub mod transport;
pub mod types;

// Internal modules (not part of public API)
#[cfg(test)]
mod mocks;

// Re-exports for convenience
pub use auth::{AccessToken, AuthProvider, ClientCredentialsProvider, StaticTokenProvider};
pub use client::{AuthRetry, OmadaClient, OmadaClientBuilder, RequestExecutor};
pub use config::{OmadaConfig, OmadaConfigBuilder};
pub use errors::{OmadaError, OmadaResult};
pub use transport::TlsMode;
pub use types::{ConnectedClient, Device, RequestDescriptor, Site, ThreatEvent, ThreatQuery};

/// Prelude module with commonly used types and traits.
///
/// ```no_run
/// use integrations_omada::prelude::*;
/// ```
pub mod prelude {
    // Client
    pub use crate::client::{AuthRetry, OmadaClient, OmadaClientBuilder, RequestExecutor};

    // Configuration
    pub use crate::config::{OmadaConfig, OmadaConfigBuilder};
    pub use crate::transport::TlsMode;

    // Authentication
    pub use crate::auth::{
        AccessToken, AuthProvider, ClientCredentialsProvider, StaticTokenProvider,
    };

    // Services
    pub use crate::services::{ClientsService, DevicesService, SitesService, ThreatsService};

    // Common types
    pub use crate::types::{
        ConnectedClient, Device, Envelope, RequestDescriptor, Site, ThreatEvent, ThreatQuery,
    };

    // Errors
    pub use crate::errors::{OmadaError, OmadaResult};

    // Pagination
    pub use crate::pagination::{Page, PageIterator};
}
