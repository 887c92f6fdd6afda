//! Connected clients service.

use super::controller_path;
use crate::client::RequestExecutor;
use crate::errors::OmadaResult;
use crate::types::ConnectedClient;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Service for the clients currently connected to a site.
pub struct ClientsService {
    executor: Arc<RequestExecutor>,
}

impl ClientsService {
    /// Creates a new clients service.
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Lists every client connected to a site.
    pub async fn list(&self, site_id: &str) -> OmadaResult<Vec<ConnectedClient>> {
        let path = controller_path(&self.executor, &["sites", site_id, "clients"]);
        self.executor.fetch_all(&path, &BTreeMap::new()).await
    }
}
