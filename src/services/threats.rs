//! Threat management service.

use super::controller_path;
use crate::client::RequestExecutor;
use crate::errors::OmadaResult;
use crate::types::{ThreatEvent, ThreatQuery};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Service for IPS threat events.
pub struct ThreatsService {
    executor: Arc<RequestExecutor>,
}

impl ThreatsService {
    /// Creates a new threats service.
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Lists threat events of a site matching `query`.
    pub async fn list(&self, site_id: &str, query: &ThreatQuery) -> OmadaResult<Vec<ThreatEvent>> {
        let path = controller_path(
            &self.executor,
            &["sites", site_id, "threat-management", "threats"],
        );
        let params: BTreeMap<String, String> = query.to_params().into_iter().collect();
        self.executor.fetch_all(&path, &params).await
    }
}
