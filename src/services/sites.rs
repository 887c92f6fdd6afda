//! Sites service.

use super::controller_path;
use crate::client::RequestExecutor;
use crate::errors::OmadaResult;
use crate::types::Site;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Service for site operations.
pub struct SitesService {
    executor: Arc<RequestExecutor>,
}

impl SitesService {
    /// Creates a new sites service.
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Lists every site on the controller.
    pub async fn list(&self) -> OmadaResult<Vec<Site>> {
        let path = controller_path(&self.executor, &["sites"]);
        self.executor.fetch_all(&path, &BTreeMap::new()).await
    }
}
