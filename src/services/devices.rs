//! Devices service.

use super::controller_path;
use crate::client::RequestExecutor;
use crate::errors::OmadaResult;
use crate::types::{Device, RequestDescriptor};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Service for adopted device operations.
pub struct DevicesService {
    executor: Arc<RequestExecutor>,
}

impl DevicesService {
    /// Creates a new devices service.
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Lists every device adopted in a site.
    pub async fn list(&self, site_id: &str) -> OmadaResult<Vec<Device>> {
        let path = controller_path(&self.executor, &["sites", site_id, "devices"]);
        self.executor.fetch_all(&path, &BTreeMap::new()).await
    }

    /// Gets one device by MAC address.
    pub async fn get(&self, site_id: &str, mac: &str) -> OmadaResult<Device> {
        let path = controller_path(&self.executor, &["sites", site_id, "devices", mac]);
        self.executor.execute(&RequestDescriptor::get(path)).await
    }
}
