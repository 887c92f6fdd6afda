//! Records returned by the site, device, client and threat endpoints.
//!
//! Only the commonly used fields are typed; everything else the controller
//! sends is kept in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A site managed by the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    /// Site ID.
    pub site_id: String,

    /// Display name.
    pub name: String,

    /// Country or region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Time zone identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,

    /// Deployment scenario (office, hotel, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,

    /// Untyped fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An adopted network device (gateway, switch or access point).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// MAC address.
    pub mac: String,

    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Device type, e.g. `ap`, `switch`, `gateway`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,

    /// Hardware model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Management IP address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    /// Controller status code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,

    /// Firmware version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,

    /// Untyped fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A client station connected to the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedClient {
    /// MAC address.
    pub mac: String,

    /// Display name or hostname.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// IP address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    /// Whether the client is on Wi-Fi.
    #[serde(default)]
    pub wireless: bool,

    /// SSID for wireless clients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,

    /// Untyped fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A security threat event reported by the gateway's IPS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatEvent {
    /// Event ID.
    pub id: String,

    /// Event time in epoch milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,

    /// Severity level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<i64>,

    /// Threat classification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,

    /// Source IP.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_ip: Option<String>,

    /// Destination IP.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dst_ip: Option<String>,

    /// Whether the event has been archived.
    #[serde(default)]
    pub archived: bool,

    /// Untyped fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filters for listing threat events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreatQuery {
    /// Start of the window, epoch milliseconds.
    pub start_time: Option<i64>,
    /// End of the window, epoch milliseconds.
    pub end_time: Option<i64>,
    /// Only return events at this severity.
    pub severity: Option<i64>,
    /// Return archived instead of active events.
    pub archived: Option<bool>,
}

impl ThreatQuery {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to a time window.
    pub fn between(mut self, start_time: i64, end_time: i64) -> Self {
        self.start_time = Some(start_time);
        self.end_time = Some(end_time);
        self
    }

    /// Restricts to one severity level.
    pub fn severity(mut self, severity: i64) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Selects archived or active events.
    pub fn archived(mut self, archived: bool) -> Self {
        self.archived = Some(archived);
        self
    }

    /// Query parameters in the controller's naming.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(start) = self.start_time {
            params.push(("startTime".to_string(), start.to_string()));
        }
        if let Some(end) = self.end_time {
            params.push(("endTime".to_string(), end.to_string()));
        }
        if let Some(severity) = self.severity {
            params.push(("severity".to_string(), severity.to_string()));
        }
        if let Some(archived) = self.archived {
            params.push(("archived".to_string(), archived.to_string()));
        }
        params
    }
}
