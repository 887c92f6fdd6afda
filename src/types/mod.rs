//! Type definitions for the Omada OpenAPI.

mod envelope;
mod network;
mod request;

pub use envelope::Envelope;
pub use network::{ConnectedClient, Device, Site, ThreatEvent, ThreatQuery};
pub use request::RequestDescriptor;
