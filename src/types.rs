use serde::{Deserialize, Serialize};

/// One open port discovered by a scan, with detected service metadata.
///
/// `service` falls back to `"unknown"` when the report carries no service
/// element for the port; `product` and `version` fall back to `""`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PortRecord {
    pub port: u16,
    pub protocol: String,
    pub service: String,
    pub product: String,
    pub version: String,
}

/// Successful scan response: the configured target plus its open ports,
/// sorted ascending by port number.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScanResponse {
    pub target: String,
    pub ports: Vec<PortRecord>,
}

/// Error body returned when a scan or report parse fails.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorResponse {
    pub error: String,
}
