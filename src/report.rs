//! Extraction of open-port records from the scan tool's XML report.
//!
//! nmap's `-oX -` flag writes a tree-structured report to stdout. The wire
//! structs below deserialize just the slice of it this service cares about
//! (hosts, their port tables, and detected services) using `quick-xml` with
//! serde; everything else in the document is ignored.

use quick_xml::de::from_str;
use serde::Deserialize;
use thiserror::Error;

use crate::types::PortRecord;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("malformed scan report: {0}")]
    Malformed(#[from] quick_xml::DeError),
}

/// Root element: `<nmaprun>`.
#[derive(Debug, Deserialize)]
struct NmaprunDoc {
    #[serde(rename = "host", default)]
    hosts: Vec<HostEl>,
}

/// A `<host>` entry. A host may legitimately carry no ports container.
#[derive(Debug, Deserialize)]
struct HostEl {
    ports: Option<PortsEl>,
}

#[derive(Debug, Deserialize)]
struct PortsEl {
    #[serde(rename = "port", default)]
    ports: Vec<PortEl>,
}

#[derive(Debug, Deserialize)]
struct PortEl {
    #[serde(rename = "@protocol")]
    protocol: String,
    #[serde(rename = "@portid")]
    portid: u16,
    state: Option<StateEl>,
    service: Option<ServiceEl>,
}

#[derive(Debug, Deserialize)]
struct StateEl {
    #[serde(rename = "@state")]
    state: String,
}

#[derive(Debug, Deserialize)]
struct ServiceEl {
    #[serde(rename = "@name")]
    name: Option<String>,
    #[serde(rename = "@product")]
    product: Option<String>,
    #[serde(rename = "@version")]
    version: Option<String>,
}

/// Walk the report and collect every open port as a [`PortRecord`].
///
/// Only ports whose state is exactly `"open"` are kept; a missing state
/// element also drops the entry. The result is sorted ascending by port
/// number with a stable sort, so equal port numbers keep document order.
/// An empty report, or one with no open ports, yields an empty list.
pub fn extract(report: &str) -> Result<Vec<PortRecord>, ReportError> {
    let doc: NmaprunDoc = from_str(report)?;

    let mut records = Vec::new();
    for host in doc.hosts {
        let Some(ports) = host.ports else {
            continue;
        };
        for port in ports.ports {
            if !matches!(&port.state, Some(s) if s.state == "open") {
                continue;
            }
            let record = match port.service {
                Some(service) => PortRecord {
                    port: port.portid,
                    protocol: port.protocol,
                    service: service.name.unwrap_or_default(),
                    product: service.product.unwrap_or_default(),
                    version: service.version.unwrap_or_default(),
                },
                None => PortRecord {
                    port: port.portid,
                    protocol: port.protocol,
                    service: "unknown".to_string(),
                    product: String::new(),
                    version: String::new(),
                },
            };
            records.push(record);
        }
    }

    records.sort_by_key(|r| r.port);
    Ok(records)
}
