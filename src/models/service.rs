//! Custom firewall services.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::traits::CmdbObject;

/// A custom service (`firewall.service/custom`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServiceCustom {
    #[serde(default)]
    pub name: String,

    /// `TCP/UDP/SCTP`, `ICMP`, `ICMP6`, `IP`, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    /// Space-separated `dst[-dst_hi][:src[-src_hi]]` ranges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_portrange: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udp_portrange: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sctp_portrange: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icmptype: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServiceCustom {
    /// A TCP service on the given port range(s).
    pub fn tcp(name: &str, portrange: &str) -> Self {
        Self {
            name: name.to_string(),
            protocol: Some("TCP/UDP/SCTP".to_string()),
            tcp_portrange: Some(portrange.to_string()),
            ..Default::default()
        }
    }

    /// A UDP service on the given port range(s).
    pub fn udp(name: &str, portrange: &str) -> Self {
        Self {
            name: name.to_string(),
            protocol: Some("TCP/UDP/SCTP".to_string()),
            udp_portrange: Some(portrange.to_string()),
            ..Default::default()
        }
    }
}

impl CmdbObject for ServiceCustom {
    const CATEGORY: &'static str = "firewall.service";
    const OBJECT: &'static str = "custom";
    const MKEY: &'static str = "name";

    fn mkey(&self) -> Option<String> {
        Some(self.name.clone()).filter(|n| !n.is_empty())
    }
}
