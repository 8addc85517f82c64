//! Virtual IPs (destination NAT).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::formats::PreferMany;
use serde_with::{serde_as, OneOrMany};

use crate::models::table::{InterfaceRef, NameRef, RangeRef};
use crate::payload::TableField;
use crate::traits::CmdbObject;

/// A virtual IP (`firewall/vip`).
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Vip {
    #[serde(default)]
    pub name: String,

    /// `static-nat`, `load-balance`, `server-load-balance`, `dns-translation`, `fqdn`, ...
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub vip_type: Option<String>,

    /// External address or range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extip: Option<String>,

    /// Internal addresses the external one maps to.
    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mappedip: Vec<RangeRef>,

    /// Incoming interface, `any` by default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extintf: Option<String>,

    /// `enable` to translate ports as well.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portforward: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extport: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mappedport: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arp_reply: Option<String>,

    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub srcintf_filter: Vec<InterfaceRef>,

    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service: Vec<NameRef>,

    /// Source addresses allowed to use this VIP.
    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub src_filter: Vec<RangeRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Vip {
    /// A static NAT from `extip` to `mappedip`.
    pub fn static_nat(name: &str, extip: &str, mappedip: &str) -> Self {
        Self {
            name: name.to_string(),
            vip_type: Some("static-nat".to_string()),
            extip: Some(extip.to_string()),
            mappedip: vec![mappedip.into()],
            ..Default::default()
        }
    }

    /// Translate `extport` on `extintf` to `mappedport`.
    #[must_use]
    pub fn with_port_forward(mut self, protocol: &str, extport: &str, mappedport: &str) -> Self {
        self.portforward = Some("enable".to_string());
        self.protocol = Some(protocol.to_string());
        self.extport = Some(extport.to_string());
        self.mappedport = Some(mappedport.to_string());
        self
    }
}

impl CmdbObject for Vip {
    const CATEGORY: &'static str = "firewall";
    const OBJECT: &'static str = "vip";
    const MKEY: &'static str = "name";
    const TABLE_FIELDS: &'static [TableField] = &[
        TableField::new("mappedip", "range"),
        TableField::new("srcintf-filter", "interface-name"),
        TableField::named("service"),
        TableField::new("src-filter", "range"),
    ];

    fn mkey(&self) -> Option<String> {
        Some(self.name.clone()).filter(|n| !n.is_empty())
    }
}
