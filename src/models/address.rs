//! Firewall address objects and address groups.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::formats::PreferMany;
use serde_with::{serde_as, OneOrMany};

use crate::models::table::NameRef;
use crate::payload::TableField;
use crate::traits::CmdbObject;

/// A firewall address (`firewall/address`).
///
/// The populated fields depend on `address_type`: `subnet` for
/// `ipmask`, `start_ip`/`end_ip` for `iprange`, `fqdn` for `fqdn`, and so on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Address {
    /// Address name (primary key).
    #[serde(default)]
    pub name: String,

    /// `ipmask`, `iprange`, `fqdn`, `geography`, `wildcard`, ...
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub address_type: Option<String>,

    /// IP and netmask, e.g. `10.0.0.0 255.0.0.0` or `10.0.0.0/8`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_ip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_ip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,

    /// Two-letter country code for `geography` addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wildcard: Option<String>,

    /// Interface the address is bound to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_interface: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Address {
    /// An `ipmask` address for `subnet`.
    pub fn subnet(name: &str, subnet: &str) -> Self {
        Self {
            name: name.to_string(),
            address_type: Some("ipmask".to_string()),
            subnet: Some(subnet.to_string()),
            ..Default::default()
        }
    }

    /// An `fqdn` address.
    pub fn fqdn(name: &str, fqdn: &str) -> Self {
        Self {
            name: name.to_string(),
            address_type: Some("fqdn".to_string()),
            fqdn: Some(fqdn.to_string()),
            ..Default::default()
        }
    }

    /// An `iprange` address.
    pub fn range(name: &str, start_ip: &str, end_ip: &str) -> Self {
        Self {
            name: name.to_string(),
            address_type: Some("iprange".to_string()),
            start_ip: Some(start_ip.to_string()),
            end_ip: Some(end_ip.to_string()),
            ..Default::default()
        }
    }
}

impl CmdbObject for Address {
    const CATEGORY: &'static str = "firewall";
    const OBJECT: &'static str = "address";
    const MKEY: &'static str = "name";

    fn mkey(&self) -> Option<String> {
        Some(self.name.clone()).filter(|n| !n.is_empty())
    }
}

/// A firewall address group (`firewall/addrgrp`).
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AddressGroup {
    #[serde(default)]
    pub name: String,

    /// Member addresses or groups.
    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub member: Vec<NameRef>,

    /// `enable` to subtract `exclude_member` from the group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,

    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_member: Vec<NameRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AddressGroup {
    pub fn new<I, S>(name: &str, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<NameRef>,
    {
        Self {
            name: name.to_string(),
            member: members.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Names of the member objects.
    pub fn member_names(&self) -> Vec<&str> {
        self.member.iter().map(|m| m.name.as_str()).collect()
    }
}

impl CmdbObject for AddressGroup {
    const CATEGORY: &'static str = "firewall";
    const OBJECT: &'static str = "addrgrp";
    const MKEY: &'static str = "name";
    const TABLE_FIELDS: &'static [TableField] = &[
        TableField::named("member"),
        TableField::named("exclude-member"),
    ];

    fn mkey(&self) -> Option<String> {
        Some(self.name.clone()).filter(|n| !n.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_address_deserialize_device_response() {
        let address: Address = serde_json::from_value(json!({
            "name": "web01",
            "q_origin_key": "web01",
            "uuid": "6a1c8f0e-0000-51ee-0000-000000000000",
            "type": "ipmask",
            "subnet": "10.1.1.10 255.255.255.255",
            "associated-interface": "",
            "color": 0,
            "comment": ""
        }))
        .unwrap();

        assert_eq!(address.name, "web01");
        assert_eq!(address.address_type.as_deref(), Some("ipmask"));
        assert_eq!(address.associated_interface.as_deref(), Some(""));
        assert_eq!(address.extra.get("q_origin_key"), Some(&json!("web01")));
    }

    #[test]
    fn test_address_serialize_skips_unset_fields() {
        let value = serde_json::to_value(Address::range("pool", "10.0.0.1", "10.0.0.9")).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "pool",
                "type": "iprange",
                "start-ip": "10.0.0.1",
                "end-ip": "10.0.0.9"
            })
        );
    }

    #[test]
    fn test_group_accepts_loose_member_shapes() {
        let group: AddressGroup =
            serde_json::from_value(json!({"name": "g", "member": "web01"})).unwrap();
        assert_eq!(group.member_names(), vec!["web01"]);

        let group: AddressGroup =
            serde_json::from_value(json!({"name": "g", "member": ["a", {"name": "b"}]})).unwrap();
        assert_eq!(group.member_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_group_serializes_table_form() {
        let group = AddressGroup::new("g", ["web01"]);
        assert_eq!(
            serde_json::to_value(&group).unwrap(),
            json!({"name": "g", "member": [{"name": "web01"}]})
        );
    }

    #[test]
    fn test_empty_name_has_no_mkey() {
        assert_eq!(Address::default().mkey(), None);
        assert_eq!(Address::subnet("a", "10.0.0.0/8").mkey().as_deref(), Some("a"));
    }
}
