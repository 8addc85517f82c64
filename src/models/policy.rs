//! Firewall policies.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::formats::PreferMany;
use serde_with::{serde_as, OneOrMany};

use crate::models::table::NameRef;
use crate::payload::TableField;
use crate::traits::CmdbObject;

/// An IPv4/IPv6 firewall policy (`firewall/policy`).
///
/// Policies are keyed by the integer `policyid`; their evaluation order
/// is the table order, changed with
/// [`Metadata::move_entry`](crate::Metadata::move_entry). Creating a policy
/// with `policyid` unset (or `0`) lets the device pick the next free ID.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Policy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policyid: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// `enable` or `disable`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub srcintf: Vec<NameRef>,

    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dstintf: Vec<NameRef>,

    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub srcaddr: Vec<NameRef>,

    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dstaddr: Vec<NameRef>,

    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service: Vec<NameRef>,

    /// `accept`, `deny` or `ipsec`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nat: Option<String>,

    /// `all`, `utm` or `disable`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logtraffic: Option<String>,

    /// User groups the policy applies to.
    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<NameRef>,

    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<NameRef>,

    /// Security profile group, when `utm-status` uses a group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Policy {
    /// An accept policy between two interfaces for all addresses,
    /// services and times.
    pub fn allow_all(name: &str, srcintf: &str, dstintf: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            srcintf: vec![srcintf.into()],
            dstintf: vec![dstintf.into()],
            srcaddr: vec!["all".into()],
            dstaddr: vec!["all".into()],
            service: vec!["ALL".into()],
            action: Some("accept".to_string()),
            schedule: Some("always".to_string()),
            ..Default::default()
        }
    }
}

impl CmdbObject for Policy {
    const CATEGORY: &'static str = "firewall";
    const OBJECT: &'static str = "policy";
    const MKEY: &'static str = "policyid";
    const TABLE_FIELDS: &'static [TableField] = &[
        TableField::named("srcintf"),
        TableField::named("dstintf"),
        TableField::named("srcaddr"),
        TableField::named("dstaddr"),
        TableField::named("service"),
        TableField::named("groups"),
        TableField::named("users"),
    ];

    fn mkey(&self) -> Option<String> {
        self.policyid.filter(|id| *id > 0).map(|id| id.to_string())
    }
}
