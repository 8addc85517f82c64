//! Security profile groups.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::traits::CmdbObject;

/// A bundle of security profiles applied together (`firewall/profile-group`).
///
/// Each field names a profile of the corresponding type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProfileGroup {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_protocol_options: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_ssh_profile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub av_profile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webfilter_profile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnsfilter_profile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emailfilter_profile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dlp_profile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_filter_profile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ips_sensor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_list: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voip_profile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waf_profile: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CmdbObject for ProfileGroup {
    const CATEGORY: &'static str = "firewall";
    const OBJECT: &'static str = "profile-group";
    const MKEY: &'static str = "name";

    fn mkey(&self) -> Option<String> {
        Some(self.name.clone()).filter(|n| !n.is_empty())
    }
}
