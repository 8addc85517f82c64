//! Wireless intrusion detection profiles.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::formats::PreferMany;
use serde_with::{serde_as, OneOrMany};

use crate::models::table::{ChanRef, NameRef};
use crate::payload::TableField;
use crate::traits::CmdbObject;

/// A WIDS profile (`wireless-controller/wids-profile`).
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WidsProfile {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// `disable`, `foreign` or `both`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_mode: Option<String>,

    /// `enable` for background scanning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ap_scan: Option<String>,

    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(
        rename = "ap-scan-channel-list-2G-5G",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub ap_scan_channel_list_2g_5g: Vec<ChanRef>,

    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(
        rename = "ap-scan-channel-list-6G",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub ap_scan_channel_list_6g: Vec<ChanRef>,

    /// Seconds between background scans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ap_bgscan_period: Option<u32>,

    /// Schedules during which background scanning is off.
    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ap_bgscan_disable_schedules: Vec<NameRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wireless_bridge: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deauth_broadcast: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_mac_oui: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CmdbObject for WidsProfile {
    const CATEGORY: &'static str = "wireless-controller";
    const OBJECT: &'static str = "wids-profile";
    const MKEY: &'static str = "name";
    const TABLE_FIELDS: &'static [TableField] = &[
        TableField::new("ap-scan-channel-list-2G-5G", "chan"),
        TableField::new("ap-scan-channel-list-6G", "chan"),
        TableField::named("ap-bgscan-disable-schedules"),
    ];

    fn mkey(&self) -> Option<String> {
        Some(self.name.clone()).filter(|n| !n.is_empty())
    }
}
