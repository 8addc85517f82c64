//! RADIUS authentication servers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::formats::PreferMany;
use serde_with::{serde_as, OneOrMany};

use crate::models::table::NameRef;
use crate::payload::TableField;
use crate::traits::CmdbObject;

/// A RADIUS server definition (`user/radius`).
///
/// Secrets are write-only: the device returns them masked (`ENC ...`).
#[serde_as]
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RadiusServer {
    #[serde(default)]
    pub name: String,

    /// Primary server address or FQDN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_server: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_secret: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tertiary_server: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tertiary_secret: Option<String>,

    /// `auto`, `ms_chap_v2`, `ms_chap`, `chap` or `pap`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nas_ip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_port: Option<u16>,

    /// Timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,

    /// Class attribute values sent with accounting.
    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub class: Vec<NameRef>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl std::fmt::Debug for RadiusServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadiusServer")
            .field("name", &self.name)
            .field("server", &self.server)
            .field("secondary_server", &self.secondary_server)
            .field("auth_type", &self.auth_type)
            .field("radius_port", &self.radius_port)
            .finish_non_exhaustive()
    }
}

impl RadiusServer {
    pub fn new(name: &str, server: &str, secret: &str) -> Self {
        Self {
            name: name.to_string(),
            server: Some(server.to_string()),
            secret: Some(secret.to_string()),
            ..Default::default()
        }
    }
}

impl CmdbObject for RadiusServer {
    const CATEGORY: &'static str = "user";
    const OBJECT: &'static str = "radius";
    const MKEY: &'static str = "name";
    const TABLE_FIELDS: &'static [TableField] = &[TableField::named("class")];

    fn mkey(&self) -> Option<String> {
        Some(self.name.clone()).filter(|n| !n.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_secrets() {
        let server = RadiusServer::new("corp", "10.0.0.5", "s3cret");
        let debug = format!("{server:?}");
        assert!(debug.contains("corp"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn test_radius_port_field_name() {
        let server = RadiusServer {
            radius_port: Some(1812),
            ..RadiusServer::new("corp", "10.0.0.5", "x")
        };
        let value = serde_json::to_value(&server).unwrap();
        assert_eq!(value["radius-port"], 1812);
    }
}
