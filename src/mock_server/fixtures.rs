//! Test data fixtures for the mock server.
//!
//! Provides factory functions for a small but realistic FortiGate
//! configuration.

use serde_json::{json, Value};

use super::state::MockState;
use crate::known_endpoints;

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // Firewall objects
    // =========================================================================

    /// A subnet address as the appliance returns it.
    pub fn address(name: &str, subnet: &str) -> Value {
        json!({
            "name": name,
            "q_origin_key": name,
            "type": "ipmask",
            "subnet": subnet,
            "comment": "",
            "color": 0
        })
    }

    /// An address group.
    pub fn address_group(name: &str, members: &[&str]) -> Value {
        json!({
            "name": name,
            "q_origin_key": name,
            "member": members
                .iter()
                .map(|m| json!({"name": m, "q_origin_key": m}))
                .collect::<Vec<_>>(),
            "exclude": "disable",
            "exclude-member": []
        })
    }

    /// An accept policy between two interfaces.
    pub fn policy(id: u32, name: &str, srcintf: &str, dstintf: &str) -> Value {
        json!({
            "policyid": id,
            "q_origin_key": id,
            "name": name,
            "srcintf": [{"name": srcintf, "q_origin_key": srcintf}],
            "dstintf": [{"name": dstintf, "q_origin_key": dstintf}],
            "srcaddr": [{"name": "all", "q_origin_key": "all"}],
            "dstaddr": [{"name": "all", "q_origin_key": "all"}],
            "service": [{"name": "ALL", "q_origin_key": "ALL"}],
            "schedule": "always",
            "action": "accept",
            "status": "enable",
            "nat": "disable"
        })
    }

    /// A static NAT virtual IP.
    pub fn vip(name: &str, extip: &str, mappedip: &str) -> Value {
        json!({
            "name": name,
            "q_origin_key": name,
            "type": "static-nat",
            "extip": extip,
            "extintf": "any",
            "mappedip": [{"range": mappedip, "q_origin_key": mappedip}],
            "portforward": "disable"
        })
    }

    /// A custom TCP service.
    pub fn tcp_service(name: &str, ports: &str) -> Value {
        json!({
            "name": name,
            "q_origin_key": name,
            "protocol": "TCP/UDP/SCTP",
            "tcp-portrange": ports,
            "category": "General"
        })
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    /// A trimmed-down table schema.
    pub fn schema(path: &str, mkey: &str) -> Value {
        let (category, object) = path.split_once('/').unwrap_or((path, ""));
        json!({
            "name": object,
            "category": "table",
            "help": format!("Configure {category} {object}."),
            "mkey": mkey,
            "mkey_type": "string",
            "children": {
                mkey: {"name": mkey, "category": "unitary", "type": "string", "size": 79},
                "comment": {"name": "comment", "category": "unitary", "type": "var-string", "size": 255}
            }
        })
    }

    /// Default values of a new entry.
    pub fn defaults(mkey: &str) -> Value {
        json!({
            mkey: "",
            "comment": "",
            "color": 0,
            "status": "enable"
        })
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// The configuration loaded by `MockServer::start`.
    ///
    /// Every modelled table is registered, plus `system/zone` as an
    /// example of a table reached without a model.
    pub fn default_state() -> MockState {
        let mut state = MockState::new().with_table("system/zone", "name");
        for endpoint in known_endpoints() {
            state = state.with_table(&endpoint.path().to_string(), endpoint.mkey());
        }

        state
            .with_entry("firewall/address", Self::address("all", "0.0.0.0 0.0.0.0"))
            .with_entry(
                "firewall/address",
                Self::address("web01", "10.1.1.10 255.255.255.255"),
            )
            .with_entry(
                "firewall/address",
                Self::address("web02", "10.1.1.11 255.255.255.255"),
            )
            .with_entry(
                "firewall/address",
                Self::address("db01", "10.2.0.5 255.255.255.255"),
            )
            .with_entry(
                "firewall/addrgrp",
                Self::address_group("web-servers", &["web01", "web02"]),
            )
            .with_entry("firewall/policy", Self::policy(1, "lan-out", "port2", "port1"))
            .with_entry("firewall/policy", Self::policy(2, "dmz-out", "port3", "port1"))
            .with_entry(
                "firewall/vip",
                Self::vip("web-nat", "203.0.113.10", "10.1.1.10"),
            )
            .with_entry(
                "firewall.service/custom",
                Self::tcp_service("HTTP-ALT", "8080"),
            )
    }
}
