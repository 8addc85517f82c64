//! Tests for human-readable CLI output.

use fortios_cmdb::{entries_table, Address, CmdbResponse, PrettyPrint, Vip};
use serde_json::json;

#[test]
fn test_address_pretty_print() {
    let address = Address {
        comment: Some("frontend".to_string()),
        ..Address::subnet("web01", "10.1.1.10 255.255.255.255")
    };

    let output = address.pretty_print();
    assert!(output.starts_with("Address: web01"));
    assert!(output.contains("Type:           ipmask"));
    assert!(output.contains("Subnet:         10.1.1.10 255.255.255.255"));
    assert!(output.contains("Comment:        frontend"));
}

#[test]
fn test_address_range_pretty_print() {
    let output = Address::range("pool", "10.0.0.10", "10.0.0.20").pretty_print();
    assert!(output.contains("Range:          10.0.0.10 - 10.0.0.20"));
    assert!(!output.contains("Subnet"));
}

#[test]
fn test_vip_pretty_print_port_forward() {
    let vip = Vip::static_nat("web-nat", "203.0.113.10", "10.1.1.10")
        .with_port_forward("tcp", "443", "8443");

    let output = vip.pretty_print();
    assert!(output.starts_with("VIP: web-nat"));
    assert!(output.contains("Mapping:        203.0.113.10 -> 10.1.1.10"));
    assert!(output.contains("Ports:          tcp/443 -> 8443"));
}

#[test]
fn test_write_response_pretty_print() {
    let response: CmdbResponse = serde_json::from_value(json!({
        "http_method": "PUT",
        "revision": "5",
        "status": "success",
        "http_status": 200,
        "path": "firewall",
        "name": "policy",
        "mkey": 3
    }))
    .unwrap();

    let output = response.pretty_print();
    assert!(output.starts_with("PUT firewall/policy"));
    assert!(output.contains("Status:         success (200)"));
    assert!(output.contains("Key:            3"));
    assert!(output.contains("Revision:       5"));
}

#[test]
fn test_entries_table_numeric_key() {
    let entries = vec![
        json!({"policyid": 1, "q_origin_key": 1, "name": "lan-out", "action": "accept"}),
        json!({"policyid": 2, "q_origin_key": 2, "name": "dmz-out", "action": "deny"}),
    ];

    let table = entries_table(&entries, "policyid");
    assert!(table.contains("policyid"));
    assert!(table.contains("lan-out"));
    assert!(table.contains("deny"));
    assert!(!table.contains("q_origin_key"));
}
