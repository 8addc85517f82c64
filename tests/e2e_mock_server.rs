//! E2E tests using the mock FortiOS server.
//!
//! These tests exercise full workflows against the mock server,
//! testing realistic scenarios rather than individual requests.

#![cfg(feature = "test-server")]

use fortios_cmdb::mock_server::{Fixtures, MockServer, MockState};
use fortios_cmdb::{
    Address, AddressGroup, CmdbObject, CmdbQuery, Crud, Endpoint, FortiClient, FortiError,
    Metadata, MovePosition, Payload, Policy, RequestOptions, Vip,
};
use serde_json::json;

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    // Both servers should have different URLs
    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_server_shutdown_is_clean() {
    let server = MockServer::start().await;
    let url = server.url().to_string();

    server.shutdown().await;

    // After shutdown, server should not respond
    let client = reqwest::Client::new();
    let result = client.get(format!("{}/health", url)).send().await;

    assert!(result.is_err());
}

// =============================================================================
// Address Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_address_lifecycle() {
    let server = MockServer::start().await;
    let client = FortiClient::new("test-token", server.url()).unwrap();
    let options = RequestOptions::default();

    // Step 1: Create
    let created = Address::subnet("app01", "10.3.0.10 255.255.255.255")
        .set(&client, &options)
        .await
        .expect("Failed to create address");
    assert_eq!(created.mkey, Some(json!("app01")));
    assert!(Address::exists(&client, "app01", &options).await);

    // Step 2: Update through set
    let changed = Address {
        comment: Some("application tier".to_string()),
        ..Address::subnet("app01", "10.3.0.11 255.255.255.255")
    };
    changed.set(&client, &options).await.expect("Failed to update");

    let fetched = Address::get(&client, "app01").await.unwrap();
    assert_eq!(fetched.subnet.as_deref(), Some("10.3.0.11 255.255.255.255"));
    assert_eq!(fetched.comment.as_deref(), Some("application tier"));

    // Step 3: Delete
    Address::delete(&client, "app01", &options)
        .await
        .expect("Failed to delete");
    assert!(!Address::exists(&client, "app01", &options).await);

    let err = Address::get(&client, "app01").await.unwrap_err();
    assert!(matches!(err, FortiError::NotFound { .. }));

    server.shutdown().await;
}

#[tokio::test]
async fn test_create_duplicate_fails() {
    let server = MockServer::start().await;
    let client = FortiClient::new("test-token", server.url()).unwrap();

    let err = Address::subnet("web01", "10.9.9.9/32")
        .create(&client, &RequestOptions::default())
        .await
        .unwrap_err();

    match err {
        FortiError::ApiError { error_code, .. } => assert_eq!(error_code, Some(-5)),
        other => panic!("Expected ApiError, got {other:?}"),
    }

    server.shutdown().await;
}

#[tokio::test]
async fn test_filters_and_paging() {
    let server = MockServer::start().await;
    let client = FortiClient::new("test-token", server.url()).unwrap();

    let web = Address::list(&client, &CmdbQuery::new().filter("name=@web"))
        .await
        .unwrap();
    let mut names: Vec<_> = web.iter().map(|a| a.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["web01", "web02"]);

    let narrowed = Address::list(
        &client,
        &CmdbQuery::new().filter("name=@web").filter("name!=web02"),
    )
    .await
    .unwrap();
    assert_eq!(narrowed.len(), 1);
    assert_eq!(narrowed[0].name, "web01");

    let page = Address::list_page(&client, &CmdbQuery::new(), 2, 2)
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, Some(4));
    assert!(!page.has_more);

    server.shutdown().await;
}

#[tokio::test]
async fn test_format_restricts_fields() {
    let server = MockServer::start().await;
    let client = FortiClient::new("test-token", server.url()).unwrap();

    let entries = Address::endpoint()
        .list(&client, &CmdbQuery::new().format(["subnet"]))
        .await
        .unwrap();

    assert_eq!(entries.len(), 4);
    for entry in &entries {
        assert!(entry.get("name").is_some());
        assert!(entry.get("subnet").is_some());
        assert!(entry.get("type").is_none());
    }

    server.shutdown().await;
}

// =============================================================================
// Group and table-field Tests
// =============================================================================

#[tokio::test]
async fn test_group_members_round_trip() {
    let server = MockServer::start().await;
    let client = FortiClient::new("test-token", server.url()).unwrap();
    let options = RequestOptions::default();

    let group = AddressGroup::get(&client, "web-servers").await.unwrap();
    assert_eq!(group.member_names(), vec!["web01", "web02"]);

    // Loose member shapes are normalized on the way out
    let payload = Payload::new()
        .field("name", "web-servers")
        .field("member", json!(["web01", {"name": "db01"}]));
    AddressGroup::endpoint()
        .set(&client, &payload, &options)
        .await
        .unwrap();

    let group = AddressGroup::get(&client, "web-servers").await.unwrap();
    assert_eq!(group.member_names(), vec!["web01", "db01"]);

    let state = server.state();
    let state = state.read().await;
    let stored = state.get_entry("firewall/addrgrp", "web-servers").unwrap();
    assert_eq!(stored["member"], json!([{"name": "web01"}, {"name": "db01"}]));
    drop(state);

    server.shutdown().await;
}

#[tokio::test]
async fn test_vip_with_port_forward() {
    let server = MockServer::start().await;
    let client = FortiClient::new("test-token", server.url()).unwrap();

    Vip::static_nat("app-nat", "203.0.113.20", "10.3.0.10")
        .with_port_forward("tcp", "443", "8443")
        .create(&client, &RequestOptions::default())
        .await
        .unwrap();

    let vip = Vip::get(&client, "app-nat").await.unwrap();
    assert_eq!(vip.mappedip[0].range, "10.3.0.10");
    assert_eq!(vip.mappedport.as_deref(), Some("8443"));

    server.shutdown().await;
}

// =============================================================================
// Policy Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_policy_create_move_clone() {
    let server = MockServer::start().await;
    let client = FortiClient::new("test-token", server.url()).unwrap();
    let options = RequestOptions::default();

    // The device assigns the next policy ID
    let response = Policy::allow_all("guest-out", "port4", "port1")
        .create(&client, &options)
        .await
        .unwrap();
    assert_eq!(response.mkey, Some(json!(3)));

    // Move it to the top
    Policy::move_entry(&client, "3", MovePosition::Before("1".to_string()), &options)
        .await
        .unwrap();
    let order: Vec<_> = Policy::list(&client, &CmdbQuery::new())
        .await
        .unwrap()
        .into_iter()
        .filter_map(|p| p.policyid)
        .collect();
    assert_eq!(order, vec![3, 1, 2]);

    // Clone it under a new ID
    Policy::clone_entry(&client, "3", "30", &options)
        .await
        .unwrap();
    let copy = Policy::get(&client, "30").await.unwrap();
    assert_eq!(copy.name.as_deref(), Some("guest-out"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_move_to_missing_anchor_fails() {
    let server = MockServer::start().await;
    let client = FortiClient::new("test-token", server.url()).unwrap();

    let err = Policy::move_entry(
        &client,
        "1",
        MovePosition::After("99".to_string()),
        &RequestOptions::default(),
    )
    .await
    .unwrap_err();
    assert!(err.is_not_found());

    server.shutdown().await;
}

// =============================================================================
// Untyped and metadata Tests
// =============================================================================

#[tokio::test]
async fn test_untyped_zone_table() {
    let server = MockServer::start().await;
    let client = FortiClient::new("test-token", server.url()).unwrap();
    let options = RequestOptions::default();

    let zones = Endpoint::new("system/zone".parse().unwrap(), "name");
    zones
        .set(
            &client,
            &Payload::new().field("name", "inside").field("intrazone", "deny"),
            &options,
        )
        .await
        .unwrap();

    assert!(zones.try_exists(&client, "inside", &options).await.unwrap());
    let entries = zones.list(&client, &CmdbQuery::new()).await.unwrap();
    assert_eq!(entries, vec![json!({"name": "inside", "intrazone": "deny"})]);

    server.shutdown().await;
}

#[tokio::test]
async fn test_unknown_table_reports_error() {
    let server = MockServer::start().await;
    let client = FortiClient::new("test-token", server.url()).unwrap();

    let endpoint = Endpoint::new("system/nonexistent".parse().unwrap(), "name");
    let err = endpoint
        .list(&client, &CmdbQuery::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FortiError::ApiError {
            http_status: Some(404),
            ..
        }
    ));

    server.shutdown().await;
}

#[tokio::test]
async fn test_schema_and_defaults() {
    let server = MockServer::start().await;
    let client = FortiClient::new("test-token", server.url()).unwrap();
    let options = RequestOptions::default();

    let schema = Policy::schema(&client, &options).await.unwrap();
    assert_eq!(schema["mkey"], "policyid");

    let defaults = Address::defaults(&client, &options).await.unwrap();
    assert_eq!(defaults["name"], "");

    server.shutdown().await;
}

#[tokio::test]
async fn test_custom_state_and_vdom_echo() {
    let state = MockState::new()
        .with_table("firewall/address", "name")
        .with_entry("firewall/address", Fixtures::address("only", "192.0.2.1 255.255.255.255"));

    let server = MockServer::with_state(state).await;
    let client = FortiClient::builder(server.url(), "test-token")
        .vdom("customer-a")
        .build()
        .unwrap();

    let response = Address::endpoint()
        .get(&client, Some("only"), &CmdbQuery::new())
        .await
        .unwrap();
    assert_eq!(response.vdom.as_deref(), Some("customer-a"));
    assert_eq!(response.result_count(), 1);

    server.shutdown().await;
}
