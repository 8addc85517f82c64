//! Request-shape tests for the client and endpoints.
//!
//! Uses wiremock to check the URLs, query strings, headers and bodies the
//! client sends, and how it maps device responses to errors.

use fortios_cmdb::{
    Address, AddressGroup, CmdbQuery, Crud, Endpoint, FortiClient, FortiError, Payload,
    RequestOptions,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn envelope(results: serde_json::Value) -> serde_json::Value {
    json!({
        "http_method": "GET",
        "results": results,
        "vdom": "root",
        "path": "firewall",
        "name": "address",
        "status": "success",
        "http_status": 200
    })
}

#[tokio::test]
async fn test_get_sends_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/address/web01"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {"name": "web01", "type": "ipmask", "subnet": "10.1.1.10 255.255.255.255"}
        ]))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FortiClient::new("test-token", &mock_server.uri()).unwrap();
    let address = Address::get(&client, "web01").await.unwrap();

    assert_eq!(address.name, "web01");
    assert_eq!(address.subnet.as_deref(), Some("10.1.1.10 255.255.255.255"));
}

#[tokio::test]
async fn test_key_with_slash_is_percent_encoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/address/10.0.0.0%2F8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {"name": "10.0.0.0/8"}
        ]))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FortiClient::new("test-token", &mock_server.uri()).unwrap();
    let address = Address::get(&client, "10.0.0.0/8").await.unwrap();
    assert_eq!(address.name, "10.0.0.0/8");
}

#[tokio::test]
async fn test_repeated_filters_and_format() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/address"))
        .and(query_param("filter", "name=@web"))
        .and(query_param("filter", "type==ipmask"))
        .and(query_param("format", "name|subnet"))
        .and(query_param("vdom", "lab"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {"name": "web01", "subnet": "10.1.1.10 255.255.255.255"}
        ]))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FortiClient::new("test-token", &mock_server.uri()).unwrap();
    let query = CmdbQuery::new()
        .filter("name=@web")
        .filter("type==ipmask")
        .format(["name", "subnet"])
        .vdom("lab");
    let addresses = Address::list(&client, &query).await.unwrap();

    assert_eq!(addresses.len(), 1);
}

#[tokio::test]
async fn test_default_vdom_applied() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/address"))
        .and(query_param("vdom", "customer-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FortiClient::builder(&mock_server.uri(), "test-token")
        .vdom("customer-a")
        .build()
        .unwrap();
    let addresses = Address::list(&client, &CmdbQuery::new()).await.unwrap();
    assert!(addresses.is_empty());
}

#[tokio::test]
async fn test_create_normalizes_table_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/cmdb/firewall/addrgrp"))
        .and(body_json(json!({
            "name": "web-servers",
            "member": [{"name": "web01"}, {"name": "web02"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "http_method": "POST",
            "status": "success",
            "http_status": 200,
            "mkey": "web-servers"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FortiClient::new("test-token", &mock_server.uri()).unwrap();
    let response = AddressGroup::new("web-servers", ["web01", "web02"])
        .create(&client, &RequestOptions::default())
        .await
        .unwrap();

    assert!(response.is_success());
    assert_eq!(response.mkey, Some(json!("web-servers")));
}

#[tokio::test]
async fn test_untyped_payload_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/cmdb/system/zone"))
        .and(body_json(json!({
            "name": "inside",
            "intrazone": "allow",
            "interface": [{"interface-name": "port2"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "http_status": 200
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    static ZONE_TABLES: &[fortios_cmdb::TableField] =
        &[fortios_cmdb::TableField::new("interface", "interface-name")];

    let client = FortiClient::new("test-token", &mock_server.uri()).unwrap();
    let zones = Endpoint::new("system/zone".parse().unwrap(), "name").with_table_fields(ZONE_TABLES);
    let payload = Payload::new()
        .field("name", "inside")
        .field("intrazone", "allow")
        .field("interface", "port2");

    zones
        .post(&client, &payload, &RequestOptions::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_not_found_maps_to_not_found_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/address/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "http_method": "GET",
            "status": "error",
            "http_status": 404,
            "error": -3
        })))
        .mount(&mock_server)
        .await;

    let client = FortiClient::new("test-token", &mock_server.uri()).unwrap();
    let err = Address::get(&client, "ghost").await.unwrap_err();

    assert!(err.is_not_found());
    match err {
        FortiError::NotFound { path, mkey } => {
            assert_eq!(path, "firewall/address");
            assert_eq!(mkey, "ghost");
        }
        other => panic!("Expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_error_envelope_with_success_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/cmdb/firewall/address"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "http_status": 500,
            "error": -5,
            "cli_error": "entry already exists\n"
        })))
        .mount(&mock_server)
        .await;

    let client = FortiClient::new("test-token", &mock_server.uri()).unwrap();
    let err = Address::subnet("web01", "10.1.1.10/32")
        .create(&client, &RequestOptions::default())
        .await
        .unwrap_err();

    match err {
        FortiError::ApiError {
            message,
            http_status,
            error_code,
        } => {
            assert_eq!(message, "entry already exists");
            assert_eq!(http_status, Some(500));
            assert_eq!(error_code, Some(-5));
        }
        other => panic!("Expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_and_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/address"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/vip"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&mock_server)
        .await;

    let client = FortiClient::new("bad-token", &mock_server.uri()).unwrap();

    let err = Address::list(&client, &CmdbQuery::new()).await.unwrap_err();
    assert!(matches!(err, FortiError::Unauthorized { http_status: 401 }));

    let err = fortios_cmdb::Vip::list(&client, &CmdbQuery::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FortiError::RateLimited {
            retry_after_secs: Some(7)
        }
    ));
}

#[tokio::test]
async fn test_non_json_error_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v2/cmdb/firewall/address/web01"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let client = FortiClient::new("test-token", &mock_server.uri()).unwrap();
    let err = Address::delete(&client, "web01", &RequestOptions::default())
        .await
        .unwrap_err();

    match err {
        FortiError::ApiError {
            message,
            http_status,
            ..
        } => {
            assert_eq!(message, "<html>oops</html>");
            assert_eq!(http_status, Some(500));
        }
        other => panic!("Expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_plain_list_has_no_paging_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/address"))
        .and(query_param_is_missing("start"))
        .and(query_param_is_missing("count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FortiClient::new("test-token", &mock_server.uri()).unwrap();
    Address::list(&client, &CmdbQuery::new()).await.unwrap();
}
