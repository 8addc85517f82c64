//! Mock FortiOS CMDB server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the
//! FortiGate REST API for integration and end-to-end testing. Unlike
//! wiremock, which mocks at the HTTP level per-test, this server keeps its
//! configuration across requests, so create/move/clone/delete workflows
//! can be checked end to end.
//!
//! # Example
//!
//! ```ignore
//! use fortios_cmdb::mock_server::MockServer;
//! use fortios_cmdb::{Address, Crud, FortiClient};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = FortiClient::new("test-token", server.url()).unwrap();
//!
//!     // Server comes with default fixtures
//!     let address = Address::get(&client, "web01").await.unwrap();
//!     assert_eq!(address.name, "web01");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::Fixtures;
pub use server::MockServer;
pub use state::{MockError, MockState, MockTable};
