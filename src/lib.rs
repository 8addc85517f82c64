//! FortiOS CMDB API client library.
//!
//! A Rust library for reading and changing FortiGate configuration through
//! the REST API under `/api/v2/cmdb/`. Every configuration table is served
//! by the same [`Endpoint`] logic; typed models implement [`CmdbObject`]
//! and gain [`Crud`] and [`Metadata`] operations automatically.
//!
//! # Quick Start
//!
//! ```no_run
//! use fortios_cmdb::{Address, AddressGroup, CmdbQuery, Crud, FortiClient, RequestOptions};
//!
//! #[tokio::main]
//! async fn main() -> fortios_cmdb::Result<()> {
//!     // Create client from environment variables
//!     let client = FortiClient::from_env()?;
//!
//!     // Create or update an address
//!     let web = Address::subnet("web01", "10.1.1.10/32");
//!     web.set(&client, &RequestOptions::default()).await?;
//!
//!     // Group it
//!     AddressGroup::new("web-servers", ["web01"])
//!         .set(&client, &RequestOptions::default())
//!         .await?;
//!
//!     // List addresses in 10.1.0.0/16
//!     let query = CmdbQuery::new().filter("subnet=@10.1.");
//!     for address in Address::list_all(&client, &query).await? {
//!         println!("{} {:?}", address.name, address.subnet);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Untyped access
//!
//! Tables without a model are reached through [`Endpoint`] with JSON
//! payloads built by [`Payload`]:
//!
//! ```no_run
//! use fortios_cmdb::{Endpoint, FortiClient, Payload, RequestOptions};
//!
//! # async fn example(client: &FortiClient) -> fortios_cmdb::Result<()> {
//! let zones = Endpoint::new("system/zone".parse()?, "name");
//! let payload = Payload::new()
//!     .field("name", "inside")
//!     .table("interface", ["port2", "port3"]);
//! zones.set(client, &payload, &RequestOptions::default()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `FORTIOS_HOST` (required) - Appliance address, `host[:port]` or URL
//! - `FORTIOS_API_TOKEN` (required) - REST API administrator token
//! - `FORTIOS_VDOM` (optional) - Default virtual domain
//! - `FORTIOS_VERIFY_TLS` (optional) - `false` to accept self-signed certificates
//! - `FORTIOS_TIMEOUT_SECS` (optional) - Request timeout, 60 by default

pub mod cli;
mod client;
mod endpoint;
mod error;
mod models;
mod output;
mod pagination;
mod path;
mod payload;
mod query;
mod response;
mod traits;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{FortiClient, FortiClientBuilder};
pub use endpoint::{mkey_string, Endpoint, DEFAULT_PAGE_SIZE};
pub use error::{FortiError, Result};
pub use output::{entries_table, PrettyPrint};
pub use pagination::Page;
pub use path::{quote_path_param, EndpointPath};
pub use payload::{
    api_field_name, build_cmdb_payload, normalize_table_field, normalize_table_fields, Payload,
    TableField,
};
pub use query::{combine_filters, Action, CmdbQuery, MovePosition, RequestOptions};
pub use response::{describe_error_code, is_success, CmdbResponse};

// Re-export traits
pub use traits::{CmdbObject, Crud, Metadata};

// Re-export models
pub use models::{
    endpoint_for, known_endpoints, refs, Address, AddressGroup, ChanRef, InterfaceRef, NameRef,
    Policy, ProfileGroup, RadiusServer, RangeRef, ServiceCustom, Vip, WidsProfile,
};
