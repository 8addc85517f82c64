//! Schema, defaults and entry ordering.

use async_trait::async_trait;
use serde_json::Value;

use crate::client::FortiClient;
use crate::error::Result;
use crate::query::{MovePosition, RequestOptions};
use crate::response::CmdbResponse;
use crate::traits::CmdbObject;

/// Table-level actions available on every CMDB object.
///
/// Implemented for every [`CmdbObject`].
#[async_trait]
pub trait Metadata: CmdbObject {
    /// Fetch the table schema (`action=schema`).
    async fn schema(client: &FortiClient, options: &RequestOptions) -> Result<Value> {
        Self::endpoint().schema(client, options).await
    }

    /// Fetch the defaults of a new entry (`action=default`).
    async fn defaults(client: &FortiClient, options: &RequestOptions) -> Result<Value> {
        Self::endpoint().defaults(client, options).await
    }

    /// Move an entry before or after another one.
    async fn move_entry(
        client: &FortiClient,
        mkey: &str,
        position: MovePosition,
        options: &RequestOptions,
    ) -> Result<CmdbResponse> {
        Self::endpoint()
            .move_entry(client, mkey, &position, options)
            .await
    }

    /// Copy an entry under a new key.
    async fn clone_entry(
        client: &FortiClient,
        mkey: &str,
        new_mkey: &str,
        options: &RequestOptions,
    ) -> Result<CmdbResponse> {
        Self::endpoint()
            .clone_entry(client, mkey, new_mkey, options)
            .await
    }
}

impl<T: CmdbObject> Metadata for T {}
