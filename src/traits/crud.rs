//! Create/read/update/delete for typed objects.

use async_trait::async_trait;

use crate::client::FortiClient;
use crate::error::{FortiError, Result};
use crate::pagination::Page;
use crate::payload::Payload;
use crate::query::{CmdbQuery, RequestOptions};
use crate::response::CmdbResponse;
use crate::traits::CmdbObject;

/// Read and write entries of a typed CMDB table.
///
/// Implemented for every [`CmdbObject`].
///
/// # Example
///
/// ```ignore
/// use fortios_cmdb::{Address, Crud, FortiClient, RequestOptions};
///
/// let client = FortiClient::from_env()?;
/// let address = Address::get(&client, "web01").await?;
/// address.set(&client, &RequestOptions::default()).await?;
/// ```
#[async_trait]
pub trait Crud: CmdbObject {
    /// Fetch one entry by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`FortiError::NotFound`] if the entry does not exist.
    async fn get(client: &FortiClient, mkey: &str) -> Result<Self> {
        Self::get_with_query(client, mkey, &CmdbQuery::new()).await
    }

    /// Fetch one entry, with extra query parameters (e.g. a VDOM).
    async fn get_with_query(client: &FortiClient, mkey: &str, query: &CmdbQuery) -> Result<Self> {
        let response = Self::endpoint().get(client, Some(mkey), query).await?;
        response
            .into_typed::<Self>()?
            .into_iter()
            .next()
            .ok_or_else(|| FortiError::NotFound {
                path: Self::endpoint().path().to_string(),
                mkey: mkey.to_string(),
            })
    }

    /// Fetch all entries matching the query in one request.
    async fn list(client: &FortiClient, query: &CmdbQuery) -> Result<Vec<Self>> {
        Self::endpoint()
            .get(client, None, query)
            .await?
            .into_typed()
    }

    /// Fetch `count` entries starting at index `start`.
    async fn list_page(
        client: &FortiClient,
        query: &CmdbQuery,
        start: u32,
        count: u32,
    ) -> Result<Page<Self>> {
        let page = Self::endpoint()
            .list_page(client, query, start, count)
            .await?;
        let items = page
            .items
            .iter()
            .cloned()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<Self>, _>>()?;
        Ok(Page {
            items,
            start: page.start,
            count: page.count,
            total: page.total,
            has_more: page.has_more,
        })
    }

    /// Fetch all matching entries, following pages.
    async fn list_all(client: &FortiClient, query: &CmdbQuery) -> Result<Vec<Self>> {
        Self::endpoint()
            .list_all(client, query)
            .await?
            .into_iter()
            .map(|entry| serde_json::from_value(entry).map_err(FortiError::ParseError))
            .collect()
    }

    /// Create this entry.
    async fn create(&self, client: &FortiClient, options: &RequestOptions) -> Result<CmdbResponse> {
        let payload = Payload::from_serializable(self)?;
        Self::endpoint().post(client, &payload, options).await
    }

    /// Replace the stored entry with this one.
    ///
    /// # Errors
    ///
    /// Returns [`FortiError::MissingKey`] if the primary key is unset.
    async fn update(&self, client: &FortiClient, options: &RequestOptions) -> Result<CmdbResponse> {
        let mkey = self.mkey().unwrap_or_default();
        let payload = Payload::from_serializable(self)?;
        Self::endpoint().put(client, &mkey, &payload, options).await
    }

    /// Delete an entry by primary key.
    async fn delete(
        client: &FortiClient,
        mkey: &str,
        options: &RequestOptions,
    ) -> Result<CmdbResponse> {
        Self::endpoint().delete(client, mkey, options).await
    }

    /// Returns true if an entry with this key exists.
    ///
    /// Errors are treated as "does not exist".
    async fn exists(client: &FortiClient, mkey: &str, options: &RequestOptions) -> bool {
        Self::endpoint().exists(client, mkey, options).await
    }

    /// Update this entry if it exists, create it otherwise.
    async fn set(&self, client: &FortiClient, options: &RequestOptions) -> Result<CmdbResponse> {
        let payload = Payload::from_serializable(self)?;
        Self::endpoint().set(client, &payload, options).await
    }
}

impl<T: CmdbObject> Crud for T {}
