//! Generic operations on one CMDB table.
//!
//! An [`Endpoint`] knows where a table lives, which field is its primary
//! key, and which fields are tables that need normalizing. Every object
//! type shares this implementation; typed access goes through the
//! [`Crud`](crate::Crud) and [`Metadata`](crate::Metadata) traits, which
//! delegate here.

use serde_json::{json, Value};

use crate::client::FortiClient;
use crate::error::{FortiError, Result};
use crate::pagination::Page;
use crate::path::EndpointPath;
use crate::payload::{Payload, TableField};
use crate::query::{Action, CmdbQuery, MovePosition, RequestOptions};
use crate::response::CmdbResponse;

/// Default page size for [`Endpoint::list_all`].
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Maximum pages to fetch (safety limit).
const MAX_PAGES: u32 = 1000;

/// A CMDB table and how to address its entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    path: EndpointPath,
    mkey: String,
    table_fields: &'static [TableField],
}

impl Endpoint {
    /// Describe a table by path and primary-key field.
    pub fn new(path: EndpointPath, mkey: impl Into<String>) -> Self {
        Self {
            path,
            mkey: mkey.into(),
            table_fields: &[],
        }
    }

    /// Declare which fields are normalized into table form before writes.
    #[must_use]
    pub fn with_table_fields(mut self, table_fields: &'static [TableField]) -> Self {
        self.table_fields = table_fields;
        self
    }

    pub fn path(&self) -> &EndpointPath {
        &self.path
    }

    /// Name of the primary-key field (e.g. `name`, `policyid`).
    pub fn mkey(&self) -> &str {
        &self.mkey
    }

    pub fn table_fields(&self) -> &'static [TableField] {
        self.table_fields
    }

    /// Read the table, or one entry when `mkey` is given.
    ///
    /// # Errors
    ///
    /// Returns [`FortiError::NotFound`] when the entry does not exist and
    /// [`FortiError::MissingKey`] for an empty key.
    #[tracing::instrument(skip(self, client), fields(path = %self.path))]
    pub async fn get(
        &self,
        client: &FortiClient,
        mkey: Option<&str>,
        query: &CmdbQuery,
    ) -> Result<CmdbResponse> {
        match mkey {
            Some(mkey) => {
                let mkey = self.require_key(Some(mkey))?;
                client
                    .get(&self.path.member(mkey), query)
                    .await
                    .map_err(|e| self.not_found(e, mkey))
            }
            None => client.get(&self.path.collection(), query).await,
        }
    }

    /// Read every entry matching the query in a single request.
    pub async fn list(&self, client: &FortiClient, query: &CmdbQuery) -> Result<Vec<Value>> {
        Ok(self.get(client, None, query).await?.results_vec())
    }

    /// Read `count` entries starting at index `start`.
    pub async fn list_page(
        &self,
        client: &FortiClient,
        query: &CmdbQuery,
        start: u32,
        count: u32,
    ) -> Result<Page<Value>> {
        let query = query.clone().start(start).count(count);
        let response = self.get(client, None, &query).await?;
        let total = response.matched_count;
        Ok(Page::new(response.results_vec(), start, count, total))
    }

    /// Read all matching entries, one page at a time.
    pub async fn list_all(&self, client: &FortiClient, query: &CmdbQuery) -> Result<Vec<Value>> {
        let mut all_items = Vec::new();
        let mut start = query.start.unwrap_or(0);
        let mut pages = 0;

        loop {
            let page = self
                .list_page(client, query, start, DEFAULT_PAGE_SIZE)
                .await?;
            let has_more = page.has_more && !page.is_empty();
            start = page.next_start();
            all_items.extend(page.items);

            if !has_more {
                break;
            }

            pages += 1;
            if pages >= MAX_PAGES {
                tracing::warn!(
                    "Reached pagination limit of {} pages for {}, stopping",
                    MAX_PAGES,
                    self.path
                );
                break;
            }
        }

        Ok(all_items)
    }

    /// Create an entry.
    #[tracing::instrument(skip(self, client, payload), fields(path = %self.path))]
    pub async fn post(
        &self,
        client: &FortiClient,
        payload: &Payload,
        options: &RequestOptions,
    ) -> Result<CmdbResponse> {
        let body = payload.build(self.table_fields);
        client
            .post(&self.path.collection(), &options.to_query(), &body)
            .await
    }

    /// Update the entry with key `mkey`.
    ///
    /// # Errors
    ///
    /// Returns [`FortiError::MissingKey`] for an empty key.
    #[tracing::instrument(skip(self, client, payload), fields(path = %self.path))]
    pub async fn put(
        &self,
        client: &FortiClient,
        mkey: &str,
        payload: &Payload,
        options: &RequestOptions,
    ) -> Result<CmdbResponse> {
        let mkey = self.require_key(Some(mkey))?;
        let body = payload.build(self.table_fields);
        client
            .put(&self.path.member(mkey), &options.to_query(), &body)
            .await
            .map_err(|e| self.not_found(e, mkey))
    }

    /// Delete the entry with key `mkey`.
    #[tracing::instrument(skip(self, client), fields(path = %self.path))]
    pub async fn delete(
        &self,
        client: &FortiClient,
        mkey: &str,
        options: &RequestOptions,
    ) -> Result<CmdbResponse> {
        let mkey = self.require_key(Some(mkey))?;
        client
            .delete(&self.path.member(mkey), &options.to_query())
            .await
            .map_err(|e| self.not_found(e, mkey))
    }

    /// Check for an entry, reporting only "not found" as `false`.
    ///
    /// # Errors
    ///
    /// Transport, authentication and other API errors are returned.
    pub async fn try_exists(
        &self,
        client: &FortiClient,
        mkey: &str,
        options: &RequestOptions,
    ) -> Result<bool> {
        match self.get(client, Some(mkey), &options.to_query()).await {
            Ok(response) => Ok(response.is_success() && response.result_count() > 0),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Returns true if the entry exists.
    ///
    /// Any failure, including transport errors, counts as "does not exist".
    /// Use [`Endpoint::try_exists`] to tell the two apart.
    pub async fn exists(&self, client: &FortiClient, mkey: &str, options: &RequestOptions) -> bool {
        match self.try_exists(client, mkey, options).await {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!(path = %self.path, mkey, error = %e, "existence check failed");
                false
            }
        }
    }

    /// Update the entry if it exists, create it otherwise.
    ///
    /// The key is read from the payload's primary-key field. There is no
    /// guard against the entry appearing or vanishing between the check
    /// and the write.
    ///
    /// # Errors
    ///
    /// Returns [`FortiError::MissingKey`] if the payload has no key.
    #[tracing::instrument(skip(self, client, payload), fields(path = %self.path))]
    pub async fn set(
        &self,
        client: &FortiClient,
        payload: &Payload,
        options: &RequestOptions,
    ) -> Result<CmdbResponse> {
        let owned = payload
            .get(&self.mkey)
            .and_then(mkey_string)
            .ok_or_else(|| FortiError::MissingKey {
                field: self.mkey.clone(),
            })?;
        let mkey = self.require_key(Some(owned.as_str()))?;

        if self.exists(client, mkey, options).await {
            tracing::debug!(mkey = %mkey, "entry exists, updating");
            self.put(client, mkey, payload, options).await
        } else {
            tracing::debug!(mkey = %mkey, "entry missing, creating");
            self.post(client, payload, options).await
        }
    }

    /// Move an entry before or after another one (e.g. policy order).
    #[tracing::instrument(skip(self, client), fields(path = %self.path))]
    pub async fn move_entry(
        &self,
        client: &FortiClient,
        mkey: &str,
        position: &MovePosition,
        options: &RequestOptions,
    ) -> Result<CmdbResponse> {
        let mkey = self.require_key(Some(mkey))?;
        let anchor = match position {
            MovePosition::Before(key) | MovePosition::After(key) => key.as_str(),
        };
        self.require_key(Some(anchor))?;

        let query = options.to_query().move_to(position);
        client
            .put(&self.path.member(mkey), &query, &json!({}))
            .await
            .map_err(|e| self.not_found(e, mkey))
    }

    /// Copy an entry under a new key.
    #[tracing::instrument(skip(self, client), fields(path = %self.path))]
    pub async fn clone_entry(
        &self,
        client: &FortiClient,
        mkey: &str,
        new_mkey: &str,
        options: &RequestOptions,
    ) -> Result<CmdbResponse> {
        let mkey = self.require_key(Some(mkey))?;
        let new_mkey = self.require_key(Some(new_mkey))?;

        let query = options
            .to_query()
            .action(Action::Clone)
            .param("nkey", new_mkey);
        client
            .post(&self.path.member(mkey), &query, &json!({}))
            .await
            .map_err(|e| self.not_found(e, mkey))
    }

    /// Fetch the table's schema.
    pub async fn schema(&self, client: &FortiClient, options: &RequestOptions) -> Result<Value> {
        let query = options.to_query().action(Action::Schema);
        Ok(self.get(client, None, &query).await?.results)
    }

    /// Fetch the default values of a new entry.
    pub async fn defaults(&self, client: &FortiClient, options: &RequestOptions) -> Result<Value> {
        let query = options.to_query().action(Action::Default);
        Ok(self.get(client, None, &query).await?.results)
    }

    fn require_key<'a>(&self, mkey: Option<&'a str>) -> Result<&'a str> {
        let mkey = mkey
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| FortiError::MissingKey {
                field: self.mkey.clone(),
            })?;
        // URL parsers resolve these as dot-segments, even percent-encoded.
        if matches!(mkey, "." | "..") {
            return Err(FortiError::InvalidKey(mkey.to_string()));
        }
        Ok(mkey)
    }

    fn not_found(&self, err: FortiError, mkey: &str) -> FortiError {
        if err.is_not_found() {
            FortiError::NotFound {
                path: self.path.to_string(),
                mkey: mkey.to_string(),
            }
        } else {
            err
        }
    }
}

/// Render a primary-key value as it appears in a URL.
pub fn mkey_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
