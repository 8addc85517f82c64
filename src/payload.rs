//! Request body construction.
//!
//! FortiOS expects hyphenated field names and represents multi-valued
//! attributes as tables: arrays of single-key objects such as
//! `[{"name": "port1"}, {"name": "port2"}]`. The helpers here accept the
//! looser shapes callers tend to have at hand and canonicalize them.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{FortiError, Result};

/// A multi-valued field and the key used inside each of its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableField {
    /// API field name, e.g. `srcintf`.
    pub field: &'static str,
    /// Key inside each table entry, e.g. `name`.
    pub key: &'static str,
}

impl TableField {
    pub const fn new(field: &'static str, key: &'static str) -> Self {
        Self { field, key }
    }

    /// A table whose entries are keyed by `name`, the common case.
    pub const fn named(field: &'static str) -> Self {
        Self { field, key: "name" }
    }
}

/// Convert a snake_case identifier to the API's hyphenated form.
pub fn api_field_name(name: &str) -> String {
    name.replace('_', "-")
}

/// Merge explicitly supplied fields over an optional raw base object.
///
/// Field names are converted with [`api_field_name`] and `null` values are
/// skipped, so optional arguments that were never set do not reach the
/// device. Keys already present in `base` are passed through untouched
/// unless an explicit field overrides them.
pub fn build_cmdb_payload<I, K>(base: Option<&Map<String, Value>>, fields: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (K, Value)>,
    K: AsRef<str>,
{
    let mut payload = base.cloned().unwrap_or_default();
    payload.retain(|_, v| !v.is_null());
    for (name, value) in fields {
        if value.is_null() {
            continue;
        }
        payload.insert(api_field_name(name.as_ref()), value);
    }
    payload
}

fn strip_query_metadata(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|k, _| !k.starts_with("q_"));
            map.values_mut().for_each(strip_query_metadata);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_query_metadata),
        _ => {}
    }
}

/// Canonicalize a list-or-string value into table form.
///
/// | input               | output                      |
/// |---------------------|-----------------------------|
/// | `"a"`               | `[{key: "a"}]`              |
/// | `["a", "b"]`        | `[{key: "a"}, {key: "b"}]`  |
/// | `{key: "a"}`        | `[{key: "a"}]`              |
/// | `[{...}]`           | unchanged                   |
///
/// Numbers are treated like strings; `null` and booleans pass through.
pub fn normalize_table_field(value: Value, key: &str) -> Value {
    match value {
        Value::String(_) | Value::Number(_) => Value::Array(vec![entry(key, value)]),
        Value::Object(_) => Value::Array(vec![value]),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(_) | Value::Number(_) => entry(key, item),
                    other => other,
                })
                .collect(),
        ),
        other => other,
    }
}

/// Apply [`normalize_table_field`] to every declared table field present.
pub fn normalize_table_fields(payload: &mut Map<String, Value>, table_fields: &[TableField]) {
    for table in table_fields {
        if let Some(value) = payload.remove(table.field) {
            payload.insert(
                table.field.to_string(),
                normalize_table_field(value, table.key),
            );
        }
    }
}

fn entry(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

/// Builder for CMDB request bodies.
///
/// # Example
///
/// ```
/// use fortios_cmdb::{Payload, TableField};
///
/// let body = Payload::new()
///     .field("name", "web-servers")
///     .table("member", ["web01", "web02"])
///     .field_opt("comment", None::<String>)
///     .build(&[TableField::named("member")]);
///
/// assert_eq!(body["member"][1]["name"], "web02");
/// assert!(!body.contains_key("comment"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Payload {
    raw: Option<Map<String, Value>>,
    fields: Vec<(String, Value)>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a raw JSON object; explicit fields are merged on top.
    ///
    /// # Errors
    ///
    /// Returns [`FortiError::InvalidPayload`] if `raw` is not an object.
    pub fn from_value(raw: Value) -> Result<Self> {
        let mut payload = Self::new();
        payload.merge_raw(raw)?;
        Ok(payload)
    }

    /// Serialize any model into a payload base.
    ///
    /// Read-only `q_*` metadata kept from a fetched entry is dropped at
    /// every level.
    ///
    /// # Errors
    ///
    /// Fails if the value does not serialize to a JSON object.
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let mut value = serde_json::to_value(value)?;
        strip_query_metadata(&mut value);
        Self::from_value(value)
    }

    /// Merge a raw JSON object into the base.
    ///
    /// # Errors
    ///
    /// Returns [`FortiError::InvalidPayload`] if `raw` is not an object.
    pub fn merge_raw(&mut self, raw: Value) -> Result<&mut Self> {
        match raw {
            Value::Object(map) => {
                self.raw.get_or_insert_with(Map::new).extend(map);
                Ok(self)
            }
            Value::Null => Ok(self),
            other => Err(FortiError::InvalidPayload(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    /// Set a field.
    #[must_use]
    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.push((name.to_string(), value.into()));
        self
    }

    /// Set a field when a value is present.
    #[must_use]
    pub fn field_opt<V: Into<Value>>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.field(name, v),
            None => self,
        }
    }

    /// Set a table field from a list of plain values.
    #[must_use]
    pub fn table<I, V>(self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let items: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.field(name, Value::Array(items))
    }

    /// Read a field from the pending payload (explicit fields win).
    pub fn get(&self, name: &str) -> Option<&Value> {
        let api_name = api_field_name(name);
        self.fields
            .iter()
            .rev()
            .find(|(k, _)| api_field_name(k) == api_name)
            .map(|(_, v)| v)
            .or_else(|| self.raw.as_ref().and_then(|raw| raw.get(&api_name)))
            .filter(|v| !v.is_null())
    }

    /// Produce the request body, normalizing the given table fields.
    pub fn build(&self, table_fields: &[TableField]) -> Map<String, Value> {
        let mut payload = build_cmdb_payload(self.raw.as_ref(), self.fields.iter().cloned());
        normalize_table_fields(&mut payload, table_fields);
        payload
    }
}
