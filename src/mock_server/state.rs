//! Mock server state management.
//!
//! Provides the in-memory configuration database for the mock FortiOS API.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;

/// Why a change to the mock database was refused.
///
/// Each variant maps to the HTTP status and FortiOS error code the
/// appliance answers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockError {
    /// The table is not known to the server.
    UnknownTable,
    /// No entry with the requested key.
    NotFound,
    /// An entry with that key already exists.
    Duplicate,
    /// The body lacks a usable primary key.
    MissingKey,
}

impl MockError {
    /// HTTP status returned for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            MockError::UnknownTable | MockError::NotFound => 404,
            MockError::Duplicate => 500,
            MockError::MissingKey => 400,
        }
    }

    /// FortiOS error code returned for this error.
    pub fn code(&self) -> Option<i64> {
        match self {
            MockError::UnknownTable => None,
            MockError::NotFound => Some(-3),
            MockError::Duplicate => Some(-5),
            MockError::MissingKey => Some(-56),
        }
    }
}

/// One CMDB table: its primary-key field and its entries in order.
#[derive(Debug, Clone, Default)]
pub struct MockTable {
    pub mkey: String,
    pub entries: Vec<Map<String, Value>>,
}

impl MockTable {
    pub fn new(mkey: &str) -> Self {
        Self {
            mkey: mkey.to_string(),
            entries: Vec::new(),
        }
    }

    /// Whether the primary key is numeric and assigned by the device.
    fn auto_key(&self) -> bool {
        self.mkey.ends_with("id")
    }

    fn position(&self, mkey: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.get(&self.mkey).and_then(key_of).as_deref() == Some(mkey))
    }

    fn next_id(&self) -> u64 {
        self.entries
            .iter()
            .filter_map(|e| e.get(&self.mkey).and_then(Value::as_u64))
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// Shared state for the mock server.
///
/// Tables are keyed by `category/object`. The struct is wrapped in
/// `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Tables indexed by path (e.g. "firewall/address").
    pub tables: HashMap<String, MockTable>,

    /// Optional API token. If set, requests must carry it as a bearer token.
    pub required_token: Option<String>,

    /// Configuration revision, bumped by every change.
    pub revision: u64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Register an empty table.
    pub fn with_table(mut self, path: &str, mkey: &str) -> Self {
        self.tables
            .entry(path.to_string())
            .or_insert_with(|| MockTable::new(mkey));
        self
    }

    /// Add an entry to a table, registering the table (keyed by `name`)
    /// if needed.
    pub fn with_entry(mut self, path: &str, entry: Value) -> Self {
        if let Value::Object(entry) = entry {
            let table = self
                .tables
                .entry(path.to_string())
                .or_insert_with(|| MockTable::new("name"));
            table.entries.push(entry);
        }
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    pub fn table(&self, path: &str) -> Option<&MockTable> {
        self.tables.get(path)
    }

    /// Get an entry by primary key.
    pub fn get_entry(&self, path: &str, mkey: &str) -> Result<&Map<String, Value>, MockError> {
        let table = self.tables.get(path).ok_or(MockError::UnknownTable)?;
        table
            .position(mkey)
            .map(|i| &table.entries[i])
            .ok_or(MockError::NotFound)
    }

    /// List entries matching every filter clause.
    pub fn list_entries(
        &self,
        path: &str,
        filters: &[String],
    ) -> Result<Vec<&Map<String, Value>>, MockError> {
        let table = self.tables.get(path).ok_or(MockError::UnknownTable)?;
        Ok(table
            .entries
            .iter()
            .filter(|entry| filters.iter().all(|clause| matches_clause(entry, clause)))
            .collect())
    }

    /// Insert a new entry, returning its primary key.
    ///
    /// Tables keyed by an `...id` field assign the next free ID when the
    /// body leaves it unset or zero.
    pub fn create_entry(
        &mut self,
        path: &str,
        mut entry: Map<String, Value>,
    ) -> Result<Value, MockError> {
        let table = self.tables.get_mut(path).ok_or(MockError::UnknownTable)?;

        let key = match entry.get(&table.mkey) {
            Some(Value::Number(n)) if n.as_u64() != Some(0) => Value::Number(n.clone()),
            Some(Value::String(s)) if !s.is_empty() => Value::String(s.clone()),
            _ if table.auto_key() => Value::from(table.next_id()),
            _ => return Err(MockError::MissingKey),
        };

        let key_str = key_of(&key).ok_or(MockError::MissingKey)?;
        if table.position(&key_str).is_some() {
            return Err(MockError::Duplicate);
        }

        entry.insert(table.mkey.clone(), key.clone());
        table.entries.push(entry);
        self.revision += 1;
        Ok(key)
    }

    /// Merge `patch` into an existing entry.
    pub fn update_entry(
        &mut self,
        path: &str,
        mkey: &str,
        patch: Map<String, Value>,
    ) -> Result<Value, MockError> {
        let table = self.tables.get_mut(path).ok_or(MockError::UnknownTable)?;
        let index = table.position(mkey).ok_or(MockError::NotFound)?;

        let mkey_field = table.mkey.clone();
        let entry = &mut table.entries[index];
        for (field, value) in patch {
            if field != mkey_field {
                entry.insert(field, value);
            }
        }
        let key = entry.get(&mkey_field).cloned().unwrap_or(Value::Null);
        self.revision += 1;
        Ok(key)
    }

    /// Remove an entry.
    pub fn delete_entry(&mut self, path: &str, mkey: &str) -> Result<(), MockError> {
        let table = self.tables.get_mut(path).ok_or(MockError::UnknownTable)?;
        let index = table.position(mkey).ok_or(MockError::NotFound)?;
        table.entries.remove(index);
        self.revision += 1;
        Ok(())
    }

    /// Move an entry directly before or after `anchor`.
    pub fn move_entry(
        &mut self,
        path: &str,
        mkey: &str,
        anchor: &str,
        before: bool,
    ) -> Result<(), MockError> {
        let table = self.tables.get_mut(path).ok_or(MockError::UnknownTable)?;
        let from = table.position(mkey).ok_or(MockError::NotFound)?;
        table.position(anchor).ok_or(MockError::NotFound)?;
        if mkey == anchor {
            return Ok(());
        }

        let entry = table.entries.remove(from);
        let anchor_at = table.position(anchor).ok_or(MockError::NotFound)?;
        let to = if before { anchor_at } else { anchor_at + 1 };
        table.entries.insert(to, entry);
        self.revision += 1;
        Ok(())
    }

    /// Copy an entry under `new_key`, appending it to the table.
    pub fn clone_entry(&mut self, path: &str, mkey: &str, new_key: &str) -> Result<(), MockError> {
        let table = self.tables.get_mut(path).ok_or(MockError::UnknownTable)?;
        let from = table.position(mkey).ok_or(MockError::NotFound)?;
        if table.position(new_key).is_some() {
            return Err(MockError::Duplicate);
        }

        let mut copy = table.entries[from].clone();
        let key = match (table.auto_key(), new_key.parse::<u64>()) {
            (true, Ok(id)) => Value::from(id),
            _ => Value::String(new_key.to_string()),
        };
        copy.insert(table.mkey.clone(), key);
        table.entries.push(copy);
        self.revision += 1;
        Ok(())
    }
}

/// String form of a primary-key value.
fn key_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Evaluate one filter clause. Comma-separated alternatives are ORed.
///
/// Supported operators: `==`, `!=`, `=@` (contains), `!@` (does not contain).
fn matches_clause(entry: &Map<String, Value>, clause: &str) -> bool {
    clause.split(',').any(|alternative| {
        let (field, op, expected) = match split_clause(alternative) {
            Some(parts) => parts,
            None => return false,
        };
        let actual = entry.get(field).map(display_value).unwrap_or_default();
        match op {
            "==" => actual == expected,
            "!=" => actual != expected,
            "=@" => actual.contains(expected),
            "!@" => !actual.contains(expected),
            _ => false,
        }
    })
}

fn split_clause(clause: &str) -> Option<(&str, &str, &str)> {
    ["==", "!=", "=@", "!@"].iter().find_map(|op| {
        clause
            .split_once(op)
            .map(|(field, value)| (field.trim(), *op, value))
    })
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(map) => map.values().next().map(display_value).unwrap_or_default(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}
