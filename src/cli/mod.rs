//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the fortios binary.

use std::fs;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use crate::error::{FortiError, Result};
use crate::models::endpoint_for;
use crate::payload::Payload;
use crate::{Endpoint, EndpointPath, MovePosition};

/// FortiOS CMDB command-line interface.
#[derive(Parser, Debug)]
#[command(name = "fortios", about = "FortiOS CMDB API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Virtual domain to operate on (overrides FORTIOS_VDOM).
    #[arg(long, global = true)]
    pub vdom: Option<String>,

    /// Primary-key field for tables this tool has no model for.
    #[arg(long, global = true)]
    pub mkey: Option<String>,

    /// Log requests to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Endpoint for a path argument, honouring `--mkey`.
    pub fn endpoint(&self, path: &str) -> Result<Endpoint> {
        let path: EndpointPath = path.parse()?;
        let endpoint = endpoint_for(&path);
        Ok(match &self.mkey {
            Some(mkey) => Endpoint::new(path, mkey.clone())
                .with_table_fields(endpoint.table_fields()),
            None => endpoint,
        })
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read a table or a single entry.
    Get {
        /// Table path, e.g. `firewall/address`.
        path: String,

        /// Primary key of a single entry.
        key: Option<String>,

        /// Filter clause, e.g. `name=@web`. Repeat to AND clauses.
        #[arg(long)]
        filter: Vec<String>,

        /// Only return these fields (comma-separated).
        #[arg(long, value_delimiter = ',')]
        format: Vec<String>,

        /// Sort expression, e.g. `name` or `policyid,desc`.
        #[arg(long)]
        sort: Option<String>,

        /// Index of the first entry.
        #[arg(long)]
        start: Option<u32>,

        /// Number of entries to return.
        #[arg(long)]
        count: Option<u32>,

        /// Fetch every page.
        #[arg(long, conflicts_with_all = ["key", "count"])]
        all: bool,
    },

    /// Create an entry.
    Create {
        path: String,

        #[command(flatten)]
        body: BodyArgs,
    },

    /// Update an existing entry.
    Update {
        path: String,

        /// Primary key of the entry to update.
        key: String,

        #[command(flatten)]
        body: BodyArgs,
    },

    /// Create an entry, or update it if it already exists.
    Set {
        path: String,

        #[command(flatten)]
        body: BodyArgs,
    },

    /// Delete an entry.
    Delete { path: String, key: String },

    /// Check whether an entry exists (exit code 1 if not, 2 on errors).
    Exists { path: String, key: String },

    /// Move an entry before or after another one.
    Move {
        path: String,
        key: String,

        #[arg(long, conflicts_with = "after", required_unless_present = "after")]
        before: Option<String>,

        #[arg(long)]
        after: Option<String>,
    },

    /// Copy an entry under a new key.
    #[command(name = "clone")]
    Duplicate {
        path: String,
        key: String,
        new_key: String,
    },

    /// Show a table's schema.
    Schema { path: String },

    /// Show the default values of a new entry.
    Defaults { path: String },

    /// List the object types with typed models.
    Types,
}

impl Command {
    /// The `--before`/`--after` target of a `move`.
    pub fn move_position(before: Option<String>, after: Option<String>) -> Result<MovePosition> {
        match (before, after) {
            (Some(key), None) => Ok(MovePosition::Before(key)),
            (None, Some(key)) => Ok(MovePosition::After(key)),
            _ => Err(FortiError::InvalidPayload(
                "exactly one of --before or --after is required".to_string(),
            )),
        }
    }
}

/// Request body arguments shared by write commands.
#[derive(Args, Debug, Clone, Default)]
pub struct BodyArgs {
    /// JSON object body, or `@file.json` to read it from a file.
    #[arg(long)]
    pub data: Option<String>,

    /// Field assignment `key=value`; values parse as JSON when possible.
    #[arg(short = 'f', long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, Value)>,
}

impl BodyArgs {
    /// Build the payload: `--data` first, `--field` assignments on top.
    ///
    /// # Errors
    ///
    /// Fails if the data file cannot be read or is not a JSON object.
    pub fn to_payload(&self) -> Result<Payload> {
        let mut payload = match &self.data {
            Some(data) => {
                let text = match data.strip_prefix('@') {
                    Some(file) => fs::read_to_string(file).map_err(|e| {
                        FortiError::InvalidPayload(format!("cannot read {file}: {e}"))
                    })?,
                    None => data.clone(),
                };
                Payload::from_value(serde_json::from_str(&text)?)?
            }
            None => Payload::new(),
        };

        for (name, value) in &self.fields {
            payload = payload.field(name, value.clone());
        }
        Ok(payload)
    }
}

/// Parse a `key=value` assignment.
///
/// `value` is taken as JSON when it parses (`5`, `["a","b"]`, `true`),
/// otherwise as a plain string.
pub fn parse_field(raw: &str) -> std::result::Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty field name in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
