//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output as an
//! alternative to JSON serialization, and table rendering for untyped
//! CMDB entries.

use serde_json::Value;
use tabled::builder::Builder;

use crate::response::CmdbResponse;
use crate::{Address, Policy, Vip};

/// Most columns shown when rendering untyped entries as a table.
const MAX_COLUMNS: usize = 6;

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for CmdbResponse {
    fn pretty_print(&self) -> String {
        let target = match (&self.path, &self.name) {
            (Some(path), Some(name)) => format!("{path}/{name}"),
            _ => "cmdb".to_string(),
        };
        let header = format!(
            "{} {}",
            self.http_method.as_deref().unwrap_or("-"),
            target
        );
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![
            header,
            divider,
            format!(
                "Status:         {} ({})",
                self.status.as_deref().unwrap_or("unknown"),
                self.http_status.map_or("-".to_string(), |s| s.to_string())
            ),
        ];

        if let Some(ref vdom) = self.vdom {
            lines.push(format!("VDOM:           {}", vdom));
        }

        if let Some(ref mkey) = self.mkey {
            lines.push(format!("Key:            {}", scalar(mkey)));
        }

        if let Some(ref revision) = self.revision {
            lines.push(format!("Revision:       {}", revision));
        }

        if !self.results.is_null() {
            lines.push(format!("Results:        {}", self.result_count()));
        }

        if let (Some(version), Some(build)) = (&self.version, self.build) {
            lines.push(format!("Firmware:       {} build {}", version, build));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Address {
    fn pretty_print(&self) -> String {
        let header = format!("Address: {}", self.name);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![
            header,
            divider,
            format!(
                "Type:           {}",
                self.address_type.as_deref().unwrap_or("ipmask")
            ),
        ];

        if let Some(ref subnet) = self.subnet {
            lines.push(format!("Subnet:         {}", subnet));
        }

        if let (Some(start), Some(end)) = (&self.start_ip, &self.end_ip) {
            lines.push(format!("Range:          {} - {}", start, end));
        }

        if let Some(ref fqdn) = self.fqdn {
            lines.push(format!("FQDN:           {}", fqdn));
        }

        if let Some(ref comment) = self.comment.as_ref().filter(|c| !c.is_empty()) {
            lines.push(format!("Comment:        {}", comment));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Policy {
    fn pretty_print(&self) -> String {
        let header = format!(
            "Policy #{}{}",
            self.policyid.map_or("-".to_string(), |id| id.to_string()),
            self.name
                .as_ref()
                .map(|n| format!(" ({n})"))
                .unwrap_or_default()
        );
        let divider = "─".repeat(header.len().max(30));

        let names = |refs: &[crate::NameRef]| {
            refs.iter()
                .map(|r| r.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let lines = vec![
            header,
            divider,
            format!(
                "Action:         {}",
                self.action.as_deref().unwrap_or("deny")
            ),
            format!(
                "Interfaces:     {} -> {}",
                names(&self.srcintf),
                names(&self.dstintf)
            ),
            format!(
                "Addresses:      {} -> {}",
                names(&self.srcaddr),
                names(&self.dstaddr)
            ),
            format!("Services:       {}", names(&self.service)),
            format!(
                "Status:         {}",
                self.status.as_deref().unwrap_or("enable")
            ),
        ];

        lines.join("\n")
    }
}

impl PrettyPrint for Vip {
    fn pretty_print(&self) -> String {
        let header = format!("VIP: {}", self.name);
        let divider = "─".repeat(header.len().max(30));

        let mapped = self
            .mappedip
            .iter()
            .map(|r| r.range.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let mut lines = vec![
            header,
            divider,
            format!(
                "Mapping:        {} -> {}",
                self.extip.as_deref().unwrap_or("-"),
                mapped
            ),
        ];

        if self.portforward.as_deref() == Some("enable") {
            lines.push(format!(
                "Ports:          {}/{} -> {}",
                self.protocol.as_deref().unwrap_or("tcp"),
                self.extport.as_deref().unwrap_or("-"),
                self.mappedport.as_deref().unwrap_or("-")
            ));
        }

        if let Some(ref extintf) = self.extintf {
            lines.push(format!("Interface:      {}", extintf));
        }

        lines.join("\n")
    }
}

/// Render untyped CMDB entries as a table.
///
/// The primary-key column comes first, followed by the first scalar
/// fields of the first entry. Tables show their entries comma-joined.
pub fn entries_table(entries: &[Value], mkey: &str) -> String {
    let columns = pick_columns(entries, mkey);

    let mut builder = Builder::default();
    builder.push_record(columns.iter().cloned());
    for entry in entries {
        builder.push_record(
            columns
                .iter()
                .map(|column| entry.get(column).map(cell).unwrap_or_default()),
        );
    }
    builder.build().to_string()
}

fn pick_columns(entries: &[Value], mkey: &str) -> Vec<String> {
    let mut columns = vec![mkey.to_string()];
    if let Some(Value::Object(first)) = entries.first() {
        columns.extend(
            first
                .iter()
                .filter(|(key, value)| {
                    key.as_str() != mkey
                        && !key.starts_with("q_")
                        && (value.is_string() || value.is_number() || value.is_array())
                })
                .map(|(key, _)| key.clone())
                .take(MAX_COLUMNS - 1),
        );
    }
    columns
}

fn cell(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(map) => map
                    .iter()
                    .find(|(k, _)| !k.starts_with("q_"))
                    .map(|(_, v)| scalar(v))
                    .unwrap_or_default(),
                other => scalar(other),
            })
            .collect::<Vec<_>>()
            .join(", "),
        other => scalar(other),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_pretty_print_format() {
        let response: CmdbResponse = serde_json::from_value(json!({
            "http_method": "POST",
            "status": "success",
            "http_status": 200,
            "path": "firewall",
            "name": "address",
            "mkey": "web01",
            "vdom": "root"
        }))
        .unwrap();

        let output = response.pretty_print();
        assert!(output.starts_with("POST firewall/address"));
        assert!(output.contains("Key:            web01"));
        assert!(output.contains("VDOM:           root"));
    }

    #[test]
    fn test_entries_table_columns() {
        let entries = vec![
            json!({"q_origin_key": "a", "name": "a", "subnet": "10.0.0.0 255.0.0.0",
                   "member": [{"name": "x", "q_origin_key": "x"}, {"name": "y"}]}),
            json!({"name": "b", "subnet": "192.168.0.0 255.255.0.0"}),
        ];

        let table = entries_table(&entries, "name");
        assert!(table.contains("subnet"));
        assert!(!table.contains("q_origin_key"));
        assert!(table.contains("x, y"));
        assert!(table.contains("192.168.0.0 255.255.0.0"));
    }

    #[test]
    fn test_policy_pretty_print() {
        let policy = Policy {
            policyid: Some(3),
            ..Policy::allow_all("lan-out", "port2", "port1")
        };
        let output = policy.pretty_print();
        assert!(output.starts_with("Policy #3 (lan-out)"));
        assert!(output.contains("port2 -> port1"));
    }
}
