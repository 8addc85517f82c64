//! Entry types for table fields.
//!
//! Table entries deserialize from either the canonical object form
//! (`{"name": "port1", "q_origin_key": "port1"}`) or a bare string
//! (`"port1"`). Combined with `OneOrMany`, a table field therefore accepts
//! every shape `normalize_table_field` understands.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

macro_rules! table_entry {
    ($(#[$doc:meta])* $name:ident { $field:ident => $key:tt }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Serialize)]
        pub struct $name {
            #[serde(rename = $key)]
            pub $field: String,

            /// Extra per-entry fields (e.g. `q_origin_key`).
            #[serde(flatten)]
            pub extra: Map<String, Value>,
        }

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self {
                    $field: value.into(),
                    extra: Map::new(),
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                #[derive(Deserialize)]
                #[serde(untagged)]
                enum Repr {
                    Bare(Scalar),
                    Entry {
                        #[serde(rename = $key)]
                        $field: Scalar,
                        #[serde(flatten)]
                        extra: Map<String, Value>,
                    },
                }

                Ok(match Repr::deserialize(deserializer)? {
                    Repr::Bare(value) => Self::new(value.0),
                    Repr::Entry { $field, extra } => Self {
                        $field: $field.0,
                        extra,
                    },
                })
            }
        }
    };
}

/// A string or number, kept as its string form.
///
/// Channel lists and IDs come back as numbers on some firmware releases
/// and as strings on others.
struct Scalar(String);

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
            Float(f64),
        }

        Ok(Scalar(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s,
            Raw::Int(n) => n.to_string(),
            Raw::Float(n) => n.to_string(),
        }))
    }
}

table_entry! {
    /// Reference to another object by name (interfaces, addresses, services).
    NameRef { name => "name" }
}

table_entry! {
    /// An address range such as `10.0.0.10-10.0.0.20`.
    RangeRef { range => "range" }
}

table_entry! {
    /// An interface reference in a VIP's source-interface filter.
    InterfaceRef { interface_name => "interface-name" }
}

table_entry! {
    /// A wireless channel number.
    ChanRef { chan => "chan" }
}

/// Turn a list of plain values into table entries.
pub fn refs<T, I, S>(values: I) -> Vec<T>
where
    I: IntoIterator<Item = S>,
    S: Into<T>,
{
    values.into_iter().map(Into::into).collect()
}
