//! The description every typed CMDB model provides.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::endpoint::Endpoint;
use crate::path::EndpointPath;
use crate::payload::TableField;

/// A typed CMDB object.
///
/// Implementors describe where their table lives and which field is the
/// primary key; [`Crud`](crate::Crud) and [`Metadata`](crate::Metadata)
/// are then available through blanket implementations.
///
/// # Example
///
/// ```ignore
/// impl CmdbObject for Address {
///     const CATEGORY: &'static str = "firewall";
///     const OBJECT: &'static str = "address";
///     const MKEY: &'static str = "name";
///
///     fn mkey(&self) -> Option<String> {
///         Some(self.name.clone())
///     }
/// }
/// ```
pub trait CmdbObject: Serialize + DeserializeOwned + Send + Sync {
    /// Category part of the path, e.g. `firewall`.
    const CATEGORY: &'static str;

    /// Object part of the path, e.g. `address`.
    const OBJECT: &'static str;

    /// Primary-key field name.
    const MKEY: &'static str;

    /// Fields sent in table form.
    const TABLE_FIELDS: &'static [TableField] = &[];

    /// This entry's primary key, if set.
    fn mkey(&self) -> Option<String>;

    /// The endpoint serving this object type.
    fn endpoint() -> Endpoint {
        let path = EndpointPath::from_static(Self::CATEGORY, Self::OBJECT);
        Endpoint::new(path, Self::MKEY).with_table_fields(Self::TABLE_FIELDS)
    }
}
