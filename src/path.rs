//! CMDB endpoint paths.
//!
//! Every configuration object lives at `cmdb/<category>/<object>`, with
//! individual entries addressed by their primary key (mkey) appended as a
//! single, fully escaped path segment.

use std::fmt;
use std::str::FromStr;

use crate::error::{FortiError, Result};

/// Percent-encode a primary key so it occupies exactly one path segment.
///
/// Only RFC 3986 unreserved characters survive unescaped, so keys such as
/// `10.0.0.0/24` or `web server` cannot break out of their segment.
pub fn quote_path_param(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// A `<category>/<object>` pair such as `firewall/vip`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointPath {
    category: String,
    object: String,
}

impl EndpointPath {
    /// Create a path from its two components.
    ///
    /// # Errors
    ///
    /// Returns [`FortiError::InvalidPath`] if either component is empty or
    /// contains a `/`.
    pub fn new(category: &str, object: &str) -> Result<Self> {
        let valid = |s: &str| !s.trim().is_empty() && !s.contains('/');
        if !valid(category) || !valid(object) {
            return Err(FortiError::InvalidPath(format!("{category}/{object}")));
        }
        Ok(Self {
            category: category.trim().to_string(),
            object: object.trim().to_string(),
        })
    }

    /// Path from compile-time constants of a known object type.
    pub(crate) fn from_static(category: &'static str, object: &'static str) -> Self {
        Self {
            category: category.to_string(),
            object: object.to_string(),
        }
    }

    /// The category, e.g. `firewall` or `firewall.service`.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The object name, e.g. `vip`.
    pub fn object(&self) -> &str {
        &self.object
    }

    /// Path of the whole table, relative to the API root.
    pub fn collection(&self) -> String {
        format!("cmdb/{}/{}", self.category, self.object)
    }

    /// Path of a single entry, relative to the API root.
    pub fn member(&self, mkey: &str) -> String {
        format!("{}/{}", self.collection(), quote_path_param(mkey))
    }
}

impl FromStr for EndpointPath {
    type Err = FortiError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_matches('/');
        let trimmed = trimmed.strip_prefix("cmdb/").unwrap_or(trimmed);
        match trimmed.split_once('/') {
            Some((category, object)) => {
                Self::new(category, object).map_err(|_| FortiError::InvalidPath(s.to_string()))
            }
            None => Err(FortiError::InvalidPath(s.to_string())),
        }
    }
}

impl fmt::Display for EndpointPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_path_param_escapes_reserved() {
        assert_eq!(quote_path_param("web01"), "web01");
        assert_eq!(quote_path_param("10.0.0.0/24"), "10.0.0.0%2F24");
        assert_eq!(quote_path_param("web server"), "web%20server");
        assert_eq!(quote_path_param("a&b=c?"), "a%26b%3Dc%3F");
        assert_eq!(quote_path_param("under_score-dash.~"), "under_score-dash.~");
    }

    #[test]
    fn test_parse_paths() {
        let path: EndpointPath = "firewall/vip".parse().unwrap();
        assert_eq!(path.category(), "firewall");
        assert_eq!(path.object(), "vip");
        assert_eq!(path.collection(), "cmdb/firewall/vip");

        let path: EndpointPath = "/cmdb/firewall.service/custom/".parse().unwrap();
        assert_eq!(path.to_string(), "firewall.service/custom");
    }

    #[test]
    fn test_parse_rejects_bad_paths() {
        assert!("firewall".parse::<EndpointPath>().is_err());
        assert!("firewall/".parse::<EndpointPath>().is_err());
        assert!("/vip".parse::<EndpointPath>().is_err());
        assert!("firewall/vip/extra".parse::<EndpointPath>().is_err());
    }

    #[test]
    fn test_member_path_quotes_key() {
        let path = EndpointPath::new("firewall", "address").unwrap();
        assert_eq!(
            path.member("net 10.0.0.0/8"),
            "cmdb/firewall/address/net%2010.0.0.0%2F8"
        );
    }
}
