//! Query parameters for CMDB requests.

use std::fmt;

/// Join filter clauses so each becomes its own `filter=` parameter.
///
/// FortiOS ANDs repeated `filter` parameters, so `["a", "b"]` renders as
/// `a&filter=b` and, once prefixed with `filter=`, as `filter=a&filter=b`.
/// Each clause is percent-encoded; the `&filter=` separators are not.
pub fn combine_filters<S: AsRef<str>>(clauses: &[S]) -> String {
    clauses
        .iter()
        .map(|c| urlencoding::encode(c.as_ref()).into_owned())
        .collect::<Vec<_>>()
        .join("&filter=")
}

/// Special request actions understood by the CMDB API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Return the table's schema instead of its contents.
    Schema,
    /// Return the default values of a new entry.
    Default,
    /// Reorder an entry (PUT).
    Move,
    /// Duplicate an entry under a new key (POST).
    Clone,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Schema => "schema",
            Self::Default => "default",
            Self::Move => "move",
            Self::Clone => "clone",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where to move an entry, relative to another entry's key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovePosition {
    Before(String),
    After(String),
}

impl MovePosition {
    fn as_pair(&self) -> (&'static str, &str) {
        match self {
            Self::Before(key) => ("before", key),
            Self::After(key) => ("after", key),
        }
    }
}

/// Query parameters for a CMDB request.
///
/// # Example
///
/// ```
/// use fortios_cmdb::CmdbQuery;
///
/// let query = CmdbQuery::new()
///     .filter("type==ipmask")
///     .filter("name=@web")
///     .format(["name", "subnet"]);
///
/// assert_eq!(
///     query.to_query_string(),
///     "filter=type%3D%3Dipmask&filter=name%3D%40web&format=name%7Csubnet"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmdbQuery {
    /// Filter clauses, ANDed together (e.g. `name==web01`, `subnet=@10.`).
    pub filter: Vec<String>,
    /// Sort expression, e.g. `name,desc`.
    pub sort: Option<String>,
    /// Restrict returned fields.
    pub format: Vec<String>,
    /// Maximum number of entries.
    pub count: Option<u32>,
    /// Index of the first entry.
    pub start: Option<u32>,
    /// Include entry metadata (`q_ref`, `q_static`, ...).
    pub with_meta: bool,
    /// Include datasource details for referenced objects.
    pub datasource: bool,
    /// Skip entries the token's admin profile cannot read.
    pub skip: bool,
    /// Target virtual domain; falls back to the client default.
    pub vdom: Option<String>,
    pub action: Option<Action>,
    /// Additional parameters, rendered after the known ones.
    pub extra: Vec<(String, String)>,
}

impl CmdbQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter clause.
    #[must_use]
    pub fn filter(mut self, clause: impl Into<String>) -> Self {
        self.filter.push(clause.into());
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Restrict the returned fields.
    #[must_use]
    pub fn format<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.format.extend(fields.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn start(mut self, start: u32) -> Self {
        self.start = Some(start);
        self
    }

    #[must_use]
    pub fn with_meta(mut self) -> Self {
        self.with_meta = true;
        self
    }

    #[must_use]
    pub fn datasource(mut self) -> Self {
        self.datasource = true;
        self
    }

    #[must_use]
    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    #[must_use]
    pub fn vdom(mut self, vdom: impl Into<String>) -> Self {
        self.vdom = Some(vdom.into());
        self
    }

    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Add an arbitrary parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    /// Add the `before`/`after` parameter of a move.
    #[must_use]
    pub fn move_to(self, position: &MovePosition) -> Self {
        let (key, value) = position.as_pair();
        self.action(Action::Move).param(key, value)
    }

    /// Returns true if no parameters have been set.
    pub fn is_empty(&self) -> bool {
        self.to_query_string().is_empty()
    }

    /// Render the encoded query string, without the leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(action) = self.action {
            parts.push(pair("action", action.as_str()));
        }
        if let Some(vdom) = &self.vdom {
            parts.push(pair("vdom", vdom));
        }
        if !self.filter.is_empty() {
            parts.push(format!("filter={}", combine_filters(&self.filter)));
        }
        if let Some(sort) = &self.sort {
            parts.push(pair("sort", sort));
        }
        if !self.format.is_empty() {
            parts.push(pair("format", &self.format.join("|")));
        }
        if let Some(start) = self.start {
            parts.push(pair("start", &start.to_string()));
        }
        if let Some(count) = self.count {
            parts.push(pair("count", &count.to_string()));
        }
        for (flag, set) in [
            ("with_meta", self.with_meta),
            ("datasource", self.datasource),
            ("skip", self.skip),
        ] {
            if set {
                parts.push(pair(flag, "1"));
            }
        }
        for (key, value) in &self.extra {
            parts.push(pair(key, value));
        }

        parts.join("&")
    }
}

fn pair(key: &str, value: &str) -> String {
    format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
}

/// Per-call options for write operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Target virtual domain; falls back to the client default.
    pub vdom: Option<String>,
    /// Additional query parameters (e.g. `scope=global`).
    pub params: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn vdom(mut self, vdom: impl Into<String>) -> Self {
        self.vdom = Some(vdom.into());
        self
    }

    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Convert into the query sent with the request.
    pub fn to_query(&self) -> CmdbQuery {
        CmdbQuery {
            vdom: self.vdom.clone(),
            extra: self.params.clone(),
            ..CmdbQuery::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_filters() {
        assert_eq!(combine_filters(&["a"]), "a");
        assert_eq!(combine_filters(&["a", "b", "c"]), "a&filter=b&filter=c");
        assert_eq!(combine_filters::<&str>(&[]), "");
    }

    #[test]
    fn test_combine_filters_encodes_clauses() {
        assert_eq!(
            combine_filters(&["name==web 01", "subnet=@10.0.0.0/8"]),
            "name%3D%3Dweb%2001&filter=subnet%3D%4010.0.0.0%2F8"
        );
    }

    #[test]
    fn test_empty_query_renders_nothing() {
        assert!(CmdbQuery::new().is_empty());
        assert_eq!(CmdbQuery::new().to_query_string(), "");
    }

    #[test]
    fn test_query_order_is_stable() {
        let query = CmdbQuery::new()
            .count(10)
            .start(20)
            .sort("name")
            .vdom("root")
            .action(Action::Schema)
            .with_meta()
            .skip();
        assert_eq!(
            query.to_query_string(),
            "action=schema&vdom=root&sort=name&start=20&count=10&with_meta=1&skip=1"
        );
    }

    #[test]
    fn test_move_parameters() {
        let query = CmdbQuery::new().move_to(&MovePosition::Before("5".to_string()));
        assert_eq!(query.to_query_string(), "action=move&before=5");

        let query = CmdbQuery::new().move_to(&MovePosition::After("web 1".to_string()));
        assert_eq!(query.to_query_string(), "action=move&after=web%201");
    }

    #[test]
    fn test_request_options_to_query() {
        let options = RequestOptions::new().vdom("dmz").param("scope", "global");
        assert_eq!(options.to_query().to_query_string(), "vdom=dmz&scope=global");
    }
}
