//! FortiOS API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Object-level operations are implemented by [`Endpoint`](crate::Endpoint)
//! and the [`Crud`](crate::Crud)/[`Metadata`](crate::Metadata) traits.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use url::Url;

use crate::error::{FortiError, Result};
use crate::query::CmdbQuery;
use crate::response::CmdbResponse;

const API_ROOT: &str = "api/v2/";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const USER_AGENT: &str = concat!("fortios-cmdb/", env!("CARGO_PKG_VERSION"));

/// Low-level FortiOS API client.
///
/// Handles authentication and HTTP requests against `/api/v2/`. This struct
/// is cheaply cloneable; clones reference the same underlying connection
/// pool.
///
/// # Example
///
/// ```no_run
/// use fortios_cmdb::FortiClient;
///
/// # fn example() -> fortios_cmdb::Result<()> {
/// // Create from environment variables
/// let client = FortiClient::from_env()?;
///
/// // Or configure manually
/// let client = FortiClient::builder("fw.example.com", "api-token")
///     .vdom("root")
///     .verify_tls(false)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FortiClient {
    http: Client,
    base_url: Arc<Url>,
    token: String,
    vdom: Option<String>,
}

impl std::fmt::Debug for FortiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FortiClient")
            .field("base_url", &self.base_url.as_str())
            .field("vdom", &self.vdom)
            .finish_non_exhaustive()
    }
}

/// Builder for [`FortiClient`].
#[derive(Debug, Clone)]
pub struct FortiClientBuilder {
    host: String,
    token: String,
    vdom: Option<String>,
    verify_tls: bool,
    timeout: Duration,
}

impl FortiClientBuilder {
    /// Start a builder for `host`, which may be a bare host, `host:port`,
    /// or a full URL such as `https://fw.example.com:8443`.
    pub fn new(host: &str, token: &str) -> Self {
        Self {
            host: host.to_string(),
            token: token.to_string(),
            vdom: None,
            verify_tls: true,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Virtual domain used when a request does not name one.
    #[must_use]
    pub fn vdom(mut self, vdom: impl Into<String>) -> Self {
        self.vdom = Some(vdom.into());
        self
    }

    /// Disable to accept the self-signed certificates appliances ship with.
    #[must_use]
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the host does not form a valid URL or the token
    /// is empty.
    pub fn build(self) -> Result<FortiClient> {
        if self.token.trim().is_empty() {
            return Err(FortiError::ConfigMissing("API token is empty".to_string()));
        }

        let base_url = api_base_url(&self.host)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .danger_accept_invalid_certs(!self.verify_tls)
            .timeout(self.timeout)
            .build()
            .map_err(FortiError::HttpError)?;

        Ok(FortiClient {
            http,
            base_url: Arc::new(base_url),
            token: self.token,
            vdom: self.vdom.filter(|v| !v.trim().is_empty()),
        })
    }
}

/// Turn a host or URL into the `/api/v2/` root.
fn api_base_url(host: &str) -> Result<Url> {
    let host = host.trim();
    if host.is_empty() {
        return Err(FortiError::ConfigMissing("host is empty".to_string()));
    }

    let with_scheme = if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{host}")
    };

    let mut url = Url::parse(&with_scheme)?;
    let path = url.path().trim_end_matches('/').to_string();
    let path = path.strip_suffix("/api/v2").unwrap_or(&path);
    url.set_path(&format!("{path}/{API_ROOT}"));
    url.set_query(None);
    Ok(url)
}

impl FortiClient {
    /// Create a client from environment variables.
    ///
    /// Reads `FORTIOS_HOST` and `FORTIOS_API_TOKEN` (both required), and
    /// optionally `FORTIOS_VDOM`, `FORTIOS_VERIFY_TLS` (`false`/`0`
    /// disables certificate checks) and `FORTIOS_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is not set.
    pub fn from_env() -> Result<Self> {
        let host = env::var("FORTIOS_HOST").map_err(|_| {
            FortiError::ConfigMissing("FORTIOS_HOST environment variable not set".to_string())
        })?;
        let token = env::var("FORTIOS_API_TOKEN").map_err(|_| {
            FortiError::ConfigMissing(
                "FORTIOS_API_TOKEN environment variable not set".to_string(),
            )
        })?;

        let mut builder = FortiClientBuilder::new(&host, &token);

        if let Ok(vdom) = env::var("FORTIOS_VDOM") {
            builder = builder.vdom(vdom);
        }
        if let Ok(verify) = env::var("FORTIOS_VERIFY_TLS") {
            builder = builder.verify_tls(parse_flag(&verify));
        }
        if let Some(secs) = env::var("FORTIOS_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
        {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// Create a new client with the provided token and host/base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        FortiClientBuilder::new(base_url, token).build()
    }

    /// Start a [`FortiClientBuilder`].
    pub fn builder(host: &str, token: &str) -> FortiClientBuilder {
        FortiClientBuilder::new(host, token)
    }

    /// The `/api/v2/` root all paths are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Default virtual domain, if configured.
    pub fn vdom(&self) -> Option<&str> {
        self.vdom.as_deref()
    }

    /// Make a GET request.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str, query: &CmdbQuery) -> Result<CmdbResponse> {
        self.send::<()>(Method::GET, path, query, None).await
    }

    /// Make a POST request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn post<B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        query: &CmdbQuery,
        body: &B,
    ) -> Result<CmdbResponse> {
        self.send(Method::POST, path, query, Some(body)).await
    }

    /// Make a PUT request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn put<B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        query: &CmdbQuery,
        body: &B,
    ) -> Result<CmdbResponse> {
        self.send(Method::PUT, path, query, Some(body)).await
    }

    /// Make a DELETE request.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, path: &str, query: &CmdbQuery) -> Result<CmdbResponse> {
        self.send::<()>(Method::DELETE, path, query, None).await
    }

    /// Full URL for a request, including the default VDOM.
    pub fn request_url(&self, path: &str, query: &CmdbQuery) -> Result<Url> {
        let mut url = self.base_url.join(path.trim_start_matches('/'))?;

        let query_string = match (&query.vdom, &self.vdom) {
            (None, Some(vdom)) => query.clone().vdom(vdom.clone()).to_query_string(),
            _ => query.to_query_string(),
        };
        if !query_string.is_empty() {
            url.set_query(Some(&query_string));
        }
        Ok(url)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &CmdbQuery,
        body: Option<&B>,
    ) -> Result<CmdbResponse> {
        let url = self.request_url(path, query)?;
        tracing::debug!(%method, %url, "sending CMDB request");

        let mut request = self.http.request(method, url).bearer_auth(&self.token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(FortiError::HttpError)?;

        Self::check_response(response).await
    }

    /// Check response status and decode the envelope.
    async fn check_response(response: Response) -> Result<CmdbResponse> {
        let status = response.status();

        // Handle rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(FortiError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FortiError::Unauthorized {
                http_status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(FortiError::HttpError)?;
        let envelope = Self::decode_envelope(&body, status);

        if status.is_success() {
            let envelope = envelope?;
            if envelope.status.as_deref() == Some("error") {
                return Err(Self::api_error(&envelope, status));
            }
            return Ok(envelope);
        }

        match envelope {
            Ok(envelope) => Err(Self::api_error(&envelope, status)),
            Err(_) => Err(FortiError::ApiError {
                message: if body.trim().is_empty() {
                    format!("HTTP {status}")
                } else {
                    body
                },
                http_status: Some(status.as_u16()),
                error_code: None,
            }),
        }
    }

    fn decode_envelope(body: &str, status: StatusCode) -> Result<CmdbResponse> {
        if body.trim().is_empty() {
            return Ok(CmdbResponse {
                http_status: Some(status.as_u16()),
                ..CmdbResponse::default()
            });
        }
        let mut envelope: CmdbResponse = serde_json::from_str(body)?;
        envelope.http_status.get_or_insert(status.as_u16());
        Ok(envelope)
    }

    fn api_error(envelope: &CmdbResponse, status: StatusCode) -> FortiError {
        FortiError::ApiError {
            message: envelope.error_message(),
            http_status: envelope.http_status.or(Some(status.as_u16())),
            error_code: envelope.error,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_debug() {
        let client = FortiClient::new("test-token", "fw.example.com").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("FortiClient"));
        assert!(debug.contains("base_url"));
        // Token should not be in debug output
        assert!(!debug.contains("test-token"));
    }

    #[test]
    fn test_base_url_forms() {
        let expected = "https://fw.example.com/api/v2/";
        for host in [
            "fw.example.com",
            "https://fw.example.com",
            "https://fw.example.com/",
            "https://fw.example.com/api/v2",
            "https://fw.example.com/api/v2/",
        ] {
            assert_eq!(api_base_url(host).unwrap().as_str(), expected, "{host}");
        }

        assert_eq!(
            api_base_url("10.0.0.1:8443").unwrap().as_str(),
            "https://10.0.0.1:8443/api/v2/"
        );
        assert_eq!(
            api_base_url("http://127.0.0.1:4000").unwrap().as_str(),
            "http://127.0.0.1:4000/api/v2/"
        );
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(matches!(
            FortiClient::new("  ", "fw.example.com"),
            Err(FortiError::ConfigMissing(_))
        ));
    }

    #[test]
    fn test_request_url_applies_default_vdom() {
        let client = FortiClient::builder("fw.example.com", "t")
            .vdom("root")
            .build()
            .unwrap();

        let url = client
            .request_url("cmdb/firewall/address", &CmdbQuery::new())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://fw.example.com/api/v2/cmdb/firewall/address?vdom=root"
        );

        let url = client
            .request_url("cmdb/firewall/address", &CmdbQuery::new().vdom("dmz"))
            .unwrap();
        assert_eq!(url.query(), Some("vdom=dmz"));
    }

    #[test]
    fn test_request_url_keeps_encoded_key() {
        let client = FortiClient::new("t", "fw.example.com").unwrap();
        let url = client
            .request_url("cmdb/firewall/address/10.0.0.0%2F8", &CmdbQuery::new())
            .unwrap();
        assert_eq!(url.path(), "/api/v2/cmdb/firewall/address/10.0.0.0%2F8");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("False"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(" off "));
    }
}
