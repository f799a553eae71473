//! Health endpoint client.
//!
//! This crate provides a lightweight client for a service's `/health`
//! endpoint. It focuses on:
//!
//! - Resolving the service base URL from explicit configuration, a runtime
//!   location, or the local fallback
//! - Validating the base URL before any request is made
//! - Issuing one GET per poll with an explicit timeout
//! - Collapsing every failure into a single [`HealthError::Unreachable`]
//!   whose message is safe to show to users
//!
//! The primary entry point is [`HealthClient`]. Resolve a base URL with
//! [`resolve_base_url`], construct the client with [`HealthClient::new`],
//! then call [`HealthClient::fetch_health`] once per polling cycle.
//!
//! # Example
//!
//! ```ignore
//! use healthdeck_api::{HealthClient, HealthClientOptions, resolve_base_url};
//!
//! async fn check() -> anyhow::Result<()> {
//!     let base_url = resolve_base_url(None, None)?;
//!     let client = HealthClient::new(&base_url, HealthClientOptions::default())?;
//!     let report = client.fetch_health().await?;
//!     println!("status: {:?}", report.overall_status);
//!     Ok(())
//! }
//! ```

use std::env;
use std::time::Duration;

use healthdeck_types::{HealthStatus, PayloadPolicy};
use reqwest::{Client, StatusCode, Url, header};
use thiserror::Error;
use tracing::{debug, warn};

/// Port the monitored service listens on when the base URL is derived from a
/// runtime location.
pub const DEFAULT_SERVICE_PORT: u16 = 8080;
/// Base URL used when nothing else is configured.
pub const FALLBACK_BASE_URL: &str = "http://localhost:8080";
/// Path of the health resource relative to the base URL.
pub const HEALTH_PATH: &str = "/health";
/// User-facing text for every fetch failure.
pub const UNREACHABLE_MESSAGE: &str = "Cannot connect to service";
/// Per-request timeout applied unless the caller overrides it.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(3000);

/// Scheme and host of the environment the dashboard runs against.
///
/// This is the terminal counterpart of a browser page location: when no
/// explicit base URL is configured, the service is assumed to live on the
/// same host at [`DEFAULT_SERVICE_PORT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeLocation {
    /// Scheme including the trailing colon, e.g. `https:`.
    pub protocol: String,
    pub hostname: String,
}

impl RuntimeLocation {
    pub fn new(protocol: &str, hostname: &str) -> Self {
        let scheme = protocol.trim().trim_end_matches(':');
        Self {
            protocol: format!("{}:", scheme.to_ascii_lowercase()),
            hostname: hostname.trim().to_string(),
        }
    }

    /// Build a location from a host string such as `status.internal` or
    /// `https://status.internal`. A missing scheme defaults to `http:`.
    ///
    /// Only the hostname is kept: any port, path or credentials are dropped,
    /// since the service port is always [`DEFAULT_SERVICE_PORT`]. IPv6 hosts
    /// keep their brackets.
    pub fn from_host(host: &str) -> Option<Self> {
        let trimmed = host.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return None;
        }
        let (scheme, authority) = match trimmed.split_once("://") {
            Some((scheme, rest)) if !rest.is_empty() => (scheme, rest),
            Some(_) => return None,
            None => ("http", trimmed),
        };
        let parsed = Url::parse(&format!("http://{authority}")).ok()?;
        let hostname = parsed.host_str().filter(|name| !name.is_empty())?;
        Some(Self::new(scheme, hostname))
    }

    /// `{protocol}//{hostname}:{port}` for the monitored service.
    pub fn service_base_url(&self) -> String {
        format!("{}//{}:{}", self.protocol, self.hostname, DEFAULT_SERVICE_PORT)
    }
}

/// Supplies the runtime location, if one is known.
pub trait LocationProvider {
    fn location(&self) -> Option<RuntimeLocation>;
}

impl LocationProvider for RuntimeLocation {
    fn location(&self) -> Option<RuntimeLocation> {
        Some(self.clone())
    }
}

impl<F> LocationProvider for F
where
    F: Fn() -> Option<RuntimeLocation>,
{
    fn location(&self) -> Option<RuntimeLocation> {
        self()
    }
}

/// Errors raised while configuring the client. These are startup errors and
/// never occur during a polling cycle.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("base URL '{url}' must use http or https; got '{scheme}://'")]
    UnsupportedScheme { url: String, scheme: String },
    #[error("base URL '{0}' must include a host")]
    MissingHost(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Failure of a single health fetch.
///
/// Network errors, non-2xx responses and malformed payloads are deliberately
/// not distinguished: the display text is always [`UNREACHABLE_MESSAGE`]. The
/// underlying cause is retained as the error source for diagnostics.
#[derive(Debug, Error)]
pub enum HealthError {
    #[error("Cannot connect to service")]
    Unreachable(#[source] UnreachableCause),
}

impl HealthError {
    pub fn cause(&self) -> &UnreachableCause {
        let HealthError::Unreachable(cause) = self;
        cause
    }
}

/// Diagnostic detail behind [`HealthError::Unreachable`].
#[derive(Debug, Error)]
pub enum UnreachableCause {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: StatusCode },
    #[error("malformed health payload: {0}")]
    Payload(#[source] serde_json::Error),
    #[error("health payload is missing required keys: {}", .0.join(", "))]
    Incomplete(Vec<&'static str>),
}

/// Resolve the service base URL.
///
/// Precedence:
/// 1. `explicit`, when set and non-blank
/// 2. the runtime location, as `{protocol}//{hostname}:8080`
/// 3. [`FALLBACK_BASE_URL`]
///
/// The winning value is validated and returned without a trailing slash.
pub fn resolve_base_url(explicit: Option<&str>, location: Option<&dyn LocationProvider>) -> Result<String, ConfigError> {
    let candidate = explicit
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .or_else(|| location.and_then(|provider| provider.location()).map(|loc| loc.service_base_url()))
        .unwrap_or_else(|| FALLBACK_BASE_URL.to_string());

    validate_base_url(&candidate)
}

/// Validate that a base URL is usable and normalize it.
///
/// Rules:
/// - must parse as an absolute URL
/// - scheme must be `http` or `https`
/// - must include a host
fn validate_base_url(base: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(base).map_err(|error| ConfigError::InvalidBaseUrl {
        url: base.to_string(),
        reason: error.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme {
            url: base.to_string(),
            scheme: parsed.scheme().to_string(),
        });
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::MissingHost(base.to_string()));
    }

    Ok(base.trim_end_matches('/').to_string())
}

/// Tunables for [`HealthClient`].
#[derive(Debug, Clone, Copy)]
pub struct HealthClientOptions {
    pub timeout: Duration,
    pub payload_policy: PayloadPolicy,
}

impl Default for HealthClientOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_REQUEST_TIMEOUT,
            payload_policy: PayloadPolicy::Lenient,
        }
    }
}

/// Thin wrapper around a configured `reqwest::Client` bound to one service.
#[derive(Debug, Clone)]
pub struct HealthClient {
    base_url: String,
    health_url: String,
    http: Client,
    payload_policy: PayloadPolicy,
}

impl HealthClient {
    /// Construct a client for `base_url`, which is validated first.
    pub fn new(base_url: &str, options: HealthClientOptions) -> Result<Self, ConfigError> {
        let base_url = validate_base_url(base_url)?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .user_agent(format!("healthdeck/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS))
            .timeout(options.timeout)
            .build()?;

        Ok(Self {
            health_url: format!("{}{}", base_url, HEALTH_PATH),
            base_url,
            http,
            payload_policy: options.payload_policy,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn health_url(&self) -> &str {
        &self.health_url
    }

    /// Fetch and parse one health report.
    ///
    /// Failures are logged with their cause and returned as
    /// [`HealthError::Unreachable`].
    pub async fn fetch_health(&self) -> Result<HealthStatus, HealthError> {
        debug!(url = %self.health_url, "fetching health report");
        self.fetch_inner().await.map_err(|cause| {
            warn!(url = %self.health_url, error = %cause, "health check failed");
            HealthError::Unreachable(cause)
        })
    }

    async fn fetch_inner(&self) -> Result<HealthStatus, UnreachableCause> {
        let network_error = |source: reqwest::Error| UnreachableCause::Network {
            url: self.health_url.clone(),
            source,
        };

        let response = self.http.get(&self.health_url).send().await.map_err(network_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(UnreachableCause::Status {
                url: self.health_url.clone(),
                status,
            });
        }

        let body = response.text().await.map_err(network_error)?;
        parse_health_payload(&body, self.payload_policy)
    }
}

/// Parse a health response body under the given policy.
///
/// Only a body that is not JSON at all fails here. Mistyped fields read as
/// absent, so [`PayloadPolicy::Lenient`] still shows whatever is usable while
/// [`PayloadPolicy::Strict`] reports the affected sections as missing.
pub fn parse_health_payload(body: &str, policy: PayloadPolicy) -> Result<HealthStatus, UnreachableCause> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(UnreachableCause::Payload)?;
    let report = HealthStatus::from_json_value(value);
    if policy == PayloadPolicy::Strict {
        let missing = report.missing_keys();
        if !missing.is_empty() {
            return Err(UnreachableCause::Incomplete(missing));
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode as AxumStatus, routing::get};
    use healthdeck_types::REQUIRED_PAYLOAD_KEYS;
    use serde_json::json;
    use std::net::SocketAddr;

    async fn serve(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind mock server");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        addr
    }

    fn client_for(addr: SocketAddr, options: HealthClientOptions) -> HealthClient {
        HealthClient::new(&format!("http://{addr}"), options).expect("client")
    }

    #[test]
    fn explicit_override_wins() {
        let location = RuntimeLocation::new("https:", "status.internal");
        let resolved = resolve_base_url(Some("http://10.0.0.5:9000/"), Some(&location)).expect("resolve");
        assert_eq!(resolved, "http://10.0.0.5:9000");
    }

    #[test]
    fn blank_override_falls_through_to_location() {
        let location = RuntimeLocation::new("https:", "status.internal");
        let resolved = resolve_base_url(Some("   "), Some(&location)).expect("resolve");
        assert_eq!(resolved, "https://status.internal:8080");
    }

    #[test]
    fn closure_provider_is_consulted() {
        let provider = || RuntimeLocation::from_host("ops.example.com");
        let resolved = resolve_base_url(None, Some(&provider)).expect("resolve");
        assert_eq!(resolved, "http://ops.example.com:8080");
    }

    #[test]
    fn empty_location_uses_fallback() {
        let provider = || -> Option<RuntimeLocation> { None };
        assert_eq!(resolve_base_url(None, Some(&provider)).expect("resolve"), FALLBACK_BASE_URL);
        assert_eq!(resolve_base_url(None, None).expect("resolve"), FALLBACK_BASE_URL);
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        assert!(matches!(
            resolve_base_url(Some("not a url"), None),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            resolve_base_url(Some("ftp://files.example.com"), None),
            Err(ConfigError::UnsupportedScheme { .. })
        ));
    }

    #[test]
    fn host_parsing_keeps_scheme() {
        let location = RuntimeLocation::from_host("HTTPS://dash.example.com/").expect("location");
        assert_eq!(location.protocol, "https:");
        assert_eq!(location.hostname, "dash.example.com");
        assert!(RuntimeLocation::from_host("  ").is_none());
    }

    #[test]
    fn host_port_is_replaced_by_service_port() {
        let location = RuntimeLocation::from_host("ops.example.com:9000").expect("location");
        assert_eq!(location.hostname, "ops.example.com");
        assert_eq!(location.service_base_url(), "http://ops.example.com:8080");

        let location = RuntimeLocation::from_host("https://ops.example.com:9443/status").expect("location");
        assert_eq!(location.service_base_url(), "https://ops.example.com:8080");

        let location = RuntimeLocation::from_host("[::1]:9000").expect("location");
        assert_eq!(location.service_base_url(), "http://[::1]:8080");
        assert_eq!(resolve_base_url(None, Some(&location)).expect("resolve"), "http://[::1]:8080");
    }

    #[test]
    fn strict_policy_rejects_partial_reports() {
        let body = r#"{"status":"ok","database":"ok"}"#;
        assert!(parse_health_payload(body, PayloadPolicy::Lenient).is_ok());
        match parse_health_payload(body, PayloadPolicy::Strict) {
            Err(UnreachableCause::Incomplete(keys)) => assert_eq!(keys, vec!["redis", "stats", "system"]),
            other => panic!("expected incomplete payload, got {other:?}"),
        }
    }

    #[test]
    fn lenient_policy_keeps_usable_fields() {
        let body = r#"{"status":"ok","stats":{"total_user_online":"5"},"system":{"heap_alloc":1.5e6}}"#;
        let report = parse_health_payload(body, PayloadPolicy::Lenient).expect("lenient parse");
        assert_eq!(report.online_count(), 5);
        assert_eq!(report.heap_bytes(), 1_500_000);

        let empty = parse_health_payload("null", PayloadPolicy::Lenient).expect("null body");
        assert_eq!(empty, HealthStatus::default());
        match parse_health_payload("null", PayloadPolicy::Strict) {
            Err(UnreachableCause::Incomplete(keys)) => assert_eq!(keys, REQUIRED_PAYLOAD_KEYS),
            other => panic!("expected incomplete payload, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_parses_success_body() {
        let router = Router::new().route(
            "/health",
            get(|| async {
                Json(json!({
                    "status": "ok",
                    "database": "ok",
                    "redis": "ok",
                    "stats": { "total_user_online": 5, "total_user_queue": 2 },
                    "system": { "heap_alloc": 2097152, "stack_in_use": 524288, "uptime_seconds": 7325, "goroutines": 12 }
                }))
            }),
        );
        let addr = serve(router).await;
        let client = client_for(addr, HealthClientOptions::default());

        let report = client.fetch_health().await.expect("health report");
        assert_eq!(report.online_count(), 5);
        assert_eq!(report.concurrency_count(), 12);
        assert_eq!(client.health_url(), format!("http://{addr}/health"));
    }

    #[tokio::test]
    async fn non_success_status_is_unreachable() {
        let router = Router::new().route("/health", get(|| async { (AxumStatus::SERVICE_UNAVAILABLE, "down") }));
        let addr = serve(router).await;
        let client = client_for(addr, HealthClientOptions::default());

        let error = client.fetch_health().await.expect_err("503 must fail");
        assert_eq!(error.to_string(), UNREACHABLE_MESSAGE);
        assert!(matches!(error.cause(), UnreachableCause::Status { status, .. } if status.as_u16() == 503));
    }

    #[tokio::test]
    async fn malformed_body_is_unreachable() {
        let router = Router::new().route("/health", get(|| async { "<html>gateway</html>" }));
        let addr = serve(router).await;
        let client = client_for(addr, HealthClientOptions::default());

        let error = client.fetch_health().await.expect_err("html must fail");
        assert!(matches!(error.cause(), UnreachableCause::Payload(_)));
        assert_eq!(error.to_string(), UNREACHABLE_MESSAGE);
    }

    #[tokio::test]
    async fn slow_service_hits_timeout() {
        let router = Router::new().route(
            "/health",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(json!({ "status": "ok" }))
            }),
        );
        let addr = serve(router).await;
        let options = HealthClientOptions {
            timeout: Duration::from_millis(100),
            ..HealthClientOptions::default()
        };
        let client = client_for(addr, options);

        let error = client.fetch_health().await.expect_err("timeout must fail");
        assert!(matches!(error.cause(), UnreachableCause::Network { .. }));
    }

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);
        let client = client_for(addr, HealthClientOptions::default());

        let error = client.fetch_health().await.expect_err("closed port must fail");
        assert_eq!(error.to_string(), UNREACHABLE_MESSAGE);
    }
}
