//! HTTP utilities for management API calls

use std::path::PathBuf;
use std::time::Duration;

use reqwest::{Certificate, Client, StatusCode};

use super::error::FetchError;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Header the management API reads the close reason from
const REASON_HEADER: &str = "X-Reason";

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Transport settings shared by every request of a client
#[derive(Debug, Clone)]
pub struct TlsOptions {
    /// Extra PEM encoded CA certificate to trust
    pub ca_cert: Option<PathBuf>,
    /// Accept any server certificate (self-signed test brokers)
    pub insecure: bool,
    pub timeout: Duration,
}

impl Default for TlsOptions {
    fn default() -> Self {
        Self {
            ca_cert: None,
            insecure: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Basic auth credentials taken from the API URI
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Raw answer of a GET, before decoding
///
/// The body is kept as bytes; decoding (and UTF-8 validation) is up to the
/// caller.
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// HTTP client wrapper for management API calls
///
/// Cloning is cheap; all clones share one connection pool.
#[derive(Clone, Debug)]
pub struct BrokerHttpClient {
    client: Client,
    credentials: Option<Credentials>,
}

impl BrokerHttpClient {
    /// Create a new HTTP client
    pub fn new(
        tls: &TlsOptions,
        credentials: Option<Credentials>,
    ) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .user_agent(concat!("rmqinfo/", env!("CARGO_PKG_VERSION")))
            .timeout(tls.timeout);

        if let Some(path) = &tls.ca_cert {
            let pem = std::fs::read(path).map_err(|e| {
                FetchError::Config(format!("cannot read CA certificate {}: {e}", path.display()))
            })?;
            let cert = Certificate::from_pem(&pem).map_err(|e| {
                FetchError::Config(format!("invalid CA certificate {}: {e}", path.display()))
            })?;
            builder = builder.add_root_certificate(cert);
        }

        if tls.insecure {
            tracing::warn!("TLS certificate verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::Config(format!("cannot set up HTTP client: {e}")))?;

        Ok(Self {
            client,
            credentials,
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Some(c) => request.basic_auth(&c.username, c.password.as_ref()),
            None => request,
        }
    }

    /// Make a GET request and read the whole body
    pub async fn get(&self, url: &str) -> Result<RawResponse, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self.authorize(self.client.get(url)).send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        if status != StatusCode::OK {
            let text = String::from_utf8_lossy(&body);
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&text));
        }

        Ok(RawResponse { status, body })
    }

    /// Make a DELETE request, passing `reason` along when given
    pub async fn delete(&self, url: &str, reason: Option<&str>) -> Result<StatusCode, FetchError> {
        tracing::debug!("DELETE {}", url);

        let mut request = self.authorize(self.client.delete(url));
        if let Some(reason) = reason {
            request = request.header(REASON_HEADER, reason);
        }

        let response = request.send().await?;
        let status = response.status();

        if status != StatusCode::OK && status != StatusCode::NO_CONTENT {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
        }

        Ok(status)
    }
}
