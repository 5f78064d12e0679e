//! GBD HTTP API client
//!
//! Two endpoints are used:
//! - `GET /getfeatures` returns a JSON array of feature names
//! - `POST /results` takes URL-encoded form fields and returns a JSON array
//!   of uniform row objects

use crate::error::ApiError;
use crate::model::{QueryForm, ResultRow};
use reqwest::blocking::Client;
use reqwest::Url;
use std::fmt;
use std::time::Duration;

/// Operations the UI needs from a GBD server
pub trait GbdApi: Send + Sync {
    /// Names of the features available for filtering
    fn fetch_features(&self) -> Result<Vec<String>, ApiError>;

    /// Run a query and return the matching rows
    fn submit_query(&self, form: &QueryForm) -> Result<Vec<ResultRow>, ApiError>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Origin
// ═══════════════════════════════════════════════════════════════════════════════

/// Scheme, host and port of the server; any path is dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
}

impl Origin {
    /// Build an origin from a URL such as `http://localhost:5000/index.html`
    pub fn parse(url: &str) -> Result<Origin, ApiError> {
        let parsed = Url::parse(url).map_err(|_| ApiError::InvalidOrigin(url.to_string()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| ApiError::InvalidOrigin(url.to_string()))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ApiError::InvalidOrigin(url.to_string()));
        }

        Ok(Origin {
            scheme: parsed.scheme().to_string(),
            host: host.to_string(),
            port: parsed.port(),
        })
    }

    /// Absolute URL of an endpoint below this origin
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self, path.trim_start_matches('/'))
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}://{}:{}", self.scheme, self.host, port),
            None => write!(f, "{}://{}", self.scheme, self.host),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Response parsing
// ═══════════════════════════════════════════════════════════════════════════════

/// Parse a `/getfeatures` body
pub fn parse_features(body: &str) -> Result<Vec<String>, ApiError> {
    Ok(serde_json::from_str(body)?)
}

/// Parse a `/results` body
pub fn parse_rows(body: &str) -> Result<Vec<ResultRow>, ApiError> {
    Ok(serde_json::from_str(body)?)
}

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP client
// ═══════════════════════════════════════════════════════════════════════════════

/// Blocking HTTP implementation of [`GbdApi`]
///
/// Calls block the current thread; the job runner moves them off the
/// event loop.
pub struct HttpClient {
    origin: Origin,
    client: Client,
}

impl HttpClient {
    pub fn new(origin: Origin, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gbd-tui/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { origin, client })
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    fn read_body(response: reqwest::blocking::Response) -> Result<String, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(response.text()?)
    }
}

impl GbdApi for HttpClient {
    fn fetch_features(&self) -> Result<Vec<String>, ApiError> {
        let url = self.origin.endpoint("getfeatures");
        tracing::debug!(%url, "fetching features");
        let response = self.client.get(&url).send()?;
        parse_features(&Self::read_body(response)?)
    }

    fn submit_query(&self, form: &QueryForm) -> Result<Vec<ResultRow>, ApiError> {
        let url = self.origin.endpoint("results");
        tracing::debug!(%url, query = %form.query, features = ?form.selected_features, "submitting query");
        let response = self.client.post(&url).form(&form.to_pairs()).send()?;
        parse_rows(&Self::read_body(response)?)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Test double
// ═══════════════════════════════════════════════════════════════════════════════

/// In-process [`GbdApi`] returning canned responses
#[cfg(test)]
pub struct StaticApi {
    pub features: Result<Vec<String>, ApiError>,
    pub rows: Result<Vec<ResultRow>, ApiError>,
    pub submitted: std::sync::Mutex<Vec<QueryForm>>,
}

#[cfg(test)]
impl StaticApi {
    pub fn new(features: &[&str], rows_json: &str) -> Self {
        Self {
            features: Ok(features.iter().map(|f| f.to_string()).collect()),
            rows: parse_rows(rows_json),
            submitted: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: ApiError) -> Self {
        Self {
            features: Err(err.clone()),
            rows: Err(err),
            submitted: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl GbdApi for StaticApi {
    fn fetch_features(&self) -> Result<Vec<String>, ApiError> {
        self.features.clone()
    }

    fn submit_query(&self, form: &QueryForm) -> Result<Vec<ResultRow>, ApiError> {
        if let Ok(mut submitted) = self.submitted.lock() {
            submitted.push(form.clone());
        }
        self.rows.clone()
    }
}
