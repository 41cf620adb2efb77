//! Supabase REST (PostgREST) client.
//!
//! Thin client over the auto-generated table API:
//! - API key authentication (`apikey` + bearer header)
//! - HTTP client tuning (pooling, timeouts)
//! - Observability (tracing spans, metrics)

use std::fmt;
use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info_span, Instrument};
use url::Url;

use crate::error::{StoreError, StoreResult};
use crate::metrics::{record_request, record_rows};

// =============================================================================
// Configuration
// =============================================================================

/// Store client configuration.
#[derive(Clone)]
pub struct StoreConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    pub base_url: String,
    /// Service or anon API key
    pub api_key: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> StoreResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build config from any variable source.
    ///
    /// Blank values count as missing; unparseable timeouts keep the defaults.
    pub fn from_lookup<F>(lookup: F) -> StoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| StoreError::config_error(format!("Missing environment variable: {}", name)))
        };
        let secs = |name: &str| lookup(name).and_then(|s| s.trim().parse::<u64>().ok());

        let mut config = Self::new(required("SUPABASE_URL")?, required("SUPABASE_KEY")?);
        if let Some(secs) = secs("STORE_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = secs("STORE_CONNECT_TIMEOUT_SECS") {
            config.connect_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

// =============================================================================
// Query
// =============================================================================

/// Row selection for a table request.
///
/// Renders to PostgREST query parameters: `select=*`, `col=eq.value`,
/// `order=col.desc`, `limit=n`.
#[derive(Debug, Clone)]
pub struct Query {
    select: String,
    filters: Vec<(String, String)>,
    order: Option<String>,
    limit: Option<usize>,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            select: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equality filter on a column.
    pub fn eq(mut self, column: impl Into<String>, value: impl fmt::Display) -> Self {
        self.filters.push((column.into(), format!("eq.{}", value)));
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some(format!("{}.desc", column));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    fn apply_filters(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        for (column, filter) in &self.filters {
            pairs.append_pair(column, filter);
        }
    }

    fn apply(&self, url: &mut Url) {
        url.query_pairs_mut().append_pair("select", &self.select);
        self.apply_filters(url);
        let mut pairs = url.query_pairs_mut();
        if let Some(order) = &self.order {
            pairs.append_pair("order", order);
        }
        if let Some(limit) = self.limit {
            pairs.append_pair("limit", &limit.to_string());
        }
    }
}

// =============================================================================
// Client
// =============================================================================

/// PostgREST table client.
#[derive(Clone)]
pub struct StoreClient {
    http: Client,
    config: StoreConfig,
    rest_url: Url,
}

impl StoreClient {
    /// Create a new store client.
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(4)
            .user_agent(concat!("tubeq-store/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(StoreError::Network)?;

        let rest_url = Url::parse(&format!(
            "{}/rest/v1/",
            config.base_url.trim_end_matches('/')
        ))?;

        Ok(Self {
            http,
            config,
            rest_url,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> StoreResult<Self> {
        Self::new(StoreConfig::from_env()?)
    }

    fn table_url(&self, table: &str) -> StoreResult<Url> {
        Ok(self.rest_url.join(table)?)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    // =========================================================================
    // Table Operations
    // =========================================================================

    /// Read rows matching `query`.
    pub async fn select<T: DeserializeOwned>(&self, table: &str, query: &Query) -> StoreResult<Vec<T>> {
        let mut url = self.table_url(table)?;
        query.apply(&mut url);

        self.execute_request("select", table, async {
            let response = self.authed(self.http.get(url.clone())).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(Self::handle_error_response(status, url.as_str(), response).await);
            }

            let body = response.text().await?;
            let rows: Vec<T> = serde_json::from_str(&body).map_err(|e| {
                StoreError::invalid_response(format!("{} returned unexpected rows: {}", table, e))
            })?;
            record_rows(table, rows.len());
            debug!(rows = rows.len(), "Selected rows");
            Ok(rows)
        })
        .await
    }

    /// Patch the columns in `body` on every row matching `filter`.
    ///
    /// An unfiltered query is rejected; PostgREST would apply it to the
    /// whole table.
    pub async fn update<B: Serialize + ?Sized>(&self, table: &str, filter: &Query, body: &B) -> StoreResult<()> {
        if !filter.has_filters() {
            return Err(StoreError::request_failed(format!(
                "refusing unfiltered update on {}",
                table
            )));
        }

        let mut url = self.table_url(table)?;
        filter.apply_filters(&mut url);

        self.execute_request("update", table, async {
            let response = self
                .authed(self.http.patch(url.clone()))
                .header("Prefer", "return=minimal")
                .json(body)
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                return Err(Self::handle_error_response(status, url.as_str(), response).await);
            }
            Ok(())
        })
        .await
    }

    /// Delete every row matching `filter`. Unfiltered deletes are rejected.
    pub async fn delete(&self, table: &str, filter: &Query) -> StoreResult<()> {
        if !filter.has_filters() {
            return Err(StoreError::request_failed(format!(
                "refusing unfiltered delete on {}",
                table
            )));
        }

        let mut url = self.table_url(table)?;
        filter.apply_filters(&mut url);

        self.execute_request("delete", table, async {
            let response = self
                .authed(self.http.delete(url.clone()))
                .header("Prefer", "return=minimal")
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                return Err(Self::handle_error_response(status, url.as_str(), response).await);
            }
            Ok(())
        })
        .await
    }

    /// Insert one row, or many when `body` serializes to an array.
    pub async fn insert<B: Serialize + ?Sized>(&self, table: &str, body: &B) -> StoreResult<()> {
        let url = self.table_url(table)?;

        self.execute_request("insert", table, async {
            let response = self
                .authed(self.http.post(url.clone()))
                .header("Prefer", "return=minimal")
                .json(body)
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                return Err(Self::handle_error_response(status, url.as_str(), response).await);
            }
            Ok(())
        })
        .await
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn execute_request<T, F>(&self, operation: &str, table: &str, fut: F) -> StoreResult<T>
    where
        F: std::future::Future<Output = StoreResult<T>>,
    {
        let span = info_span!("store_request", operation = %operation, table = %table);

        let start = Instant::now();
        let result = fut.instrument(span).await;
        let latency_ms = start.elapsed().as_millis() as f64;

        let status = match &result {
            Ok(_) => 200,
            Err(e) => e.http_status().unwrap_or(500),
        };
        record_request(operation, status, latency_ms);

        result
    }

    async fn handle_error_response(status: StatusCode, url: &str, response: reqwest::Response) -> StoreError {
        let body = response.text().await.unwrap_or_default();
        StoreError::from_http_status(status.as_u16(), format!("{} failed: {}", url, body))
    }
}

// =============================================================================
// Tests
// =============================================================================
