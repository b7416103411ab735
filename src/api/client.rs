use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;

use super::constants;
use super::models::{NewRow, Record, RecordPage, Sheet};
use super::service::{RecordSource, SheetService};
use crate::config::SyncConfig;

/// Smartsheet REST API client with connection pooling and explicit timeouts.
pub struct SmartsheetClient {
    http_client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl SmartsheetClient {
    pub fn new(config: &SyncConfig) -> Result<Self> {
        if config.danger_accept_invalid_certs {
            warn!("TLS certificate verification is disabled (SYNC_DANGER_ACCEPT_INVALID_CERTS)");
        }

        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("smartsheet-sync/0.1")
            .danger_accept_invalid_certs(config.danger_accept_invalid_certs)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
            access_token: config.access_token.clone(),
        })
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("Accept", "application/json")
    }

    /// Check the status and parse the body; non-success statuses become
    /// errors carrying the status code and the response body.
    async fn read_json(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        debug!("Response status: {}", status);

        if status.is_success() {
            response
                .json()
                .await
                .context("Failed to parse response body as JSON")
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            bail!("Request failed with HTTP {}: {}", status, body)
        }
    }
}

#[async_trait]
impl RecordSource for SmartsheetClient {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<Vec<Record>> {
        let url = constants::collection_endpoint(&self.base_url);
        debug!("GET {} page={} pageSize={}", url, page, page_size);

        let response = self
            .request(reqwest::Method::GET, &url)
            .query(&[("page", page.to_string()), ("pageSize", page_size.to_string())])
            .send()
            .await
            .with_context(|| format!("Failed to fetch page {page} from {url}"))?;

        let json = Self::read_json(response).await?;
        Ok(RecordPage::from_json(json)?.data)
    }
}

#[async_trait]
impl SheetService for SmartsheetClient {
    async fn get_sheet(&self, sheet_id: u64) -> Result<Sheet> {
        let url = constants::sheet_endpoint(&self.base_url, sheet_id);
        debug!("GET {}", url);

        let response = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .with_context(|| format!("Failed to read sheet {sheet_id}"))?;

        let json = Self::read_json(response).await?;
        serde_json::from_value(json).context("Failed to parse sheet metadata")
    }

    async fn delete_rows(&self, sheet_id: u64, row_ids: &[u64]) -> Result<()> {
        let url = constants::rows_endpoint(&self.base_url, sheet_id);
        let ids = row_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        debug!("DELETE {} ({} rows)", url, row_ids.len());

        let response = self
            .request(reqwest::Method::DELETE, &url)
            .query(&[("ids", ids.as_str()), ("ignoreRowsNotFound", "true")])
            .send()
            .await
            .with_context(|| {
                format!("Failed to delete {} rows from sheet {sheet_id}", row_ids.len())
            })?;

        Self::read_json(response).await?;
        Ok(())
    }

    async fn add_rows(&self, sheet_id: u64, rows: Vec<NewRow>) -> Result<()> {
        let url = constants::rows_endpoint(&self.base_url, sheet_id);
        debug!("POST {} ({} rows)", url, rows.len());

        let response = self
            .request(reqwest::Method::POST, &url)
            .json(&rows)
            .send()
            .await
            .with_context(|| format!("Failed to add {} rows to sheet {sheet_id}", rows.len()))?;

        Self::read_json(response).await?;
        Ok(())
    }
}
