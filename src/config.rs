use anyhow::{Context, Result, bail};

use crate::api::constants;

/// Where newly inserted row batches land in the destination sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowPlacement {
    /// Each batch is added at the top of the sheet. The final on-sheet order
    /// is therefore the reverse of batch order, while record order within a
    /// batch is preserved.
    #[default]
    Top,
    /// Each batch is appended at the bottom, preserving record order overall.
    Bottom,
}

impl std::str::FromStr for RowPlacement {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(RowPlacement::Top),
            "bottom" => Ok(RowPlacement::Bottom),
            other => bail!("Unknown row placement '{}', expected 'top' or 'bottom'", other),
        }
    }
}

/// Run configuration, built once at startup and passed by reference into
/// every component.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub access_token: String,
    pub sheet_id: u64,
    pub base_url: String,
    pub page_size: u32,
    pub delete_batch_size: usize,
    pub insert_batch_size: usize,
    pub placement: RowPlacement,
    pub http_timeout_secs: u64,
    /// Disables TLS certificate verification for all requests. Discouraged;
    /// off unless explicitly requested through the environment.
    pub danger_accept_invalid_certs: bool,
}

fn default_page_size() -> u32 {
    300
}

fn default_batch_size() -> usize {
    200
}

fn default_http_timeout_secs() -> u64 {
    30
}

impl SyncConfig {
    /// Build the configuration from the process environment (and a `.env`
    /// file if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any name -> value lookup. Fails before
    /// any network call when a required value is missing or does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token =
            lookup("SS_TOKEN").context("SS_TOKEN environment variable is not set")?;
        if access_token.trim().is_empty() {
            bail!("SS_TOKEN is set but empty");
        }

        let sheet_id = lookup("SM_SHEET_ID")
            .context("SM_SHEET_ID environment variable is not set")?
            .parse::<u64>()
            .context("SM_SHEET_ID must be a numeric sheet id")?;

        let base_url =
            lookup("SMARTSHEET_BASE_URL").unwrap_or_else(|| constants::BASE_URL.to_string());

        let placement = match lookup("SYNC_ROW_PLACEMENT") {
            Some(raw) => raw.parse::<RowPlacement>()?,
            None => RowPlacement::default(),
        };

        let config = Self {
            access_token,
            sheet_id,
            base_url,
            page_size: parse_value(&lookup, "SYNC_PAGE_SIZE", default_page_size())?,
            delete_batch_size: parse_value(&lookup, "SYNC_DELETE_BATCH_SIZE", default_batch_size())?,
            insert_batch_size: parse_value(&lookup, "SYNC_INSERT_BATCH_SIZE", default_batch_size())?,
            placement,
            http_timeout_secs: parse_value(
                &lookup,
                "SYNC_HTTP_TIMEOUT_SECS",
                default_http_timeout_secs(),
            )?,
            danger_accept_invalid_certs: parse_value(
                &lookup,
                "SYNC_DANGER_ACCEPT_INVALID_CERTS",
                false,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            bail!("SYNC_PAGE_SIZE must be greater than zero");
        }
        if self.delete_batch_size == 0 {
            bail!("SYNC_DELETE_BATCH_SIZE must be greater than zero");
        }
        if self.insert_batch_size == 0 {
            bail!("SYNC_INSERT_BATCH_SIZE must be greater than zero");
        }
        if self.insert_batch_size > constants::MAX_ROWS_PER_CALL {
            bail!(
                "SYNC_INSERT_BATCH_SIZE {} exceeds the service limit of {} rows per call",
                self.insert_batch_size,
                constants::MAX_ROWS_PER_CALL
            );
        }
        Ok(())
    }
}

fn parse_value<T, F>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{name} has invalid value '{raw}'")),
        None => Ok(default),
    }
}
