//! Endpoint constants for the Smartsheet REST API.

/// Public Smartsheet API base URL.
pub const BASE_URL: &str = "https://api.smartsheet.com/2.0";

/// Collection endpoint the sync reads from, relative to the API base.
pub const COLLECTION_PATH: &str = "sights";

/// Hard service limit on rows per add-rows call.
pub const MAX_ROWS_PER_CALL: usize = 500;

/// Build the paginated collection endpoint URL.
pub fn collection_endpoint(base_url: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), COLLECTION_PATH)
}

/// Build the sheet metadata endpoint URL.
pub fn sheet_endpoint(base_url: &str, sheet_id: u64) -> String {
    format!("{}/sheets/{}", base_url.trim_end_matches('/'), sheet_id)
}

/// Build the sheet rows endpoint URL (add and delete).
pub fn rows_endpoint(base_url: &str, sheet_id: u64) -> String {
    format!("{}/rows", sheet_endpoint(base_url, sheet_id))
}
