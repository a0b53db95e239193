use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Cell range consumed from the source spreadsheet. Columns are read strictly
/// positionally: A is the domain, I is the spam score.
pub const SHEETS_RANGE: &str = "Sheet1!A2:I";

/// How long a fetched sheet stays fresh before the next request refetches it.
pub const REVALIDATE_WINDOW: Duration = Duration::from_secs(300);

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

const MISSING_KEY_MESSAGE: &str = "API key is not configured";
const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to fetch data. Please try again later.";

/// One normalized spreadsheet row.
///
/// Text cells default to empty strings when the source cell is absent; `dr`
/// and `da` are parsed best-effort and default to 0. Records carry no
/// identity beyond their position in the fetched array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebsiteRecord {
    pub domain: String,
    pub niche1: String,
    pub niche2: String,
    pub traffic: String,
    pub dr: i64,
    pub da: i64,
    pub language: String,
    pub price: String,
    #[serde(rename = "spamScore")]
    pub spam_score: String,
}

impl WebsiteRecord {
    /// Map one row of cell values positionally into a record. Missing or
    /// out-of-range cells become empty text, non-numeric scores become 0.
    pub fn from_row(row: &[serde_json::Value]) -> Self {
        WebsiteRecord {
            domain: cell_text(row, 0),
            niche1: cell_text(row, 1),
            niche2: cell_text(row, 2),
            traffic: cell_text(row, 3),
            dr: parse_score(&cell_text(row, 4)),
            da: parse_score(&cell_text(row, 5)),
            language: cell_text(row, 6),
            price: cell_text(row, 7),
            spam_score: cell_text(row, 8),
        }
    }
}

fn cell_text(row: &[serde_json::Value], index: usize) -> String {
    match row.get(index) {
        Some(serde_json::Value::String(text)) => text.clone(),
        Some(serde_json::Value::Number(number)) => number.to_string(),
        Some(serde_json::Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

/// Best-effort score parsing: leading ASCII digits only, so `"45"` is 45,
/// `"10k"` is 10, and `"N/A"` is 0. Never negative.
fn parse_score(text: &str) -> i64 {
    let digits: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Errors from the sheet gateway.
///
/// Only the fixed public message reaches the client; the underlying cause is
/// logged server-side when the error is turned into a response.
#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("sheets request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("sheets API returned {status}: {body}")]
    UpstreamStatus {
        status: reqwest::StatusCode,
        body: String,
    },
}

impl SheetsError {
    /// The fixed message exposed to clients for this error.
    pub fn public_message(&self) -> &'static str {
        match self {
            SheetsError::MissingApiKey => MISSING_KEY_MESSAGE,
            SheetsError::Transport(_) | SheetsError::UpstreamStatus { .. } => {
                UPSTREAM_FAILURE_MESSAGE
            }
        }
    }
}

impl IntoResponse for SheetsError {
    fn into_response(self) -> Response {
        tracing::error!("sheet fetch failed: {self}");
        let body = serde_json::json!({ "error": self.public_message() });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Response body of the Sheets v4 values API. `values` is absent when the
/// requested range is empty.
#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Client for the Google Sheets v4 values API.
pub struct SheetsClient {
    api_key: Option<String>,
    spreadsheet_id: String,
    http: reqwest::Client,
}

impl SheetsClient {
    /// Create a client. A missing API key is not an error here: the gateway
    /// reports it per request, before any network call.
    pub fn new(api_key: Option<String>, spreadsheet_id: String) -> anyhow::Result<Self> {
        use anyhow::Context;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(SheetsClient {
            api_key,
            spreadsheet_id,
            http,
        })
    }

    /// Fetch the configured range and normalize every row into a record.
    /// Ordering matches the source rows; no sorting happens here.
    pub async fn fetch_records(&self) -> Result<Vec<WebsiteRecord>, SheetsError> {
        let api_key = self.api_key.as_deref().ok_or(SheetsError::MissingApiKey)?;

        let url = format!(
            "{}/{}/values/{}",
            SHEETS_API_BASE, self.spreadsheet_id, SHEETS_RANGE
        );
        let response = self.http.get(&url).query(&[("key", api_key)]).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::UpstreamStatus { status, body });
        }

        let range: ValueRange = response.json().await?;
        Ok(range
            .values
            .iter()
            .map(|row| WebsiteRecord::from_row(row))
            .collect())
    }
}

/// In-process cache holding the last successful fetch for the revalidate
/// window. Errors are never cached; overlapping refetches race benignly and
/// the last write wins.
#[derive(Default)]
pub struct SheetCache {
    entry: Mutex<Option<(Instant, Vec<WebsiteRecord>)>>,
}

impl SheetCache {
    /// Return the cached records if they are still fresh.
    pub fn get(&self) -> Option<Vec<WebsiteRecord>> {
        let entry = self.entry.lock().unwrap();
        match entry.as_ref() {
            Some((fetched_at, records)) if fetched_at.elapsed() < REVALIDATE_WINDOW => {
                Some(records.clone())
            }
            _ => None,
        }
    }

    /// Replace the cached records, restarting the revalidate window.
    pub fn store(&self, records: Vec<WebsiteRecord>) {
        let mut entry = self.entry.lock().unwrap();
        *entry = Some((Instant::now(), records));
    }
}
