use anyhow::{Context, Result};

/// Document id of the source spreadsheet, overridable via `SPREADSHEET_ID`.
pub const DEFAULT_SPREADSHEET_ID: &str = "1vwc803C8MwWBMc7ntCre3zJ5xZtG881HKkxlIrwwxNs";

const DEFAULT_PORT: u16 = 3000;

/// Process configuration, read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Google Sheets API key. Left optional so the server still starts
    /// without it; the gateway answers 500 per request until it is set.
    pub api_key: Option<String>,
    pub spreadsheet_id: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let spreadsheet_id = std::env::var("SPREADSHEET_ID")
            .ok()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| DEFAULT_SPREADSHEET_ID.to_string());

        let port = match std::env::var("PORT") {
            Ok(value) => value.parse().context("PORT must be a valid port number")?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Config {
            api_key,
            spreadsheet_id,
            port,
        })
    }
}
