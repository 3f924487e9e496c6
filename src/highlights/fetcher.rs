use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::config::RunSettings;
use crate::error::{AppError, Result};
use crate::models::HighlightPayload;

const API_KEY_HEADER: &str = "X-RapidAPI-Key";
const API_HOST_HEADER: &str = "X-RapidAPI-Host";

pub struct HighlightFetcher {
    client: Client,
    api_url: Url,
    api_key: String,
    api_host: String,
    date: String,
    league_name: String,
    limit: u32,
}

impl HighlightFetcher {
    pub fn new(settings: &RunSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent("highlights-pipeline/1.0")
            .build()?;

        Ok(Self {
            client,
            api_url: settings.api_url.clone(),
            api_key: settings.rapidapi_key.clone(),
            api_host: settings.rapidapi_host.clone(),
            date: settings.date.clone(),
            league_name: settings.league_name.clone(),
            limit: settings.limit,
        })
    }

    /// Single GET against the highlights endpoint. No retries.
    pub async fn fetch_highlights(&self) -> Result<HighlightPayload> {
        let limit = self.limit.to_string();
        let response = self
            .client
            .get(self.api_url.clone())
            .query(&[
                ("date", self.date.as_str()),
                ("leagueName", self.league_name.as_str()),
                ("limit", limit.as_str()),
            ])
            .header(API_KEY_HEADER, &self.api_key)
            .header(API_HOST_HEADER, &self.api_host)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::HighlightsApi(format!("HTTP {}: {}", status, error_text)));
        }

        let body: Value = response.json().await?;
        Ok(HighlightPayload::new(body))
    }
}
