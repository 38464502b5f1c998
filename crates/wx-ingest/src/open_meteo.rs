//! Open-Meteo daily-forecast client and payload models.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use wx_model::PIPELINE_TZ;

use crate::error::{IngestError, Result};

/// Daily variables requested from the forecast API.
const DAILY_VARIABLES: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum";

/// Forecast fetch parameters.
///
/// Station coordinates only parameterize the fetch; they play no part in the
/// merge. The horizon is capped at the API's 16-day maximum.
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    /// Open-Meteo API base URL.
    pub base_url: String,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
    /// Station latitude.
    pub latitude: f64,
    /// Station longitude.
    pub longitude: f64,
    /// Forecast horizon in days (1-16).
    pub forecast_days: u8,
    /// Past days included for overlap with the historical source.
    pub past_days: u8,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-meteo.com/v1".to_string(),
            timeout_secs: 30,
            latitude: 43.79,
            longitude: -79.35,
            forecast_days: 16,
            past_days: 5,
        }
    }
}

/// The `daily` block of the forecast payload: parallel arrays keyed by
/// position. Metric arrays tolerate JSON nulls.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DailyBlock {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_sum: Vec<Option<f64>>,
}

/// Top-level forecast payload. Fields other than `daily` are ignored.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub daily: DailyBlock,
}

/// Blocking HTTP client for the Open-Meteo daily forecast endpoint.
#[derive(Debug)]
pub struct OpenMeteoClient {
    client: Client,
    config: ForecastConfig,
}

impl OpenMeteoClient {
    pub fn new(config: ForecastConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| IngestError::Network(error.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(ForecastConfig::default())
    }

    fn forecast_url(&self) -> String {
        format!("{}/forecast", self.config.base_url)
    }

    /// Fetch the daily forecast window configured for this client.
    ///
    /// Transport failures and non-success statuses are fatal; an empty
    /// `daily` block is not, and normalizes to an empty set downstream.
    pub fn fetch_daily(&self) -> Result<ForecastResponse> {
        let forecast_days = self.config.forecast_days.clamp(1, 16);
        debug!(
            latitude = self.config.latitude,
            longitude = self.config.longitude,
            forecast_days,
            past_days = self.config.past_days,
            "requesting daily forecast"
        );

        let response = self
            .client
            .get(self.forecast_url())
            .query(&[
                ("latitude", self.config.latitude.to_string()),
                ("longitude", self.config.longitude.to_string()),
                ("daily", DAILY_VARIABLES.to_string()),
                ("forecast_days", forecast_days.to_string()),
                ("past_days", self.config.past_days.to_string()),
                ("timezone", PIPELINE_TZ.name().to_string()),
            ])
            .send()
            .map_err(|error| IngestError::Network(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(IngestError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: ForecastResponse = response
            .json()
            .map_err(|error| IngestError::Network(error.to_string()))?;
        debug!(days = payload.daily.time.len(), "daily forecast received");
        Ok(payload)
    }
}
