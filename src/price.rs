//! Bitcoin price lookup against a CoinGecko-compatible endpoint.

use crate::config::PriceFeedSettings;
use crate::error::{PrepdeskError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Current bitcoin price in a given currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BitcoinPrice {
    pub price: f64,
    /// Upper-cased currency code.
    pub currency: String,
    /// RFC 3339 timestamp of the quote.
    pub last_updated: String,
}

/// HTTP client for the price feed with retry and exponential backoff.
pub struct PriceClient {
    http: reqwest::Client,
    base_url: String,
    max_retries: u32,
    base_delay: Duration,
}

impl PriceClient {
    pub fn new(settings: &PriceFeedSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: settings.base_url.clone(),
            max_retries: settings.max_retries.max(1),
            base_delay: Duration::from_millis(settings.base_delay_ms),
        })
    }

    /// Fetch the bitcoin price, retrying failed attempts.
    #[instrument(skip(self))]
    pub async fn bitcoin_price(&self, currency: &str) -> Result<BitcoinPrice> {
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            match self.fetch(currency).await {
                Ok(price) => {
                    info!("Fetched bitcoin price: {} {}", price.price, price.currency);
                    return Ok(price);
                }
                Err(e) => {
                    warn!("Price fetch attempt {} failed: {}", attempt, e);
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        let delay = backoff_delay(self.base_delay, attempt);
                        debug!("Retrying in {:?}", delay);
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(PrepdeskError::PriceFeed(format!(
            "Failed to fetch Bitcoin price after {} attempts: {}",
            self.max_retries,
            last_error.map(|e| e.to_string()).unwrap_or_default()
        )))
    }

    async fn fetch(&self, currency: &str) -> Result<BitcoinPrice> {
        let currency = currency.trim().to_lowercase();
        let url = Url::parse_with_params(
            &self.base_url,
            &[
                ("ids", "bitcoin"),
                ("vs_currencies", currency.as_str()),
                ("include_last_updated_at", "true"),
            ],
        )
        .map_err(|e| PrepdeskError::Config(format!("Invalid price feed URL: {}", e)))?;

        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PrepdeskError::PriceFeed(format!(
                "HTTP error! Status: {}, Message: {}",
                status, body
            )));
        }

        let data: Value = response.json().await?;
        parse_quote(&data, &currency)
    }
}

/// Extract the quote for `currency` from a simple-price response body.
fn parse_quote(data: &Value, currency: &str) -> Result<BitcoinPrice> {
    let bitcoin = data
        .get("bitcoin")
        .ok_or_else(|| PrepdeskError::PriceFeed("No Bitcoin data returned from API".to_string()))?;

    let price = bitcoin.get(currency).and_then(|p| p.as_f64()).ok_or_else(|| {
        PrepdeskError::PriceFeed(format!("No {} price returned from API", currency.to_uppercase()))
    })?;

    let last_updated = bitcoin
        .get("last_updated_at")
        .and_then(|t| t.as_i64())
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .unwrap_or_else(Utc::now);

    Ok(BitcoinPrice {
        price,
        currency: currency.to_uppercase(),
        last_updated: last_updated.to_rfc3339(),
    })
}

/// Delay before the retry that follows failed attempt `attempt` (1-based).
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}
