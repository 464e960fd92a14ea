use crate::domain::money::parse_amount;
use crate::domain::ports::RateProvider;
use crate::domain::rate::ExchangeRate;
use crate::error::{Result, SplitError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Url;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_RATE_URL: &str = "https://pydolarve.org/api/v2/tipo-cambio";

/// Payload published by the exchange-rate feed.
///
/// Rates come as text with a decimal comma, e.g. `"36,50"`; `timestamp` is in
/// seconds since the epoch.
#[derive(Debug, Deserialize)]
struct RatePayload {
    dolar: String,
    euro: String,
    #[serde(default)]
    timestamp: Option<i64>,
}

/// Fetches exchange rates over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRateProvider {
    url: Url,
    http: reqwest::Client,
}

impl HttpRateProvider {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| SplitError::InvalidInput(format!("invalid rate url '{url}': {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SplitError::RateUnavailable(e.to_string()))?;
        Ok(Self { url, http })
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    async fn fetch(&self) -> Result<ExchangeRate> {
        let res = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| SplitError::RateUnavailable(format!("request failed: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            return Err(SplitError::RateUnavailable(format!(
                "feed answered {status}"
            )));
        }

        let body = res
            .text()
            .await
            .map_err(|e| SplitError::RateUnavailable(format!("body read failed: {e}")))?;

        parse_payload(&body)
    }
}

/// Decodes a feed response. Missing, unparsable or non-positive rates are
/// reported as unavailable.
pub fn parse_payload(body: &str) -> Result<ExchangeRate> {
    let payload: RatePayload = serde_json::from_str(body)
        .map_err(|e| SplitError::RateUnavailable(format!("malformed payload: {e}")))?;

    let as_of = payload
        .timestamp
        .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
        .unwrap_or_else(Utc::now);

    Ok(ExchangeRate {
        usd: positive_rate(&payload.dolar, "dolar")?,
        eur: positive_rate(&payload.euro, "euro")?,
        as_of,
    })
}

fn positive_rate(text: &str, field: &str) -> Result<Decimal> {
    let value = parse_amount(text)
        .map_err(|e| SplitError::RateUnavailable(format!("{field}: {e}")))?;
    if value <= Decimal::ZERO {
        return Err(SplitError::RateUnavailable(format!(
            "{field}: rate must be positive, got {value}"
        )));
    }
    Ok(value)
}
