//! Exchange-rate client with retry and a short-lived in-memory cache.
//!
//! Currency conversion is display-only. When the upstream endpoint is
//! unconfigured or keeps failing after retries, the built-in fallback
//! rates are served instead so the storefront never blocks on it.

use std::collections::HashMap;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::Instant;

use boutique_core::{Currency, ExchangeRates};

/// How many times a fetch is attempted before falling back.
const MAX_ATTEMPTS: u32 = 3;

/// Base delay between attempts; attempt n waits n times this.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// How long fetched rates are served before refetching.
const CACHE_TTL: Duration = Duration::from_secs(3600);

/// Errors that can occur when fetching exchange rates.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: status {0}")]
    Api(u16),
}

/// Upstream response body: currency code to rate against the base.
#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, Decimal>,
}

struct CachedRates {
    rates: ExchangeRates,
    fetched_at: Instant,
}

/// Exchange-rate service.
pub struct ExchangeService {
    client: reqwest::Client,
    url: Option<String>,
    cache: RwLock<Option<CachedRates>>,
}

impl ExchangeService {
    /// Create a new exchange-rate service.
    ///
    /// `url` is the upstream endpoint; `None` disables fetching and
    /// serves fallback rates only.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(url: Option<String>) -> Result<Self, ExchangeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            url,
            cache: RwLock::new(None),
        })
    }

    /// Current exchange rates: cached, freshly fetched, or fallback.
    ///
    /// Never fails; fetch errors are logged and the fallback table is
    /// returned.
    pub async fn rates(&self) -> ExchangeRates {
        if let Some(cached) = self.cache.read().await.as_ref()
            && cached.fetched_at.elapsed() < CACHE_TTL
        {
            return cached.rates.clone();
        }

        let Some(url) = &self.url else {
            return ExchangeRates::fallback();
        };

        match self.fetch_with_retry(url).await {
            Ok(rates) => {
                *self.cache.write().await = Some(CachedRates {
                    rates: rates.clone(),
                    fetched_at: Instant::now(),
                });
                rates
            }
            Err(e) => {
                tracing::warn!(error = %e, "exchange rate fetch failed, using fallback rates");
                ExchangeRates::fallback()
            }
        }
    }

    /// Fetch rates, retrying transient failures with linear backoff.
    async fn fetch_with_retry(&self, url: &str) -> Result<ExchangeRates, ExchangeError> {
        let mut last_error = None;

        for attempt in 1..=MAX_ATTEMPTS {
            match self.fetch_once(url).await {
                Ok(rates) => return Ok(rates),
                Err(e) => {
                    tracing::debug!(attempt, error = %e, "exchange rate fetch attempt failed");
                    last_error = Some(e);
                    if attempt < MAX_ATTEMPTS {
                        tokio::time::sleep(RETRY_BASE_DELAY * attempt).await;
                    }
                }
            }
        }

        // Loop always records an error before exiting
        Err(last_error.unwrap_or(ExchangeError::Api(0)))
    }

    async fn fetch_once(&self, url: &str) -> Result<ExchangeRates, ExchangeError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ExchangeError::Api(status.as_u16()));
        }

        let body: RatesResponse = response.json().await?;
        // Unknown currency codes in the response are ignored
        let fetched = body
            .rates
            .into_iter()
            .filter_map(|(code, rate)| Currency::from_code(&code).map(|c| (c, rate)))
            .collect();
        Ok(ExchangeRates::from_fetched(fetched))
    }
}
