use crate::domain::ports::RateProvider;
use crate::domain::rate::ExchangeRate;
use crate::error::{Result, SplitError};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// An in-memory rate provider.
///
/// Serves whatever rate it currently holds, or `RateUnavailable` when it holds
/// none. `Clone` shares the underlying state, so a test can keep a handle and
/// change the rate while a poller owns another.
#[derive(Clone)]
pub struct StaticRateProvider {
    rate: Arc<RwLock<Option<ExchangeRate>>>,
    reason: Arc<str>,
    calls: Arc<AtomicUsize>,
}

impl StaticRateProvider {
    pub fn available(rate: ExchangeRate) -> Self {
        Self {
            rate: Arc::new(RwLock::new(Some(rate))),
            reason: Arc::from("no rate configured"),
            calls: Arc::default(),
        }
    }

    /// A provider that fails with `reason` until a rate is `set`.
    pub fn unavailable(reason: &str) -> Self {
        Self {
            rate: Arc::new(RwLock::new(None)),
            reason: Arc::from(reason),
            calls: Arc::default(),
        }
    }

    pub async fn set(&self, rate: Option<ExchangeRate>) {
        *self.rate.write().await = rate;
    }

    /// Number of fetches served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateProvider for StaticRateProvider {
    async fn fetch(&self) -> Result<ExchangeRate> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rate
            .read()
            .await
            .clone()
            .ok_or_else(|| SplitError::RateUnavailable(self.reason.to_string()))
    }
}
