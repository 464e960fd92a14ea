use super::rate::ExchangeRate;
use crate::error::Result;
use async_trait::async_trait;

/// Source of exchange rates for the informational currency display.
///
/// Implementations report failure as `SplitError::RateUnavailable`, never as a
/// zero rate.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch(&self) -> Result<ExchangeRate>;
}

pub type RateProviderBox = Box<dyn RateProvider>;
