use crate::domain::currency::Currency;
use crate::domain::terms::{TaxTipTerm, TermMode};
use crate::error::Result;
use crate::infrastructure::http_rate::DEFAULT_RATE_URL;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "tabsplit.toml";
pub const ENV_PREFIX: &str = "TABSPLIT";

/// Runtime settings.
///
/// Layered from lowest to highest priority: built-in defaults, an optional TOML
/// file, `TABSPLIT_*` environment variables. The CLI applies its own flags on
/// top. Tax and tip are kept as text so they go through the same parsing as
/// form input.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub currency: String,
    pub rate_url: String,
    pub rate_poll_interval_secs: u64,
    pub rate_timeout_secs: u64,
    pub tax: String,
    pub tax_mode: String,
    pub tip: String,
    pub tip_mode: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: Currency::default().code().to_string(),
            rate_url: DEFAULT_RATE_URL.to_string(),
            rate_poll_interval_secs: 3600,
            rate_timeout_secs: 10,
            tax: String::new(),
            tax_mode: TermMode::Percentage.to_string(),
            tip: String::new(),
            tip_mode: TermMode::Percentage.to_string(),
        }
    }
}

impl Settings {
    /// Loads settings. An explicit `path` must exist; without one the default
    /// file is read only if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_PATH).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn currency(&self) -> Result<Currency> {
        self.currency.parse()
    }

    pub fn tax_term(&self) -> Result<TaxTipTerm> {
        TaxTipTerm::parse(&self.tax, self.tax_mode.parse()?)
    }

    pub fn tip_term(&self) -> Result<TaxTipTerm> {
        TaxTipTerm::parse(&self.tip, self.tip_mode.parse()?)
    }

    pub fn rate_poll_interval(&self) -> Duration {
        Duration::from_secs(self.rate_poll_interval_secs.max(1))
    }

    pub fn rate_timeout(&self) -> Duration {
        Duration::from_secs(self.rate_timeout_secs.max(1))
    }
}
