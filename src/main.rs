use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tabsplit::application::invoice::Invoice;
use tabsplit::application::rate_poller::RatePoller;
use tabsplit::application::roster;
use tabsplit::domain::rate::RateState;
use tabsplit::infrastructure::http_rate::HttpRateProvider;
use tabsplit::interfaces::csv::breakdown_writer::BreakdownWriter;
use tabsplit::interfaces::csv::invoice_reader::{InvoiceEntry, InvoiceReader};
use tabsplit::settings::Settings;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Invoice CSV file with `type,id,name,price,payers` rows
    input: PathBuf,

    /// Settings file (TOML). Defaults to ./tabsplit.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Currency code the invoice is entered in (USD, VES, EUR, CNY)
    #[arg(long)]
    currency: Option<String>,

    /// Tax value; a percent of the subtotal or a fixed amount, see --tax-mode
    #[arg(long)]
    tax: Option<String>,

    /// `percentage` or `fixed`
    #[arg(long)]
    tax_mode: Option<String>,

    /// Tip value; a percent of the subtotal or a fixed amount, see --tip-mode
    #[arg(long)]
    tip: Option<String>,

    /// `percentage` or `fixed`
    #[arg(long)]
    tip_mode: Option<String>,

    /// Fetch the current exchange rate and add a VES column when it applies
    #[arg(long)]
    rate: bool,

    /// Override the exchange-rate feed URL
    #[arg(long)]
    rate_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).into_diagnostic()?;
    if let Some(currency) = cli.currency {
        settings.currency = currency;
    }
    if let Some(tax) = cli.tax {
        settings.tax = tax;
    }
    if let Some(tax_mode) = cli.tax_mode {
        settings.tax_mode = tax_mode;
    }
    if let Some(tip) = cli.tip {
        settings.tip = tip;
    }
    if let Some(tip_mode) = cli.tip_mode {
        settings.tip_mode = tip_mode;
    }
    if let Some(rate_url) = cli.rate_url {
        settings.rate_url = rate_url;
    }

    let mut invoice = Invoice::new(settings.currency().into_diagnostic()?);
    invoice.set_tax(settings.tax_term().into_diagnostic()?);
    invoice.set_tip(settings.tip_term().into_diagnostic()?);

    let file = File::open(&cli.input).into_diagnostic()?;
    for entry in InvoiceReader::new(file).entries() {
        let inserted = entry.and_then(|entry| match entry {
            InvoiceEntry::Person(person) => invoice.insert_person(person),
            InvoiceEntry::Product(product) => invoice.insert_product(product),
        });
        if let Err(e) = inserted {
            warn!("Error reading invoice row: {}", e);
        }
    }

    for (product, payer) in roster::dangling_payers(invoice.people(), invoice.products()) {
        warn!("payer {} of product {} is not on the roster", payer, product);
    }

    let rate = if cli.rate {
        current_rate(&settings).await
    } else {
        RateState::Loading
    };
    if cli.rate && !rate.is_available() {
        warn!("exchange rate unavailable, showing amounts without conversion");
    }

    let breakdown = invoice.breakdown().into_diagnostic()?;
    if breakdown.has_unallocated() {
        warn!(
            "{} of the total is not allocated to anyone",
            invoice.currency().format(breakdown.unallocated)
        );
    }

    let stdout = io::stdout();
    let mut writer = BreakdownWriter::new(stdout.lock());
    writer
        .write_breakdown(&breakdown, invoice.currency(), &rate)
        .into_diagnostic()?;

    Ok(())
}

/// Runs the poller until its first fetch settles, then stops it.
async fn current_rate(settings: &Settings) -> RateState {
    let provider = match HttpRateProvider::new(&settings.rate_url, settings.rate_timeout()) {
        Ok(provider) => provider,
        Err(e) => return RateState::Unavailable(e.to_string()),
    };

    let poller = RatePoller::spawn(Box::new(provider), settings.rate_poll_interval());
    let mut updates = poller.subscribe();
    let deadline = settings.rate_timeout() + Duration::from_secs(1);
    let settled = tokio::time::timeout(
        deadline,
        updates.wait_for(|state| !matches!(state, RateState::Loading)),
    )
    .await;

    let state = match settled {
        Ok(Ok(state)) => state.clone(),
        _ => RateState::Unavailable("timed out waiting for the exchange rate".to_string()),
    };
    poller.stop();
    state
}
