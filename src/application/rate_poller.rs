use crate::domain::ports::{RateProvider, RateProviderBox};
use crate::domain::rate::RateState;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Asks `provider` once and folds the outcome into a `RateState`.
pub async fn fetch_state(provider: &dyn RateProvider) -> RateState {
    match provider.fetch().await {
        Ok(rate) => {
            info!(usd = %rate.usd, eur = %rate.eur, as_of = %rate.as_of, "exchange rate fetched");
            RateState::Available(rate)
        }
        Err(e) => {
            warn!("exchange rate unavailable: {}", e);
            RateState::Unavailable(e.to_string())
        }
    }
}

/// Periodically refreshes the exchange rate on a background task.
///
/// The first fetch happens immediately, then once per `interval`. Readers see
/// the latest `RateState` through a `watch` channel. A failed fetch publishes
/// `Unavailable`, replacing any earlier rate. The task is aborted by `stop`
/// or when the poller is dropped.
pub struct RatePoller {
    state: watch::Receiver<RateState>,
    handle: JoinHandle<()>,
}

impl RatePoller {
    /// Starts polling. Must be called from within a tokio runtime.
    pub fn spawn(provider: RateProviderBox, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(RateState::Loading);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let state = fetch_state(provider.as_ref()).await;
                if tx.send(state).is_err() {
                    // every reader is gone
                    break;
                }
            }
        });

        Self { state: rx, handle }
    }

    /// The most recently published state.
    pub fn current(&self) -> RateState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RateState> {
        self.state.clone()
    }

    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_stopped(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RatePoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rate::ExchangeRate;
    use crate::infrastructure::static_rate::StaticRateProvider;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    const WAIT: Duration = Duration::from_secs(5);

    fn rate() -> ExchangeRate {
        ExchangeRate {
            usd: dec!(36.5),
            eur: dec!(39.1),
            as_of: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_poller_publishes_rate() {
        let poller = RatePoller::spawn(
            Box::new(StaticRateProvider::available(rate())),
            Duration::from_secs(3600),
        );
        let mut rx = poller.subscribe();

        tokio::time::timeout(WAIT, rx.wait_for(|s| s.is_available()))
            .await
            .unwrap()
            .unwrap();

        assert!(matches!(poller.current(), RateState::Available(r) if r.usd == dec!(36.5)));
    }

    #[tokio::test]
    async fn test_poller_publishes_unavailable_on_failure() {
        let poller = RatePoller::spawn(
            Box::new(StaticRateProvider::unavailable("feed down")),
            Duration::from_secs(3600),
        );
        let mut rx = poller.subscribe();

        let state = tokio::time::timeout(WAIT, rx.wait_for(|s| !matches!(s, RateState::Loading)))
            .await
            .unwrap()
            .unwrap()
            .clone();

        assert!(matches!(state, RateState::Unavailable(reason) if reason.contains("feed down")));
    }

    #[tokio::test]
    async fn test_poller_refreshes_on_interval() {
        let provider = StaticRateProvider::unavailable("not yet");
        let poller = RatePoller::spawn(Box::new(provider.clone()), Duration::from_millis(20));
        let mut rx = poller.subscribe();

        tokio::time::timeout(WAIT, rx.wait_for(|s| matches!(s, RateState::Unavailable(_))))
            .await
            .unwrap()
            .unwrap();

        provider.set(Some(rate())).await;

        tokio::time::timeout(WAIT, rx.wait_for(|s| s.is_available()))
            .await
            .unwrap()
            .unwrap();
        assert!(provider.calls() >= 2);
    }

    #[tokio::test]
    async fn test_stop_cancels_task() {
        let poller = RatePoller::spawn(
            Box::new(StaticRateProvider::available(rate())),
            Duration::from_millis(10),
        );
        let mut rx = poller.subscribe();
        poller.stop();

        // The sender is dropped with the aborted task.
        let closed = tokio::time::timeout(WAIT, async {
            while rx.changed().await.is_ok() {}
        })
        .await;
        assert!(closed.is_ok());

        let finished = tokio::time::timeout(WAIT, async {
            while !poller.is_stopped() {
                tokio::task::yield_now().await;
            }
        })
        .await;
        assert!(finished.is_ok());
    }
}
