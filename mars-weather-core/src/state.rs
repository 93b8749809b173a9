//! What the presentation layer shows, and the fetcher that drives it.
//!
//! [`ReportFetcher`] owns a single [`ViewState`] behind a `watch` channel. The
//! state starts as [`ViewState::Loading`] and is replaced as a whole exactly
//! once per completed fetch, whether it succeeded or failed. Receivers may live
//! on any thread.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use chrono::{DateTime, Utc};
use tokio::{sync::watch, task::JoinHandle};

use crate::{
    FetchError, SolWeather,
    provider::{ReportProvider, load_weather},
};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// No fetch has completed yet.
    Loading,
    Loaded {
        records: Vec<SolWeather>,
        fetched_at: DateTime<Utc>,
    },
    /// The report decoded but no declared sol had published data.
    Empty { fetched_at: DateTime<Utc> },
    Failed { message: String },
}

impl ViewState {
    pub fn from_outcome(outcome: Result<Vec<SolWeather>, FetchError>) -> Self {
        Self::from_outcome_at(outcome, Utc::now())
    }

    pub fn from_outcome_at(
        outcome: Result<Vec<SolWeather>, FetchError>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        match outcome {
            Ok(records) if records.is_empty() => ViewState::Empty { fetched_at },
            Ok(records) => ViewState::Loaded { records, fetched_at },
            Err(err) => ViewState::Failed { message: err.to_string() },
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

/// Runs report fetches and publishes the resulting [`ViewState`].
///
/// At most one fetch runs at a time; an activation that arrives while one is
/// in flight is ignored.
#[derive(Debug)]
pub struct ReportFetcher {
    provider: Box<dyn ReportProvider>,
    state: watch::Sender<ViewState>,
    in_flight: AtomicBool,
}

impl ReportFetcher {
    pub fn new(provider: Box<dyn ReportProvider>) -> Self {
        let (state, _) = watch::channel(ViewState::Loading);
        Self { provider, state, in_flight: AtomicBool::new(false) }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Fetch once and publish the outcome.
    ///
    /// Returns `false` without fetching if another activation is still running.
    pub async fn activate(&self) -> bool {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            tracing::debug!("Fetch already in flight, ignoring activation");
            return false;
        };

        let outcome = load_weather(self.provider.as_ref()).await;
        match &outcome {
            Ok(records) => tracing::info!("Loaded {} sols", records.len()),
            Err(err) => tracing::error!("Error fetching Mars weather: {err}"),
        }

        self.state.send_replace(ViewState::from_outcome(outcome));
        true
    }

    /// Run [`activate`](Self::activate) on the tokio runtime.
    pub fn spawn_activation(self: &Arc<Self>) -> JoinHandle<bool> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.activate().await })
    }
}

/// Clears the in-flight flag on drop, including when the fetch future is cancelled.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::DecodeError;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    #[derive(Debug)]
    struct Canned(&'static str);

    #[async_trait]
    impl ReportProvider for Canned {
        async fn fetch_payload(&self) -> Result<Vec<u8>, FetchError> {
            Ok(self.0.as_bytes().to_vec())
        }
    }

    /// Blocks inside the fetch until the gate is opened.
    #[derive(Debug)]
    struct Gated {
        started: Arc<Notify>,
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl ReportProvider for Gated {
        async fn fetch_payload(&self) -> Result<Vec<u8>, FetchError> {
            self.started.notify_one();
            self.gate.notified().await;
            Ok(br#"{"sol_keys": ["1"], "1": {}}"#.to_vec())
        }
    }

    fn fetcher(payload: &'static str) -> ReportFetcher {
        ReportFetcher::new(Box::new(Canned(payload)))
    }

    #[test]
    fn outcome_maps_to_exactly_one_state() {
        let now = Utc::now();
        let row = SolWeather {
            id: "6".into(),
            sol: "6".into(),
            temperature_c: 0.0,
            wind_speed_mps: 0.0,
            pressure_pa: 0.0,
        };

        assert_eq!(
            ViewState::from_outcome_at(Ok(vec![row.clone()]), now),
            ViewState::Loaded { records: vec![row], fetched_at: now }
        );
        assert_eq!(ViewState::from_outcome_at(Ok(vec![]), now), ViewState::Empty { fetched_at: now });

        let failed = ViewState::from_outcome_at(
            Err(FetchError::Decode(DecodeError::MissingKeyList)),
            now,
        );
        match failed {
            ViewState::Failed { message } => assert!(message.contains("sol_keys")),
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn starts_loading_then_publishes_records() {
        let fetcher = fetcher(r#"{"sol_keys": ["6", "7"], "6": {"PRE": {"av": 750.1}}}"#);
        let mut rx = fetcher.subscribe();
        assert!(rx.borrow_and_update().is_loading());

        assert!(fetcher.activate().await);

        assert!(rx.has_changed().unwrap());
        match &*rx.borrow_and_update() {
            ViewState::Loaded { records, .. } => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].pressure_pa, 750.1);
            }
            other => panic!("unexpected state: {other:?}"),
        }
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn no_published_sols_is_empty_state() {
        let fetcher = fetcher(r#"{"sol_keys": ["6", "7"]}"#);
        fetcher.activate().await;

        assert!(matches!(fetcher.current(), ViewState::Empty { .. }));
    }

    #[tokio::test]
    async fn decode_failure_is_failed_state() {
        let fetcher = fetcher("{ not json");
        fetcher.activate().await;

        match fetcher.current() {
            ViewState::Failed { message } => assert!(message.contains("malformed")),
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn next_fetch_replaces_previous_state() {
        let fetcher = fetcher(r#"{"sol_keys": ["6"], "6": {}}"#);

        fetcher.activate().await;
        let first = fetcher.current();
        fetcher.activate().await;
        let second = fetcher.current();

        assert!(matches!(first, ViewState::Loaded { .. }));
        assert!(matches!(second, ViewState::Loaded { ref records, .. } if records.len() == 1));
    }

    #[tokio::test]
    async fn activation_while_in_flight_is_ignored() {
        let started = Arc::new(Notify::new());
        let gate = Arc::new(Notify::new());
        let fetcher = Arc::new(ReportFetcher::new(Box::new(Gated {
            started: Arc::clone(&started),
            gate: Arc::clone(&gate),
        })));

        let first = fetcher.spawn_activation();
        started.notified().await;

        assert!(!fetcher.activate().await);
        assert!(fetcher.current().is_loading());

        gate.notify_one();
        assert!(first.await.unwrap());
        assert!(matches!(fetcher.current(), ViewState::Loaded { .. }));

        // The slot is free again once the fetch finishes.
        let again = fetcher.spawn_activation();
        started.notified().await;
        gate.notify_one();
        assert!(again.await.unwrap());
    }
}
