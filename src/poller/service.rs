use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::{task::JoinHandle, time};
use tracing::{debug, error, info, warn};

use crate::{
    dashboard_state::{CycleOutcome, DashboardState},
    feed::{
        classify::{classify, Classification},
        FeedClient,
    },
    models::StatusNote,
    sample,
};

/// Advisory shown alongside live data that needed the bare-array conversion.
const COMPAT_NOTE: &str = "Live data received via compatibility conversion.";

/// Drives acquisition cycles against the feed and publishes each outcome to
/// the shared [`DashboardState`]. Cloneable; the API layer holds one clone
/// for manual refreshes while the background loop holds another.
#[derive(Clone)]
pub struct PollService {
    client: FeedClient,
    state: DashboardState,
}

impl PollService {
    pub fn new(client: FeedClient, state: DashboardState) -> Self {
        Self { client, state }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn feed_url(&self) -> &str {
        self.client.url()
    }

    /// Run one acquisition cycle, unless one is already in flight. Returns
    /// whether a cycle actually ran. Every failure mode resolves to a
    /// degraded outcome with a fresh sample dataset, so this never errors.
    pub async fn refresh_once(&self) -> bool {
        if !self.state.begin_cycle().await {
            debug!("Refresh requested while a cycle is in flight; skipping");
            return false;
        }

        let now = Utc::now();
        let outcome = match self.client.fetch_body().await {
            Ok(body) => self.classify_body(&body, now),
            Err(e) => {
                error!(error = %e, "Feed request failed");
                self.degraded(e.to_string(), now)
            }
        };

        // last_updated records when the cycle resolved, not when it started.
        self.state.finish_cycle(outcome, Utc::now()).await;
        true
    }

    fn classify_body(&self, body: &str, now: DateTime<Utc>) -> CycleOutcome {
        match classify(body, now) {
            Classification::Canonical { readings, current } => {
                info!(readings = readings.len(), "Canonical payload received");
                CycleOutcome::live(readings, current, sample::schedule(now), None)
            }
            Classification::Compatibility { readings, current } => {
                info!(readings = readings.len(), "Bare-array payload converted");
                CycleOutcome::live(
                    readings,
                    current,
                    sample::schedule(now),
                    Some(StatusNote::advisory(COMPAT_NOTE)),
                )
            }
            Classification::RemoteError(message) => {
                warn!(message = %message, "Feed reported an error");
                self.degraded(format!("feed error: {message}"), now)
            }
            Classification::Malformed(detail) => {
                warn!(detail = %detail, "Feed body was not valid JSON");
                self.degraded(format!("response was not valid JSON: {detail}"), now)
            }
            Classification::UnexpectedShape => {
                warn!("Feed body matched no known data shape");
                self.degraded("response did not match any known data shape".to_owned(), now)
            }
        }
    }

    fn degraded(&self, reason: String, now: DateTime<Utc>) -> CycleOutcome {
        CycleOutcome::degraded(
            format!("Data fetch failed: {reason}. Sample data is shown instead."),
            sample::readings(now, &mut rand::thread_rng()),
            sample::current_status(now),
            sample::schedule(now),
        )
    }

    /// Start the polling and clock loops. The polling ticker fires
    /// immediately, so the first cycle runs at startup without waiting a
    /// full interval.
    pub fn spawn(self, poll_interval: Duration, clock_interval: Duration) -> ControllerHandle {
        let poller = self.clone();
        let poll_task = tokio::spawn(async move {
            info!(
                interval_secs = poll_interval.as_secs(),
                "Data polling loop started"
            );
            let mut ticker = time::interval(poll_interval);
            loop {
                ticker.tick().await;
                poller.refresh_once().await;
            }
        });

        let state = self.state.clone();
        let clock_task = tokio::spawn(async move {
            let mut ticker = time::interval(clock_interval);
            loop {
                ticker.tick().await;
                state.tick_clock(Utc::now()).await;
            }
        });

        ControllerHandle {
            poll_task,
            clock_task,
        }
    }
}

/// Owns the two background loops. Dropping the handle aborts them, so the
/// loops cannot outlive whoever started them.
pub struct ControllerHandle {
    poll_task: JoinHandle<()>,
    clock_task: JoinHandle<()>,
}

impl ControllerHandle {
    /// Stop both loops. Consuming the handle is enough; `Drop` aborts.
    pub fn shutdown(self) {}
}

impl Drop for ControllerHandle {
    fn drop(&mut self) {
        self.poll_task.abort();
        self.clock_task.abort();
        info!("Background loops stopped");
    }
}
