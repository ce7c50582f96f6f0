use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::models::{CurrentStatus, Phase, Reading, ScheduleDay, StatusNote};

/// In-memory store of everything the dashboard shows.
///
/// Wrapped in `Arc` so it can be cheaply cloned and shared across tasks.
/// Uses a `tokio::sync::RwLock` so many readers never block each other.
/// Writers touch it only at cycle boundaries, so the displayed dataset is
/// always one coherent whole; a cycle in progress never blanks the screen.
#[derive(Clone)]
pub struct DashboardState {
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    phase: Phase,
    busy: bool,
    readings: Vec<Reading>,
    current: Option<CurrentStatus>,
    schedule: Vec<ScheduleDay>,
    note: Option<StatusNote>,
    clock: DateTime<Utc>,
    last_updated: Option<DateTime<Utc>>,
}

/// Complete result of one acquisition cycle, applied atomically.
#[derive(Debug)]
pub struct CycleOutcome {
    phase: Phase,
    readings: Vec<Reading>,
    current: Option<CurrentStatus>,
    schedule: Vec<ScheduleDay>,
    note: Option<StatusNote>,
}

impl CycleOutcome {
    /// A successful cycle. `note` carries the compatibility advisory when
    /// the payload needed conversion, `None` on the canonical path.
    pub fn live(
        readings: Vec<Reading>,
        current: Option<CurrentStatus>,
        schedule: Vec<ScheduleDay>,
        note: Option<StatusNote>,
    ) -> Self {
        Self {
            phase: Phase::Live,
            readings,
            current,
            schedule,
            note,
        }
    }

    /// A failed cycle. The sample dataset replaces whatever was shown and
    /// `message` becomes the error banner.
    pub fn degraded(
        message: impl Into<String>,
        readings: Vec<Reading>,
        current: CurrentStatus,
        schedule: Vec<ScheduleDay>,
    ) -> Self {
        Self {
            phase: Phase::Degraded,
            readings,
            current: Some(current),
            schedule,
            note: Some(StatusNote::error(message)),
        }
    }
}

/// Point-in-time copy handed to the API layer.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub phase: Phase,
    pub busy: bool,
    pub readings: Vec<Reading>,
    pub current: Option<CurrentStatus>,
    pub schedule: Vec<ScheduleDay>,
    pub note: Option<StatusNote>,
    pub clock: DateTime<Utc>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl DashboardState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                phase: Phase::Loading,
                busy: false,
                readings: Vec::new(),
                current: None,
                schedule: Vec::new(),
                note: None,
                clock: now,
                last_updated: None,
            })),
        }
    }

    /// Claim the in-flight slot. Returns `false` when a cycle is already
    /// running; the caller must then skip its cycle entirely.
    pub async fn begin_cycle(&self) -> bool {
        let mut inner = self.inner.write().await;
        if inner.busy {
            return false;
        }
        inner.busy = true;
        true
    }

    /// Apply a finished cycle and release the in-flight slot.
    pub async fn finish_cycle(&self, outcome: CycleOutcome, now: DateTime<Utc>) {
        let mut inner = self.inner.write().await;
        inner.phase = outcome.phase;
        inner.readings = outcome.readings;
        inner.current = outcome.current;
        inner.schedule = outcome.schedule;
        inner.note = outcome.note;
        inner.busy = false;
        inner.last_updated = Some(now);
    }

    /// Advance the wall clock shown in the header. Independent of the
    /// acquisition cycle and never touches the dataset.
    pub async fn tick_clock(&self, now: DateTime<Utc>) {
        self.inner.write().await.clock = now;
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        let inner = self.inner.read().await;
        DashboardSnapshot {
            phase: inner.phase,
            busy: inner.busy,
            readings: inner.readings.clone(),
            current: inner.current.clone(),
            schedule: inner.schedule.clone(),
            note: inner.note.clone(),
            clock: inner.clock,
            last_updated: inner.last_updated,
        }
    }
}
