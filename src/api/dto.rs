use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::dashboard_state::DashboardSnapshot;
use crate::models::{CurrentStatus, DataSource, Phase, Reading, ScheduleDay, StatusNote};

/// Every third reading goes to the chart; 72 hourly readings plot as 24
/// points, enough for the trend without crowding the axis.
const CHART_STRIDE: usize = 3;

/// Everything one dashboard render needs, in a single response.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardDto {
    pub phase: Phase,
    /// Where the displayed dataset came from; absent while still loading.
    pub source: Option<DataSource>,
    /// Whether an acquisition cycle is in flight right now.
    pub busy: bool,
    pub note: Option<StatusNote>,
    /// Wall clock shown in the header, advanced once a minute.
    pub clock: DateTime<Utc>,
    pub last_updated: Option<DateTime<Utc>>,
    /// Size of the full dataset, before chart downsampling.
    pub reading_count: usize,
    pub current: Option<CurrentStatusDto>,
    pub chart: Vec<ChartPointDto>,
    pub schedule: Vec<ScheduleDay>,
    /// Upstream feed endpoint, linked from the error banner.
    pub feed_url: String,
}

impl DashboardDto {
    pub fn from_snapshot(snapshot: DashboardSnapshot, feed_url: String) -> Self {
        Self {
            phase: snapshot.phase,
            source: snapshot.phase.data_source(),
            busy: snapshot.busy,
            note: snapshot.note,
            clock: snapshot.clock,
            last_updated: snapshot.last_updated,
            reading_count: snapshot.readings.len(),
            current: snapshot.current.map(Into::into),
            chart: downsample(&snapshot.readings),
            schedule: snapshot.schedule,
            feed_url,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentStatusDto {
    pub timestamp: DateTime<Utc>,
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity percentage
    pub humidity: i64,
    /// Lux
    pub illuminance: i64,
    /// 1 = presence detected, 0 = vacant
    pub motion: i64,
}

impl From<CurrentStatus> for CurrentStatusDto {
    fn from(s: CurrentStatus) -> Self {
        Self {
            timestamp: s.timestamp,
            temperature: s.temperature,
            humidity: s.humidity,
            illuminance: s.illuminance,
            motion: s.motion,
        }
    }
}

/// One plotted point. Carries only what the chart and its tooltip use.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChartPointDto {
    /// Short display label, e.g. `07/12 14:00`.
    pub time: String,
    pub timestamp: DateTime<Utc>,
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity percentage
    pub humidity: i64,
    pub reservation_user: Option<String>,
}

impl From<&Reading> for ChartPointDto {
    fn from(r: &Reading) -> Self {
        Self {
            time: r.time.clone(),
            timestamp: r.timestamp,
            temperature: r.temperature,
            humidity: r.humidity,
            reservation_user: r.reservation_user.clone(),
        }
    }
}

/// Response for `POST /refresh`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshDto {
    /// `false` when the request arrived while a cycle was already in
    /// flight and was therefore skipped.
    pub refreshed: bool,
    pub dashboard: DashboardDto,
}

fn downsample(readings: &[Reading]) -> Vec<ChartPointDto> {
    readings.iter().step_by(CHART_STRIDE).map(Into::into).collect()
}
