use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// Controller phase
// ---------------------------------------------------------------------------

/// Lifecycle phase of the acquisition controller as seen by the view.
///
/// `Loading` only exists before the first cycle resolves; afterwards the
/// controller alternates between `Live` and `Degraded` while the busy flag
/// tracks in-flight cycles separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Loading,
    Live,
    Degraded,
}

/// Origin of the currently displayed dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Sample,
}

impl Phase {
    /// The data source implied by this phase; `None` while still loading.
    pub fn data_source(self) -> Option<DataSource> {
        match self {
            Phase::Loading => None,
            Phase::Live => Some(DataSource::Live),
            Phase::Degraded => Some(DataSource::Sample),
        }
    }
}

// ---------------------------------------------------------------------------
// Status banner
// ---------------------------------------------------------------------------

/// Severity of the status banner text.
///
/// `Advisory` is shown on a *successful* cycle that went through the
/// compatibility transform; `Error` means the dataset is sample data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    Advisory,
    Error,
}

/// Human-readable banner message plus its visual treatment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatusNote {
    pub kind: NoteKind,
    pub text: String,
}

impl StatusNote {
    pub fn advisory(text: impl Into<String>) -> Self {
        Self { kind: NoteKind::Advisory, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: NoteKind::Error, text: text.into() }
    }
}

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

/// One timestamped environmental sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    /// Preformatted local time label, e.g. `07/12 09:00`.
    pub time: String,
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity percentage
    pub humidity: i64,
    /// Lux
    pub illuminance: i64,
    /// 1 = motion detected
    pub motion: i64,
    /// Air conditioning considered active for this sample.
    pub aircon_active: bool,
    /// Sample falls inside a reserved facility window.
    pub reserved: bool,
    /// Reservation label, when the window is annotated.
    pub reservation_user: Option<String>,
}

impl Reading {
    /// Local-wall-clock label used on the chart axis.
    pub fn time_label(timestamp: DateTime<Utc>) -> String {
        timestamp
            .with_timezone(&Local)
            .format("%m/%d %H:%M")
            .to_string()
    }
}

/// Core fields of the most recent reading, shown in the summary cards.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentStatus {
    pub timestamp: DateTime<Utc>,
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity percentage
    pub humidity: i64,
    /// Lux
    pub illuminance: i64,
    /// 1 = motion detected
    pub motion: i64,
}

// ---------------------------------------------------------------------------
// Reservation schedule
// ---------------------------------------------------------------------------

/// Occupancy state of one reservation slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Confirmed,
    Active,
}

/// One reservation entry on a schedule day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScheduleSlot {
    /// Time range, e.g. `09:00-11:00`.
    pub time: String,
    /// User or group the slot belongs to.
    pub user: String,
    pub status: SlotStatus,
}

/// One calendar day of the reservation schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScheduleDay {
    /// Date label, e.g. `07/12`.
    pub date: String,
    /// Short weekday label, e.g. `Sat`.
    pub day_of_week: String,
    pub slots: Vec<ScheduleSlot>,
}
