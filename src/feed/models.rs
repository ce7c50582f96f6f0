//! Wire-shape types for the scripted feed endpoint.
//!
//! The feed is loosely typed: numeric fields may arrive as JSON numbers or
//! numeric strings, timestamps as epoch milliseconds or RFC 3339, and the
//! chart annotations (`aircon`, `reservation`) as number-or-null markers.
//! The helpers at the bottom absorb that looseness in one place.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Canonical envelope
// ---------------------------------------------------------------------------

/// Canonical payload shape:
/// `{ environmentData: [...], currentStatus?: {...}, ... }`.
///
/// The `error` field of the envelope is handled before this type is ever
/// deserialized, so it is not modelled here. `currentStatus` is kept as a
/// raw value: only `environmentData` decides whether the payload parses,
/// and a malformed status is dropped rather than failing the whole body.
#[derive(Debug, Deserialize)]
pub struct FeedEnvelope {
    #[serde(rename = "environmentData")]
    pub environment_data: Vec<WireRecord>,
    #[serde(rename = "currentStatus")]
    pub current_status: Option<Value>,
}

/// One loosely-typed record as it appears on the wire, canonical or bare
/// array alike. Every field is optional; classification decides which ones
/// are honoured on which path.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WireRecord {
    pub time: Option<String>,
    pub timestamp: Option<Value>,
    pub temperature: Option<Value>,
    /// Compatibility alias for `temperature`.
    pub temp: Option<Value>,
    pub humidity: Option<Value>,
    /// Compatibility alias for `humidity`.
    pub hum: Option<Value>,
    pub illuminance: Option<Value>,
    /// Compatibility alias for `illuminance`.
    pub light: Option<Value>,
    /// Compatibility alias for `illuminance`.
    pub lux: Option<Value>,
    pub motion: Option<Value>,
    /// Number-or-null marker: non-null means air conditioning was active.
    pub aircon: Option<Value>,
    /// Number-or-null marker: non-null means the hour was reserved.
    pub reservation: Option<Value>,
    #[serde(rename = "reservationUser")]
    pub reservation_user: Option<String>,
}

/// Loosely-typed `currentStatus` field of the canonical envelope.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WireCurrentStatus {
    pub timestamp: Option<Value>,
    pub temperature: Option<Value>,
    pub humidity: Option<Value>,
    pub illuminance: Option<Value>,
    pub motion: Option<Value>,
}

// ---------------------------------------------------------------------------
// Loose value helpers
// ---------------------------------------------------------------------------

/// Read a numeric wire value that may be a JSON number or a numeric string.
pub fn loose_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Integer variant of [`loose_f64`]; fractional values truncate toward zero.
pub fn loose_i64(value: Option<&Value>) -> Option<i64> {
    loose_f64(value).map(|v| v as i64)
}

/// Read a timestamp given as epoch milliseconds or an RFC 3339 string.
pub fn loose_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        _ => None,
    }
}

/// Whether a number-or-null annotation marker is set. The feed uses plot
/// heights (e.g. `30`) for "on" and `null` for "off"; zero counts as off.
pub fn marker_flag(value: Option<&Value>) -> bool {
    loose_f64(value).is_some_and(|v| v != 0.0)
}
