//! Response classification for the scripted feed.
//!
//! A fetched body lands on exactly one of five paths: the canonical
//! envelope, the bare-array compatibility transform, an explicit remote
//! error, a JSON decode failure, or an unrecognized shape. The controller
//! matches the result exhaustively; the three failure variants all resolve
//! to sample data further up.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use crate::feed::models::{
    loose_f64, loose_i64, loose_timestamp, marker_flag, FeedEnvelope, WireCurrentStatus,
    WireRecord,
};
use crate::models::{CurrentStatus, Reading};

/// Assumed spacing between elements of a bare-array payload that carries no
/// timestamps of its own; the synthesized series ends at "now".
const COMPAT_SPACING: i64 = 5;

const DEFAULT_TEMPERATURE: f64 = 25.0;
const DEFAULT_HUMIDITY: i64 = 50;
const DEFAULT_ILLUMINANCE: i64 = 100;
const DEFAULT_MOTION: i64 = 1;

/// Outcome of classifying one response body.
#[derive(Debug)]
pub enum Classification {
    /// Canonical envelope with an `environmentData` collection; records are
    /// taken verbatim and `currentStatus` is honoured when present.
    Canonical {
        readings: Vec<Reading>,
        current: Option<CurrentStatus>,
    },
    /// Bare array of loosely-typed records, coerced field-by-field. The
    /// current status is derived from the last coerced element.
    Compatibility {
        readings: Vec<Reading>,
        current: Option<CurrentStatus>,
    },
    /// The payload itself reported a failure via its `error` field.
    RemoteError(String),
    /// The body was not valid JSON.
    Malformed(String),
    /// Valid JSON matching none of the recognized shapes.
    UnexpectedShape,
}

/// Classify a response body. `now` anchors synthesized timestamps, so the
/// whole function stays deterministic under test.
pub fn classify(body: &str, now: DateTime<Utc>) -> Classification {
    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => return Classification::Malformed(e.to_string()),
    };

    // An explicit error field wins over any data that may also be present.
    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Classification::RemoteError(message.to_owned());
    }

    if value.get("environmentData").is_some_and(Value::is_array) {
        return match serde_json::from_value::<FeedEnvelope>(value) {
            Ok(envelope) => Classification::Canonical {
                readings: envelope
                    .environment_data
                    .iter()
                    .map(|record| canonical_reading(record, now))
                    .collect(),
                // A malformed currentStatus drops to absent; only the shape
                // of environmentData decides the classification.
                current: envelope
                    .current_status
                    .and_then(|status| serde_json::from_value::<WireCurrentStatus>(status).ok())
                    .map(|status| canonical_current(&status, now)),
            },
            // environmentData was an array, but its elements were not records.
            Err(_) => Classification::UnexpectedShape,
        };
    }

    match value {
        Value::Array(items) => {
            let readings = compatibility_readings(&items, now);
            let current = readings.last().map(|last| CurrentStatus {
                timestamp: last.timestamp,
                temperature: last.temperature,
                humidity: last.humidity,
                illuminance: last.illuminance,
                motion: last.motion,
            });
            Classification::Compatibility { readings, current }
        }
        _ => Classification::UnexpectedShape,
    }
}

// ---------------------------------------------------------------------------
// Canonical path
// ---------------------------------------------------------------------------

fn canonical_reading(record: &WireRecord, now: DateTime<Utc>) -> Reading {
    let timestamp = loose_timestamp(record.timestamp.as_ref()).unwrap_or(now);
    Reading {
        timestamp,
        time: record
            .time
            .clone()
            .unwrap_or_else(|| Reading::time_label(timestamp)),
        temperature: loose_f64(record.temperature.as_ref()).unwrap_or(DEFAULT_TEMPERATURE),
        humidity: loose_i64(record.humidity.as_ref()).unwrap_or(DEFAULT_HUMIDITY),
        illuminance: loose_i64(record.illuminance.as_ref()).unwrap_or(DEFAULT_ILLUMINANCE),
        motion: loose_i64(record.motion.as_ref()).unwrap_or(DEFAULT_MOTION),
        aircon_active: marker_flag(record.aircon.as_ref()),
        reserved: marker_flag(record.reservation.as_ref()),
        reservation_user: record.reservation_user.clone().filter(|s| !s.is_empty()),
    }
}

fn canonical_current(status: &WireCurrentStatus, now: DateTime<Utc>) -> CurrentStatus {
    CurrentStatus {
        timestamp: loose_timestamp(status.timestamp.as_ref()).unwrap_or(now),
        temperature: loose_f64(status.temperature.as_ref()).unwrap_or(DEFAULT_TEMPERATURE),
        humidity: loose_i64(status.humidity.as_ref()).unwrap_or(DEFAULT_HUMIDITY),
        illuminance: loose_i64(status.illuminance.as_ref()).unwrap_or(DEFAULT_ILLUMINANCE),
        motion: loose_i64(status.motion.as_ref()).unwrap_or(DEFAULT_MOTION),
    }
}

// ---------------------------------------------------------------------------
// Compatibility path
// ---------------------------------------------------------------------------

/// Coerce a bare array element-by-element.
///
/// | Field       | Wire keys                     | Default |
/// |-------------|-------------------------------|---------|
/// | temperature | `temperature`, `temp`         | 25.0    |
/// | humidity    | `humidity`, `hum`             | 50      |
/// | illuminance | `illuminance`, `light`, `lux` | 100     |
/// | motion      | `motion`                      | 1       |
///
/// A source timestamp is preserved when the element carries one; otherwise
/// the element is assigned an evenly spaced 5-minute slot ending at `now`.
/// Annotation fields (aircon, reservation) are never honoured on this path.
fn compatibility_readings(items: &[Value], now: DateTime<Utc>) -> Vec<Reading> {
    let len = items.len() as i64;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let slot = now - Duration::minutes((len - 1 - i as i64) * COMPAT_SPACING);
            coerce_reading(item, slot)
        })
        .collect()
}

fn coerce_reading(item: &Value, slot: DateTime<Utc>) -> Reading {
    // Non-object elements coerce to an all-defaults record, the same way the
    // original's property lookups came back undefined on them.
    let record: WireRecord = serde_json::from_value(item.clone()).unwrap_or_default();

    let timestamp = loose_timestamp(record.timestamp.as_ref()).unwrap_or(slot);
    Reading {
        timestamp,
        time: Reading::time_label(timestamp),
        temperature: loose_f64(record.temperature.as_ref())
            .or_else(|| loose_f64(record.temp.as_ref()))
            .unwrap_or(DEFAULT_TEMPERATURE),
        humidity: loose_i64(record.humidity.as_ref())
            .or_else(|| loose_i64(record.hum.as_ref()))
            .unwrap_or(DEFAULT_HUMIDITY),
        illuminance: loose_i64(record.illuminance.as_ref())
            .or_else(|| loose_i64(record.light.as_ref()))
            .or_else(|| loose_i64(record.lux.as_ref()))
            .unwrap_or(DEFAULT_ILLUMINANCE),
        motion: loose_i64(record.motion.as_ref()).unwrap_or(DEFAULT_MOTION),
        aircon_active: false,
        reserved: false,
        reservation_user: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        "2025-07-12T10:30:00Z".parse().unwrap()
    }

    fn canonical_body(n: usize) -> String {
        let readings: Vec<Value> = (0..n)
            .map(|i| {
                json!({
                    "time": format!("07/12 0{i}:00"),
                    "timestamp": 1_752_000_000_000_i64 + i as i64 * 3_600_000,
                    "temperature": 21.0 + i as f64,
                    "humidity": 50 + i,
                    "illuminance": 120,
                    "motion": 1,
                    "aircon": if i == 0 { json!(30) } else { json!(null) },
                    "reservation": if i == 0 { json!(10) } else { json!(null) },
                    "reservationUser": if i == 0 { "Morning squad" } else { "" },
                })
            })
            .collect();
        json!({
            "environmentData": readings,
            "currentStatus": {
                "timestamp": "2025-07-12T10:25:00Z",
                "temperature": 23.4,
                "humidity": 52,
                "illuminance": 180,
                "motion": 0,
            },
        })
        .to_string()
    }

    #[test]
    fn canonical_payload_keeps_every_reading() {
        let got = classify(&canonical_body(3), fixed_now());
        let Classification::Canonical { readings, current } = got else {
            panic!("expected canonical, got {got:?}");
        };

        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].temperature, 21.0);
        assert_eq!(readings[0].time, "07/12 00:00");
        assert!(readings[0].aircon_active);
        assert!(readings[0].reserved);
        assert_eq!(readings[0].reservation_user.as_deref(), Some("Morning squad"));
        assert!(!readings[1].aircon_active);
        assert_eq!(readings[1].reservation_user, None, "empty label must clear");

        let current = current.expect("currentStatus was present");
        assert_eq!(current.temperature, 23.4);
        assert_eq!(current.humidity, 52);
        assert_eq!(current.motion, 0);
    }

    #[test]
    fn canonical_without_current_status_leaves_it_absent() {
        let body = json!({ "environmentData": [{ "temperature": 22.0 }] }).to_string();
        let Classification::Canonical { readings, current } = classify(&body, fixed_now()) else {
            panic!("expected canonical");
        };
        assert_eq!(readings.len(), 1);
        assert!(current.is_none());
    }

    #[test]
    fn malformed_current_status_does_not_fail_the_payload() {
        let body = json!({
            "environmentData": [{ "temperature": 21.0 }, { "temperature": 22.0 }],
            "currentStatus": 5,
        })
        .to_string();
        let Classification::Canonical { readings, current } = classify(&body, fixed_now()) else {
            panic!("expected canonical");
        };
        assert_eq!(readings.len(), 2);
        assert!(current.is_none());
    }

    #[test]
    fn canonical_record_without_timestamp_falls_back_to_now() {
        let now = fixed_now();
        let body = json!({ "environmentData": [{ "temperature": 22.0 }] }).to_string();
        let Classification::Canonical { readings, .. } = classify(&body, now) else {
            panic!("expected canonical");
        };
        assert_eq!(readings[0].timestamp, now);
    }

    #[test]
    fn error_field_wins_over_data() {
        let body = json!({
            "error": "quota exceeded",
            "environmentData": [{ "temperature": 22.0 }],
        })
        .to_string();
        let Classification::RemoteError(message) = classify(&body, fixed_now()) else {
            panic!("expected remote error");
        };
        assert_eq!(message, "quota exceeded");
    }

    #[test]
    fn non_record_environment_data_is_unexpected_shape() {
        let body = json!({ "environmentData": [1, 2, 3] }).to_string();
        assert!(matches!(
            classify(&body, fixed_now()),
            Classification::UnexpectedShape
        ));
    }

    #[test]
    fn bare_array_coerces_aliases_and_defaults() {
        let body = json!([{ "temp": 30, "hum": 80 }]).to_string();
        let Classification::Compatibility { readings, current } = classify(&body, fixed_now())
        else {
            panic!("expected compatibility");
        };

        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].temperature, 30.0);
        assert_eq!(readings[0].humidity, 80);
        assert_eq!(readings[0].illuminance, 100, "default applies");
        assert_eq!(readings[0].motion, 1, "default applies");

        let current = current.expect("derived from the last element");
        assert_eq!(current.temperature, 30.0);
        assert_eq!(current.humidity, 80);
    }

    #[test]
    fn bare_array_synthesizes_five_minute_slots_ending_at_now() {
        let now = fixed_now();
        let body = json!([{ "temp": 1 }, { "temp": 2 }, { "temp": 3 }]).to_string();
        let Classification::Compatibility { readings, .. } = classify(&body, now) else {
            panic!("expected compatibility");
        };

        assert_eq!(readings[2].timestamp, now);
        assert_eq!(readings[1].timestamp, now - Duration::minutes(5));
        assert_eq!(readings[0].timestamp, now - Duration::minutes(10));
    }

    #[test]
    fn bare_array_prefers_a_source_timestamp_when_present() {
        let now = fixed_now();
        let source_ms = 1_752_000_000_000_i64;
        let body = json!([
            { "temp": 1, "timestamp": source_ms },
            { "temp": 2 },
        ])
        .to_string();
        let Classification::Compatibility { readings, .. } = classify(&body, now) else {
            panic!("expected compatibility");
        };

        assert_eq!(readings[0].timestamp.timestamp_millis(), source_ms);
        assert_eq!(readings[1].timestamp, now, "last synthesized slot is now");
    }

    #[test]
    fn bare_array_accepts_numeric_strings() {
        let body = json!([{ "temperature": "26.5", "lux": "210" }]).to_string();
        let Classification::Compatibility { readings, .. } = classify(&body, fixed_now()) else {
            panic!("expected compatibility");
        };
        assert_eq!(readings[0].temperature, 26.5);
        assert_eq!(readings[0].illuminance, 210);
    }

    #[test]
    fn bare_array_invalid_values_fall_back_to_defaults() {
        let body = json!([{ "temperature": "warm", "humidity": true }]).to_string();
        let Classification::Compatibility { readings, .. } = classify(&body, fixed_now()) else {
            panic!("expected compatibility");
        };
        assert_eq!(readings[0].temperature, 25.0);
        assert_eq!(readings[0].humidity, 50);
    }

    #[test]
    fn bare_array_never_honours_annotations() {
        let body = json!([{ "temp": 30, "aircon": 30, "reservation": 10 }]).to_string();
        let Classification::Compatibility { readings, .. } = classify(&body, fixed_now()) else {
            panic!("expected compatibility");
        };
        assert!(!readings[0].aircon_active);
        assert!(!readings[0].reserved);
    }

    #[test]
    fn empty_array_is_a_success_with_no_readings() {
        let Classification::Compatibility { readings, current } = classify("[]", fixed_now())
        else {
            panic!("expected compatibility");
        };
        assert!(readings.is_empty());
        assert!(current.is_none());
    }

    #[test]
    fn non_json_body_is_malformed() {
        let got = classify("<html>service unavailable</html>", fixed_now());
        assert!(matches!(got, Classification::Malformed(_)));
    }

    #[test]
    fn unrecognized_shapes_are_rejected() {
        assert!(matches!(
            classify(r#"{"foo": 1}"#, fixed_now()),
            Classification::UnexpectedShape
        ));
        assert!(matches!(
            classify("42", fixed_now()),
            Classification::UnexpectedShape
        ));
        assert!(matches!(
            classify(r#"{"environmentData": "soon"}"#, fixed_now()),
            Classification::UnexpectedShape
        ));
    }
}
