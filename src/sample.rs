//! Sample-data generation used whenever the live feed is unavailable or
//! malformed, so the dashboard never renders empty.
//!
//! Everything here is pure with respect to the injected wall-clock instant
//! and random generator; no network or stored state is consulted, which is
//! what lets the whole degraded path run fully offline (and in tests).

use chrono::{DateTime, Duration, Local, Timelike, Utc};
use rand::Rng;

use crate::models::{CurrentStatus, Reading, ScheduleDay, ScheduleSlot, SlotStatus};

/// Number of hourly readings in a generated history window.
pub const HISTORY_HOURS: i64 = 72;

/// Daily facility windows during which occupancy is assumed, as inclusive
/// `[start, end]` local-hour bounds.
const RESERVED_WINDOWS: [(f64, f64); 3] = [(9.0, 11.0), (14.0, 16.0), (18.0, 20.0)];

const SAMPLE_RESERVATION: &str = "Sample booking";

/// Whether a fractional local hour (`hours + minutes / 60`) falls inside a
/// reserved facility window. Bounds are inclusive on both ends, so 11:00:00
/// still counts as reserved while 11:01 does not.
pub fn reserved_window(hour: f64) -> bool {
    RESERVED_WINDOWS
        .iter()
        .any(|&(start, end)| hour >= start && hour <= end)
}

fn local_hour(timestamp: DateTime<Utc>) -> f64 {
    let local = timestamp.with_timezone(&Local);
    local.hour() as f64 + local.minute() as f64 / 60.0
}

/// Generate [`HISTORY_HOURS`] hourly readings ending exactly at `now`.
///
/// Reserved windows run warmer and more humid than idle hours; the
/// air-conditioning flag is derived from the *stored* (rounded) values so
/// that `aircon_active == reserved && (temperature > 25 || humidity > 65)`
/// holds exactly on the emitted data.
pub fn readings(now: DateTime<Utc>, rng: &mut impl Rng) -> Vec<Reading> {
    let mut data = Vec::with_capacity(HISTORY_HOURS as usize);

    for i in (0..HISTORY_HOURS).rev() {
        let timestamp = now - Duration::hours(i);
        let reserved = reserved_window(local_hour(timestamp));

        let raw_temp = if reserved {
            rng.gen_range(24.0..28.0)
        } else {
            rng.gen_range(20.0..23.0)
        };
        let raw_humidity: f64 = if reserved {
            rng.gen_range(55.0..70.0)
        } else {
            rng.gen_range(45.0..55.0)
        };

        let temperature = (raw_temp * 10.0_f64).round() / 10.0;
        let humidity = raw_humidity.round() as i64;
        let aircon_active = reserved && (temperature > 25.0 || humidity > 65);

        data.push(Reading {
            timestamp,
            time: Reading::time_label(timestamp),
            temperature,
            humidity,
            illuminance: rng.gen_range(50..250),
            motion: 1,
            aircon_active,
            reserved,
            reservation_user: reserved.then(|| SAMPLE_RESERVATION.to_owned()),
        });
    }

    data
}

/// Fixed current-status card values used while degraded. Deliberately not
/// randomized so the cards show a stable default.
pub fn current_status(now: DateTime<Utc>) -> CurrentStatus {
    CurrentStatus {
        timestamp: now,
        temperature: 25.5,
        humidity: 60,
        illuminance: 150,
        motion: 1,
    }
}

/// Three days of schedule starting at `today`, each with the same three
/// slots. The evening slot is marked active on day 0 only.
pub fn schedule(today: DateTime<Utc>) -> Vec<ScheduleDay> {
    (0..3)
        .map(|day| {
            let date = (today + Duration::days(day)).with_timezone(&Local);
            ScheduleDay {
                date: date.format("%m/%d").to_string(),
                day_of_week: date.format("%a").to_string(),
                slots: vec![
                    ScheduleSlot {
                        time: "09:00-11:00".to_owned(),
                        user: "Personal training".to_owned(),
                        status: SlotStatus::Confirmed,
                    },
                    ScheduleSlot {
                        time: "14:00-16:00".to_owned(),
                        user: "Group class".to_owned(),
                        status: SlotStatus::Confirmed,
                    },
                    ScheduleSlot {
                        time: "18:00-20:00".to_owned(),
                        user: "Evening booking".to_owned(),
                        status: if day == 0 { SlotStatus::Active } else { SlotStatus::Confirmed },
                    },
                ],
            }
        })
        .collect()
}
