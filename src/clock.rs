// src/clock.rs

//! Wall-clock date arithmetic.
//!
//! Everything here operates on `chrono`'s naive (zone-less) types: the
//! process plans against the local wall clock and nothing else. Weekday
//! indices follow the stored-task convention of 0 = Sunday .. 6 = Saturday.

use std::fmt::Debug;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Granularity relocation targets are quantized to, in minutes.
pub const SNAP_MINUTES: u32 = 5;

/// Source of "now" for the scheduler.
///
/// Production code uses [`WallClock`]; tests can substitute a clock slaved to
/// a simulated timeline so armed timers and planning stay consistent.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> NaiveDateTime;
}

/// Implementation that reads the local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl Clock for WallClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Weekday index of a date, 0 = Sunday .. 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Midnight at the start of the given instant's calendar date.
pub fn day_start(dt: NaiveDateTime) -> NaiveDateTime {
    dt.date().and_time(NaiveTime::MIN)
}

pub fn add_minutes(dt: NaiveDateTime, minutes: i64) -> NaiveDateTime {
    dt + Duration::minutes(minutes)
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// Minutes elapsed since midnight of the instant's own date.
pub fn minutes_from_midnight(dt: NaiveDateTime) -> u32 {
    dt.time().hour() * 60 + dt.time().minute()
}

/// Quantize an instant to the [`SNAP_MINUTES`] grid, dropping seconds.
///
/// Rounds to the nearest grid line; an instant close enough to midnight
/// rolls over into the next day (23:58 snaps to 00:00 the following date).
pub fn snap_to_grid(dt: NaiveDateTime) -> NaiveDateTime {
    let minutes = minutes_from_midnight(dt);
    let snapped = (minutes + SNAP_MINUTES / 2) / SNAP_MINUTES * SNAP_MINUTES;
    day_start(dt) + Duration::minutes(i64::from(snapped))
}

/// `HH:MM` rendering for notification bodies and status output.
pub fn format_clock(dt: NaiveDateTime) -> String {
    dt.format("%H:%M").to_string()
}
