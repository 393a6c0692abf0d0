//! Core data types for the alarm clock.
//!
//! This module defines the data structures used for:
//! - Wall-clock values (`TimeOfDay`, `Weekday`, `Now`)
//! - The per-alarm state machine (`Alarm`)
//! - Scheduler configuration with validation
//! - Observational list entries

mod error;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

pub use error::ParseError;

/// Minutes in one day.
const MINUTES_PER_DAY: u32 = 24 * 60;

// ============================================================================
// TimeOfDay
// ============================================================================

/// A wall-clock time of day with minute precision.
///
/// Always renders as zero-padded 24-hour `HH:MM`. The derived ordering
/// (hour, then minute) matches the lexical ordering of that rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Creates a time of day, or `None` if hour > 23 or minute > 59.
    #[must_use]
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Truncates a chrono time to the minute.
    pub fn from_timelike<T: Timelike>(t: &T) -> Self {
        // chrono guarantees hour < 24 and minute < 60
        Self {
            hour: t.hour() as u8,
            minute: t.minute() as u8,
        }
    }

    /// Returns this time shifted forward by `minutes`, wrapping at midnight.
    #[must_use]
    pub fn add_minutes(self, minutes: u32) -> Self {
        let total = (self.minutes_since_midnight() + minutes % MINUTES_PER_DAY) % MINUTES_PER_DAY;
        Self {
            hour: (total / 60) as u8,
            minute: (total % 60) as u8,
        }
    }

    fn minutes_since_midnight(&self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseError;

    /// Parses a strict `HH:MM` value: exactly two digits, a colon, two digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidTime(s.to_string());

        let bytes = s.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(invalid());
        }
        let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }
        let hour = (digits[0] - b'0') * 10 + (digits[1] - b'0');
        let minute = (digits[2] - b'0') * 10 + (digits[3] - b'0');

        Self::new(hour, minute).ok_or_else(invalid)
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ============================================================================
// Weekday
// ============================================================================

/// Day of the week an alarm fires on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// All weekdays, starting on Sunday.
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Returns the lowercase English name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Sunday => "sunday",
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Sun => Weekday::Sunday,
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = ParseError;

    /// Accepts full English names in any letter case; abbreviations are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::InvalidDay(s.to_string()))
    }
}

// ============================================================================
// Now
// ============================================================================

/// The current moment as seen by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Now {
    /// Current weekday
    pub day: Weekday,
    /// Current time of day
    pub time: TimeOfDay,
}

impl Now {
    /// Creates a moment from its parts.
    pub fn new(day: Weekday, time: TimeOfDay) -> Self {
        Self { day, time }
    }

    /// Derives the weekday and time of day from a local date-time.
    pub fn from_datetime(dt: &NaiveDateTime) -> Self {
        Self {
            day: dt.weekday().into(),
            time: TimeOfDay::from_timelike(dt),
        }
    }
}

// ============================================================================
// AlarmConfig
// ============================================================================

/// Configuration for alarm evaluation and snoozing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmConfig {
    /// Minutes a snooze postpones the alarm by (1-60)
    pub snooze_minutes: u32,
    /// Maximum successful snoozes per alarm (0-10)
    pub max_snoozes: u32,
    /// Milliseconds between due-alarm evaluations (100-60000)
    pub poll_interval_ms: u64,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            snooze_minutes: 5,
            max_snoozes: 3,
            poll_interval_ms: 1000,
        }
    }
}

impl AlarmConfig {
    /// Sets the snooze length.
    pub fn with_snooze_minutes(mut self, minutes: u32) -> Self {
        self.snooze_minutes = minutes;
        self
    }

    /// Sets the snooze limit.
    pub fn with_max_snoozes(mut self, max: u32) -> Self {
        self.max_snoozes = max;
        self
    }

    /// Sets the polling interval.
    pub fn with_poll_interval_ms(mut self, millis: u64) -> Self {
        self.poll_interval_ms = millis;
        self
    }

    /// Returns the polling interval as a `Duration`.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.snooze_minutes < 1 || self.snooze_minutes > 60 {
            return Err("snooze length must be between 1 and 60 minutes".to_string());
        }
        if self.max_snoozes > 10 {
            return Err("snooze limit must be between 0 and 10".to_string());
        }
        if self.poll_interval_ms < 100 || self.poll_interval_ms > 60_000 {
            return Err("poll interval must be between 100 and 60000 milliseconds".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Alarm
// ============================================================================

/// A weekly alarm and its snooze state.
///
/// Two states: active (initial) and dismissed (terminal). Snoozing is a
/// self-transition on the active state that moves `time` forward and
/// bumps `snooze_count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alarm {
    time: TimeOfDay,
    day: Weekday,
    active: bool,
    snooze_count: u32,
}

impl Alarm {
    /// Creates an active alarm that has never been snoozed.
    pub fn new(time: TimeOfDay, day: Weekday) -> Self {
        Self {
            time,
            day,
            active: true,
            snooze_count: 0,
        }
    }

    /// Returns the next trigger time.
    pub fn time(&self) -> TimeOfDay {
        self.time
    }

    /// Returns the weekday the alarm fires on.
    pub fn day(&self) -> Weekday {
        self.day
    }

    /// Returns true until the alarm is dismissed.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns how many times the alarm has been snoozed.
    pub fn snooze_count(&self) -> u32 {
        self.snooze_count
    }

    /// Returns true if the alarm should fire at `now`.
    pub fn is_due(&self, now: &Now) -> bool {
        self.active && self.day == now.day && self.time <= now.time
    }

    /// Returns true if another snooze is allowed under `config`.
    pub fn can_snooze(&self, config: &AlarmConfig) -> bool {
        self.active && self.snooze_count < config.max_snoozes
    }

    /// Postpones the alarm to `now + snooze_minutes`.
    ///
    /// The new time is anchored to `now`, not to the previous trigger time.
    /// Returns false and leaves the alarm untouched once the snooze limit
    /// is reached or the alarm has been dismissed.
    pub fn snooze(&mut self, now: TimeOfDay, config: &AlarmConfig) -> bool {
        if !self.can_snooze(config) {
            return false;
        }
        self.snooze_count += 1;
        self.time = now.add_minutes(config.snooze_minutes);
        true
    }

    /// Deactivates the alarm permanently.
    pub fn dismiss(&mut self) {
        self.active = false;
    }
}

// ============================================================================
// AlarmEntry
// ============================================================================

/// One row of the alarm listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmEntry {
    /// Current position in the registry
    pub index: usize,
    /// Trigger time
    pub time: TimeOfDay,
    /// Trigger weekday
    pub day: Weekday,
    /// Whether the alarm can still fire
    pub active: bool,
}

impl AlarmEntry {
    /// Creates a listing row for the alarm at `index`.
    pub fn from_alarm(index: usize, alarm: &Alarm) -> Self {
        Self {
            index,
            time: alarm.time(),
            day: alarm.day(),
            active: alarm.is_active(),
        }
    }

    /// Returns "active" or "inactive".
    pub fn status(&self) -> &'static str {
        if self.active {
            "active"
        } else {
            "inactive"
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
