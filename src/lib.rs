//! Alarm Clock Library
//!
//! This library provides the core functionality for the alarm clock CLI.
//! It includes:
//! - Alarm registry and the per-alarm snooze/dismiss state machine
//! - Scheduler with a reentrancy guard for due-alarm handling
//! - Wall-clock sources (system and manual)
//! - Interactive menu session and CLI command parsing
//! - Type definitions for configuration and alarm state

pub mod cli;
pub mod scheduler;
pub mod types;

// Re-export commonly used types for convenience
pub use scheduler::{
    AlarmEvent, AlarmHandle, AlarmRegistry, AlarmScheduler, Clock, ManualClock, Resolution,
    SnoozeOutcome, SystemClock,
};
pub use types::{Alarm, AlarmConfig, AlarmEntry, Now, ParseError, TimeOfDay, Weekday};
