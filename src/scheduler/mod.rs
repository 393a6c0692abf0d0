//! Scheduler module for the alarm clock.
//!
//! This module contains the alarm core:
//! - `registry`: ordered alarm storage and due-alarm lookup
//! - `engine`: scheduler state with the reentrancy guard and snooze/dismiss handling
//! - `clock`: wall-clock sources

pub mod clock;
pub mod engine;
pub mod registry;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{log_events, AlarmEvent, AlarmHandle, AlarmScheduler, Resolution, SnoozeOutcome};
pub use registry::AlarmRegistry;
