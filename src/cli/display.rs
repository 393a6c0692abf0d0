//! Display utilities for the alarm clock CLI.
//!
//! This module provides formatted output for:
//! - The interactive menu and its prompts
//! - Alarm listings
//! - Alarm notifications and snooze results
//! - Error messages

use std::io::{self, Write};

use chrono::NaiveDateTime;

use crate::scheduler::{AlarmHandle, Resolution};
use crate::types::AlarmEntry;

/// ASCII bell, rung when an alarm goes off.
const BELL: &str = "\x07";

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the startup banner.
    pub fn show_banner(out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Alarm CLI Application!!!")
    }

    /// Shows the current time and the menu, then the choice prompt.
    pub fn show_menu(out: &mut impl Write, now: &NaiveDateTime) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "Current time: {}", Self::format_timestamp(now))?;
        writeln!(out, "0. Refresh Time")?;
        writeln!(out, "1. Add alarm")?;
        writeln!(out, "2. Delete alarm")?;
        writeln!(out, "3. List alarms")?;
        writeln!(out, "4. Exit")?;
        Self::prompt(out, "Enter your choice: ")
    }

    /// Writes a prompt without a trailing newline and flushes it.
    pub fn prompt(out: &mut impl Write, text: &str) -> io::Result<()> {
        write!(out, "{}", text)?;
        out.flush()
    }

    /// Writes a single message line.
    pub fn show_message(out: &mut impl Write, text: &str) -> io::Result<()> {
        writeln!(out, "{}", text)
    }

    /// Shows every alarm with its index and status.
    pub fn show_alarms<I>(out: &mut impl Write, entries: I) -> io::Result<()>
    where
        I: IntoIterator<Item = AlarmEntry>,
    {
        let mut any = false;
        for entry in entries {
            any = true;
            writeln!(out)?;
            writeln!(out, " {}", Self::format_entry(&entry))?;
        }
        if !any {
            writeln!(out, "No alarms set.")?;
        }
        Ok(())
    }

    /// Announces a due alarm.
    pub fn show_alarm_triggered(out: &mut impl Write, handle: &AlarmHandle, bell: bool) -> io::Result<()> {
        if bell {
            write!(out, "{}", BELL)?;
        }
        writeln!(out)?;
        writeln!(out, "ALARM! It's {} on {}", handle.time(), handle.day())
    }

    /// Reports how a triggered alarm was resolved.
    pub fn show_resolution(out: &mut impl Write, resolution: &Resolution, snooze_minutes: u32) -> io::Result<()> {
        match resolution {
            Resolution::Snoozed { next, .. } => writeln!(
                out,
                "Alarm snoozed for {} minutes. Next alert at {}",
                snooze_minutes, next
            ),
            Resolution::Dismissed => writeln!(out, "Alarm dismissed."),
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Formats one listing row, e.g. `0. 07:30 on friday is active`.
    pub fn format_entry(entry: &AlarmEntry) -> String {
        format!(
            "{}. {} on {} is {}",
            entry.index,
            entry.time,
            entry.day,
            entry.status()
        )
    }

    /// Formats a date-time as `Mon Oct 19 2026 09:05:42`.
    fn format_timestamp(now: &NaiveDateTime) -> String {
        now.format("%a %b %d %Y %H:%M:%S").to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
