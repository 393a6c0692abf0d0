//! One-shot alarm evaluation for the `check` command.

use std::io::Write;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use crate::scheduler::AlarmScheduler;
use crate::types::{AlarmConfig, AlarmEntry, Now};

use super::commands::CheckArgs;
use super::display::Display;

/// Loads the given alarms, evaluates them once at the given moment and
/// returns the alarm that would go off, if any.
pub fn evaluate_once(args: &CheckArgs) -> Option<AlarmEntry> {
    let (event_tx, _event_rx) = mpsc::unbounded_channel();
    let mut scheduler = AlarmScheduler::new(AlarmConfig::default(), event_tx);
    for spec in &args.alarms {
        scheduler.add(spec.time, spec.day);
    }

    let now = Now::new(args.day, args.time);
    scheduler
        .evaluate(&now)
        .and_then(|handle| scheduler.list().nth(handle.index()))
}

/// Runs the check command, writing the result to `out`.
pub fn run_check(args: &CheckArgs, out: &mut impl Write) -> Result<()> {
    let due = evaluate_once(args);
    tracing::debug!(due = ?due, "check evaluated");

    if args.json {
        let json = serde_json::to_string(&due).context("Failed to serialize check result")?;
        writeln!(out, "{}", json)?;
    } else {
        match &due {
            Some(entry) => Display::show_message(out, &format!("Due: {}", Display::format_entry(entry)))?,
            None => Display::show_message(out, "No alarm due.")?,
        }
    }
    Ok(())
}
