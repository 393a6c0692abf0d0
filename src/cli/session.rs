//! Interactive menu session.
//!
//! The session is an explicit prompt state machine driven by two kinds of
//! input: lines typed by the user and ticks from the polling timer. Only
//! one prompt is outstanding at a time. When an alarm goes off, whatever
//! prompt was open is abandoned and replaced by the snooze question; the
//! scheduler's guard keeps further ticks from interrupting that question.

use std::io::Write;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::scheduler::{AlarmHandle, AlarmScheduler, Clock};
use crate::types::{ParseError, TimeOfDay, Weekday};

use super::display::Display;

const INVALID_ALARM_MESSAGE: &str =
    "Invalid format. Please enter correct time in HH:MM format and valid day of the week";

// ============================================================================
// Flow / Prompt
// ============================================================================

/// Whether the session keeps going after handling an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Wait for the next input or tick
    Continue,
    /// Leave the session
    Exit,
}

/// The question the session is currently waiting on.
#[derive(Debug)]
enum Prompt {
    /// Main menu choice
    Menu,
    /// Time of a new alarm
    AddTime,
    /// Day of a new alarm, after its time was entered
    AddDay { time: String },
    /// Index of the alarm to delete
    DeleteIndex,
    /// Snooze answer for a triggered alarm
    Snooze(AlarmHandle),
}

impl Prompt {
    fn name(&self) -> &'static str {
        match self {
            Prompt::Menu => "menu",
            Prompt::AddTime => "add_time",
            Prompt::AddDay { .. } => "add_day",
            Prompt::DeleteIndex => "delete_index",
            Prompt::Snooze(_) => "snooze",
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// Interactive alarm menu bound to a clock and an output stream.
pub struct Session<C, W> {
    /// Alarm state and reentrancy guard
    scheduler: AlarmScheduler,
    /// Wall-clock source
    clock: C,
    /// Where prompts and messages are written
    out: W,
    /// Current prompt
    prompt: Prompt,
    /// Whether to ring the terminal bell on alarms
    bell: bool,
}

impl<C: Clock, W: Write> Session<C, W> {
    /// Creates a session waiting at the main menu.
    pub fn new(scheduler: AlarmScheduler, clock: C, out: W) -> Self {
        Self {
            scheduler,
            clock,
            out,
            prompt: Prompt::Menu,
            bell: true,
        }
    }

    /// Enables or disables the terminal bell.
    pub fn with_bell(mut self, bell: bool) -> Self {
        self.bell = bell;
        self
    }

    /// Runs the session until the user exits or input ends.
    ///
    /// Lines from `input` and ticks of the polling interval are handled one
    /// at a time. The first tick fires one interval after start.
    pub async fn run(&mut self, mut input: mpsc::UnboundedReceiver<String>) -> Result<()> {
        self.start()?;

        let period = self.scheduler.config().poll_interval();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                line = input.recv() => {
                    let Some(line) = line else {
                        tracing::info!("input closed, leaving session");
                        break;
                    };
                    if self.handle_line(&line)? == Flow::Exit {
                        tracing::info!("exit requested");
                        break;
                    }
                }
                _ = ticker.tick() => self.on_tick()?,
            }
        }

        self.out.flush().context("Failed to flush output")
    }

    /// Shows the banner and the main menu.
    pub fn start(&mut self) -> Result<()> {
        Display::show_banner(&mut self.out)?;
        self.show_menu()
    }

    /// Handles one line typed by the user.
    pub fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let prompt = std::mem::replace(&mut self.prompt, Prompt::Menu);
        tracing::debug!(prompt = prompt.name(), "input received");

        match prompt {
            Prompt::Menu => return self.handle_choice(line),
            Prompt::AddTime => {
                self.prompt = Prompt::AddDay {
                    time: line.to_string(),
                };
                Display::prompt(&mut self.out, "Enter day of the week: ")?;
                return Ok(Flow::Continue);
            }
            Prompt::AddDay { time } => self.add_alarm(&time, line)?,
            Prompt::DeleteIndex => self.delete_alarm(line)?,
            Prompt::Snooze(handle) => self.answer_snooze(handle, line)?,
        }

        self.show_menu()?;
        Ok(Flow::Continue)
    }

    /// Evaluates alarms once.
    ///
    /// A due alarm abandons the open prompt and asks whether to snooze.
    /// Does nothing while a snooze question is already open.
    pub fn on_tick(&mut self) -> Result<()> {
        let now = self.clock.moment();
        let Some(handle) = self.scheduler.evaluate(&now) else {
            return Ok(());
        };

        if !matches!(self.prompt, Prompt::Menu) {
            tracing::debug!(prompt = self.prompt.name(), "prompt abandoned by alarm");
        }

        Display::show_alarm_triggered(&mut self.out, &handle, self.bell)?;
        Display::prompt(&mut self.out, "Snooze? (y/n): ")?;
        self.prompt = Prompt::Snooze(handle);
        Ok(())
    }

    /// Returns true while the snooze question is open.
    pub fn is_awaiting_snooze(&self) -> bool {
        matches!(self.prompt, Prompt::Snooze(_))
    }

    /// Returns the scheduler.
    pub fn scheduler(&self) -> &AlarmScheduler {
        &self.scheduler
    }

    /// Returns the scheduler for direct registry operations.
    pub fn scheduler_mut(&mut self) -> &mut AlarmScheduler {
        &mut self.scheduler
    }

    /// Returns the output stream.
    pub fn output(&self) -> &W {
        &self.out
    }

    fn handle_choice(&mut self, choice: &str) -> Result<Flow> {
        match choice.trim() {
            "0" => self.show_menu()?,
            "1" => {
                self.prompt = Prompt::AddTime;
                Display::prompt(
                    &mut self.out,
                    "Please Enter the alarm time in 24h Format (HH:MM): ",
                )?;
            }
            "2" => {
                self.prompt = Prompt::DeleteIndex;
                Display::prompt(&mut self.out, "Enter alarm index to delete: ")?;
            }
            "3" => {
                Display::show_alarms(&mut self.out, self.scheduler.list())?;
                self.show_menu()?;
            }
            "4" => return Ok(Flow::Exit),
            _ => {
                Display::show_message(&mut self.out, "Invalid choice. Please try again.")?;
                self.show_menu()?;
            }
        }
        Ok(Flow::Continue)
    }

    fn add_alarm(&mut self, time: &str, day: &str) -> Result<()> {
        match (time.parse::<TimeOfDay>(), day.parse::<Weekday>()) {
            (Ok(time), Ok(day)) => {
                self.scheduler.add(time, day);
                Display::show_message(&mut self.out, "Alarm added successfully.")?;
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::debug!("rejected alarm: {}", e);
                Display::show_message(&mut self.out, INVALID_ALARM_MESSAGE)?;
            }
        }
        Ok(())
    }

    fn delete_alarm(&mut self, input: &str) -> Result<()> {
        let deleted = match parse_index(input) {
            Ok(index) => self.scheduler.delete(index),
            Err(e) => {
                tracing::debug!("rejected index: {}", e);
                false
            }
        };

        if deleted {
            writeln!(self.out)?;
            Display::show_message(&mut self.out, "Alarm deleted successfully.")?;
        } else {
            Display::show_message(&mut self.out, "Invalid alarm index.")?;
        }
        Ok(())
    }

    fn answer_snooze(&mut self, handle: AlarmHandle, answer: &str) -> Result<()> {
        let wants_snooze = answer.trim().eq_ignore_ascii_case("y");
        // Snooze is measured from the moment of the answer
        let now = self.clock.moment().time;
        let resolution = self.scheduler.respond(handle, wants_snooze, now);

        let snooze_minutes = self.scheduler.config().snooze_minutes;
        Display::show_resolution(&mut self.out, &resolution, snooze_minutes)?;
        Ok(())
    }

    fn show_menu(&mut self) -> Result<()> {
        let now = self.clock.now();
        Display::show_menu(&mut self.out, &now)?;
        Ok(())
    }
}

/// Parses an alarm index typed at the delete prompt.
fn parse_index(input: &str) -> Result<usize, ParseError> {
    input
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidIndex(input.to_string()))
}

// ============================================================================
// Tests
// ============================================================================
