//! CLI module for the alarm clock.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `session`: Interactive menu and polling loop
//! - `input`: Blocking stdin reader feeding the session
//! - `check`: One-shot evaluation for scripting
//! - `display`: Output formatting and display logic

pub mod check;
pub mod commands;
pub mod display;
pub mod input;
pub mod session;

pub use check::{evaluate_once, run_check};
pub use commands::{AlarmSpec, CheckArgs, Cli, Commands, RunArgs};
pub use display::Display;
pub use input::spawn_stdin_reader;
pub use session::{Flow, Session};
