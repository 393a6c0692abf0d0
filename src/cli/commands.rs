//! Command definitions for the alarm clock CLI.
//!
//! Uses clap derive macro for argument parsing.

use clap::{Args, Parser, Subcommand};

use crate::types::{AlarmConfig, ParseError, TimeOfDay, Weekday};

// ============================================================================
// CLI Structure
// ============================================================================

/// Alarm clock CLI - weekly alarms with snooze in the terminal
#[derive(Parser, Debug)]
#[command(
    name = "alarm",
    version,
    about = "Terminal alarm clock with weekly alarms and snooze",
    long_about = "Register alarms for a time of day and a weekday from an interactive menu.\n\
                  Due alarms interrupt the menu and can be snoozed up to three times.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the interactive alarm menu
    Run(RunArgs),

    /// Evaluate alarms once at a given moment and exit
    Check(CheckArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// AlarmSpec
// ============================================================================

/// An alarm given on the command line as `HH:MM,day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmSpec {
    /// Trigger time
    pub time: TimeOfDay,
    /// Trigger weekday
    pub day: Weekday,
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Alarm to register at startup, as HH:MM,day (repeatable)
    #[arg(short, long = "alarm", value_name = "HH:MM,DAY", value_parser = parse_alarm_spec)]
    pub alarms: Vec<AlarmSpec>,

    /// Snooze length in minutes (1-60)
    #[arg(
        short,
        long,
        default_value = "5",
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub snooze_minutes: u32,

    /// Maximum snoozes per alarm (0-10)
    #[arg(
        short,
        long,
        default_value = "3",
        value_parser = clap::value_parser!(u32).range(0..=10)
    )]
    pub max_snoozes: u32,

    /// Milliseconds between alarm checks (100-60000)
    #[arg(
        long,
        default_value = "1000",
        value_parser = clap::value_parser!(u64).range(100..=60_000)
    )]
    pub poll_interval_ms: u64,

    /// Do not ring the terminal bell when an alarm goes off
    #[arg(long)]
    pub no_bell: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            alarms: Vec::new(),
            snooze_minutes: 5,
            max_snoozes: 3,
            poll_interval_ms: 1000,
            no_bell: false,
        }
    }
}

impl RunArgs {
    /// Builds the scheduler configuration from the arguments.
    pub fn to_config(&self) -> AlarmConfig {
        AlarmConfig::default()
            .with_snooze_minutes(self.snooze_minutes)
            .with_max_snoozes(self.max_snoozes)
            .with_poll_interval_ms(self.poll_interval_ms)
    }
}

// ============================================================================
// Check Command Arguments
// ============================================================================

/// Arguments for the check command
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Weekday to evaluate at
    #[arg(short, long, value_parser = parse_day)]
    pub day: Weekday,

    /// Time of day to evaluate at (HH:MM)
    #[arg(short, long, value_parser = parse_time)]
    pub time: TimeOfDay,

    /// Alarm to register before evaluating, as HH:MM,day (repeatable)
    #[arg(short, long = "alarm", value_name = "HH:MM,DAY", value_parser = parse_alarm_spec)]
    pub alarms: Vec<AlarmSpec>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses a strict 24-hour `HH:MM` time.
fn parse_time(s: &str) -> Result<TimeOfDay, ParseError> {
    s.parse()
}

/// Parses a full weekday name in any letter case.
fn parse_day(s: &str) -> Result<Weekday, ParseError> {
    s.parse()
}

/// Parses an alarm given as `HH:MM,day`.
///
/// - Time must be strict 24-hour `HH:MM`
/// - Day must be a full weekday name
fn parse_alarm_spec(s: &str) -> Result<AlarmSpec, ParseError> {
    let (time, day) = s
        .split_once(',')
        .ok_or_else(|| ParseError::InvalidAlarmSpec(s.to_string()))?;

    Ok(AlarmSpec {
        time: time.parse()?,
        day: day.parse()?,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    // ------------------------------------------------------------------------
    // Cli Tests
    // ------------------------------------------------------------------------

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["alarm"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
        }

        #[test]
        fn test_parse_verbose_flag() {
            let cli = Cli::parse_from(["alarm", "--verbose"]);
            assert!(cli.verbose);

            let cli = Cli::parse_from(["alarm", "run", "-v"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_completions() {
            let cli = Cli::parse_from(["alarm", "completions", "bash"]);
            assert!(matches!(
                cli.command,
                Some(Commands::Completions {
                    shell: clap_complete::Shell::Bash
                })
            ));
        }

        #[test]
        fn test_parse_unknown_command_fails() {
            assert!(Cli::try_parse_from(["alarm", "snooze"]).is_err());
        }
    }

    // ------------------------------------------------------------------------
    // RunArgs Tests
    // ------------------------------------------------------------------------

    mod run_args_tests {
        use super::*;

        fn parse_run(args: &[&str]) -> RunArgs {
            let mut argv = vec!["alarm", "run"];
            argv.extend_from_slice(args);
            match Cli::parse_from(argv).command {
                Some(Commands::Run(args)) => args,
                other => panic!("Expected Run command, got {:?}", other),
            }
        }

        #[test]
        fn test_defaults_match_default_impl() {
            let args = parse_run(&[]);
            let default = RunArgs::default();
            assert_eq!(args.alarms, default.alarms);
            assert_eq!(args.snooze_minutes, default.snooze_minutes);
            assert_eq!(args.max_snoozes, default.max_snoozes);
            assert_eq!(args.poll_interval_ms, default.poll_interval_ms);
            assert_eq!(args.no_bell, default.no_bell);
            assert_eq!(args.to_config(), AlarmConfig::default());
        }

        #[test]
        fn test_parse_alarms() {
            let args = parse_run(&["--alarm", "07:30,Friday", "-a", "23:59,sunday"]);
            assert_eq!(
                args.alarms,
                vec![
                    AlarmSpec {
                        time: t("07:30"),
                        day: Weekday::Friday
                    },
                    AlarmSpec {
                        time: t("23:59"),
                        day: Weekday::Sunday
                    },
                ]
            );
        }

        #[test]
        fn test_parse_options() {
            let args = parse_run(&[
                "--snooze-minutes",
                "10",
                "--max-snoozes",
                "1",
                "--poll-interval-ms",
                "250",
                "--no-bell",
            ]);
            let config = args.to_config();
            assert_eq!(config.snooze_minutes, 10);
            assert_eq!(config.max_snoozes, 1);
            assert_eq!(config.poll_interval_ms, 250);
            assert!(args.no_bell);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_rejects_out_of_range_options() {
            assert!(Cli::try_parse_from(["alarm", "run", "--snooze-minutes", "0"]).is_err());
            assert!(Cli::try_parse_from(["alarm", "run", "--snooze-minutes", "61"]).is_err());
            assert!(Cli::try_parse_from(["alarm", "run", "--max-snoozes", "11"]).is_err());
            assert!(Cli::try_parse_from(["alarm", "run", "--poll-interval-ms", "50"]).is_err());
        }

        #[test]
        fn test_rejects_invalid_alarm() {
            for bad in ["25:00,monday", "07:30,fri", "07:30", "07:30,", ",monday"] {
                assert!(
                    Cli::try_parse_from(["alarm", "run", "--alarm", bad]).is_err(),
                    "{bad} should be rejected"
                );
            }
        }
    }

    // ------------------------------------------------------------------------
    // CheckArgs Tests
    // ------------------------------------------------------------------------

    mod check_args_tests {
        use super::*;

        #[test]
        fn test_parse_check() {
            let cli = Cli::parse_from([
                "alarm", "check", "--day", "Monday", "--time", "09:05", "--alarm", "09:00,monday",
                "--json",
            ]);
            match cli.command {
                Some(Commands::Check(args)) => {
                    assert_eq!(args.day, Weekday::Monday);
                    assert_eq!(args.time, t("09:05"));
                    assert_eq!(args.alarms.len(), 1);
                    assert!(args.json);
                }
                _ => panic!("Expected Check command"),
            }
        }

        #[test]
        fn test_check_requires_day_and_time() {
            assert!(Cli::try_parse_from(["alarm", "check", "--day", "monday"]).is_err());
            assert!(Cli::try_parse_from(["alarm", "check", "--time", "09:00"]).is_err());
        }

        #[test]
        fn test_check_rejects_invalid_time() {
            assert!(
                Cli::try_parse_from(["alarm", "check", "--day", "monday", "--time", "9:00"]).is_err()
            );
        }
    }

    // ------------------------------------------------------------------------
    // Validation Function Tests
    // ------------------------------------------------------------------------

    mod validation_tests {
        use super::*;

        #[test]
        fn test_parse_alarm_spec_valid() {
            let spec = parse_alarm_spec("07:30,FRIDAY").unwrap();
            assert_eq!(spec.time, t("07:30"));
            assert_eq!(spec.day, Weekday::Friday);
        }

        #[test]
        fn test_parse_alarm_spec_missing_comma() {
            assert_eq!(
                parse_alarm_spec("07:30 friday"),
                Err(ParseError::InvalidAlarmSpec("07:30 friday".to_string()))
            );
        }

        #[test]
        fn test_parse_alarm_spec_reports_bad_part() {
            assert_eq!(
                parse_alarm_spec("24:00,friday"),
                Err(ParseError::InvalidTime("24:00".to_string()))
            );
            assert_eq!(
                parse_alarm_spec("07:30,fri"),
                Err(ParseError::InvalidDay("fri".to_string()))
            );
        }
    }
}
