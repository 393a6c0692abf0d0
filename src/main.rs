//! Alarm Clock CLI - weekly alarms in the terminal
//!
//! Register alarms for a time of day and a weekday. While the menu is
//! open, alarms are checked every second; a due alarm interrupts the menu
//! and can be snoozed for five minutes, up to three times.

use std::io;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::sync::mpsc;

use alarm_clock::cli::{run_check, spawn_stdin_reader, Cli, Commands, Display, RunArgs, Session};
use alarm_clock::scheduler::{log_events, AlarmScheduler, SystemClock};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug output.
/// Logs go to stderr so they never mix with the menu on stdout.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => run_session(args).await,
        Some(Commands::Check(args)) => run_check(&args, &mut io::stdout().lock()),
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
            Ok(())
        }
        None => run_session(RunArgs::default()).await,
    }
}

/// Runs the interactive menu until exit, end of input or Ctrl-C.
async fn run_session(args: RunArgs) -> Result<()> {
    let config = args.to_config();
    config.validate().map_err(anyhow::Error::msg)?;

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let mut scheduler = AlarmScheduler::new(config, event_tx);
    for spec in &args.alarms {
        scheduler.add(spec.time, spec.day);
    }
    tokio::spawn(log_events(event_rx));

    let input = spawn_stdin_reader()?;
    let mut session = Session::new(scheduler, SystemClock, io::stdout()).with_bell(!args.no_bell);

    tokio::select! {
        result = session.run(input) => result,
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            tracing::info!("interrupted");
            println!();
            Ok(())
        }
    }
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
