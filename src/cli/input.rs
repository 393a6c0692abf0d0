//! Line input for the interactive session.
//!
//! Standard input is read by a dedicated blocking thread that forwards
//! each line over a channel. The session never blocks on the terminal, so
//! the polling ticker keeps running while a prompt waits for an answer.

use std::io::{self, BufRead};
use std::thread;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

/// Spawns the stdin reader thread and returns the receiving end.
///
/// The channel closes when stdin reaches end of input or fails, or when
/// the receiver is dropped.
pub fn spawn_stdin_reader() -> Result<mpsc::UnboundedReceiver<String>> {
    let (tx, rx) = mpsc::unbounded_channel();

    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || forward_lines(io::stdin().lock(), &tx))
        .context("Failed to spawn stdin reader thread")?;

    Ok(rx)
}

/// Forwards lines from `reader` until end of input, a read error, or a
/// closed channel.
fn forward_lines<R: BufRead>(reader: R, tx: &mpsc::UnboundedSender<String>) {
    for line in reader.lines() {
        match line {
            Ok(line) => {
                if tx.send(line).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!("Failed to read input: {}", e);
                break;
            }
        }
    }
    tracing::debug!("stdin reader finished");
}
