//! The interactive shell.
//!
//! A single-threaded event loop that waits on two sources: the next input
//! line and, while the timer is running, the display tick. Every command
//! runs to completion before the next event is taken, and the tick is
//! re-synced with the timer state after each one.

use std::io::Write;
use std::string::FromUtf8Error;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use thon_core::{Clock, EntryId, TickSlot, TimerState, Tracker, format_clock};

use crate::Config;
use crate::input::{ShellCommand, parse_line};
use crate::render;

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Runs the shell until `quit` or end of input.
pub async fn run<C, R, W>(
    tracker: &mut Tracker<C>,
    config: &Config,
    input: R,
    out: &mut W,
) -> Result<()>
where
    C: Clock,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut input = input;
    let mut buf = Vec::new();
    let mut ticks = TickSlot::new(config.tick_interval());

    writeln!(out, "thon: type `help` for commands")?;
    out.flush()?;

    loop {
        tokio::select! {
            read = input.read_until(b'\n', &mut buf) => {
                if read.context("failed to read input")? == 0 {
                    tracing::debug!("end of input");
                    break;
                }
                let line = match take_line(&mut buf) {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::warn!(error = %e, "input line ignored");
                        writeln!(out, "Ignored a line that is not valid UTF-8.")?;
                        out.flush()?;
                        continue;
                    }
                };
                let flow = execute(tracker, config, &line, out)?;
                ticks.sync(tracker.state());
                out.flush()?;
                if flow == Flow::Quit {
                    break;
                }
            }
            _ = ticks.tick() => {
                let elapsed = tracker.refresh();
                if config.echo_ticks {
                    writeln!(out, "{}", format_clock(elapsed))?;
                    out.flush()?;
                }
            }
        }
    }

    ticks.release();
    if let Some(entry) = tracker.status().entry {
        writeln!(out, "Discarding active session \"{}\".", entry.title())?;
        out.flush()?;
    }
    Ok(())
}

/// Takes the buffered line out of `buf` without its line ending.
fn take_line(buf: &mut Vec<u8>) -> Result<String, FromUtf8Error> {
    let mut bytes = std::mem::take(buf);
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
    }
    String::from_utf8(bytes)
}

/// Parses and applies one input line, writing the response to `out`.
pub fn execute<C: Clock, W: Write>(
    tracker: &mut Tracker<C>,
    config: &Config,
    line: &str,
    out: &mut W,
) -> Result<Flow> {
    let command = match parse_line(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Ok(Flow::Continue),
        Err(e) => {
            write!(out, "{e}")?;
            if !e.to_string().ends_with('\n') {
                writeln!(out)?;
            }
            return Ok(Flow::Continue);
        }
    };
    tracing::debug!(?command, "shell command");

    match command {
        ShellCommand::Start {
            title,
            category,
            description,
            labels,
        } => {
            let category = category
                .or_else(|| config.default_category.clone())
                .unwrap_or_default();
            match tracker.start(&title, &description, &category, &labels) {
                Ok(entry) => writeln!(
                    out,
                    "Started \"{}\" in {}.",
                    entry.title(),
                    entry.category()
                )?,
                Err(e) => writeln!(out, "Not started: {e}.")?,
            }
        }
        ShellCommand::Pause => {
            if tracker.pause() {
                writeln!(out, "Paused at {}.", tracker.status().elapsed_display())?;
            } else {
                writeln!(out, "Nothing is running.")?;
            }
        }
        ShellCommand::Resume => {
            if tracker.resume() {
                writeln!(out, "Resumed at {}.", tracker.status().elapsed_display())?;
            } else if tracker.state() == TimerState::Running {
                writeln!(out, "Already running.")?;
            } else {
                writeln!(out, "Nothing is paused.")?;
            }
        }
        ShellCommand::Stop => match tracker.stop() {
            Some(entry) => writeln!(
                out,
                "Stopped \"{}\" after {}.",
                entry.title(),
                format_clock(entry.active_seconds().unwrap_or(0))
            )?,
            None => writeln!(out, "Nothing to stop.")?,
        },
        ShellCommand::Delete { id } => {
            let removed = EntryId::new(id.as_str())
                .ok()
                .and_then(|id| tracker.delete(&id));
            match removed {
                Some(entry) => writeln!(out, "Deleted \"{}\".", entry.title())?,
                None => writeln!(out, "No entry with id {id}.")?,
            }
        }
        ShellCommand::List { json } => {
            if json {
                writeln!(out, "{}", render::format_entries_json(tracker.entries())?)?;
            } else {
                write!(out, "{}", render::format_entries(tracker.entries()))?;
            }
        }
        ShellCommand::Stats { json } => {
            let stats = tracker.stats();
            if json {
                writeln!(out, "{}", render::format_stats_json(&stats)?)?;
            } else {
                write!(out, "{}", render::format_stats(&stats))?;
            }
        }
        ShellCommand::Status => {
            tracker.refresh();
            write!(out, "{}", render::format_status(&tracker.status()))?;
        }
        ShellCommand::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}
