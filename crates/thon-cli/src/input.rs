//! Parsing of shell input lines.
//!
//! Lines are split into words first. Double or single quotes group words,
//! and a backslash escapes the next character except inside single quotes,
//! where text is taken literally. The words are then parsed with clap, so
//! each shell command gets the same flag handling and help output as the
//! top-level binary.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

/// One line of shell input.
#[derive(Debug, Parser)]
#[command(
    name = "thon",
    no_binary_name = true,
    disable_version_flag = true,
    help_template = "{all-args}"
)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

/// Commands accepted by the interactive shell.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ShellCommand {
    /// Start tracking a new entry.
    Start {
        /// What you are working on.
        title: String,

        /// Category for the entry.
        #[arg(short, long)]
        category: Option<String>,

        /// Longer description.
        #[arg(short, long, default_value = "")]
        description: String,

        /// Label to attach; repeat or comma-separate for several.
        #[arg(short = 'l', long = "label", value_delimiter = ',')]
        labels: Vec<String>,
    },

    /// Pause the running timer.
    Pause,

    /// Resume a paused timer.
    Resume,

    /// Stop the timer and record the entry.
    Stop,

    /// Delete a recorded entry.
    Delete {
        /// Entry ID, as shown by `list`.
        id: String,
    },

    /// List recorded entries, newest first.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show totals by category and label.
    Stats {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the current timer.
    Status,

    /// Leave the shell.
    #[command(visible_alias = "exit")]
    Quit,
}

/// Parses a line into a command. Blank lines yield `None`.
///
/// Parse failures, including `help`, come back as errors whose message is
/// ready to show to the user.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>> {
    let words = split_words(line)?;
    if words.is_empty() {
        return Ok(None);
    }
    let parsed = ShellLine::try_parse_from(words)?;
    Ok(Some(parsed.command))
}

/// Splits a line into words, honouring quotes and backslash escapes.
pub fn split_words(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('\''), '\'') => quote = None,
            (Some('\''), c) => current.push(c),
            (_, '\\') => {
                let Some(escaped) = chars.next() else {
                    bail!("trailing backslash");
                };
                current.push(escaped);
                in_word = true;
            }
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        bail!("unterminated {q} quote");
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
