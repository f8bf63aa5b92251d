//! `TrackerThon` CLI library.
//!
//! Argument parsing, configuration, and the interactive shell that drives
//! the tracker from stdin.

mod cli;
mod config;
pub mod input;
pub mod render;
pub mod shell;

pub use cli::{Cli, Commands};
pub use config::Config;
