//! Core domain logic for the `TrackerThon` time tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Timing: the start/pause/resume/stop state machine over an injectable clock
//! - Entries: validated time entries and the newest-first entry log
//! - Statistics: totals grouped by category and by label
//! - Ticking: the scoped one-second display refresh

pub mod clock;
pub mod entries;
pub mod entry;
pub mod format;
mod stats;
pub mod tick;
pub mod timer;
pub mod tracker;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entries::EntryLog;
pub use entry::{NewEntry, TimeEntry};
pub use format::{format_clock, format_hours_minutes};
pub use stats::{AggregatableEntry, TimeStats, aggregate};
pub use tick::{TickGuard, TickSlot};
pub use timer::{ActiveSession, TimerClock, TimerError, TimerState};
pub use tracker::{Status, Tracker};
pub use types::{EntryId, Labels, ValidationError};
