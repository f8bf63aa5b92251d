//! The tracker: one timer plus the log of completed entries.
//!
//! This is the surface a shell drives. Every user action maps to one method
//! and every refused action leaves both the timer and the log unchanged.

use crate::clock::Clock;
use crate::entries::EntryLog;
use crate::entry::{NewEntry, TimeEntry};
use crate::format::format_clock;
use crate::stats::{TimeStats, aggregate};
use crate::timer::{ActiveSession, TimerClock, TimerError, TimerState};
use crate::types::EntryId;

/// A point-in-time view of the timer for display.
#[derive(Debug, Clone, Copy)]
pub struct Status<'a> {
    pub state: TimerState,
    pub elapsed_seconds: i64,
    pub entry: Option<&'a TimeEntry>,
}

impl Status<'_> {
    pub const fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running)
    }

    /// Elapsed time as `HH:MM:SS`.
    pub fn elapsed_display(&self) -> String {
        format_clock(self.elapsed_seconds)
    }
}

#[derive(Debug)]
pub struct Tracker<C> {
    timer: TimerClock<C>,
    entries: EntryLog,
}

impl<C: Clock> Tracker<C> {
    pub const fn new(clock: C) -> Self {
        Self {
            timer: TimerClock::new(clock),
            entries: EntryLog::new(),
        }
    }

    /// Validates the fields and starts a session.
    pub fn start<I, S>(
        &mut self,
        title: &str,
        description: &str,
        category: &str,
        labels: I,
    ) -> Result<&TimeEntry, TimerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields = NewEntry::new(title, description, category, labels).inspect_err(|e| {
            tracing::debug!(error = %e, "start refused");
        })?;
        self.timer.start(fields)
    }

    pub fn pause(&mut self) -> bool {
        self.timer.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.timer.resume()
    }

    /// Stops the active session and records it at the front of the log.
    pub fn stop(&mut self) -> Option<&TimeEntry> {
        let entry = self.timer.stop()?;
        self.entries.prepend(entry);
        self.entries.latest()
    }

    /// Removes a completed entry. The active session cannot be deleted.
    pub fn delete(&mut self, id: &EntryId) -> Option<TimeEntry> {
        let removed = self.entries.delete(id);
        if removed.is_none() {
            tracing::debug!(entry_id = %id, "delete ignored: no such entry");
        }
        removed
    }

    pub const fn entries(&self) -> &EntryLog {
        &self.entries
    }

    pub const fn timer(&self) -> &TimerClock<C> {
        &self.timer
    }

    pub const fn state(&self) -> TimerState {
        self.timer.state()
    }

    /// Recomputes totals over the completed entries.
    pub fn stats(&self) -> TimeStats {
        aggregate(&self.entries)
    }

    /// The timer as last displayed: elapsed time is the value stored by the
    /// most recent [`refresh`](Self::refresh), pause, or start.
    pub fn status(&self) -> Status<'_> {
        let session = self.timer.session();
        Status {
            state: self.timer.state(),
            elapsed_seconds: session.map_or(0, ActiveSession::elapsed_seconds),
            entry: session.map(ActiveSession::entry),
        }
    }

    /// Updates the displayed elapsed value; called on each tick.
    pub fn refresh(&mut self) -> i64 {
        self.timer.refresh()
    }
}
