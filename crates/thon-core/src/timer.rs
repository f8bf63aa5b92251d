//! The session timer.
//!
//! # State machine
//!
//! ```text
//!   Idle ──start──▶ Running ──pause──▶ Paused
//!    ▲                │  ▲               │
//!    │                │  └────resume─────┘
//!    └─────stop───────┴───────stop───────┘
//! ```
//!
//! While running, elapsed time is `floor(now - run_start) + accumulated`,
//! where `run_start` is captured each time the session enters Running (on
//! start or resume) and `accumulated` banks the seconds of earlier runs.
//! The computation is a pure function of the clock reading, so calling it
//! repeatedly with the same `now` gives the same answer.
//!
//! Clock drift and backward jumps are not compensated: a clock that moves
//! backwards yields a smaller, possibly negative, elapsed value.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::clock::Clock;
use crate::entry::{NewEntry, TimeEntry};
use crate::types::{EntryId, ValidationError};

/// Errors from starting a session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// The entry fields were rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Another session is still running or paused.
    #[error("session {0} is still active; stop it first")]
    SessionActive(EntryId),
}

/// Externally visible timer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

impl TimerState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
        }
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Running { since: DateTime<Utc> },
    Paused { at: DateTime<Utc> },
}

/// The active (non-terminal) entry and its elapsed-time bookkeeping.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    entry: TimeEntry,
    /// Value last shown to the user; set on start, pause, and each refresh.
    elapsed_seconds: i64,
    /// Seconds banked from runs that ended in a pause.
    accumulated_seconds: i64,
    phase: Phase,
}

impl ActiveSession {
    pub const fn entry(&self) -> &TimeEntry {
        &self.entry
    }

    pub const fn elapsed_seconds(&self) -> i64 {
        self.elapsed_seconds
    }

    pub const fn accumulated_seconds(&self) -> i64 {
        self.accumulated_seconds
    }

    /// When the session was paused; `None` while running.
    pub const fn last_pause_at(&self) -> Option<DateTime<Utc>> {
        match self.phase {
            Phase::Paused { at } => Some(at),
            Phase::Running { .. } => None,
        }
    }

    pub const fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    fn elapsed_at(&self, now: DateTime<Utc>) -> i64 {
        match self.phase {
            Phase::Running { since } => run_seconds(since, now) + self.accumulated_seconds,
            Phase::Paused { .. } => self.accumulated_seconds,
        }
    }
}

/// Whole seconds between `since` and `now`, floored.
fn run_seconds(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let delta_ms = (now - since).num_milliseconds();
    if delta_ms < 0 {
        tracing::warn!(%since, %now, "clock moved backwards during a run");
    }
    delta_ms.div_euclid(1000)
}

/// Tracks at most one active session against an injected clock.
#[derive(Debug)]
pub struct TimerClock<C> {
    clock: C,
    session: Option<ActiveSession>,
}

impl<C: Clock> TimerClock<C> {
    pub const fn new(clock: C) -> Self {
        Self {
            clock,
            session: None,
        }
    }

    pub const fn state(&self) -> TimerState {
        match &self.session {
            None => TimerState::Idle,
            Some(s) if s.is_running() => TimerState::Running,
            Some(_) => TimerState::Paused,
        }
    }

    pub const fn session(&self) -> Option<&ActiveSession> {
        self.session.as_ref()
    }

    /// Starts a new session with `start_time = now`.
    ///
    /// Refused with [`TimerError::SessionActive`] if a session is already
    /// running or paused; the existing session is left untouched.
    pub fn start(&mut self, fields: NewEntry) -> Result<&TimeEntry, TimerError> {
        if let Some(active) = &self.session {
            tracing::debug!(entry_id = %active.entry.id(), "start refused: session active");
            return Err(TimerError::SessionActive(active.entry.id().clone()));
        }

        let now = self.clock.now();
        let entry = TimeEntry::begin(EntryId::generate(), fields, now);
        tracing::debug!(entry_id = %entry.id(), title = entry.title(), "session started");

        let session = self.session.insert(ActiveSession {
            entry,
            elapsed_seconds: 0,
            accumulated_seconds: 0,
            phase: Phase::Running { since: now },
        });
        Ok(&session.entry)
    }

    /// Banks the current run and pauses. Returns `false` if nothing was running.
    pub fn pause(&mut self) -> bool {
        let now = self.clock.now();
        let Some(session) = self.session.as_mut() else {
            tracing::debug!("pause ignored: no active session");
            return false;
        };
        let Phase::Running { since } = session.phase else {
            tracing::debug!("pause ignored: already paused");
            return false;
        };

        session.accumulated_seconds += run_seconds(since, now);
        session.elapsed_seconds = session.accumulated_seconds;
        session.phase = Phase::Paused { at: now };
        session.entry.set_running(false);
        tracing::debug!(
            entry_id = %session.entry.id(),
            accumulated = session.accumulated_seconds,
            "session paused"
        );
        true
    }

    /// Resumes a paused session. Returns `false` if nothing was paused.
    pub fn resume(&mut self) -> bool {
        let now = self.clock.now();
        let Some(session) = self.session.as_mut() else {
            tracing::debug!("resume ignored: no active session");
            return false;
        };
        if session.is_running() {
            tracing::debug!("resume ignored: already running");
            return false;
        }

        session.phase = Phase::Running { since: now };
        session.entry.set_running(true);
        tracing::debug!(entry_id = %session.entry.id(), "session resumed");
        true
    }

    /// Finalizes the active session and hands back the terminal entry.
    ///
    /// Returns `None` (and changes nothing) when idle.
    pub fn stop(&mut self) -> Option<TimeEntry> {
        let now = self.clock.now();
        let Some(session) = self.session.take() else {
            tracing::debug!("stop ignored: no active session");
            return None;
        };

        let active = session.elapsed_at(now);
        let mut entry = session.entry;
        entry.finish(now, active);
        tracing::debug!(entry_id = %entry.id(), active_seconds = active, "session stopped");
        Some(entry)
    }

    /// Elapsed seconds of the active session as of `now`; 0 when idle.
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> i64 {
        self.session.as_ref().map_or(0, |s| s.elapsed_at(now))
    }

    /// Elapsed seconds as of the clock's current reading.
    pub fn elapsed(&self) -> i64 {
        self.elapsed_at(self.clock.now())
    }

    /// Recomputes and stores the displayed elapsed value.
    pub fn refresh(&mut self) -> i64 {
        let now = self.clock.now();
        match self.session.as_mut() {
            Some(session) => {
                session.elapsed_seconds = session.elapsed_at(now);
                session.elapsed_seconds
            }
            None => 0,
        }
    }
}
