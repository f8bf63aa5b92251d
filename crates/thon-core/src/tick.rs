//! Periodic display refresh.
//!
//! The running clock is redrawn once per tick. A [`TickGuard`] owns the
//! background interval task; dropping it cancels the task, so the tick can
//! never outlive the state that asked for it. [`TickSlot`] holds at most one
//! guard and keeps it in step with the timer: acquired on entering Running,
//! released on pause, stop, or teardown.

use std::future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::timer::TimerState;

/// A running periodic tick, cancelled on drop.
#[derive(Debug)]
pub struct TickGuard {
    cancel: CancellationToken,
    ticks: mpsc::Receiver<Instant>,
    task: Option<JoinHandle<()>>,
}

impl TickGuard {
    /// Spawns the interval task. The first tick fires one `period` from now.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(period: Duration) -> Self {
        let cancel = CancellationToken::new();
        let (tx, ticks) = mpsc::channel(1);

        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let token = cancel.clone();
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    at = interval.tick() => {
                        // A full channel means the consumer has a tick it hasn't
                        // read yet; coalesce rather than queue.
                        if let Err(mpsc::error::TrySendError::Closed(_)) = tx.try_send(at) {
                            break;
                        }
                    }
                }
            }
            tracing::trace!("tick task finished");
        });

        tracing::debug!(?period, "tick acquired");
        Self {
            cancel,
            ticks,
            task: Some(task),
        }
    }

    /// Waits for the next tick. Returns `None` once the task has stopped.
    pub async fn tick(&mut self) -> Option<Instant> {
        self.ticks.recv().await
    }

    /// Cancels the tick and returns the task handle so callers can await its exit.
    pub fn cancel(mut self) -> Option<JoinHandle<()>> {
        self.cancel.cancel();
        self.task.take()
    }
}

impl Drop for TickGuard {
    fn drop(&mut self) {
        if !self.cancel.is_cancelled() {
            tracing::debug!("tick released");
        }
        self.cancel.cancel();
    }
}

/// Holds the tick while, and only while, the timer is running.
#[derive(Debug)]
pub struct TickSlot {
    period: Duration,
    guard: Option<TickGuard>,
}

impl TickSlot {
    pub const fn new(period: Duration) -> Self {
        Self {
            period,
            guard: None,
        }
    }

    /// Acquires or releases the tick to match `state`.
    pub fn sync(&mut self, state: TimerState) {
        match (state, self.guard.is_some()) {
            (TimerState::Running, false) => self.guard = Some(TickGuard::start(self.period)),
            (TimerState::Idle | TimerState::Paused, true) => self.release(),
            _ => {}
        }
    }

    pub fn release(&mut self) {
        self.guard = None;
    }

    pub const fn is_active(&self) -> bool {
        self.guard.is_some()
    }

    /// Waits for the next tick; never resolves while no tick is held.
    pub async fn tick(&mut self) -> Instant {
        if let Some(guard) = self.guard.as_mut() {
            if let Some(at) = guard.tick().await {
                return at;
            }
        }
        future::pending().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_secs(1);

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_period() {
        let start = Instant::now();
        let mut guard = TickGuard::start(PERIOD);

        let first = guard.tick().await.unwrap();
        assert_eq!(first - start, PERIOD);

        let second = guard.tick().await.unwrap();
        assert_eq!(second - first, PERIOD);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_task() {
        let guard = TickGuard::start(PERIOD);
        let task = guard.cancel().unwrap();
        task.await.unwrap();
    }

    async fn assert_finished(task: JoinHandle<()>) {
        let joined = time::timeout(Duration::from_secs(5), task).await;
        assert!(matches!(joined, Ok(Ok(()))), "tick task still running");
    }

    fn take_task(slot: &mut TickSlot) -> JoinHandle<()> {
        slot.guard.as_mut().unwrap().task.take().unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_ends_task() {
        let mut guard = TickGuard::start(PERIOD);
        guard.tick().await.unwrap();
        let task = guard.task.take().unwrap();

        drop(guard);
        assert_finished(task).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_slot_ends_task_on_every_exit() {
        for exit in [TimerState::Paused, TimerState::Idle] {
            let mut slot = TickSlot::new(PERIOD);
            slot.sync(TimerState::Running);
            let task = take_task(&mut slot);

            slot.sync(exit);
            assert_finished(task).await;
        }

        let mut slot = TickSlot::new(PERIOD);
        slot.sync(TimerState::Running);
        let task = take_task(&mut slot);
        drop(slot);
        assert_finished(task).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_slot_follows_timer_state() {
        let mut slot = TickSlot::new(PERIOD);
        assert!(!slot.is_active());

        slot.sync(TimerState::Running);
        assert!(slot.is_active());
        slot.tick().await;

        slot.sync(TimerState::Paused);
        assert!(!slot.is_active());

        slot.sync(TimerState::Running);
        assert!(slot.is_active());

        slot.sync(TimerState::Idle);
        assert!(!slot.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slot_keeps_existing_guard_while_running() {
        let mut slot = TickSlot::new(PERIOD);
        slot.sync(TimerState::Running);
        let token = slot.guard.as_ref().unwrap().cancel.clone();

        slot.sync(TimerState::Running);
        assert!(!token.is_cancelled());

        slot.release();
        assert!(token.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_slot_never_ticks() {
        let mut slot = TickSlot::new(PERIOD);
        let waited = time::timeout(Duration::from_secs(10), slot.tick()).await;
        assert!(waited.is_err());
    }
}
