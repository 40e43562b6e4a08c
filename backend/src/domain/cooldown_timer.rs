//! Scheduled driver for the resend [`Countdown`].
//!
//! Each running timer holds at most one pending tick. Re-arming, a successful
//! resend, cancellation and drop all cancel the pending tick before anything
//! else is scheduled. A generation counter discards ticks that were already
//! in flight when they were cancelled.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use super::countdown::{Countdown, ResendDecision, TickOutcome};
use super::ports::{PendingTick, TickScheduler};

/// Interval between countdown ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

struct TimerState {
    countdown: Countdown,
    pending: Option<Box<dyn PendingTick>>,
    generation: u64,
    updates: watch::Sender<Countdown>,
}

impl TimerState {
    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    fn publish(&self) {
        self.updates.send_replace(self.countdown.clone());
    }
}

/// Countdown driven by a [`TickScheduler`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use storefront_edge::domain::CooldownTimer;
/// use storefront_edge::test_support::ManualTickScheduler;
///
/// let scheduler = Arc::new(ManualTickScheduler::default());
/// let timer = CooldownTimer::start(scheduler.clone(), 2);
/// scheduler.fire_next();
/// scheduler.fire_next();
/// assert!(timer.snapshot().is_enabled());
/// assert_eq!(scheduler.pending_count(), 0);
/// ```
pub struct CooldownTimer {
    state: Arc<Mutex<TimerState>>,
    scheduler: Arc<dyn TickScheduler>,
}

impl CooldownTimer {
    /// Start a countdown of `seconds` and schedule its first tick.
    pub fn start(scheduler: Arc<dyn TickScheduler>, seconds: u32) -> Self {
        let countdown = Countdown::new(seconds);
        let (updates, _) = watch::channel(countdown.clone());
        let state = Arc::new(Mutex::new(TimerState {
            countdown,
            pending: None,
            generation: 0,
            updates,
        }));
        let timer = Self { state, scheduler };
        {
            let mut guard = lock(&timer.state);
            if guard.countdown.is_running() {
                schedule_tick(&timer.state, &mut guard, &timer.scheduler);
            }
        }
        timer
    }

    /// Copy of the current countdown state.
    #[must_use]
    pub fn snapshot(&self) -> Countdown {
        lock(&self.state).countdown.clone()
    }

    /// Receive every countdown change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Countdown> {
        lock(&self.state).updates.subscribe()
    }

    /// Whether a tick is currently scheduled.
    #[must_use]
    pub fn has_pending_tick(&self) -> bool {
        lock(&self.state).pending.is_some()
    }

    /// Restart the countdown from its full duration.
    pub fn rearm(&self) {
        let mut guard = lock(&self.state);
        guard.cancel_pending();
        guard.countdown.rearm();
        guard.publish();
        if guard.countdown.is_running() {
            schedule_tick(&self.state, &mut guard, &self.scheduler);
        }
    }

    /// Attempt the resend action; on acceptance the countdown restarts.
    pub fn try_resend(&self) -> ResendDecision {
        let mut guard = lock(&self.state);
        let decision = guard.countdown.try_resend();
        if decision == ResendDecision::Accepted {
            guard.cancel_pending();
            guard.publish();
            if guard.countdown.is_running() {
                schedule_tick(&self.state, &mut guard, &self.scheduler);
            }
        }
        decision
    }

    /// Cancel the pending tick, freezing the countdown.
    pub fn cancel(&self) {
        lock(&self.state).cancel_pending();
    }
}

impl Drop for CooldownTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn lock(state: &Mutex<TimerState>) -> MutexGuard<'_, TimerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn schedule_tick(
    state: &Arc<Mutex<TimerState>>,
    guard: &mut TimerState,
    scheduler: &Arc<dyn TickScheduler>,
) {
    let weak = Arc::downgrade(state);
    let generation = guard.generation;
    let next_scheduler = Arc::clone(scheduler);
    let pending = scheduler.schedule(
        TICK_INTERVAL,
        Box::new(move || on_tick(&weak, generation, &next_scheduler)),
    );
    guard.pending = Some(pending);
}

fn on_tick(state: &Weak<Mutex<TimerState>>, generation: u64, scheduler: &Arc<dyn TickScheduler>) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let mut guard = lock(&state);
    if guard.generation != generation {
        debug!(generation, "discarding stale cooldown tick");
        return;
    }
    guard.pending = None;
    let outcome = guard.countdown.tick();
    guard.publish();
    match outcome {
        TickOutcome::Running { .. } => schedule_tick(&state, &mut guard, scheduler),
        TickOutcome::Expired => debug!("resend cooldown expired"),
        TickOutcome::Idle => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::countdown::RESEND_COOLDOWN_SECONDS;
    use crate::test_support::ManualTickScheduler;
    use rstest::{fixture, rstest};

    #[fixture]
    fn scheduler() -> Arc<ManualTickScheduler> {
        Arc::new(ManualTickScheduler::default())
    }

    #[rstest]
    fn full_cooldown_enables_resend_once(scheduler: Arc<ManualTickScheduler>) {
        let timer = CooldownTimer::start(scheduler.clone(), RESEND_COOLDOWN_SECONDS);
        let mut updates = timer.subscribe();
        let mut enabled_transitions = 0;
        let mut was_enabled = false;

        for _ in 0..RESEND_COOLDOWN_SECONDS {
            assert_eq!(scheduler.pending_count(), 1, "exactly one pending tick");
            assert!(scheduler.fire_next());
            let now_enabled = updates.borrow_and_update().is_enabled();
            if now_enabled && !was_enabled {
                enabled_transitions += 1;
            }
            was_enabled = now_enabled;
        }

        assert_eq!(enabled_transitions, 1);
        assert!(timer.snapshot().is_enabled());
        assert_eq!(scheduler.pending_count(), 0);
        assert!(!scheduler.fire_next(), "no ticks after expiry");
        assert!(timer.snapshot().is_enabled());
    }

    #[rstest]
    fn resend_before_expiry_changes_nothing(scheduler: Arc<ManualTickScheduler>) {
        let timer = CooldownTimer::start(scheduler.clone(), RESEND_COOLDOWN_SECONDS);
        scheduler.fire_next();
        let before = timer.snapshot();

        assert_eq!(timer.try_resend(), ResendDecision::Rejected);
        assert_eq!(timer.snapshot(), before);
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[rstest]
    fn rearm_never_overlaps_ticks(scheduler: Arc<ManualTickScheduler>) {
        let timer = CooldownTimer::start(scheduler.clone(), 5);
        scheduler.fire_next();
        timer.rearm();
        timer.rearm();

        assert_eq!(scheduler.pending_count(), 1);
        assert_eq!(scheduler.cancelled_count(), 2);
        assert_eq!(timer.snapshot().remaining(), 5);
    }

    #[rstest]
    fn accepted_resend_restarts_countdown(scheduler: Arc<ManualTickScheduler>) {
        let timer = CooldownTimer::start(scheduler.clone(), 2);
        scheduler.fire_next();
        scheduler.fire_next();

        assert_eq!(timer.try_resend(), ResendDecision::Accepted);
        let snapshot = timer.snapshot();
        assert_eq!(snapshot.remaining(), 2);
        assert!(snapshot.has_resent());
        assert!(timer.has_pending_tick());
        assert_eq!(timer.try_resend(), ResendDecision::Rejected);
    }

    #[rstest]
    fn drop_cancels_pending_tick(scheduler: Arc<ManualTickScheduler>) {
        let timer = CooldownTimer::start(scheduler.clone(), 3);
        drop(timer);
        assert_eq!(scheduler.pending_count(), 0);
        assert!(!scheduler.fire_next());
    }

    #[rstest]
    fn stale_tick_is_discarded(scheduler: Arc<ManualTickScheduler>) {
        let timer = CooldownTimer::start(scheduler.clone(), 3);
        let stale = scheduler.take_next().expect("scheduled tick");
        timer.rearm();

        stale();
        assert_eq!(timer.snapshot().remaining(), 3);
        assert_eq!(scheduler.pending_count(), 1);
    }
}
