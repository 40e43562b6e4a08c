//! Tokio-backed [`TickScheduler`].
//!
//! Each scheduled tick is a spawned task that sleeps for the delay and then
//! runs the callback. Cancelling aborts the task.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::domain::ports::{PendingTick, TickCallback, TickScheduler};

/// Scheduler spawning ticks on a Tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioTickScheduler {
    runtime: Handle,
}

impl TokioTickScheduler {
    /// Scheduler bound to an explicit runtime.
    #[must_use]
    pub const fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Scheduler bound to the runtime of the calling task.
    ///
    /// # Errors
    ///
    /// Returns an error when called outside a Tokio runtime.
    pub fn current() -> Result<Self, tokio::runtime::TryCurrentError> {
        Handle::try_current().map(Self::new)
    }
}

struct SpawnedTick(JoinHandle<()>);

impl PendingTick for SpawnedTick {
    fn cancel(&self) {
        self.0.abort();
    }
}

impl TickScheduler for TokioTickScheduler {
    fn schedule(&self, delay: Duration, callback: TickCallback) -> Box<dyn PendingTick> {
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
        Box::new(SpawnedTick(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CooldownTimer;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay() {
        let scheduler = TokioTickScheduler::current().expect("inside runtime");
        let fired = Arc::new(AtomicUsize::new(0));
        let observed = Arc::clone(&fired);
        let _pending = scheduler.schedule(
            Duration::from_secs(1),
            Box::new(move || {
                observed.fetch_add(1, Ordering::SeqCst);
            }),
        );

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_tick_never_fires() {
        let scheduler = TokioTickScheduler::current().expect("inside runtime");
        let fired = Arc::new(AtomicUsize::new(0));
        let observed = Arc::clone(&fired);
        let pending = scheduler.schedule(
            Duration::from_secs(1),
            Box::new(move || {
                observed.fetch_add(1, Ordering::SeqCst);
            }),
        );
        pending.cancel();
        pending.cancel();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn drives_cooldown_in_real_time_units() {
        let scheduler = Arc::new(TokioTickScheduler::current().expect("inside runtime"));
        let timer = CooldownTimer::start(scheduler, 120);
        let mut updates = timer.subscribe();

        tokio::time::sleep(Duration::from_millis(119_500)).await;
        assert!(!timer.snapshot().is_enabled());

        updates
            .wait_for(|countdown| countdown.is_enabled())
            .await
            .expect("timer alive");
        assert_eq!(timer.snapshot().remaining(), 0);
        assert!(!timer.has_pending_tick());
    }
}
