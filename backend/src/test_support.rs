//! Test utilities for the edge crate.
//!
//! Shared by unit tests (in `src/`), integration tests (in `tests/`) and
//! doctests. Compiled for `cfg(test)` or with the `test-support` feature.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::domain::ports::{PendingTick, TickCallback, TickScheduler};

struct QueuedTick {
    delay: Duration,
    callback: TickCallback,
    cancelled: Arc<AtomicBool>,
}

/// Deterministic [`TickScheduler`] whose callbacks fire only when asked.
///
/// Callbacks are queued in scheduling order. Firing never holds the queue
/// lock, so a callback may schedule its successor.
#[derive(Default)]
pub struct ManualTickScheduler {
    queue: Mutex<VecDeque<QueuedTick>>,
    cancelled: Arc<AtomicUsize>,
}

struct ManualPendingTick {
    cancelled: Arc<AtomicBool>,
    counter: Arc<AtomicUsize>,
}

impl PendingTick for ManualPendingTick {
    fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            self.counter.fetch_add(1, Ordering::AcqRel);
        }
    }
}

impl TickScheduler for ManualTickScheduler {
    fn schedule(&self, delay: Duration, callback: TickCallback) -> Box<dyn PendingTick> {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(QueuedTick {
                delay,
                callback,
                cancelled: Arc::clone(&cancelled),
            });
        Box::new(ManualPendingTick {
            cancelled,
            counter: Arc::clone(&self.cancelled),
        })
    }
}

impl ManualTickScheduler {
    /// Remove the next live callback without running it.
    pub fn take_next(&self) -> Option<TickCallback> {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        while let Some(tick) = queue.pop_front() {
            if !tick.cancelled.load(Ordering::Acquire) {
                return Some(tick.callback);
            }
        }
        None
    }

    /// Run the next live callback. Returns `false` when none is queued.
    pub fn fire_next(&self) -> bool {
        match self.take_next() {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Number of queued callbacks that have not been cancelled.
    pub fn pending_count(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|tick| !tick.cancelled.load(Ordering::Acquire))
            .count()
    }

    /// Number of scheduled callbacks cancelled so far.
    pub fn cancelled_count(&self) -> usize {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Delays requested for the queued live callbacks.
    pub fn pending_delays(&self) -> Vec<Duration> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|tick| !tick.cancelled.load(Ordering::Acquire))
            .map(|tick| tick.delay)
            .collect()
    }
}
