//! Driven port for scheduling one delayed callback.
//!
//! The cooldown timer never relies on a UI binding to re-run itself. It asks a
//! [`TickScheduler`] for exactly one callback at a time and cancels the
//! pending one before scheduling another.

use std::time::Duration;

/// Callback run once when a scheduled tick fires.
pub type TickCallback = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a scheduled callback that has not fired yet.
pub trait PendingTick: Send {
    /// Prevent the callback from running. Cancelling twice is a no-op.
    fn cancel(&self);
}

/// Port for running a callback after a delay.
pub trait TickScheduler: Send + Sync {
    /// Schedule `callback` to run once after `delay`.
    fn schedule(&self, delay: Duration, callback: TickCallback) -> Box<dyn PendingTick>;
}
