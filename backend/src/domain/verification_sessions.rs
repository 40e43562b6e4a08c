//! Per-address registry of resend-verification flows.
//!
//! A session opens when a visitor lands on the "check your inbox" page and
//! owns one [`ResendVerificationFlow`]. Reopening a session replaces the flow,
//! which cancels the old timer and starts a fresh cooldown.
//!
//! The registry is bounded. Opening a session first drops finished sessions
//! (the single resend was issued and its countdown has elapsed), then evicts
//! the oldest sessions until the new one fits under the cap. A resend for a
//! dropped address reports [`SessionResend::NoSession`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::countdown::Countdown;
use super::ports::{TickScheduler, VerificationMailer};
use super::resend_flow::{ResendAttempt, ResendVerificationFlow};

/// Default upper bound on concurrently open sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Result of [`VerificationSessions::resend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResend {
    /// No session is open for the address.
    NoSession,
    /// The flow ran; see [`ResendAttempt`].
    Attempted(ResendAttempt),
}

struct Session {
    flow: Arc<ResendVerificationFlow>,
    opened: u64,
}

impl Session {
    fn is_finished(&self) -> bool {
        let countdown = self.flow.timer().snapshot();
        countdown.has_resent() && !countdown.is_running()
    }
}

#[derive(Default)]
struct Registry {
    sessions: HashMap<String, Session>,
    next_seq: u64,
}

impl Registry {
    fn insert(&mut self, email: &str, flow: Arc<ResendVerificationFlow>) {
        let opened = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.sessions
            .insert(email.to_owned(), Session { flow, opened });
    }

    fn prune_finished(&mut self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_finished());
        before - self.sessions.len()
    }

    fn evict_oldest(&mut self, keep: usize) -> usize {
        let mut evicted = 0;
        while self.sessions.len() > keep {
            let Some(oldest) = self
                .sessions
                .iter()
                .min_by_key(|(_, session)| session.opened)
                .map(|(email, _)| email.clone())
            else {
                break;
            };
            self.sessions.remove(&oldest);
            evicted += 1;
        }
        evicted
    }
}

/// Bounded registry of open verification sessions keyed by email address.
pub struct VerificationSessions {
    registry: Mutex<Registry>,
    mailer: Arc<dyn VerificationMailer>,
    scheduler: Arc<dyn TickScheduler>,
    cooldown_seconds: u32,
    max_sessions: usize,
}

impl VerificationSessions {
    /// Empty registry starting every cooldown at `cooldown_seconds`, holding
    /// at most [`DEFAULT_MAX_SESSIONS`] sessions.
    pub fn new(
        mailer: Arc<dyn VerificationMailer>,
        scheduler: Arc<dyn TickScheduler>,
        cooldown_seconds: u32,
    ) -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
            mailer,
            scheduler,
            cooldown_seconds,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    /// Cap the number of open sessions; values below one are raised to one.
    #[must_use]
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    /// Open (or reopen) the session for `email` and return its countdown.
    pub fn open(&self, email: &str) -> Countdown {
        let flow = Arc::new(ResendVerificationFlow::start(
            email,
            Arc::clone(&self.mailer),
            Arc::clone(&self.scheduler),
            self.cooldown_seconds,
        ));
        let countdown = flow.timer().snapshot();

        let mut registry = self.lock();
        let reopened = registry.sessions.remove(email).is_some();
        let pruned = registry.prune_finished();
        let evicted = registry.evict_oldest(self.max_sessions.saturating_sub(1));
        registry.insert(email, flow);
        debug!(
            reopened,
            pruned,
            evicted,
            open = registry.sessions.len(),
            "verification session opened"
        );
        countdown
    }

    /// Countdown of the session for `email`, if one is open.
    pub fn countdown(&self, email: &str) -> Option<Countdown> {
        self.lock()
            .sessions
            .get(email)
            .map(|session| session.flow.timer().snapshot())
    }

    /// Trigger the resend action of the session for `email`.
    pub async fn resend(&self, email: &str) -> SessionResend {
        let flow = self
            .lock()
            .sessions
            .get(email)
            .map(|session| Arc::clone(&session.flow));
        match flow {
            Some(flow) => SessionResend::Attempted(flow.resend().await),
            None => SessionResend::NoSession,
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.lock().sessions.len()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
