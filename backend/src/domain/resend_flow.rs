//! Resend-verification flow: cooldown-gated calls to the auth backend.

use std::sync::Arc;

use tracing::{info, warn};

use super::cooldown_timer::CooldownTimer;
use super::countdown::ResendDecision;
use super::normalized_error::NormalizedError;
use super::ports::{TickScheduler, VerificationMailer};

/// Outcome of [`ResendVerificationFlow::resend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResendAttempt {
    /// The auth backend accepted the request.
    Sent,
    /// The cooldown is still running; nothing was sent.
    Suppressed {
        /// Seconds until the action is enabled.
        remaining: u32,
    },
    /// This countdown already issued its one resend; nothing was sent and
    /// waiting will not enable the action again.
    AlreadyResent,
    /// The request failed; the countdown restarts so a retry becomes
    /// available once it expires.
    Failed(NormalizedError),
}

/// Cooldown-gated resend action for one registered email address.
pub struct ResendVerificationFlow {
    email: String,
    mailer: Arc<dyn VerificationMailer>,
    timer: CooldownTimer,
}

impl ResendVerificationFlow {
    /// Start the flow with a fresh cooldown of `cooldown_seconds`.
    pub fn start(
        email: impl Into<String>,
        mailer: Arc<dyn VerificationMailer>,
        scheduler: Arc<dyn TickScheduler>,
        cooldown_seconds: u32,
    ) -> Self {
        Self {
            email: email.into(),
            mailer,
            timer: CooldownTimer::start(scheduler, cooldown_seconds),
        }
    }

    /// Cooldown driving the action, for display bindings.
    #[must_use]
    pub const fn timer(&self) -> &CooldownTimer {
        &self.timer
    }

    /// Trigger the resend action.
    pub async fn resend(&self) -> ResendAttempt {
        if self.timer.try_resend() == ResendDecision::Rejected {
            let countdown = self.timer.snapshot();
            return if countdown.has_resent() {
                ResendAttempt::AlreadyResent
            } else {
                ResendAttempt::Suppressed {
                    remaining: countdown.remaining(),
                }
            };
        }

        match self.mailer.resend(&self.email).await {
            Ok(()) => {
                info!("verification email resent");
                ResendAttempt::Sent
            }
            Err(failure) => {
                warn!(error = %failure, "verification resend failed");
                self.timer.rearm();
                ResendAttempt::Failed(NormalizedError::from(failure))
            }
        }
    }
}
