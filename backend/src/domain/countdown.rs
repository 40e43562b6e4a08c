//! Resend-verification cooldown state.
//!
//! After a verification email is sent, the "resend" action stays disabled
//! until a countdown reaches zero. Only one resend is allowed per countdown
//! instance; a successful resend disables the action again and re-arms the
//! countdown.

/// Default cooldown before the resend action is enabled, in seconds.
pub const RESEND_COOLDOWN_SECONDS: u32 = 120;

/// Result of one [`Countdown::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown is still running; `remaining` seconds are left.
    Running { remaining: u32 },
    /// This tick reached zero and enabled the resend action.
    Expired,
    /// The countdown had already reached zero; nothing changed.
    Idle,
}

/// Result of [`Countdown::try_resend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResendDecision {
    /// The resend may proceed; the countdown has been re-armed.
    Accepted,
    /// The action is disabled or a resend was already issued.
    Rejected,
}

/// Countdown gating the resend action.
///
/// # Examples
/// ```
/// use storefront_edge::domain::{Countdown, ResendDecision};
///
/// let mut countdown = Countdown::new(2);
/// assert_eq!(countdown.try_resend(), ResendDecision::Rejected);
/// countdown.tick();
/// countdown.tick();
/// assert!(countdown.is_enabled());
/// assert_eq!(countdown.display(), "0:00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    duration: u32,
    remaining: u32,
    enabled: bool,
    has_resent: bool,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(RESEND_COOLDOWN_SECONDS)
    }
}

impl Countdown {
    /// Start a countdown of `duration` seconds with the action disabled.
    ///
    /// A zero duration enables the action immediately.
    #[must_use]
    pub const fn new(duration: u32) -> Self {
        Self {
            duration,
            remaining: duration,
            enabled: duration == 0,
            has_resent: false,
        }
    }

    /// Seconds left before the action is enabled.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether the resend action can currently be triggered.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled && !self.has_resent
    }

    /// Whether a resend has been issued from this countdown.
    #[must_use]
    pub const fn has_resent(&self) -> bool {
        self.has_resent
    }

    /// Whether another tick is needed.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.remaining > 0
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.remaining == 0 {
            return TickOutcome::Idle;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.enabled = true;
            TickOutcome::Expired
        } else {
            TickOutcome::Running {
                remaining: self.remaining,
            }
        }
    }

    /// Attempt the resend action.
    pub fn try_resend(&mut self) -> ResendDecision {
        if !self.is_enabled() {
            return ResendDecision::Rejected;
        }
        self.has_resent = true;
        self.enabled = false;
        self.remaining = self.duration;
        ResendDecision::Accepted
    }

    /// Restart the countdown from the full duration.
    ///
    /// Clears the resend flag, so the next expiry enables the action again.
    pub fn rearm(&mut self) {
        *self = Self::new(self.duration);
    }

    /// Remaining time as `m:ss`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}
