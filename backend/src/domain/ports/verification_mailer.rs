//! Driven port for asking the authentication backend to resend a
//! verification email.

use async_trait::async_trait;

use crate::domain::TransportFailure;

/// Port for the auth backend's resend-verification call.
///
/// Failures are reported as [`TransportFailure`] so callers can normalize
/// them without knowing which client performed the request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationMailer: Send + Sync {
    /// Request a new verification email for `email`.
    async fn resend(&self, email: &str) -> Result<(), TransportFailure>;
}

/// Fixture mailer that accepts every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureVerificationMailer;

#[async_trait]
impl VerificationMailer for FixtureVerificationMailer {
    async fn resend(&self, _email: &str) -> Result<(), TransportFailure> {
        Ok(())
    }
}
