//! Resend-verification endpoints.
//!
//! ```text
//! POST /api/v1/verification/sessions {"email":"ada@example.com"}
//! POST /api/v1/verification/resend   {"email":"ada@example.com"}
//! ```
//!
//! Opening a session starts the cooldown shown on the "check your inbox"
//! page. Resend is accepted once the cooldown has expired, and only once.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Countdown, NormalizedError, ResendAttempt, SessionResend};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ApiError;
use crate::inbound::http::state::HttpState;

const INVALID_EMAIL: &str = "A valid email address is required";
const NO_SESSION: &str = "No verification is pending for this email address";
const COOLING_DOWN: &str = "Please wait before requesting another verification email";
const ALREADY_RESENT: &str = "A verification email has already been resent";
const RESEND_ACCEPTED: &str = "Verification email sent";

/// Request body naming the address awaiting verification.
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationRequest {
    pub email: String,
}

/// Countdown state as rendered by the verify page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownResponse {
    pub remaining_seconds: u32,
    pub resend_enabled: bool,
    pub has_resent: bool,
    pub display: String,
}

impl From<&Countdown> for CountdownResponse {
    fn from(countdown: &Countdown) -> Self {
        Self {
            remaining_seconds: countdown.remaining(),
            resend_enabled: countdown.is_enabled(),
            has_resent: countdown.has_resent(),
            display: countdown.display(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ResendAccepted {
    message: &'static str,
}

fn rejection(message: &str, details: Option<String>) -> NormalizedError {
    let error = NormalizedError::try_new(message).unwrap_or_else(|_| NormalizedError::unexpected());
    match details {
        Some(details) => error.with_details(details),
        None => error,
    }
}

fn validated_email(raw: &str) -> ApiResult<&str> {
    let email = raw.trim();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if well_formed {
        Ok(email)
    } else {
        Err(ApiError::bad_request(rejection(INVALID_EMAIL, None)))
    }
}

/// Open (or restart) the cooldown for an address.
#[post("/verification/sessions")]
pub async fn open_session(
    state: web::Data<HttpState>,
    payload: web::Json<VerificationRequest>,
) -> ApiResult<HttpResponse> {
    let email = validated_email(&payload.email)?;
    let countdown = state.sessions.open(email);
    Ok(HttpResponse::Created().json(CountdownResponse::from(&countdown)))
}

/// Ask the auth backend to resend the verification email.
#[post("/verification/resend")]
pub async fn resend(
    state: web::Data<HttpState>,
    payload: web::Json<VerificationRequest>,
) -> ApiResult<HttpResponse> {
    let email = validated_email(&payload.email)?;
    match state.sessions.resend(email).await {
        SessionResend::NoSession => Err(ApiError::new(
            StatusCode::NOT_FOUND,
            rejection(NO_SESSION, None),
        )),
        SessionResend::Attempted(ResendAttempt::Sent) => {
            Ok(HttpResponse::Accepted().json(ResendAccepted {
                message: RESEND_ACCEPTED,
            }))
        }
        SessionResend::Attempted(ResendAttempt::AlreadyResent) => Err(ApiError::new(
            StatusCode::TOO_MANY_REQUESTS,
            rejection(ALREADY_RESENT, None),
        )),
        SessionResend::Attempted(ResendAttempt::Suppressed { remaining }) => {
            let countdown = Countdown::new(remaining);
            Err(ApiError::new(
                StatusCode::TOO_MANY_REQUESTS,
                rejection(
                    COOLING_DOWN,
                    Some(format!("Retry in {}", countdown.display())),
                ),
            )
            .with_retry_after(remaining))
        }
        SessionResend::Attempted(ResendAttempt::Failed(error)) => {
            Err(ApiError::bad_gateway(error))
        }
    }
}
