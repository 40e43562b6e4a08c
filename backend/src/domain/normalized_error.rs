//! Display-ready error shape shared by every failure surface.
//!
//! Modals and inline banners never branch on what failed; they render
//! `message`, optionally `details`, and an administrator hint when `code` is
//! present. [`normalize`] is total over [`Failure`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::failure::{non_blank, Failure, GenericFailure, TransportFailure};

/// Message used when a transport failure carries no usable text.
pub const API_REQUEST_FAILED: &str = "API request failed";
/// Details attached to generic client-side errors.
pub const CLIENT_SIDE_DETAILS: &str = "Client-side error occurred";
/// Message used for unrecognized failures.
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred";
/// Details used for unrecognized failures.
pub const UNEXPECTED_DETAILS: &str = "Please try again later";
/// Hint shown next to errors that carry a code.
pub const ADMIN_HINT: &str = "If the problem persists, contact your administrator";

/// Normalized failure payload.
///
/// ## Invariants
/// - `message` is non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use storefront_edge::domain::NormalizedError;
///
/// let err = NormalizedError::try_new("Email is already verified")
///     .expect("non-empty message")
///     .with_code("ERR_BAD_REQUEST");
/// assert!(err.admin_hint().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "NormalizedErrorDto", into = "NormalizedErrorDto")]
pub struct NormalizedError {
    message: String,
    details: Option<String>,
    code: Option<String>,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizedErrorValidationError {
    #[error("error message must not be empty")]
    EmptyMessage,
}

impl NormalizedError {
    /// Fallible constructor that validates the message content.
    pub fn try_new(message: impl Into<String>) -> Result<Self, NormalizedErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(NormalizedErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            message,
            details: None,
            code: None,
        })
    }

    /// The fixed payload for failures nothing is known about.
    #[must_use]
    pub fn unexpected() -> Self {
        Self {
            message: UNEXPECTED_MESSAGE.to_owned(),
            details: Some(UNEXPECTED_DETAILS.to_owned()),
            code: None,
        }
    }

    /// Attach supplementary details. Blank values are dropped.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        let details = details.into();
        self.details = non_blank(&details).is_some().then_some(details);
        self
    }

    /// Attach a machine-readable code. Blank values are dropped.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        let code = code.into();
        self.code = non_blank(&code).is_some().then_some(code);
        self
    }

    /// Human-readable message; always non-empty.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary details, when known.
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Machine-readable code, when known.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Hint about contacting an administrator, shown when a code is present.
    #[must_use]
    pub fn admin_hint(&self) -> Option<&'static str> {
        self.code.as_ref().map(|_| ADMIN_HINT)
    }
}

impl std::fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {details}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for NormalizedError {}

/// Normalize any classified failure. Never fails.
///
/// # Examples
/// ```
/// use storefront_edge::domain::{normalize, Failure, TransportFailure};
///
/// let failure = Failure::from(TransportFailure::new("Request failed").with_status(404));
/// let normalized = normalize(&failure);
/// assert_eq!(normalized.message(), "Request failed");
/// assert_eq!(normalized.details(), Some("Status code: 404"));
/// ```
#[must_use]
pub fn normalize(failure: &Failure) -> NormalizedError {
    match failure {
        Failure::Transport(transport) => normalize_transport(transport),
        Failure::Generic(generic) => normalize_generic(generic),
        Failure::Unknown => NormalizedError::unexpected(),
    }
}

/// Classify and normalize a foreign caught value reported as JSON.
#[must_use]
pub fn normalize_value(value: &Value) -> NormalizedError {
    normalize(&Failure::classify(value))
}

/// Classify and normalize a Rust error.
#[must_use]
pub fn normalize_error(error: &(dyn std::error::Error + 'static)) -> NormalizedError {
    normalize(&Failure::from_error(error))
}

fn normalize_transport(transport: &TransportFailure) -> NormalizedError {
    let message = transport
        .body_field("error")
        .or_else(|| transport.body_field("message"))
        .or_else(|| transport.message().and_then(non_blank))
        .unwrap_or(API_REQUEST_FAILED);

    let details = transport
        .body_field("details")
        .or_else(|| transport.status_text().and_then(non_blank))
        .map(str::to_owned)
        .or_else(|| transport.status().map(|status| format!("Status code: {status}")));

    NormalizedError {
        message: message.to_owned(),
        details,
        code: transport.code().and_then(non_blank).map(str::to_owned),
    }
}

fn normalize_generic(generic: &GenericFailure) -> NormalizedError {
    NormalizedError {
        message: generic.message().to_owned(),
        details: Some(CLIENT_SIDE_DETAILS.to_owned()),
        code: None,
    }
}

impl From<&Failure> for NormalizedError {
    fn from(value: &Failure) -> Self {
        normalize(value)
    }
}

impl From<TransportFailure> for NormalizedError {
    fn from(value: TransportFailure) -> Self {
        normalize_transport(&value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NormalizedErrorDto {
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl From<NormalizedError> for NormalizedErrorDto {
    fn from(value: NormalizedError) -> Self {
        Self {
            message: value.message,
            details: value.details,
            code: value.code,
        }
    }
}

impl TryFrom<NormalizedErrorDto> for NormalizedError {
    type Error = NormalizedErrorValidationError;

    fn try_from(value: NormalizedErrorDto) -> Result<Self, Self::Error> {
        let NormalizedErrorDto {
            message,
            details,
            code,
        } = value;
        let mut error = Self::try_new(message)?;
        if let Some(details) = details {
            error = error.with_details(details);
        }
        if let Some(code) = code {
            error = error.with_code(code);
        }
        Ok(error)
    }
}

#[cfg(test)]
mod tests;
