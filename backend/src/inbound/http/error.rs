//! HTTP adapter mapping for failures.
//!
//! Purpose: every error body leaving the edge is a [`NormalizedError`], so
//! display surfaces consume one shape regardless of where the failure arose.

use actix_web::error::JsonPayloadError;
use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use tracing::{error, warn};

use crate::domain::ports::DictionaryLoadError;
use crate::domain::{DictionaryError, NormalizedError, normalize_error};
use crate::middleware::trace::{TRACE_ID_HEADER, TraceId};

/// Message served when a supported locale has no page text.
pub const PAGE_TEXT_UNAVAILABLE: &str = "Page text is not available for this locale";

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// A normalized error paired with the status it is served under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    body: NormalizedError,
    retry_after: Option<u32>,
}

impl ApiError {
    /// Pair `body` with `status`.
    #[must_use]
    pub const fn new(status: StatusCode, body: NormalizedError) -> Self {
        Self {
            status,
            body,
            retry_after: None,
        }
    }

    /// Advertise a `Retry-After` delay in seconds; zero is not sent.
    #[must_use]
    pub fn with_retry_after(mut self, seconds: u32) -> Self {
        self.retry_after = if seconds == 0 { None } else { Some(seconds) };
        self
    }

    /// `400 Bad Request`.
    #[must_use]
    pub const fn bad_request(body: NormalizedError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, body)
    }

    /// `502 Bad Gateway`, used when an upstream call failed.
    #[must_use]
    pub const fn bad_gateway(body: NormalizedError) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, body)
    }

    /// `500` carrying the fixed unexpected-error shape.
    #[must_use]
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            NormalizedError::unexpected(),
        )
    }

    /// Status served with the body.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Normalized body.
    #[must_use]
    pub const fn body(&self) -> &NormalizedError {
        &self.body
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.body, self.status)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status);
        if let Some(id) = TraceId::current() {
            builder.insert_header((TRACE_ID_HEADER, id.to_string()));
        }
        if let Some(seconds) = self.retry_after {
            builder.insert_header((header::RETRY_AFTER, seconds.to_string()));
        }
        builder.json(&self.body)
    }
}

impl From<DictionaryError> for ApiError {
    fn from(err: DictionaryError) -> Self {
        match err {
            DictionaryError::UnknownLocale { .. }
            | DictionaryError::Load(DictionaryLoadError::NotFound { .. }) => {
                warn!(error = %err, "dictionary unavailable");
                let body = NormalizedError::try_new(PAGE_TEXT_UNAVAILABLE)
                    .unwrap_or_else(|_| NormalizedError::unexpected())
                    .with_details(err.to_string());
                Self::new(StatusCode::NOT_FOUND, body)
            }
            DictionaryError::Load(_) => {
                // Decode and read failures expose file details; keep them in logs.
                error!(error = %err, "dictionary load failed");
                Self::internal()
            }
        }
    }
}

/// `JsonConfig` error handler answering malformed bodies with a normalized
/// `400`.
pub fn json_payload_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!(error = %err, "rejected JSON payload");
    ApiError::bad_request(normalize_error(&err)).into()
}
