//! Reqwest-backed adapter for the authentication backend.
//!
//! This adapter owns transport details only: request serialisation, timeout
//! handling and mapping non-success responses into [`TransportFailure`]s that
//! keep the status, reason phrase and decoded body for normalization.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;

use crate::domain::TransportFailure;
use crate::domain::ports::VerificationMailer;

const RESEND_VERIFICATION_PATH: &str = "auth/resend-verification";
const DEFAULT_USER_AGENT: &str = "storefront-edge/0.1";

/// Transport error code for 4xx responses.
pub const ERR_BAD_REQUEST: &str = "ERR_BAD_REQUEST";
/// Transport error code for 5xx and other unexpected responses.
pub const ERR_BAD_RESPONSE: &str = "ERR_BAD_RESPONSE";
/// Transport error code for requests that exceeded the timeout.
pub const ETIMEDOUT: &str = "ETIMEDOUT";
/// Transport error code for connection-level failures.
pub const ERR_NETWORK: &str = "ERR_NETWORK";

#[derive(Serialize)]
struct ResendRequest<'a> {
    email: &'a str,
}

/// Verification mailer that calls `POST {base}/auth/resend-verification`.
pub struct HttpVerificationMailer {
    client: Client,
    endpoint: Url,
}

impl HttpVerificationMailer {
    /// Build an adapter for the auth API rooted at `base`.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint cannot be derived from `base` or
    /// the reqwest client cannot be constructed.
    pub fn new(base: &Url, timeout: Duration) -> Result<Self, AuthApiSetupError> {
        let endpoint = resend_endpoint(base)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self { client, endpoint })
    }

    /// Endpoint the adapter posts to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Errors raised while constructing [`HttpVerificationMailer`].
#[derive(Debug, thiserror::Error)]
pub enum AuthApiSetupError {
    /// The base URL cannot carry a path.
    #[error("invalid auth API base URL: {0}")]
    InvalidBase(#[from] url::ParseError),
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[async_trait]
impl VerificationMailer for HttpVerificationMailer {
    async fn resend(&self, email: &str) -> Result<(), TransportFailure> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&ResendRequest { email })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn resend_endpoint(base: &Url) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(RESEND_VERIFICATION_PATH)
}

fn map_transport_error(error: reqwest::Error) -> TransportFailure {
    let code = if error.is_timeout() {
        ETIMEDOUT
    } else {
        ERR_NETWORK
    };
    TransportFailure::new(error.to_string()).with_code(code)
}

fn map_status_error(status: StatusCode, body: &[u8]) -> TransportFailure {
    let code = if status.is_client_error() {
        ERR_BAD_REQUEST
    } else {
        ERR_BAD_RESPONSE
    };
    let mut failure = TransportFailure::new(format!(
        "Request failed with status code {}",
        status.as_u16()
    ))
    .with_code(code)
    .with_status(status.as_u16());
    if let Some(reason) = status.canonical_reason() {
        failure = failure.with_status_text(reason);
    }
    if let Ok(decoded) = serde_json::from_slice::<Value>(body) {
        failure = failure.with_body(decoded);
    }
    failure
}
