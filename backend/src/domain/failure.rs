//! Classification of caught failures.
//!
//! Every failure that reaches a display surface is first classified into the
//! closed [`Failure`] set. Normalization (see
//! [`crate::domain::normalized_error`]) is then a total `match` over it.

use serde_json::{Map, Value};

/// Failure raised by a network or API call, carrying response metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportFailure {
    message: Option<String>,
    code: Option<String>,
    status: Option<u16>,
    status_text: Option<String>,
    body: Option<Value>,
}

impl TransportFailure {
    /// Transport failure with only the client library's own message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Attach the transport error code (for example `ERR_BAD_RESPONSE`).
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach the HTTP status of the failed response.
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach the HTTP reason phrase of the failed response.
    #[must_use]
    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = Some(status_text.into());
        self
    }

    /// Attach the decoded response body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Client library message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Transport error code.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// HTTP status, when a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    /// HTTP reason phrase, when a response was received.
    #[must_use]
    pub fn status_text(&self) -> Option<&str> {
        self.status_text.as_deref()
    }

    /// Decoded response body, when one was received.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// String field of the response body, ignoring blanks and non-strings.
    #[must_use]
    pub fn body_field(&self, field: &str) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|body| body.get(field))
            .and_then(Value::as_str)
            .and_then(non_blank)
    }
}

impl std::fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.status, self.message.as_deref()) {
            (Some(status), Some(message)) => write!(f, "{message} (status {status})"),
            (Some(status), None) => write!(f, "request failed with status {status}"),
            (None, Some(message)) => f.write_str(message),
            (None, None) => f.write_str("request failed"),
        }
    }
}

impl std::error::Error for TransportFailure {}

/// Ordinary error with a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericFailure {
    message: String,
}

impl GenericFailure {
    /// Wrap a message; blank messages are rejected.
    pub fn new(message: impl Into<String>) -> Option<Self> {
        let message = message.into();
        non_blank(&message)?;
        Some(Self { message })
    }

    /// Message of the wrapped error.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Closed classification of anything an operation can fail with.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// Network or API failure with response metadata.
    Transport(TransportFailure),
    /// Ordinary error carrying a message.
    Generic(GenericFailure),
    /// Anything else: strings, plain objects, `null`, numbers.
    Unknown,
}

impl Failure {
    /// Classify a Rust error value.
    ///
    /// [`TransportFailure`]s keep their metadata. Other errors become
    /// [`Failure::Generic`] when their `Display` output is not blank.
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        if let Some(transport) = error.downcast_ref::<TransportFailure>() {
            return Self::Transport(transport.clone());
        }
        GenericFailure::new(error.to_string()).map_or(Self::Unknown, Self::Generic)
    }

    /// Classify a foreign caught value reported as JSON.
    ///
    /// - objects flagged `"isAxiosError": true` or named `"AxiosError"` are
    ///   transport failures; `response.data`, `response.status`,
    ///   `response.statusText`, `message` and `code` are read when present;
    /// - objects with a string `name` and a non-blank string `message` are
    ///   generic errors;
    /// - everything else is unknown.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use storefront_edge::domain::Failure;
    ///
    /// let failure = Failure::classify(&json!({"name": "TypeError", "message": "x is undefined"}));
    /// assert!(matches!(failure, Failure::Generic(_)));
    /// assert_eq!(Failure::classify(&json!("boom")), Failure::Unknown);
    /// ```
    #[must_use]
    pub fn classify(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::Unknown;
        };
        if is_transport_shape(object) {
            return Self::Transport(transport_from_object(object));
        }
        let has_name = object.get("name").is_some_and(Value::is_string);
        match object.get("message").and_then(Value::as_str) {
            Some(message) if has_name => {
                GenericFailure::new(message).map_or(Self::Unknown, Self::Generic)
            }
            _ => Self::Unknown,
        }
    }
}

impl From<TransportFailure> for Failure {
    fn from(value: TransportFailure) -> Self {
        Self::Transport(value)
    }
}

impl From<GenericFailure> for Failure {
    fn from(value: GenericFailure) -> Self {
        Self::Generic(value)
    }
}

fn is_transport_shape(object: &Map<String, Value>) -> bool {
    object.get("isAxiosError").and_then(Value::as_bool) == Some(true)
        || object.get("name").and_then(Value::as_str) == Some("AxiosError")
}

fn transport_from_object(object: &Map<String, Value>) -> TransportFailure {
    let response = object.get("response").and_then(Value::as_object);
    let status = response
        .and_then(|r| r.get("status"))
        .or_else(|| object.get("status"))
        .and_then(Value::as_u64)
        .and_then(|status| u16::try_from(status).ok());

    TransportFailure {
        message: string_field(object, "message"),
        code: string_field(object, "code"),
        status,
        status_text: response.and_then(|r| string_field(r, "statusText")),
        body: response.and_then(|r| r.get("data")).cloned(),
    }
}

fn string_field(object: &Map<String, Value>, field: &str) -> Option<String> {
    object
        .get(field)
        .and_then(Value::as_str)
        .and_then(non_blank)
        .map(str::to_owned)
}

pub(crate) fn non_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
