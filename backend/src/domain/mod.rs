//! Domain primitives and policies.
//!
//! Purpose: hold the transport-agnostic decision logic of the edge. Nothing in
//! this module performs I/O directly; adapters reach it through [`ports`].
//!
//! Public surface:
//! - `Locale`, `SupportedLocales`: the closed set of page locales.
//! - `resolve`: request locale precedence (path, cookie, header, default).
//! - `Failure`, `normalize`: failure classification and display shape.
//! - `Countdown`, `CooldownTimer`, `ResendVerificationFlow`: resend cooldown.
//! - `VerificationSessions`: per-address resend flows.
//! - `DictionaryCatalogue`: `locale -> loader` lookup table.

pub mod cooldown_timer;
pub mod countdown;
pub mod dictionary;
pub mod failure;
pub mod locale;
pub mod locale_resolution;
pub mod normalized_error;
pub mod ports;
pub mod resend_flow;
pub mod verification_sessions;

pub use self::cooldown_timer::{CooldownTimer, TICK_INTERVAL};
pub use self::countdown::{Countdown, RESEND_COOLDOWN_SECONDS, ResendDecision, TickOutcome};
pub use self::dictionary::{DictionaryCatalogue, DictionaryError};
pub use self::failure::{Failure, GenericFailure, TransportFailure};
pub use self::locale::{Locale, LocaleValidationError, SupportedLocales};
pub use self::locale_resolution::{
    LocaleRedirect, PreferenceSource, ResolutionInput, ResolutionOutcome, path_locale,
    primary_language, resolve,
};
pub use self::normalized_error::{
    NormalizedError, NormalizedErrorValidationError, normalize, normalize_error,
    normalize_value,
};
pub use self::resend_flow::{ResendAttempt, ResendVerificationFlow};
pub use self::verification_sessions::{
    DEFAULT_MAX_SESSIONS, SessionResend, VerificationSessions,
};
