//! Request middleware.
//!
//! Purpose: request lifecycle concerns that run before any handler, namely
//! correlation ([`Trace`]) and locale redirects ([`LocaleRedirect`]).

pub mod locale;
pub mod trace;

pub use locale::{
    DEFAULT_EXCLUDED_PREFIXES, DEFAULT_LOCALE_COOKIE, LocaleRedirect, LocaleRouting,
    ResolvedLocale, RouteExclusions,
};
pub use trace::Trace;
