//! Request locale resolution policy.
//!
//! Decides, per request, whether the path already carries a supported locale
//! or which locale prefix it must be redirected to. Precedence is fixed:
//! localized path, then cookie, then `Accept-Language`, then the default.
//!
//! The resolver is pure. Performing the redirect and deciding which paths are
//! intercepted at all belongs to the HTTP layer (see
//! `crate::middleware::locale`).

use super::locale::{Locale, SupportedLocales};

/// Facts available when resolving the locale for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionInput<'a> {
    /// Request path, always starting with `/`.
    pub path: &'a str,
    /// Value of the locale preference cookie, when sent.
    pub cookie: Option<&'a str>,
    /// Raw `Accept-Language` header value, when sent.
    pub accept_language: Option<&'a str>,
}

impl<'a> ResolutionInput<'a> {
    /// Input for a bare path with no preference signals.
    #[must_use]
    pub const fn new(path: &'a str) -> Self {
        Self {
            path,
            cookie: None,
            accept_language: None,
        }
    }

    /// Attach the locale cookie value.
    #[must_use]
    pub const fn with_cookie(mut self, cookie: Option<&'a str>) -> Self {
        self.cookie = cookie;
        self
    }

    /// Attach the `Accept-Language` header value.
    #[must_use]
    pub const fn with_accept_language(mut self, header: Option<&'a str>) -> Self {
        self.accept_language = header;
        self
    }
}

/// Signal that selected the redirect locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceSource {
    /// The locale preference cookie.
    Cookie,
    /// The first `Accept-Language` entry.
    Header,
    /// Nothing usable was sent; the configured default applies.
    Default,
}

impl PreferenceSource {
    /// Stable label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cookie => "cookie",
            Self::Header => "header",
            Self::Default => "default",
        }
    }
}

/// Redirect decision for an unlocalized path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleRedirect {
    locale: Locale,
    source: PreferenceSource,
    location: String,
}

impl LocaleRedirect {
    fn new(locale: &Locale, source: PreferenceSource, path: &str) -> Self {
        Self {
            location: format!("/{locale}{path}"),
            locale: locale.clone(),
            source,
        }
    }

    /// Locale the request is redirected to.
    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Signal that chose the locale.
    #[must_use]
    pub const fn source(&self) -> PreferenceSource {
        self.source
    }

    /// Target path, `/{locale}{original path}`, without query string.
    #[must_use]
    pub fn location(&self) -> &str {
        self.location.as_str()
    }
}

/// Result of [`resolve`]; exactly one per input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The path already starts with a supported locale; nothing to do.
    AlreadyLocalized {
        /// Locale found in the path prefix.
        locale: Locale,
    },
    /// The path must be redirected under a locale prefix.
    Redirect(LocaleRedirect),
}

impl ResolutionOutcome {
    /// Return the redirect decision, if any.
    #[must_use]
    pub const fn redirect(&self) -> Option<&LocaleRedirect> {
        match self {
            Self::AlreadyLocalized { .. } => None,
            Self::Redirect(redirect) => Some(redirect),
        }
    }
}

/// Resolve the locale for a request.
///
/// # Examples
/// ```
/// use storefront_edge::domain::{resolve, ResolutionInput, SupportedLocales};
///
/// let locales = SupportedLocales::parse(["en", "fr", "es"], "en").expect("valid set");
/// let input = ResolutionInput::new("/shop").with_accept_language(Some("fr-CA,en;q=0.8"));
/// let outcome = resolve(&input, &locales);
/// assert_eq!(outcome.redirect().map(|r| r.location()), Some("/fr/shop"));
/// ```
#[must_use]
pub fn resolve(input: &ResolutionInput<'_>, locales: &SupportedLocales) -> ResolutionOutcome {
    if let Some(locale) = path_locale(input.path, locales) {
        return ResolutionOutcome::AlreadyLocalized {
            locale: locale.clone(),
        };
    }

    let (locale, source) = if let Some(locale) = input.cookie.and_then(|c| locales.get(c)) {
        (locale, PreferenceSource::Cookie)
    } else if let Some(locale) = input
        .accept_language
        .and_then(primary_language)
        .and_then(|tag| locales.get(&tag))
    {
        (locale, PreferenceSource::Header)
    } else {
        (locales.default_locale(), PreferenceSource::Default)
    };

    ResolutionOutcome::Redirect(LocaleRedirect::new(locale, source, input.path))
}

/// Return the supported locale that prefixes `path`, if any.
///
/// Matches `/{locale}` exactly or `/{locale}/...`; `/english` does not match
/// `en`.
#[must_use]
pub fn path_locale<'l>(path: &str, locales: &'l SupportedLocales) -> Option<&'l Locale> {
    let rest = path.strip_prefix('/')?;
    let segment = rest.split_once('/').map_or(rest, |(head, _)| head);
    locales.get(segment)
}

/// Extract the primary language subtag of the first `Accept-Language` entry.
///
/// Only the first comma-separated entry is considered. Quality parameters and
/// surrounding whitespace are dropped, then everything from the first `-` on.
/// Returns `None` for an empty header or an empty first entry.
///
/// # Examples
/// ```
/// use storefront_edge::domain::primary_language;
///
/// assert_eq!(primary_language("fr-CA,en;q=0.8").as_deref(), Some("fr"));
/// assert_eq!(primary_language("de").as_deref(), Some("de"));
/// assert_eq!(primary_language(""), None);
/// ```
#[must_use]
pub fn primary_language(header: &str) -> Option<String> {
    let first = header.split(',').next().unwrap_or_default();
    let tag = first.split(';').next().unwrap_or_default().trim();
    let primary = tag.split('-').next().unwrap_or_default();
    if primary.is_empty() {
        None
    } else {
        Some(primary.to_ascii_lowercase())
    }
}
