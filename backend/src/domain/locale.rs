//! Supported locale primitives.
//!
//! A [`Locale`] is the short identifier that prefixes every localized page
//! path (`/en/...`, `/fr/...`). [`SupportedLocales`] is the closed set the edge
//! accepts together with the designated default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors raised while validating locale identifiers and sets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocaleValidationError {
    /// The identifier is blank.
    #[error("locale identifier must not be empty")]
    Empty,
    /// The identifier contains characters that cannot appear in a path segment.
    #[error("locale identifier '{value}' must be lowercase ASCII letters, digits or '-'")]
    InvalidCharacters { value: String },
    /// The supported set has no members.
    #[error("supported locales must contain at least one locale")]
    EmptySet,
    /// The default locale is not part of the supported set.
    #[error("default locale '{default}' is not in the supported set")]
    DefaultNotSupported { default: String },
}

/// Validated locale identifier, for example `en` or `fr`.
///
/// ## Invariants
/// - non-empty;
/// - lowercase ASCII letters, digits and `-` only, so it is always safe to
///   splice into a URL path.
///
/// # Examples
/// ```
/// use storefront_edge::domain::Locale;
///
/// let locale = Locale::new("fr").expect("valid locale");
/// assert_eq!(locale.as_str(), "fr");
/// assert!(Locale::new("FR/../").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    /// Validate and wrap a locale identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, LocaleValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(LocaleValidationError::Empty);
        }
        let valid = value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid {
            return Err(LocaleValidationError::InvalidCharacters { value });
        }
        Ok(Self(value))
    }

    /// Borrow the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Locale {
    type Err = LocaleValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = LocaleValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Locale> for String {
    fn from(value: Locale) -> Self {
        value.0
    }
}

/// Closed set of supported locales plus the designated default.
///
/// ## Invariants
/// - the set is non-empty;
/// - the default is a member of the set.
///
/// Declaration order is preserved and duplicates are dropped.
///
/// # Examples
/// ```
/// use storefront_edge::domain::{Locale, SupportedLocales};
///
/// let locales = SupportedLocales::parse(["en", "fr", "es"], "en").expect("valid set");
/// assert!(locales.contains("fr"));
/// assert_eq!(locales.default_locale().as_str(), "en");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedLocales {
    locales: Vec<Locale>,
    default: Locale,
}

impl SupportedLocales {
    /// Build a set from validated locales.
    pub fn new(
        locales: impl IntoIterator<Item = Locale>,
        default: Locale,
    ) -> Result<Self, LocaleValidationError> {
        let mut unique: Vec<Locale> = Vec::new();
        for locale in locales {
            if !unique.contains(&locale) {
                unique.push(locale);
            }
        }
        if unique.is_empty() {
            return Err(LocaleValidationError::EmptySet);
        }
        if !unique.contains(&default) {
            return Err(LocaleValidationError::DefaultNotSupported {
                default: default.0,
            });
        }
        Ok(Self {
            locales: unique,
            default,
        })
    }

    /// Validate raw identifiers and build a set.
    pub fn parse<I, S>(locales: I, default: &str) -> Result<Self, LocaleValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = locales
            .into_iter()
            .map(|raw| Locale::new(raw.as_ref().trim()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(parsed, Locale::new(default.trim())?)
    }

    /// Look up a supported locale by identifier.
    #[must_use]
    pub fn get(&self, candidate: &str) -> Option<&Locale> {
        self.locales.iter().find(|locale| locale.as_str() == candidate)
    }

    /// Return whether `candidate` names a supported locale.
    #[must_use]
    pub fn contains(&self, candidate: &str) -> bool {
        self.get(candidate).is_some()
    }

    /// The designated default locale.
    #[must_use]
    pub fn default_locale(&self) -> &Locale {
        &self.default
    }

    /// Iterate over the supported locales in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Locale> {
        self.locales.iter()
    }
}
