//! Edge configuration loaded via OrthoConfig.
//!
//! Every value may come from `EDGE_*` environment variables, a config file or
//! the command line, and every value has a default so a bare `edge` binary
//! starts with the storefront's stock locales. [`EdgeSettings::resolve`]
//! validates the raw values into an [`EdgeConfig`].

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{
    DEFAULT_MAX_SESSIONS, LocaleValidationError, RESEND_COOLDOWN_SECONDS, SupportedLocales,
};
use crate::middleware::{DEFAULT_LOCALE_COOKIE, LocaleRouting, RouteExclusions};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_LOCALES: &str = "en,fr,es";
const DEFAULT_LOCALE: &str = "en";
const DEFAULT_AUTH_API_URL: &str = "http://127.0.0.1:8888";
const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 10;

fn default_translations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("translations")
}

/// Raw configuration values.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EDGE")]
pub struct EdgeSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Comma-separated supported locales, in preference order.
    pub locales: Option<String>,
    /// Locale used when no request signal matches.
    pub default_locale: Option<String>,
    /// Name of the cookie holding the visitor's saved locale.
    pub locale_cookie: Option<String>,
    /// Comma-separated path prefixes that bypass locale redirects.
    pub excluded_prefixes: Option<String>,
    /// Directory holding `{locale}.json` dictionaries.
    pub translations_dir: Option<PathBuf>,
    /// Base URL of the authentication backend.
    pub auth_api_url: Option<String>,
    /// Timeout for calls to the authentication backend.
    pub auth_timeout_secs: Option<u64>,
    /// Resend-verification cooldown.
    pub cooldown_secs: Option<u32>,
    /// Upper bound on concurrently open verification sessions.
    pub max_sessions: Option<usize>,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct EdgeConfig {
    pub bind_addr: SocketAddr,
    pub routing: LocaleRouting,
    pub translations_dir: PathBuf,
    pub auth_api_url: Url,
    pub auth_timeout: Duration,
    pub cooldown_seconds: u32,
    pub max_sessions: usize,
}

/// Errors raised while validating [`EdgeSettings`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The bind address is not `host:port`.
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// The locale set is unusable.
    #[error("invalid locale configuration: {0}")]
    Locales(#[from] LocaleValidationError),
    /// The auth API URL does not parse.
    #[error("invalid auth API URL '{value}': {source}")]
    AuthApiUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    /// The auth API timeout is zero.
    #[error("auth API timeout must be at least one second")]
    ZeroTimeout,
    /// The cookie name is blank.
    #[error("locale cookie name must not be empty")]
    EmptyCookieName,
    /// The session cap is zero.
    #[error("max sessions must be at least one")]
    ZeroMaxSessions,
}

fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

impl EdgeSettings {
    /// Validate raw values, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] naming the first invalid value.
    pub fn resolve(&self) -> Result<EdgeConfig, SettingsError> {
        let bind_raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr = bind_raw
            .parse()
            .map_err(|source| SettingsError::BindAddr {
                value: bind_raw.to_owned(),
                source,
            })?;

        let locales = SupportedLocales::parse(
            split_list(self.locales.as_deref().unwrap_or(DEFAULT_LOCALES)),
            self.default_locale
                .as_deref()
                .unwrap_or(DEFAULT_LOCALE)
                .trim(),
        )?;

        let cookie_name = self
            .locale_cookie
            .as_deref()
            .unwrap_or(DEFAULT_LOCALE_COOKIE)
            .trim();
        if cookie_name.is_empty() {
            return Err(SettingsError::EmptyCookieName);
        }

        let exclusions = self
            .excluded_prefixes
            .as_deref()
            .map_or_else(RouteExclusions::default, |raw| {
                RouteExclusions::new(split_list(raw))
            });

        let url_raw = self.auth_api_url.as_deref().unwrap_or(DEFAULT_AUTH_API_URL);
        let auth_api_url = Url::parse(url_raw).map_err(|source| SettingsError::AuthApiUrl {
            value: url_raw.to_owned(),
            source,
        })?;

        let timeout_secs = self.auth_timeout_secs.unwrap_or(DEFAULT_AUTH_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(SettingsError::ZeroTimeout);
        }

        let max_sessions = self.max_sessions.unwrap_or(DEFAULT_MAX_SESSIONS);
        if max_sessions == 0 {
            return Err(SettingsError::ZeroMaxSessions);
        }

        Ok(EdgeConfig {
            bind_addr,
            routing: LocaleRouting::new(locales)
                .with_cookie_name(cookie_name)
                .with_exclusions(exclusions),
            translations_dir: self
                .translations_dir
                .clone()
                .unwrap_or_else(default_translations_dir),
            auth_api_url,
            auth_timeout: Duration::from_secs(timeout_secs),
            cooldown_seconds: self.cooldown_secs.unwrap_or(RESEND_COOLDOWN_SECONDS),
            max_sessions,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Configuration parsing and validation.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 10] = [
        "EDGE_BIND_ADDR",
        "EDGE_LOCALES",
        "EDGE_DEFAULT_LOCALE",
        "EDGE_LOCALE_COOKIE",
        "EDGE_EXCLUDED_PREFIXES",
        "EDGE_TRANSLATIONS_DIR",
        "EDGE_AUTH_API_URL",
        "EDGE_AUTH_TIMEOUT_SECS",
        "EDGE_COOLDOWN_SECS",
        "EDGE_MAX_SESSIONS",
    ];

    fn unset() -> EdgeSettings {
        EdgeSettings {
            bind_addr: None,
            locales: None,
            default_locale: None,
            locale_cookie: None,
            excluded_prefixes: None,
            translations_dir: None,
            auth_api_url: None,
            auth_timeout_secs: None,
            cooldown_secs: None,
            max_sessions: None,
        }
    }

    fn load_from_empty_args() -> EdgeSettings {
        EdgeSettings::load_from_iter([OsString::from("edge")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let config = load_from_empty_args().resolve().expect("defaults are valid");
        assert_eq!(config.bind_addr.port(), 8080);
        let locales: Vec<_> = config
            .routing
            .locales()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(locales, ["en", "fr", "es"]);
        assert_eq!(config.routing.locales().default_locale().as_str(), "en");
        assert_eq!(config.translations_dir, default_translations_dir());
        assert_eq!(config.auth_timeout, Duration::from_secs(10));
        assert_eq!(config.cooldown_seconds, 120);
        assert_eq!(config.max_sessions, DEFAULT_MAX_SESSIONS);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("EDGE_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            ("EDGE_LOCALES", Some("de, en".to_owned())),
            ("EDGE_DEFAULT_LOCALE", Some("de".to_owned())),
            ("EDGE_LOCALE_COOKIE", Some("lang".to_owned())),
            ("EDGE_EXCLUDED_PREFIXES", Some("/static".to_owned())),
            ("EDGE_TRANSLATIONS_DIR", Some("/srv/i18n".to_owned())),
            ("EDGE_AUTH_API_URL", Some("https://auth.example/api".to_owned())),
            ("EDGE_AUTH_TIMEOUT_SECS", Some("3".to_owned())),
            ("EDGE_COOLDOWN_SECS", Some("30".to_owned())),
            ("EDGE_MAX_SESSIONS", Some("500".to_owned())),
        ]);

        let config = load_from_empty_args().resolve().expect("overrides are valid");
        assert_eq!(config.bind_addr, "127.0.0.1:9090".parse().expect("addr"));
        assert_eq!(config.routing.locales().default_locale().as_str(), "de");
        assert!(config.routing.locales().contains("en"));
        assert_eq!(config.translations_dir, PathBuf::from("/srv/i18n"));
        assert_eq!(config.auth_api_url.as_str(), "https://auth.example/api");
        assert_eq!(config.auth_timeout, Duration::from_secs(3));
        assert_eq!(config.cooldown_seconds, 30);
        assert_eq!(config.max_sessions, 500);
    }

    #[rstest]
    #[case::default_outside_set(
        EdgeSettings { default_locale: Some("de".into()), ..unset() },
        "invalid locale configuration"
    )]
    #[case::bad_bind(
        EdgeSettings { bind_addr: Some("localhost".into()), ..unset() },
        "invalid bind address"
    )]
    #[case::bad_url(
        EdgeSettings { auth_api_url: Some("not a url".into()), ..unset() },
        "invalid auth API URL"
    )]
    #[case::zero_timeout(
        EdgeSettings { auth_timeout_secs: Some(0), ..unset() },
        "timeout"
    )]
    #[case::blank_cookie(
        EdgeSettings { locale_cookie: Some("  ".into()), ..unset() },
        "cookie name"
    )]
    #[case::zero_sessions(
        EdgeSettings { max_sessions: Some(0), ..unset() },
        "max sessions"
    )]
    fn invalid_values_are_rejected(#[case] settings: EdgeSettings, #[case] expected: &str) {
        let err = settings.resolve().expect_err("invalid settings");
        assert!(err.to_string().contains(expected), "{err}");
    }

    #[rstest]
    fn lists_skip_blank_entries() {
        assert_eq!(split_list(" en, ,fr ,"), ["en", "fr"]);
    }
}
