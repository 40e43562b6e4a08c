//! Driven port for loading a translation dictionary for one locale.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;
use crate::domain::Locale;

define_port_error! {
    /// Errors surfaced while loading a dictionary.
    pub enum DictionaryLoadError {
        /// No dictionary exists for the locale.
        NotFound { locale: String } =>
            "no dictionary for locale {locale}",
        /// The dictionary could not be read.
        Read { locale: String, message: String } =>
            "failed to read dictionary for {locale}: {message}",
        /// The dictionary is not a JSON object.
        Decode { locale: String, message: String } =>
            "invalid dictionary for {locale}: {message}",
    }
}

/// Port returning the structured page text for a locale.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DictionaryLoader: Send + Sync {
    /// Load the dictionary for `locale`.
    async fn load(&self, locale: &Locale) -> Result<Value, DictionaryLoadError>;
}

/// Fixture loader returning an empty dictionary for every locale.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureDictionaryLoader;

#[async_trait]
impl DictionaryLoader for FixtureDictionaryLoader {
    async fn load(&self, _locale: &Locale) -> Result<Value, DictionaryLoadError> {
        Ok(Value::Object(serde_json::Map::new()))
    }
}
