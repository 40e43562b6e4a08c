//! Translation dictionary lookup table.
//!
//! One loader per supported locale, fixed at construction. There is no
//! registry to mutate afterwards; lookups are by key only.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use super::locale::{Locale, SupportedLocales};
use super::ports::{DictionaryLoadError, DictionaryLoader};

/// Errors returned by [`DictionaryCatalogue::load`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DictionaryError {
    /// No loader is registered for the locale.
    #[error("locale '{locale}' has no dictionary loader")]
    UnknownLocale { locale: String },
    /// The loader failed.
    #[error(transparent)]
    Load(#[from] DictionaryLoadError),
}

/// Immutable `locale -> loader` table.
#[derive(Clone)]
pub struct DictionaryCatalogue {
    loaders: BTreeMap<Locale, Arc<dyn DictionaryLoader>>,
}

impl DictionaryCatalogue {
    /// Build a table from explicit entries.
    pub fn new(entries: impl IntoIterator<Item = (Locale, Arc<dyn DictionaryLoader>)>) -> Self {
        Self {
            loaders: entries.into_iter().collect(),
        }
    }

    /// Register the same loader for every supported locale.
    #[must_use]
    pub fn uniform(locales: &SupportedLocales, loader: Arc<dyn DictionaryLoader>) -> Self {
        Self::new(locales.iter().map(|l| (l.clone(), Arc::clone(&loader))))
    }

    /// Whether a loader exists for `locale`.
    #[must_use]
    pub fn has(&self, locale: &Locale) -> bool {
        self.loaders.contains_key(locale)
    }

    /// Load the dictionary for `locale`.
    pub async fn load(&self, locale: &Locale) -> Result<Value, DictionaryError> {
        let loader = self
            .loaders
            .get(locale)
            .ok_or_else(|| DictionaryError::UnknownLocale {
                locale: locale.to_string(),
            })?;
        Ok(loader.load(locale).await?)
    }
}
