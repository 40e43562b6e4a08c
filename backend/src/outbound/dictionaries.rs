//! Translation dictionaries stored as `{locale}.json` files.
//!
//! Reads go through a `cap_std` directory handle, so a loader can never reach
//! outside the configured translations directory. Locale identifiers are
//! validated path segments, which keeps the file name well-formed.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use serde_json::Value;
use tracing::debug;

use crate::domain::Locale;
use crate::domain::ports::{DictionaryLoadError, DictionaryLoader};

/// Dictionary loader backed by a directory of JSON files.
#[derive(Clone)]
pub struct FileDictionaryLoader {
    dir: Arc<Dir>,
}

impl FileDictionaryLoader {
    /// Open `path` as the translations directory.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the directory cannot be opened.
    pub fn open(path: &Path) -> io::Result<Self> {
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self { dir: Arc::new(dir) })
    }
}

#[async_trait]
impl DictionaryLoader for FileDictionaryLoader {
    async fn load(&self, locale: &Locale) -> Result<Value, DictionaryLoadError> {
        let dir = Arc::clone(&self.dir);
        let file_name = format!("{locale}.json");
        let read = tokio::task::spawn_blocking(move || dir.read_to_string(&file_name))
            .await
            .map_err(|error| DictionaryLoadError::read(locale.to_string(), error.to_string()))?;

        let contents = read.map_err(|error| match error.kind() {
            io::ErrorKind::NotFound => DictionaryLoadError::not_found(locale.to_string()),
            _ => DictionaryLoadError::read(locale.to_string(), error.to_string()),
        })?;
        debug!(%locale, bytes = contents.len(), "dictionary loaded");
        parse_dictionary(locale, &contents)
    }
}

fn parse_dictionary(locale: &Locale, contents: &str) -> Result<Value, DictionaryLoadError> {
    let value: Value = serde_json::from_str(contents)
        .map_err(|error| DictionaryLoadError::decode(locale.to_string(), error.to_string()))?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(DictionaryLoadError::decode(
            locale.to_string(),
            "dictionary root must be a JSON object",
        ))
    }
}
