//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only see domain services and
//! ports, so they stay testable without network or filesystem access.

use std::sync::Arc;

use crate::domain::{DictionaryCatalogue, VerificationSessions};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub sessions: Arc<VerificationSessions>,
    pub dictionaries: DictionaryCatalogue,
}

impl HttpState {
    /// Bundle the verification registry with the dictionary table.
    pub fn new(sessions: Arc<VerificationSessions>, dictionaries: DictionaryCatalogue) -> Self {
        Self {
            sessions,
            dictionaries,
        }
    }
}
