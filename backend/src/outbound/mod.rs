//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **auth_api**: reqwest client for the authentication backend
//! - **dictionaries**: capability-scoped JSON dictionary files
//! - **timer**: Tokio-backed tick scheduling
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod auth_api;
pub mod dictionaries;
pub mod timer;
