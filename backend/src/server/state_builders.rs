//! Construction of handler state from validated configuration.

use std::io;
use std::sync::Arc;

use storefront_edge::domain::ports::{DictionaryLoader, TickScheduler, VerificationMailer};
use storefront_edge::domain::{DictionaryCatalogue, VerificationSessions};
use storefront_edge::inbound::http::state::HttpState;
use storefront_edge::outbound::auth_api::HttpVerificationMailer;
use storefront_edge::outbound::dictionaries::FileDictionaryLoader;
use storefront_edge::outbound::timer::TokioTickScheduler;
use storefront_edge::settings::EdgeConfig;
use tracing::info;

/// Wire the real adapters behind [`HttpState`].
///
/// Must run inside the runtime that should drive cooldown ticks.
///
/// # Errors
/// Returns [`io::Error`] when the translations directory cannot be opened,
/// the auth client cannot be built or no Tokio runtime is active.
pub(crate) fn build_http_state(config: &EdgeConfig) -> io::Result<HttpState> {
    let loader: Arc<dyn DictionaryLoader> =
        Arc::new(FileDictionaryLoader::open(&config.translations_dir).map_err(|e| {
            io::Error::new(
                e.kind(),
                format!(
                    "failed to open translations at {}: {e}",
                    config.translations_dir.display()
                ),
            )
        })?);
    let dictionaries = DictionaryCatalogue::uniform(config.routing.locales(), loader);

    let mailer = HttpVerificationMailer::new(&config.auth_api_url, config.auth_timeout)
        .map_err(io::Error::other)?;
    info!(endpoint = %mailer.endpoint(), "auth API configured");
    let mailer: Arc<dyn VerificationMailer> = Arc::new(mailer);

    let scheduler: Arc<dyn TickScheduler> =
        Arc::new(TokioTickScheduler::current().map_err(io::Error::other)?);
    let sessions = VerificationSessions::new(mailer, scheduler, config.cooldown_seconds)
        .with_max_sessions(config.max_sessions);

    Ok(HttpState::new(Arc::new(sessions), dictionaries))
}
