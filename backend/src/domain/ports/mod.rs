//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod dictionary_loader;
mod tick_scheduler;
mod verification_mailer;

#[cfg(test)]
pub use dictionary_loader::MockDictionaryLoader;
pub use dictionary_loader::{DictionaryLoadError, DictionaryLoader, FixtureDictionaryLoader};
pub use tick_scheduler::{PendingTick, TickCallback, TickScheduler};
#[cfg(test)]
pub use verification_mailer::MockVerificationMailer;
pub use verification_mailer::{FixtureVerificationMailer, VerificationMailer};
