//! Storefront edge library: locale resolution, failure normalization and the
//! resend-verification cooldown, with the HTTP adapters that host them.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use middleware::Trace;
