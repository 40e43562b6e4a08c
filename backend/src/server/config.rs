//! HTTP server configuration object.

use std::net::SocketAddr;

use storefront_edge::inbound::http::state::HttpState;
use storefront_edge::middleware::LocaleRouting;

/// Everything [`super::create_server`] needs besides the health state.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) routing: LocaleRouting,
    pub(crate) http_state: HttpState,
}

impl ServerConfig {
    /// Bundle the listener address, locale routing and handler state.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, routing: LocaleRouting, http_state: HttpState) -> Self {
        Self {
            bind_addr,
            routing,
            http_state,
        }
    }

    /// Socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(dead_code, reason = "read by bootstrap tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
