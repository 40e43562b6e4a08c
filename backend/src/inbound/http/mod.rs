//! HTTP inbound adapter.

pub mod error;
pub mod failures;
pub mod health;
pub mod pages;
pub mod state;
pub mod verification;

use actix_web::web;

pub use error::{ApiError, ApiResult};

/// Register every route of the edge.
///
/// Callers provide `web::Data<HealthState>` and `web::Data<HttpState>` and
/// wrap the app in the locale and trace middleware.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use storefront_edge::inbound::http::{configure, health::HealthState};
///
/// let app = App::new()
///     .app_data(web::Data::new(HealthState::new()))
///     .configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_payload_error))
        .service(health::ready)
        .service(health::live)
        .service(
            web::scope("/api/v1")
                .service(verification::open_session)
                .service(verification::resend)
                .service(failures::normalize_failure),
        )
        .service(
            web::resource(["/{locale}", "/{locale}/{tail:.*}"])
                .route(web::get().to(pages::page)),
        );
}
