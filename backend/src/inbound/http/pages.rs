//! Page hand-off for the renderer.
//!
//! Localized page requests reach this handler only after the locale
//! middleware has accepted the path, so the locale is taken from the request
//! extensions and the dictionary is loaded from the catalogue.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use serde_json::Value;

use crate::domain::Locale;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::middleware::ResolvedLocale;

/// Everything the renderer needs for one localized page.
#[derive(Debug, Serialize)]
pub struct PageHandoff {
    pub locale: Locale,
    pub path: String,
    pub dictionary: Value,
}

/// `GET /{locale}` and `GET /{locale}/{tail}`.
pub async fn page(
    req: HttpRequest,
    locale: ResolvedLocale,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let ResolvedLocale(locale) = locale;
    let dictionary = state.dictionaries.load(&locale).await?;
    Ok(HttpResponse::Ok().json(PageHandoff {
        locale,
        path: req.path().to_owned(),
        dictionary,
    }))
}
