//! Failure normalization endpoint.
//!
//! Display surfaces that catch a foreign value (a transport error serialised
//! by the browser client, an `Error`, a bare string) post it here and render
//! the returned `{message, details?, code?}` shape.

use actix_web::{HttpResponse, post, web};
use serde_json::Value;

use crate::domain::normalize_value;

/// `POST /api/v1/errors/normalize`
#[post("/errors/normalize")]
pub async fn normalize_failure(payload: web::Json<Value>) -> HttpResponse {
    HttpResponse::Ok().json(normalize_value(&payload))
}
