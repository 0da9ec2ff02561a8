use actix_web::{HttpRequest, HttpResponse, Responder, error::JsonPayloadError, web};
use serde::Serialize;

use super::error::{AppError, Res};

pub struct Success;
impl Success {
    pub fn ok<T: Serialize>(body: T) -> Res<impl Responder> {
        Result::Ok(HttpResponse::Ok().json(body))
    }
}

/// Empty 200 answered to `OPTIONS` on every endpoint.
pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// JSON extractor settings answering malformed bodies with `{error}`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            AppError::BadRequest(err.to_string()).into()
        })
}
