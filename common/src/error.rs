use std::fmt;

use actix_web::{HttpResponse, http::StatusCode};
use serde_json::{Map, Value};
use thiserror::Error;

pub type Res<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    // === CONVERSION ERRORS ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JWT error: {0}")]
    JWT(#[from] jsonwebtoken::errors::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    // === APPLICATION ERRORS ===
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Already processed: {0}")]
    AlreadyProcessed(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A third-party dependency answered with an error status worth
    /// forwarding to the caller as-is (rate limits, billing).
    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Status used when the error is returned from a handler directly.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::JWT(_) | AppError::Reqwest(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyProcessed(_) => StatusCode::CONFLICT,
            AppError::InvalidAction(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand back to the caller. Conversion and internal
    /// errors are logged here and only exposed in debug builds.
    pub fn public_message(&self) -> String {
        let is_dev = cfg!(debug_assertions);

        let internal = |kind: &str, err_msg: String| {
            log::error!("{}: {}", kind, err_msg);
            if is_dev {
                err_msg
            } else {
                "Internal server error".to_string()
            }
        };

        match self {
            // === CONVERSION ERRORS ===
            AppError::Database(error) => internal("Database error", error.to_string()),
            AppError::JWT(error) => internal("JWT error", error.to_string()),
            AppError::Reqwest(error) => internal("Reqwest error", error.to_string()),

            // === APPLICATION ERRORS ===
            AppError::Upstream { status, message } => {
                log::warn!("Upstream service answered {}: {}", status, message);
                message.clone()
            }
            AppError::Internal(error) => internal("Internal error", error.clone()),
            _ => self.to_string(),
        }
    }

    pub fn to_http_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.public_message() }))
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        self.to_http_response()
    }
}

/// An [`AppError`] answered with the status an endpoint's contract fixes
/// for its failures, instead of the error's own status.
///
/// Upstream errors keep their original status on every endpoint so the
/// caller can tell throttling from billing problems.
#[derive(Debug)]
pub struct Rejection {
    status: StatusCode,
    error: AppError,
    fields: Map<String, Value>,
}

impl Rejection {
    pub fn with_status(status: StatusCode, error: AppError) -> Self {
        let status = match &error {
            AppError::Upstream { .. } => error.status_code(),
            _ => status,
        };
        Rejection {
            status,
            error,
            fields: Map::new(),
        }
    }

    pub fn bad_request(error: AppError) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, error)
    }

    pub fn server_error(error: AppError) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, error)
    }

    /// Adds an extra top-level field to the error body.
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.error, self.status)
    }
}

impl actix_web::ResponseError for Rejection {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = self.fields.clone();
        body.insert(
            "error".to_string(),
            Value::String(self.error.public_message()),
        );
        HttpResponse::build(self.status).json(Value::Object(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{ResponseError, body};

    async fn body_json(res: HttpResponse) -> Value {
        let bytes = body::to_bytes(res.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn taxonomy_maps_to_natural_statuses() {
        let cases = [
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::AlreadyProcessed("x".into()), StatusCode::CONFLICT),
            (AppError::InvalidAction("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(error.status_code(), status, "{error}");
        }
    }

    #[test]
    fn upstream_keeps_its_status() {
        let error = AppError::Upstream {
            status: 402,
            message: "Payment required".into(),
        };
        assert_eq!(error.status_code(), StatusCode::PAYMENT_REQUIRED);

        let rejection = Rejection::server_error(AppError::Upstream {
            status: 429,
            message: "slow down".into(),
        });
        assert_eq!(rejection.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[actix_web::test]
    async fn rejection_pins_status_and_carries_fields() {
        let rejection = Rejection::bad_request(AppError::Forbidden("Admin role required".into()))
            .with_field("redemption_id", "abc");
        assert_eq!(rejection.status_code(), StatusCode::BAD_REQUEST);

        let json = body_json(rejection.error_response()).await;
        assert_eq!(json["error"], "Forbidden: Admin role required");
        assert_eq!(json["redemption_id"], "abc");
    }

    #[actix_web::test]
    async fn error_body_has_single_error_field() {
        let res = AppError::NotFound("Redemption not found".into()).to_http_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let json = body_json(res).await;
        assert_eq!(json, serde_json::json!({ "error": "Resource not found: Redemption not found" }));
    }
}
