use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Res};

/// Claims of an access token issued by the auth platform.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtClaims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: usize,
}

/// Extracts claims object from JWT token.
/// Requires JWT secret.
pub fn validate_jwt(token: &str, secret: &str) -> Res<JwtClaims> {
    let mut validation = Validation::default();
    // platform tokens carry `aud: authenticated`; identity is the signature + `sub`
    validation.validate_aud = false;

    let token_data = jsonwebtoken::decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

/// The authenticated caller of a request.
///
/// Built from the claims the extractor middleware stored in the request
/// extensions; handlers receive it as an explicit argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Caller {
    pub user_id: Uuid,
    pub email: Option<String>,
}

impl From<JwtClaims> for Caller {
    fn from(claims: JwtClaims) -> Self {
        Caller {
            user_id: claims.sub,
            email: claims.email,
        }
    }
}

pub fn get_caller(req: &HttpRequest) -> Res<Caller> {
    match req.extensions().get::<Res<JwtClaims>>() {
        Some(Ok(claims)) => Ok(Caller::from(claims.clone())),
        Some(Err(err)) => {
            log::debug!("Rejected bearer token: {}", err);
            Err(AppError::Unauthorized("Invalid token".to_string()))
        }
        None => Err(AppError::Unauthorized(
            "No authorization token provided".to_string(),
        )),
    }
}

impl FromRequest for Caller {
    type Error = AppError;
    type Future = Ready<Res<Self>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(get_caller(req))
    }
}

/// Token issuing, for tests only: in production tokens come from the auth platform.
#[cfg(any(test, feature = "test-utils"))]
pub mod issue {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header};
    use uuid::Uuid;

    use super::JwtClaims;
    use crate::{
        env_config::JwtConfig,
        error::{AppError, Res},
    };

    pub struct ClaimsSpec {
        pub user_id: Uuid,
        pub email: Option<String>,
        pub expiration_hours: i64,
    }

    /// Generates a JWT token for the given user.
    pub fn generate_jwt(issue: ClaimsSpec, config: &JwtConfig) -> Res<String> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::hours(issue.expiration_hours))
            .ok_or_else(|| AppError::Internal("Token expiration out of range".to_string()))?
            .timestamp();

        let claims = JwtClaims {
            sub: issue.user_id,
            email: issue.email,
            exp: expiration as usize,
        };

        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        issue::{ClaimsSpec, generate_jwt},
        *,
    };
    use crate::env_config::JwtConfig;
    use actix_web::test::TestRequest;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
        }
    }

    #[test]
    fn issued_token_validates_with_same_secret() {
        let user_id = Uuid::new_v4();
        let token = generate_jwt(
            ClaimsSpec {
                user_id,
                email: Some("owner@example.com".to_string()),
                expiration_hours: 1,
            },
            &config(),
        )
        .unwrap();

        let claims = validate_jwt(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email.as_deref(), Some("owner@example.com"));

        assert!(matches!(
            validate_jwt(&token, "other-secret"),
            Err(AppError::JWT(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = generate_jwt(
            ClaimsSpec {
                user_id: Uuid::new_v4(),
                email: None,
                expiration_hours: -2,
            },
            &config(),
        )
        .unwrap();
        assert!(validate_jwt(&token, "test-secret").is_err());
    }

    #[test]
    fn missing_claims_mean_unauthorized() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(get_caller(&req), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn invalid_claims_mean_unauthorized() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut()
            .insert::<Res<JwtClaims>>(Err(AppError::Internal("bad signature".into())));
        match get_caller(&req) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid token"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn valid_claims_become_caller() {
        let user_id = Uuid::new_v4();
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert::<Res<JwtClaims>>(Ok(JwtClaims {
            sub: user_id,
            email: None,
            exp: usize::MAX,
        }));
        assert_eq!(get_caller(&req).unwrap().user_id, user_id);
    }
}
