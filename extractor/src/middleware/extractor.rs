use std::{future::Future, pin::Pin, rc::Rc, sync::Arc};

use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures::future::{Ready, ok};

use common::{
    error::Res,
    jwt::{self, JwtClaims},
};

/// Validates the bearer token, when one is sent, and stores the outcome
/// as `Res<JwtClaims>` in the request extensions. Handlers decide whether
/// they need a caller.
pub struct ExtractionMiddleware {
    secret: Rc<String>,
}

impl ExtractionMiddleware {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: Rc::new(secret.to_string()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ExtractionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = ExtractionMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ExtractionMiddlewareService {
            service: Arc::new(service),
            secret: self.secret.clone(),
        })
    }
}

pub struct ExtractionMiddlewareService<S> {
    service: Arc<S>,
    secret: Rc<String>,
}

impl<S, B> Service<ServiceRequest> for ExtractionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // retrieve token from authorization header
        let auth_header = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|auth_value| auth_value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_owned());

        let secret = self.secret.clone();
        let srv = Arc::clone(&self.service);

        Box::pin(async move {
            if let Some(token) = auth_header {
                // validate token and insert claims to request object for future use
                let claims_res = jwt::validate_jwt(&token, &secret);
                if let Err(err) = &claims_res {
                    log::debug!("Bearer token rejected: {}", err);
                }
                req.extensions_mut().insert::<Res<JwtClaims>>(claims_res);
            }
            srv.call(req).await.map(|res| res.map_into_boxed_body())
        })
    }
}
