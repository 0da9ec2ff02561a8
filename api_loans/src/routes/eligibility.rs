use std::sync::Arc;

use actix_web::{HttpResponse, Responder, options, post, web};
use common::{
    error::{Rejection, Res},
    http::{self, Success},
    jwt::Caller,
};
use sqlx::PgPool;

use crate::{policy::LoanPolicy, services};

/// Computes the caller's loan offers from their profile, verified credits
/// and latest ESG snapshot.
///
/// Every failure, including a missing caller, is answered with 400.
#[post("/calculate-loan-eligibility")]
pub async fn post_calculate_eligibility(
    caller: Res<Caller>,
    pool: web::Data<Arc<PgPool>>,
    policy: web::Data<LoanPolicy>,
) -> Result<impl Responder, Rejection> {
    let caller = caller.map_err(Rejection::bad_request)?;
    let result = services::eligibility::evaluate(&pool, &policy, &caller)
        .await
        .map_err(Rejection::bad_request)?;
    Success::ok(result).map_err(Rejection::bad_request)
}

#[options("/calculate-loan-eligibility")]
pub async fn options_calculate_eligibility() -> HttpResponse {
    http::preflight().await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test, web};
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;

    use crate::{LoanPolicy, mount_loans};

    #[actix_web::test]
    async fn preflight_is_empty_ok() {
        let app = test::init_service(App::new().configure(mount_loans)).await;
        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/calculate-loan-eligibility")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 200);
        assert!(test::read_body(res).await.is_empty());
    }

    #[actix_web::test]
    async fn anonymous_caller_gets_400_without_touching_the_database() {
        // lazy pool: any query would fail, the handler must bail out first
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://nobody@127.0.0.1:1/none")
            .unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::new(pool)))
                .app_data(web::Data::new(LoanPolicy::default()))
                .configure(mount_loans),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/calculate-loan-eligibility")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 400);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Unauthorized: No authorization token provided");
    }
}
