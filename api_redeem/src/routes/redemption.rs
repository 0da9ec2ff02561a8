use std::sync::Arc;

use actix_web::{HttpResponse, Responder, options, post, web};
use common::{
    error::{AppError, Rejection, Res},
    http::{self, Success},
    jwt::Caller,
};
use sqlx::PgPool;

use crate::{
    dtos::redemption::RedeemRequest,
    services::redemption::{self, CallerRole},
};

/// Approves or rejects a pending credit redemption. Admin only.
///
/// Failures are answered with 400 and echo the redemption id.
#[post("/redeem-credits")]
pub async fn post_redeem_credits(
    caller: Res<Caller>,
    pool: web::Data<Arc<PgPool>>,
    req: web::Json<RedeemRequest>,
) -> Result<impl Responder, Rejection> {
    let req = req.into_inner();
    let redemption_id = req.redemption_id;
    let action = req.action_text();
    let reject = |err: AppError| {
        Rejection::bad_request(err).with_field("redemption_id", redemption_id.to_string())
    };

    let caller = caller.map_err(reject)?;
    let pool: &PgPool = &pool;

    let roles = db::role::get_roles_by_user_id(pool, caller.user_id)
        .await
        .map_err(reject)?;
    let role = CallerRole::from_roles(&roles);
    if role != CallerRole::Admin {
        log::warn!(
            "User {} tried to {} redemption {} without admin role",
            caller.user_id,
            action,
            redemption_id
        );
    }

    let outcome = redemption::process_redemption(
        pool,
        role,
        redemption_id,
        &action,
        req.transaction_id,
    )
    .await
    .map_err(reject)?;
    Success::ok(outcome).map_err(reject)
}

#[options("/redeem-credits")]
pub async fn options_redeem_credits() -> HttpResponse {
    http::preflight().await
}
