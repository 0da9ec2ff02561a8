use std::sync::Arc;

use actix_web::{HttpResponse, Responder, options, post, web};
use common::{
    error::{Rejection, Res},
    http::{self, Success},
    jwt::Caller,
};
use sqlx::PgPool;

use crate::{
    dtos::email::SendEmailRequest,
    services::{self, email_client::EmailClient},
};

/// Sends one of the fixed notification emails to a user.
///
/// Answers with the provider's response; every failure is a 500.
#[post("/send-notification-email")]
pub async fn post_send_notification_email(
    caller: Res<Caller>,
    pool: web::Data<Arc<PgPool>>,
    client: web::Data<EmailClient>,
    req: web::Json<SendEmailRequest>,
) -> Result<impl Responder, Rejection> {
    let caller = caller.map_err(Rejection::server_error)?;
    log::debug!(
        "User {} requested a {:?} email for {}",
        caller.user_id,
        req.kind,
        req.user_id
    );

    let provider_response = services::email::send_notification_email(&pool, &client, &req)
        .await
        .map_err(Rejection::server_error)?;
    Success::ok(provider_response).map_err(Rejection::server_error)
}

#[options("/send-notification-email")]
pub async fn options_send_notification_email() -> HttpResponse {
    http::preflight().await
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use actix_web::{App, test, web};
    use common::env_config::EmailConfig;
    use serde_json::{Value, json};
    use sqlx::postgres::PgPoolOptions;
    use uuid::Uuid;

    use crate::{EmailClient, mount_notify};

    #[actix_web::test]
    async fn anonymous_caller_gets_500() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://nobody@127.0.0.1:1/none")
            .unwrap();
        let client = EmailClient::new(
            EmailConfig {
                api_url: "http://127.0.0.1:1/emails".to_string(),
                api_key: "key".to_string(),
                from: "EcoFin <test@example.com>".to_string(),
            },
            Duration::from_millis(200),
        )
        .unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::new(pool)))
                .app_data(web::Data::new(client))
                .configure(mount_notify),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/send-notification-email")
            .set_json(json!({
                "userId": Uuid::new_v4(),
                "type": "loan_approved",
                "data": { "amount": 250000 }
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 500);
        let body: Value = test::read_body_json(res).await;
        assert!(body["error"].as_str().unwrap().starts_with("Unauthorized"));
    }

    #[::std::prelude::v1::test]
    fn request_uses_camel_case_and_snake_case_types() {
        let req: crate::dtos::email::SendEmailRequest = serde_json::from_value(json!({
            "userId": "6f1c1b2e-8a3d-4c55-9d7e-2b1f0a9c4e11",
            "type": "redemption_completed",
            "data": { "credit_amount": 10 }
        }))
        .unwrap();
        assert_eq!(req.kind, crate::dtos::email::EmailKind::RedemptionCompleted);
        assert_eq!(req.data["credit_amount"], 10);

        let unknown = serde_json::from_value::<crate::dtos::email::SendEmailRequest>(json!({
            "userId": "6f1c1b2e-8a3d-4c55-9d7e-2b1f0a9c4e11",
            "type": "newsletter"
        }));
        assert!(unknown.is_err());
    }
}
