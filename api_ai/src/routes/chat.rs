use actix_web::{HttpResponse, Responder, options, post, web};
use common::{
    error::{AppError, Rejection},
    http::{self, Success},
};

use crate::{
    dtos::chat::{ChatRequest, ChatResponse},
    services::{self, gateway_client::GatewayClient},
};

/// Answers a short question through the AI gateway.
///
/// Gateway throttling (429) and billing (402) statuses are passed
/// through; anything else unexpected is a 500.
#[post("/ai-chat")]
pub async fn post_ai_chat(
    client: web::Data<GatewayClient>,
    req: web::Json<ChatRequest>,
) -> Result<impl Responder, Rejection> {
    let reject = |err: AppError| match err {
        AppError::BadRequest(_) => Rejection::bad_request(err),
        _ => Rejection::server_error(err),
    };

    let response = services::chat::answer(&client, &req).await.map_err(reject)?;
    Success::ok(ChatResponse { response }).map_err(reject)
}

#[options("/ai-chat")]
pub async fn options_ai_chat() -> HttpResponse {
    http::preflight().await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use actix_web::{App, test, web};
    use common::env_config::AiGatewayConfig;
    use serde_json::{Value, json};

    use crate::{GatewayClient, mount_ai};

    fn client(api_key: &str) -> GatewayClient {
        GatewayClient::new(
            AiGatewayConfig {
                url: "http://127.0.0.1:1/v1/chat/completions".to_string(),
                api_key: api_key.to_string(),
                model: "test-model".to_string(),
            },
            Duration::from_millis(200),
        )
        .unwrap()
    }

    #[actix_web::test]
    async fn blank_query_is_a_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(client("key")))
                .configure(mount_ai),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/ai-chat")
            .set_json(json!({ "query": "   " }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 400);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Bad request: Query is required");
    }

    #[actix_web::test]
    async fn unreachable_gateway_is_a_server_error() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(client("key")))
                .configure(mount_ai),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/ai-chat")
            .set_json(json!({ "query": "What is an ESG score?", "language": "en" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 500);
        let body: Value = test::read_body_json(res).await;
        assert!(body["error"].is_string());
    }
}
