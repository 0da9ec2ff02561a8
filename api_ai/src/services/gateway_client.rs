use std::time::Duration;

use common::{
    env_config::AiGatewayConfig,
    error::{AppError, Res},
};
use log::{info, warn};
use reqwest::{Client, StatusCode};

use crate::dtos::chat::{ChatMessage, CompletionRequest, CompletionResponse};

/// Client of an OpenAI-compatible `chat/completions` endpoint.
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    config: AiGatewayConfig,
}

impl GatewayClient {
    pub fn new(config: AiGatewayConfig, timeout: Duration) -> Res<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(GatewayClient { client, config })
    }

    pub async fn complete(&self, messages: Vec<ChatMessage>) -> Res<String> {
        if self.config.api_key.is_empty() {
            return Err(AppError::Internal(
                "AI gateway API key is not configured".to_string(),
            ));
        }

        let request_body = CompletionRequest {
            model: self.config.model.clone(),
            messages,
        };

        info!("Sending chat completion request to {}", self.config.url);
        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("AI gateway answered {}: {}", status, body);
            return Err(classify_failure(status));
        }

        let completion = response.json::<CompletionResponse>().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::Internal("AI gateway returned no choices".to_string()))
    }
}

/// Rate limit and billing failures are forwarded with their status; any
/// other failure is internal.
pub fn classify_failure(status: StatusCode) -> AppError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => AppError::Upstream {
            status: status.as_u16(),
            message: "Rate limits exceeded, please try again later.".to_string(),
        },
        StatusCode::PAYMENT_REQUIRED => AppError::Upstream {
            status: status.as_u16(),
            message: "Payment required, please add funds to your AI workspace.".to_string(),
        },
        other => AppError::Internal(format!("AI gateway error: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttling_and_billing_pass_through() {
        match classify_failure(StatusCode::TOO_MANY_REQUESTS) {
            AppError::Upstream { status, .. } => assert_eq!(status, 429),
            other => panic!("unexpected: {other:?}"),
        }
        match classify_failure(StatusCode::PAYMENT_REQUIRED) {
            AppError::Upstream { status, .. } => assert_eq!(status, 402),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn other_statuses_are_internal() {
        assert!(matches!(
            classify_failure(StatusCode::BAD_GATEWAY),
            AppError::Internal(_)
        ));
        assert!(matches!(
            classify_failure(StatusCode::UNAUTHORIZED),
            AppError::Internal(_)
        ));
    }

    #[actix_web::test]
    async fn missing_api_key_fails_before_any_request() {
        let client = GatewayClient::new(
            AiGatewayConfig {
                url: "http://127.0.0.1:1/v1/chat/completions".to_string(),
                api_key: String::new(),
                model: "test-model".to_string(),
            },
            Duration::from_secs(1),
        )
        .unwrap();
        let result = client.complete(vec![]).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
