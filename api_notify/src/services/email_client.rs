use std::time::Duration;

use common::{
    env_config::EmailConfig,
    error::{AppError, Res},
};
use log::{info, warn};
use reqwest::Client;
use serde_json::Value;

use crate::dtos::email::{OutgoingEmail, RenderedEmail};

/// Client of the transactional email provider.
#[derive(Clone)]
pub struct EmailClient {
    client: Client,
    config: EmailConfig,
}

impl EmailClient {
    pub fn new(config: EmailConfig, timeout: Duration) -> Res<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(EmailClient { client, config })
    }

    /// Sends one email and returns the provider's JSON answer.
    pub async fn send(&self, to: &str, email: &RenderedEmail) -> Res<Value> {
        if self.config.api_key.is_empty() {
            return Err(AppError::Internal(
                "Email provider API key is not configured".to_string(),
            ));
        }

        let request_body = OutgoingEmail {
            from: &self.config.from,
            to: vec![to],
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Email provider answered {}: {}", status, body);
            return Err(AppError::Internal(format!(
                "Email provider answered {}",
                status
            )));
        }

        let provider_response = response.json::<Value>().await?;
        info!("Email \"{}\" accepted by provider", email.subject);
        Ok(provider_response)
    }
}
