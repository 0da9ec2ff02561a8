use common::error::{AppError, Res};
use serde_json::Value;
use sqlx::PgPool;

use crate::{
    dtos::email::SendEmailRequest,
    services::{email_client::EmailClient, templates},
};

/// Renders the template for the request and mails it to the user's
/// profile address.
pub async fn send_notification_email(
    pool: &PgPool,
    client: &EmailClient,
    req: &SendEmailRequest,
) -> Res<Value> {
    let profile = db::profile::get_profile_by_user_id(pool, req.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User profile not found".to_string()))?;
    let email_address = profile
        .email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .ok_or_else(|| AppError::NotFound("User has no email address".to_string()))?;

    let email = templates::render(req.kind, profile.full_name.as_deref(), &req.data);
    log::info!("Sending {:?} email to user {}", req.kind, req.user_id);
    client.send(email_address, &email).await
}
