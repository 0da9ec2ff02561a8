use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::JsonValue;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    pub data: Option<JsonValue>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
