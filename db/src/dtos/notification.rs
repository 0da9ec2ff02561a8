use sqlx::types::JsonValue;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationCreateRequest {
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub data: JsonValue,
}
