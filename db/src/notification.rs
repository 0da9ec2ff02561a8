use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};

use crate::{dtos::notification::NotificationCreateRequest, models::notification::Notification};

pub async fn insert_notification<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: NotificationCreateRequest,
) -> Res<Notification> {
    sqlx::query_as::<_, Notification>(
        r#"
        INSERT INTO notifications (user_id, type, title, message, data)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, type, title, message, data, read, created_at
        "#,
    )
    .bind(data.user_id)
    .bind(data.kind)
    .bind(data.title)
    .bind(data.message)
    .bind(data.data)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}
