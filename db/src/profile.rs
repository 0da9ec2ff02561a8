use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::profile::Profile;

pub async fn get_profile_by_user_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Option<Profile>> {
    sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, email, full_name, business_type, gstin, created_at, updated_at
        FROM profiles
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}
