use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::esg::EsgMetric;

pub async fn get_latest_metric_by_user_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Option<EsgMetric>> {
    sqlx::query_as::<_, EsgMetric>(
        r#"
        SELECT id, user_id,
               environmental_score::float8 AS environmental_score,
               social_score::float8 AS social_score,
               governance_score::float8 AS governance_score,
               metric_date
        FROM esg_metrics
        WHERE user_id = $1
        ORDER BY metric_date DESC, created_at DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}
