use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::credit::CreditAmounts;

/// Verified ledger entries of a user. Other statuses never count towards
/// eligibility.
pub async fn get_verified_credits_by_user_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Vec<CreditAmounts>> {
    sqlx::query_as::<_, CreditAmounts>(
        r#"
        SELECT id,
               credits_earned::float8 AS credits_earned,
               credit_value::float8 AS credit_value
        FROM carbon_credits
        WHERE user_id = $1 AND status = 'verified'
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}
