use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{dtos::redemption::RedemptionSettleRequest, models::redemption::CreditRedemption};

const REDEMPTION_COLUMNS: &str = r#"
    id, user_id,
    credit_amount::float8 AS credit_amount,
    monetary_value::float8 AS monetary_value,
    redemption_type, status, transaction_id, processed_at, created_at
"#;

pub async fn get_redemption_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    redemption_id: Uuid,
) -> Res<Option<CreditRedemption>> {
    sqlx::query_as::<_, CreditRedemption>(&format!(
        "SELECT {REDEMPTION_COLUMNS} FROM credit_redemptions WHERE id = $1"
    ))
    .bind(redemption_id)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

/// Moves a pending redemption to a terminal state in one statement.
///
/// Returns `None` when the row is no longer pending, so two concurrent
/// transitions can never both succeed.
pub async fn settle_pending_redemption<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    redemption_id: Uuid,
    data: &RedemptionSettleRequest,
) -> Res<Option<CreditRedemption>> {
    sqlx::query_as::<_, CreditRedemption>(&format!(
        r#"
        UPDATE credit_redemptions
        SET status = $2, transaction_id = COALESCE($3, transaction_id), processed_at = $4
        WHERE id = $1 AND status = 'pending'
        RETURNING {REDEMPTION_COLUMNS}
        "#
    ))
    .bind(redemption_id)
    .bind(&data.status)
    .bind(&data.transaction_id)
    .bind(data.processed_at)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}
