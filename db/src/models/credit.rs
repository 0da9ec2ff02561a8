use serde::Serialize;
use uuid::Uuid;

/// Amount columns of a carbon credit entry, read as floats.
/// `None` when the stored value is null.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct CreditAmounts {
    pub id: Uuid,
    pub credits_earned: Option<f64>,
    pub credit_value: Option<f64>,
}
