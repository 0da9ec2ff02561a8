use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, PartialEq)]
pub struct CreditRedemption {
    pub id: Uuid,
    pub user_id: Uuid,
    pub credit_amount: f64,
    pub monetary_value: f64,
    pub redemption_type: String,
    pub status: String,
    pub transaction_id: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
