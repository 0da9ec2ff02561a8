use chrono::{DateTime, Utc};

/// Terminal state written by a redemption transition.
#[derive(Debug, Clone, PartialEq)]
pub struct RedemptionSettleRequest {
    pub status: String,
    pub transaction_id: Option<String>,
    pub processed_at: DateTime<Utc>,
}
