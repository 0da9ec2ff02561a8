use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct RedeemRequest {
    pub redemption_id: Uuid,
    /// Kept untyped so a malformed action is still answered with the id.
    #[serde(default)]
    pub action: Value,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

impl RedeemRequest {
    /// The action as sent; non-string values in their JSON form.
    pub fn action_text(&self) -> String {
        match &self.action {
            Value::String(action) => action.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedemptionOutcome {
    pub success: bool,
    pub message: String,
    pub redemption_id: Uuid,
}
