use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailKind {
    CreditEarned,
    RedemptionCompleted,
    LoanApproved,
    LoanRejected,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: EmailKind,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

/// Body of the provider's send endpoint.
#[derive(Debug, Serialize)]
pub struct OutgoingEmail<'a> {
    pub from: &'a str,
    pub to: Vec<&'a str>,
    pub subject: &'a str,
    pub html: &'a str,
}
