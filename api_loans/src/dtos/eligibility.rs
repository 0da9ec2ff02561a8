use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EligibilityStatus {
    Eligible,
    Ineligible,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanOffer {
    pub tenure_months: u16,
    pub monthly_emi: i64,
    pub total_payment: i64,
    pub total_interest: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub base_loan_amount: f64,
    pub carbon_credit_boost: f64,
    pub esg_score: f64,
    pub esg_multiplier: f64,
    pub final_loan_amount: i64,
    pub interest_rate: f64,
    pub total_credits: f64,
    pub total_credit_value: f64,
    pub loan_offers: Vec<LoanOffer>,
    pub eligibility_status: EligibilityStatus,
    pub improvement_suggestions: Vec<String>,
}
