use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessType {
    Manufacturing,
    Services,
    Retail,
    Agriculture,
    Technology,
    Other,
}

impl BusinessType {
    pub const ALL: [BusinessType; 6] = [
        BusinessType::Manufacturing,
        BusinessType::Services,
        BusinessType::Retail,
        BusinessType::Agriculture,
        BusinessType::Technology,
        BusinessType::Other,
    ];

    /// Reads the stored profile value; missing or unknown types are `Other`.
    pub fn from_profile(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("manufacturing") => BusinessType::Manufacturing,
            Some("services") => BusinessType::Services,
            Some("retail") => BusinessType::Retail,
            Some("agriculture") => BusinessType::Agriculture,
            Some("technology") => BusinessType::Technology,
            _ => BusinessType::Other,
        }
    }
}

/// Tunable tables and constants of the loan offer computation.
#[derive(Debug, Clone)]
pub struct LoanPolicy {
    /// Base principal per business type.
    pub base_loans: HashMap<BusinessType, f64>,
    /// Principal added per verified credit.
    pub credit_boost_per_credit: f64,
    /// Average ESG score assumed without any snapshot.
    pub neutral_esg_score: f64,
    /// Annual rate in percent before the ESG reduction.
    pub base_interest_rate: f64,
    pub max_rate_reduction: f64,
    pub min_interest_rate: f64,
    pub tenures_months: Vec<u16>,
    /// Smallest principal that is still offered.
    pub min_eligible_amount: f64,
    pub suggest_credits_below: f64,
    pub suggest_esg_below: f64,
}

impl LoanPolicy {
    pub fn base_loan(&self, business_type: BusinessType) -> f64 {
        self.base_loans
            .get(&business_type)
            .or_else(|| self.base_loans.get(&BusinessType::Other))
            .copied()
            .unwrap_or(0.0)
    }
}

impl Default for LoanPolicy {
    fn default() -> Self {
        LoanPolicy {
            base_loans: HashMap::from([
                (BusinessType::Manufacturing, 500_000.0),
                (BusinessType::Services, 300_000.0),
                (BusinessType::Retail, 250_000.0),
                (BusinessType::Agriculture, 400_000.0),
                (BusinessType::Technology, 350_000.0),
                (BusinessType::Other, 200_000.0),
            ]),
            credit_boost_per_credit: 15.0,
            neutral_esg_score: 50.0,
            base_interest_rate: 12.0,
            max_rate_reduction: 4.0,
            min_interest_rate: 8.0,
            tenures_months: vec![12, 24, 36, 48, 60],
            min_eligible_amount: 50_000.0,
            suggest_credits_below: 5.0,
            suggest_esg_below: 60.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_and_missing_types_fall_back_to_other() {
        assert_eq!(BusinessType::from_profile(None), BusinessType::Other);
        assert_eq!(BusinessType::from_profile(Some("mining")), BusinessType::Other);
        assert_eq!(
            BusinessType::from_profile(Some("Retail")),
            BusinessType::Retail
        );
    }

    #[test]
    fn default_table_matches_published_amounts() {
        let policy = LoanPolicy::default();
        assert_eq!(policy.base_loan(BusinessType::Manufacturing), 500_000.0);
        assert_eq!(policy.base_loan(BusinessType::Services), 300_000.0);
        assert_eq!(policy.base_loan(BusinessType::Retail), 250_000.0);
        assert_eq!(policy.base_loan(BusinessType::Agriculture), 400_000.0);
        assert_eq!(policy.base_loan(BusinessType::Technology), 350_000.0);
        assert_eq!(policy.base_loan(BusinessType::Other), 200_000.0);
    }

    #[test]
    fn sparse_table_uses_other_entry() {
        let policy = LoanPolicy {
            base_loans: HashMap::from([(BusinessType::Other, 1_000.0)]),
            ..LoanPolicy::default()
        };
        assert_eq!(policy.base_loan(BusinessType::Technology), 1_000.0);
    }
}
