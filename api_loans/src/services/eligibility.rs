use common::{
    error::Res,
    jwt::Caller,
    misc::{non_negative, round_half_up},
};
use db::models::{credit::CreditAmounts, esg::EsgMetric, profile::Profile};
use sqlx::PgPool;

use crate::{
    dtos::eligibility::{EligibilityResult, EligibilityStatus, LoanOffer},
    policy::{BusinessType, LoanPolicy},
};

pub const SUGGEST_MORE_CREDITS: &str =
    "Earn more carbon credits by uploading GST invoices to boost your loan amount";
pub const SUGGEST_BETTER_ESG: &str =
    "Improve your ESG score to unlock a lower interest rate and a higher loan amount";
pub const SUGGEST_GST_REGISTRATION: &str =
    "Complete your GST registration to strengthen your loan application";

/// Reads the caller's profile, verified credits and latest ESG snapshot,
/// then computes the offer. Read-only.
pub async fn evaluate(pool: &PgPool, policy: &LoanPolicy, caller: &Caller) -> Res<EligibilityResult> {
    let profile = db::profile::get_profile_by_user_id(pool, caller.user_id).await?;
    let credits = db::credit::get_verified_credits_by_user_id(pool, caller.user_id).await?;
    let latest_esg = db::esg::get_latest_metric_by_user_id(pool, caller.user_id).await?;

    let result = compute_eligibility(policy, profile.as_ref(), &credits, latest_esg.as_ref());
    log::info!(
        "Eligibility for user {}: {} credits, ESG {:.1}, amount {} at {:.2}% ({:?})",
        caller.user_id,
        result.total_credits,
        result.esg_score,
        result.final_loan_amount,
        result.interest_rate,
        result.eligibility_status
    );
    Ok(result)
}

/// Mean of the three sub-scores of a snapshot; missing scores count as 0.
pub fn average_esg(snapshot: Option<&EsgMetric>, neutral: f64) -> f64 {
    match snapshot {
        Some(esg) => {
            (non_negative(esg.environmental_score)
                + non_negative(esg.social_score)
                + non_negative(esg.governance_score))
                / 3.0
        }
        None => neutral,
    }
}

/// Monthly installment of an amortizing loan, rounded half up.
pub fn monthly_emi(principal: f64, annual_rate_percent: f64, tenure_months: u16) -> f64 {
    let r = annual_rate_percent / 12.0 / 100.0;
    if r <= 0.0 || tenure_months == 0 {
        return round_half_up(principal / f64::from(tenure_months.max(1)));
    }
    let growth = (1.0 + r).powi(i32::from(tenure_months));
    if !growth.is_finite() {
        // installment converges to the interest-only payment
        return round_half_up(principal * r);
    }
    round_half_up(principal * r * growth / (growth - 1.0))
}

/// Computes the loan offer set. Pure: same inputs, same output.
///
/// `credits` must already be restricted to verified entries. Missing,
/// negative or non-finite amounts are counted as 0.
pub fn compute_eligibility(
    policy: &LoanPolicy,
    profile: Option<&Profile>,
    credits: &[CreditAmounts],
    latest_esg: Option<&EsgMetric>,
) -> EligibilityResult {
    let business_type =
        BusinessType::from_profile(profile.and_then(|p| p.business_type.as_deref()));
    let base_loan = policy.base_loan(business_type);

    let total_credits: f64 = credits.iter().map(|c| non_negative(c.credits_earned)).sum();
    let total_credit_value: f64 = credits.iter().map(|c| non_negative(c.credit_value)).sum();

    let avg_esg = average_esg(latest_esg, policy.neutral_esg_score);

    let credit_boost = total_credits * policy.credit_boost_per_credit;
    let esg_multiplier = 1.0 + (avg_esg - 50.0) / 100.0;
    let final_loan_amount = round_half_up((base_loan + credit_boost) * esg_multiplier);

    let interest_reduction = (avg_esg / 100.0 * policy.max_rate_reduction).min(policy.max_rate_reduction);
    let interest_rate =
        (policy.base_interest_rate - interest_reduction).max(policy.min_interest_rate);

    let loan_offers = policy
        .tenures_months
        .iter()
        .map(|&tenure| {
            let emi = monthly_emi(final_loan_amount, interest_rate, tenure);
            let total_payment = round_half_up(emi * f64::from(tenure));
            LoanOffer {
                tenure_months: tenure,
                monthly_emi: emi as i64,
                total_payment: total_payment as i64,
                total_interest: (total_payment - final_loan_amount) as i64,
            }
        })
        .collect();

    let eligibility_status = if final_loan_amount >= policy.min_eligible_amount {
        EligibilityStatus::Eligible
    } else {
        EligibilityStatus::Ineligible
    };

    let has_gstin = profile
        .and_then(|p| p.gstin.as_deref())
        .is_some_and(|gstin| !gstin.trim().is_empty());

    let improvement_suggestions = [
        (total_credits < policy.suggest_credits_below).then_some(SUGGEST_MORE_CREDITS),
        (avg_esg < policy.suggest_esg_below).then_some(SUGGEST_BETTER_ESG),
        (!has_gstin).then_some(SUGGEST_GST_REGISTRATION),
    ]
    .into_iter()
    .flatten()
    .map(str::to_string)
    .collect();

    EligibilityResult {
        base_loan_amount: base_loan,
        carbon_credit_boost: credit_boost,
        esg_score: avg_esg,
        esg_multiplier,
        final_loan_amount: final_loan_amount as i64,
        interest_rate,
        total_credits,
        total_credit_value,
        loan_offers,
        eligibility_status,
        improvement_suggestions,
    }
}
