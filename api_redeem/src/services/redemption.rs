use chrono::{DateTime, Utc};
use common::{
    error::{AppError, Res},
    misc::{format_en_in, format_inr},
};
use db::{
    dtos::{notification::NotificationCreateRequest, redemption::RedemptionSettleRequest},
    models::redemption::CreditRedemption,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::redemption::RedemptionOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedemptionStatus {
    Pending,
    Completed,
    Failed,
}

impl RedemptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedemptionStatus::Pending => "pending",
            RedemptionStatus::Completed => "completed",
            RedemptionStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedemptionAction {
    Approve,
    Reject,
}

impl RedemptionAction {
    pub fn parse(action: &str) -> Res<Self> {
        match action {
            "approve" => Ok(RedemptionAction::Approve),
            "reject" => Ok(RedemptionAction::Reject),
            other => Err(AppError::InvalidAction(format!(
                "'{}' is not one of approve, reject",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CallerRole {
    User,
    Moderator,
    Admin,
}

impl CallerRole {
    /// Highest role among those granted to a user.
    pub fn from_roles(roles: &[String]) -> Self {
        roles
            .iter()
            .map(|role| match role.as_str() {
                "admin" => CallerRole::Admin,
                "moderator" => CallerRole::Moderator,
                _ => CallerRole::User,
            })
            .max()
            .unwrap_or(CallerRole::User)
    }
}

/// Storage the redemption transition reads from and writes to.
#[allow(async_fn_in_trait)]
pub trait RedemptionLedger {
    async fn find_redemption(&self, redemption_id: Uuid) -> Res<Option<CreditRedemption>>;

    /// Conditional write: applies only while the row is still pending and
    /// returns `None` otherwise.
    async fn settle_pending(
        &self,
        redemption_id: Uuid,
        data: &RedemptionSettleRequest,
    ) -> Res<Option<CreditRedemption>>;

    async fn append_notification(&self, data: NotificationCreateRequest) -> Res<()>;
}

impl RedemptionLedger for PgPool {
    async fn find_redemption(&self, redemption_id: Uuid) -> Res<Option<CreditRedemption>> {
        db::redemption::get_redemption_by_id(self, redemption_id).await
    }

    async fn settle_pending(
        &self,
        redemption_id: Uuid,
        data: &RedemptionSettleRequest,
    ) -> Res<Option<CreditRedemption>> {
        db::redemption::settle_pending_redemption(self, redemption_id, data).await
    }

    async fn append_notification(&self, data: NotificationCreateRequest) -> Res<()> {
        db::notification::insert_notification(self, data).await?;
        Ok(())
    }
}

pub fn generate_transaction_id(now: DateTime<Utc>) -> String {
    format!("TXN-{}", now.timestamp_millis())
}

/// Approves or rejects a pending redemption on behalf of an admin.
///
/// The transition is one-way: a record that is not pending, or that
/// another admin settles first, fails with `AlreadyProcessed`. The user
/// notification is only written after the status update went through.
pub async fn process_redemption<L: RedemptionLedger>(
    ledger: &L,
    caller_role: CallerRole,
    redemption_id: Uuid,
    action: &str,
    transaction_id: Option<String>,
) -> Res<RedemptionOutcome> {
    if caller_role != CallerRole::Admin {
        return Err(AppError::Forbidden("Admin role required".to_string()));
    }
    let action = RedemptionAction::parse(action)?;

    let redemption = ledger
        .find_redemption(redemption_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Redemption not found".to_string()))?;

    if redemption.status != RedemptionStatus::Pending.as_str() {
        return Err(AppError::AlreadyProcessed(format!(
            "Redemption is already {}",
            redemption.status
        )));
    }

    let now = Utc::now();
    let settle = match action {
        RedemptionAction::Approve => RedemptionSettleRequest {
            status: RedemptionStatus::Completed.as_str().to_string(),
            transaction_id: Some(
                transaction_id
                    .filter(|id| !id.trim().is_empty())
                    .unwrap_or_else(|| generate_transaction_id(now)),
            ),
            processed_at: now,
        },
        RedemptionAction::Reject => RedemptionSettleRequest {
            status: RedemptionStatus::Failed.as_str().to_string(),
            transaction_id: None,
            processed_at: now,
        },
    };

    let settled = ledger
        .settle_pending(redemption_id, &settle)
        .await?
        .ok_or_else(|| {
            log::warn!(
                "Redemption {} left pending before it could be settled",
                redemption_id
            );
            AppError::AlreadyProcessed("Redemption was processed concurrently".to_string())
        })?;

    log::info!(
        "Redemption {} for user {} -> {}",
        settled.id,
        settled.user_id,
        settled.status
    );

    let notification = match action {
        RedemptionAction::Approve => completed_notification(&settled),
        RedemptionAction::Reject => failed_notification(&settled),
    };
    if let Err(err) = ledger.append_notification(notification).await {
        log::error!(
            "Redemption {} settled but its notification was not stored: {}",
            settled.id,
            err
        );
    }

    let message = match action {
        RedemptionAction::Approve => "Redemption approved successfully",
        RedemptionAction::Reject => "Redemption rejected",
    };
    Ok(RedemptionOutcome {
        success: true,
        message: message.to_string(),
        redemption_id,
    })
}

fn completed_notification(redemption: &CreditRedemption) -> NotificationCreateRequest {
    let transaction_id = redemption.transaction_id.clone().unwrap_or_default();
    NotificationCreateRequest {
        user_id: redemption.user_id,
        kind: "redemption_completed".to_string(),
        title: "Redemption Completed".to_string(),
        message: format!(
            "Your redemption of {} credits worth {} has been completed. Transaction ID: {}",
            format_en_in(redemption.credit_amount),
            format_inr(redemption.monetary_value),
            transaction_id
        ),
        data: json!({
            "redemption_id": redemption.id,
            "credit_amount": redemption.credit_amount,
            "monetary_value": redemption.monetary_value,
            "redemption_type": redemption.redemption_type,
            "transaction_id": transaction_id,
        }),
    }
}

fn failed_notification(redemption: &CreditRedemption) -> NotificationCreateRequest {
    NotificationCreateRequest {
        user_id: redemption.user_id,
        kind: "redemption_failed".to_string(),
        title: "Redemption Failed".to_string(),
        message: format!(
            "Your redemption of {} credits worth {} could not be processed. Please contact support for details.",
            format_en_in(redemption.credit_amount),
            format_inr(redemption.monetary_value)
        ),
        data: json!({
            "redemption_id": redemption.id,
            "credit_amount": redemption.credit_amount,
            "monetary_value": redemption.monetary_value,
            "redemption_type": redemption.redemption_type,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, collections::HashMap};

    #[derive(Default)]
    struct MemoryLedger {
        rows: RefCell<HashMap<Uuid, CreditRedemption>>,
        notifications: RefCell<Vec<NotificationCreateRequest>>,
        writes: RefCell<usize>,
        /// Another admin settles the row between our read and our write.
        lose_race: bool,
        fail_notifications: bool,
    }

    impl MemoryLedger {
        fn with(redemption: CreditRedemption) -> Self {
            let ledger = MemoryLedger::default();
            ledger.rows.borrow_mut().insert(redemption.id, redemption);
            ledger
        }

        fn row(&self, id: Uuid) -> CreditRedemption {
            self.rows.borrow()[&id].clone()
        }
    }

    impl RedemptionLedger for MemoryLedger {
        async fn find_redemption(&self, redemption_id: Uuid) -> Res<Option<CreditRedemption>> {
            Ok(self.rows.borrow().get(&redemption_id).cloned())
        }

        async fn settle_pending(
            &self,
            redemption_id: Uuid,
            data: &RedemptionSettleRequest,
        ) -> Res<Option<CreditRedemption>> {
            let mut rows = self.rows.borrow_mut();
            let Some(row) = rows.get_mut(&redemption_id) else {
                return Ok(None);
            };
            if self.lose_race {
                row.status = "completed".to_string();
            }
            if row.status != "pending" {
                return Ok(None);
            }
            *self.writes.borrow_mut() += 1;
            row.status = data.status.clone();
            if data.transaction_id.is_some() {
                row.transaction_id = data.transaction_id.clone();
            }
            row.processed_at = Some(data.processed_at);
            Ok(Some(row.clone()))
        }

        async fn append_notification(&self, data: NotificationCreateRequest) -> Res<()> {
            if self.fail_notifications {
                return Err(AppError::Internal("notifications table unavailable".into()));
            }
            self.notifications.borrow_mut().push(data);
            Ok(())
        }
    }

    fn redemption(status: &str) -> CreditRedemption {
        CreditRedemption {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            credit_amount: 120.0,
            monetary_value: 150000.0,
            redemption_type: "bank_transfer".to_string(),
            status: status.to_string(),
            transaction_id: None,
            processed_at: None,
            created_at: Utc::now(),
        }
    }

    #[actix_web::test]
    async fn approve_completes_and_notifies() {
        let pending = redemption("pending");
        let id = pending.id;
        let ledger = MemoryLedger::with(pending);

        let outcome = process_redemption(
            &ledger,
            CallerRole::Admin,
            id,
            "approve",
            Some("UTR-884201".to_string()),
        )
        .await
        .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.redemption_id, id);

        let row = ledger.row(id);
        assert_eq!(row.status, "completed");
        assert_eq!(row.transaction_id.as_deref(), Some("UTR-884201"));
        assert!(row.processed_at.is_some());

        let notifications = ledger.notifications.borrow();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, "redemption_completed");
        assert_eq!(notifications[0].user_id, row.user_id);
        assert!(notifications[0].message.contains("₹1,50,000"));
        assert_eq!(notifications[0].data["credit_amount"], 120.0);
        assert_eq!(notifications[0].data["transaction_id"], "UTR-884201");
    }

    #[actix_web::test]
    async fn approve_without_transaction_id_generates_one() {
        let pending = redemption("pending");
        let id = pending.id;
        let ledger = MemoryLedger::with(pending);

        process_redemption(&ledger, CallerRole::Admin, id, "approve", None)
            .await
            .unwrap();

        let txn = ledger.row(id).transaction_id.unwrap();
        assert!(txn.starts_with("TXN-"));
        assert!(txn["TXN-".len()..].parse::<i64>().is_ok());
    }

    #[actix_web::test]
    async fn reject_fails_and_notifies() {
        let pending = redemption("pending");
        let id = pending.id;
        let ledger = MemoryLedger::with(pending);

        let outcome = process_redemption(&ledger, CallerRole::Admin, id, "reject", None)
            .await
            .unwrap();
        assert_eq!(outcome.message, "Redemption rejected");

        let row = ledger.row(id);
        assert_eq!(row.status, "failed");
        assert!(row.transaction_id.is_none());
        assert!(row.processed_at.is_some());
        assert_eq!(ledger.notifications.borrow()[0].kind, "redemption_failed");
    }

    #[actix_web::test]
    async fn terminal_records_are_never_reprocessed() {
        for status in ["completed", "failed"] {
            for action in ["approve", "reject"] {
                let done = redemption(status);
                let id = done.id;
                let ledger = MemoryLedger::with(done.clone());

                let err = process_redemption(&ledger, CallerRole::Admin, id, action, None)
                    .await
                    .unwrap_err();
                assert!(matches!(err, AppError::AlreadyProcessed(_)), "{status}/{action}");
                assert_eq!(*ledger.writes.borrow(), 0);
                assert!(ledger.notifications.borrow().is_empty());
                assert_eq!(ledger.row(id), done);
            }
        }
    }

    #[actix_web::test]
    async fn only_admins_may_process() {
        for role in [CallerRole::User, CallerRole::Moderator] {
            let pending = redemption("pending");
            let id = pending.id;
            let ledger = MemoryLedger::with(pending.clone());

            let err = process_redemption(&ledger, role, id, "approve", None)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Forbidden(_)));
            assert_eq!(ledger.row(id), pending);
            assert!(ledger.notifications.borrow().is_empty());
        }
    }

    #[actix_web::test]
    async fn unknown_action_leaves_record_unchanged() {
        let pending = redemption("pending");
        let id = pending.id;
        let ledger = MemoryLedger::with(pending.clone());

        let err = process_redemption(&ledger, CallerRole::Admin, id, "cancel", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidAction(_)));
        assert_eq!(ledger.row(id), pending);
        assert_eq!(*ledger.writes.borrow(), 0);
    }

    #[actix_web::test]
    async fn missing_record_is_not_found() {
        let ledger = MemoryLedger::default();
        let err = process_redemption(&ledger, CallerRole::Admin, Uuid::new_v4(), "reject", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[actix_web::test]
    async fn losing_a_concurrent_settle_is_already_processed() {
        let pending = redemption("pending");
        let id = pending.id;
        let ledger = MemoryLedger {
            lose_race: true,
            ..MemoryLedger::with(pending)
        };

        let err = process_redemption(&ledger, CallerRole::Admin, id, "approve", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyProcessed(_)));
        assert_eq!(*ledger.writes.borrow(), 0);
        assert!(ledger.notifications.borrow().is_empty());
    }

    #[actix_web::test]
    async fn notification_failure_does_not_undo_the_transition() {
        let pending = redemption("pending");
        let id = pending.id;
        let ledger = MemoryLedger {
            fail_notifications: true,
            ..MemoryLedger::with(pending)
        };

        let outcome = process_redemption(&ledger, CallerRole::Admin, id, "approve", None)
            .await
            .unwrap();
        assert!(outcome.success);
        assert_eq!(ledger.row(id).status, "completed");
    }

    #[test]
    fn highest_role_wins() {
        assert_eq!(CallerRole::from_roles(&[]), CallerRole::User);
        assert_eq!(
            CallerRole::from_roles(&["user".into(), "admin".into()]),
            CallerRole::Admin
        );
        assert_eq!(
            CallerRole::from_roles(&["moderator".into(), "support".into()]),
            CallerRole::Moderator
        );
    }
}
