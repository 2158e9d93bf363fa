use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{
        AuditLogEntry,
        NewTransaction,
        Paisa,
        PendingTransaction,
        Transaction,
        TransactionMethod,
        TransactionStatus,
        UserId,
        DEFAULT_CURRENCY_CODE,
    },
    ledger_api::{
        errors::ContributionError,
        ledger_objects::{
            ApprovalResult,
            ContributionHistory,
            OfflineContribution,
            OnlinePaymentReceipt,
            OrderHandle,
            OrderRequest,
            PaymentCallback,
            RejectionResult,
            SecondaryWrite,
        },
    },
    traits::{ContributionDatabase, NewGatewayOrder, OfflineResolution, PaymentGateway},
};

/// The most rows [`ContributionApi::list_pending_offline`] returns.
pub const PENDING_LIST_LIMIT: i64 = 200;

/// `ContributionApi` is the transaction service for the contribution ledger.
///
/// It is constructed once per process from an explicit database backend and payment gateway. It holds no mutable
/// state of its own: everything lives in the ledger and at the gateway.
///
/// The caller identity passed to each operation must already have been authenticated by the transport layer.
pub struct ContributionApi<B, G> {
    db: B,
    gateway: G,
}

impl<B, G> Debug for ContributionApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContributionApi")
    }
}

impl<B, G> ContributionApi<B, G> {
    pub fn new(db: B, gateway: G) -> Self {
        Self { db, gateway }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }
}

impl<B, G> ContributionApi<B, G>
where
    B: ContributionDatabase,
    G: PaymentGateway,
{
    /// True iff the user holds an admin role in any group. Every admin-gated operation goes through this check.
    pub async fn is_admin(&self, user_id: &UserId) -> Result<bool, ContributionError> {
        let result = self.db.is_admin(user_id).await?;
        Ok(result)
    }

    async fn require_admin(&self, caller: &UserId, action: &str) -> Result<(), ContributionError> {
        if self.is_admin(caller).await? {
            Ok(())
        } else {
            warn!("🔄️🔒️ {caller} tried to {action} without an admin role");
            Err(ContributionError::AuthorizationError(format!("Only admins can {action}")))
        }
    }

    /// Creates a gateway order for the given amount in rupees, rounded to the nearest paisa.
    pub async fn create_order(
        &self,
        amount_rupees: f64,
        request: OrderRequest,
    ) -> Result<OrderHandle, ContributionError> {
        let amount = Paisa::try_from_rupees(amount_rupees)
            .map_err(|e| ContributionError::ValidationError(format!("Invalid amount. {e}")))?;
        self.open_gateway_order(amount, request).await
    }

    /// Creates a gateway order for an amount already expressed in minor units (paisa). Fractional amounts are rounded
    /// to the nearest paisa.
    pub async fn create_order_in_minor_units(
        &self,
        amount_paisa: f64,
        request: OrderRequest,
    ) -> Result<OrderHandle, ContributionError> {
        let amount = Paisa::try_from_minor_units(amount_paisa)
            .map_err(|e| ContributionError::ValidationError(format!("Invalid amount. {e}")))?;
        self.open_gateway_order(amount, request).await
    }

    async fn open_gateway_order(&self, amount: Paisa, request: OrderRequest) -> Result<OrderHandle, ContributionError> {
        if !amount.is_positive() {
            return Err(ContributionError::ValidationError("Amount must be greater than zero".to_string()));
        }
        let currency = request.currency.unwrap_or_else(|| DEFAULT_CURRENCY_CODE.to_string());
        let new_order = NewGatewayOrder { amount, currency, receipt: request.receipt, notes: request.notes };
        let order = self.gateway.create_order(new_order).await?;
        info!("🔄️🧾️ Gateway order {} created for {} {}", order.id, order.amount, order.currency);
        let shadow_copy = SecondaryWrite::from_result(self.db.upsert_gateway_order(&order).await);
        if let SecondaryWrite::Failed(e) = &shadow_copy {
            warn!("🔄️🧾️ Could not save a shadow copy of order {}. {e}", order.id);
        }
        Ok(OrderHandle {
            id: order.id,
            amount: order.amount.value(),
            currency: order.currency,
            key_id: self.gateway.key_id(),
            shadow_copy,
        })
    }

    /// Records a manually reported contribution.
    ///
    /// * If `logged_by_admin_id` is given, it must be the caller, and the caller must be an admin.
    /// * The group is taken from the contributor's membership. Contributors outside any group are rejected and
    ///   nothing is written.
    /// * The transaction is `completed` straight away if the caller is an admin or the method is cash or UPI.
    ///   Otherwise it is `pending` until an admin approves or rejects it. Entries made by an admin record that admin in
    ///   `logged_by_admin_id`.
    /// * Online payments can only be recorded through [`Self::verify_and_record_online_payment`].
    ///
    /// There is no de-duplication. Submitting the same contribution twice records it twice.
    pub async fn add_offline_transaction(
        &self,
        caller: &UserId,
        contribution: OfflineContribution,
    ) -> Result<Transaction, ContributionError> {
        let caller_is_admin = self.is_admin(caller).await?;
        if let Some(admin_id) = &contribution.logged_by_admin_id {
            if admin_id != caller {
                warn!("🔄️🔒️ {caller} tried to log a payment as admin {admin_id}");
                return Err(ContributionError::AuthorizationError(
                    "logged_by_admin_id must be the authenticated user".to_string(),
                ));
            }
            if !caller_is_admin {
                warn!("🔄️🔒️ {caller} tried to log a payment as admin without an admin role");
                return Err(ContributionError::AuthorizationError("Only admins can log payments as admin".to_string()));
            }
        }
        if !contribution.amount.is_positive() {
            return Err(ContributionError::ValidationError("Amount must be greater than zero".to_string()));
        }
        let method = contribution.method().map_err(ContributionError::ValidationError)?.unwrap_or_default();
        if !method.is_offline() {
            return Err(ContributionError::ValidationError(
                "Online payments must be recorded through payment verification".to_string(),
            ));
        }
        let membership = self.db.fetch_membership(&contribution.user_id).await?;
        let status = if caller_is_admin || method.settles_immediately() {
            TransactionStatus::Completed
        } else {
            TransactionStatus::Pending
        };
        // An entry made by an admin always names the admin who vouched for it
        let logged_by = contribution.logged_by_admin_id.or_else(|| caller_is_admin.then(|| caller.clone()));
        let new_tx = NewTransaction::new(contribution.user_id, membership.farewell_id, contribution.amount, method)
            .with_status(status)
            .with_notes(contribution.notes)
            .with_receipt_url(contribution.receipt_url)
            .with_logged_by_admin(logged_by);
        let tx = self.db.insert_transaction(new_tx).await?;
        info!(
            "🔄️💵️ Offline contribution #{} of {} for {} in group #{} recorded by {caller} as {}",
            tx.id, tx.amount, tx.user_id, tx.farewell_id, tx.status
        );
        Ok(tx)
    }

    /// Verifies a checkout callback and records the payment in the ledger.
    ///
    /// The callback signature is checked before anything else happens. Amounts are never taken from the client: the
    /// order and payment are re-fetched from the gateway, and the gateway's minor-unit amount is recorded exactly.
    ///
    /// A gateway payment is recorded at most once. Replaying a callback for a payment that is already in the ledger
    /// fails with a validation error and writes nothing.
    pub async fn verify_and_record_online_payment(
        &self,
        caller: &UserId,
        callback: PaymentCallback,
    ) -> Result<OnlinePaymentReceipt, ContributionError> {
        let order_id = callback.razorpay_order_id.as_str();
        let payment_id = callback.razorpay_payment_id.as_str();
        if !self.gateway.verify_callback_signature(order_id, payment_id, &callback.razorpay_signature)? {
            warn!("🔄️🔐️ Rejecting callback for order {order_id} / payment {payment_id} from {caller}. Bad signature.");
            return Err(ContributionError::SignatureError);
        }
        if let Some(existing) = self.db.fetch_transaction_by_gateway_payment(payment_id).await? {
            warn!("🔄️💳️ Payment {payment_id} was already recorded as transaction #{}. Ignoring the replay.", existing.id);
            return Err(ContributionError::ValidationError(format!(
                "Payment {payment_id} has already been recorded as transaction {}",
                existing.id
            )));
        }
        let order = self.gateway.fetch_order(order_id).await?;
        if !order.amount.is_positive() {
            return Err(ContributionError::ValidationError(format!(
                "Gateway order {order_id} has an invalid amount ({})",
                order.amount.value()
            )));
        }
        let payment = self.gateway.fetch_payment(payment_id).await?;
        let payment_shadow_copy = SecondaryWrite::from_result(self.db.upsert_gateway_payment(&payment).await);
        if let SecondaryWrite::Failed(e) = &payment_shadow_copy {
            warn!("🔄️🧾️ Could not save a shadow copy of payment {payment_id}. {e}");
        }

        let acting_for_other = callback.selected_user_id.as_ref().filter(|u| *u != caller);
        let owner = match acting_for_other {
            Some(user) => {
                self.require_admin(caller, "record payments for other users").await?;
                user.clone()
            },
            None => caller.clone(),
        };
        let membership = self.db.fetch_membership(&owner).await?;
        let amount = payment.amount.unwrap_or(order.amount);
        let currency = payment.currency.clone().unwrap_or_else(|| order.currency.clone());
        let currency = if currency.trim().is_empty() { DEFAULT_CURRENCY_CODE.to_string() } else { currency };
        let logged_by = acting_for_other.map(|_| caller.clone());
        let notes = callback.notes();
        let new_tx = NewTransaction::new(owner, membership.farewell_id, amount, TransactionMethod::Online)
            .with_status(TransactionStatus::Completed)
            .with_currency(currency)
            .with_notes(notes)
            .with_payment_gateway_id(Some(payment.id.clone()))
            .with_logged_by_admin(logged_by)
            .with_metadata(callback.metadata);
        let saved = self.db.insert_transaction(new_tx).await?;
        info!(
            "🔄️💳️ Online payment {payment_id} of {} {} recorded as transaction #{} for {}",
            saved.amount, saved.currency, saved.id, saved.user_id
        );
        Ok(OnlinePaymentReceipt { success: true, saved, payment_shadow_copy })
    }

    /// Approves a pending offline transaction. Only admins can do this, and only once per transaction.
    pub async fn approve_offline(
        &self,
        caller: &UserId,
        transaction_id: i64,
    ) -> Result<ApprovalResult, ContributionError> {
        self.require_admin(caller, "approve offline payments").await?;
        let tx = self.db.resolve_offline_transaction(transaction_id, caller, &OfflineResolution::Approve).await?;
        info!("🔄️✅️ Offline transaction #{transaction_id} approved by {caller}");
        Ok(ApprovalResult { transaction_id: tx.id, status: tx.status, approved_by: caller.clone() })
    }

    /// Rejects a pending offline transaction, recording the reason in the audit log. Related notifications are marked
    /// as read on a best-effort basis.
    pub async fn reject_offline(
        &self,
        caller: &UserId,
        transaction_id: i64,
        reason: Option<String>,
    ) -> Result<RejectionResult, ContributionError> {
        self.require_admin(caller, "reject offline payments").await?;
        let resolution = OfflineResolution::Reject { reason };
        let transaction = self.db.resolve_offline_transaction(transaction_id, caller, &resolution).await?;
        info!("🔄️❌️ Offline transaction #{transaction_id} rejected by {caller}");
        let notifications =
            SecondaryWrite::from_result(self.db.mark_notifications_read_for_transaction(transaction_id).await);
        if let SecondaryWrite::Failed(e) = &notifications {
            warn!("🔄️❌️ Could not mark notifications for transaction #{transaction_id} as read. {e}");
        }
        Ok(RejectionResult { success: true, transaction, notifications })
    }

    /// Offline transactions awaiting review, newest first, capped at [`PENDING_LIST_LIMIT`] rows.
    pub async fn list_pending_offline(&self, caller: &UserId) -> Result<Vec<PendingTransaction>, ContributionError> {
        self.require_admin(caller, "review pending payments").await?;
        let pending = self.db.fetch_pending_offline_transactions(PENDING_LIST_LIMIT).await?;
        Ok(pending)
    }

    /// A user's contribution history. Users can see their own; admins can see anyone's.
    pub async fn transactions_for_user(
        &self,
        caller: &UserId,
        user_id: Option<&UserId>,
    ) -> Result<ContributionHistory, ContributionError> {
        let user_id = match user_id {
            Some(other) if other != caller => {
                self.require_admin(caller, "view other users' contributions").await?;
                other
            },
            _ => caller,
        };
        let transactions = self.db.fetch_transactions_for_user(user_id).await?;
        Ok(ContributionHistory::new(user_id.clone(), transactions))
    }

    /// The audit trail of a transaction, oldest first. Admin only.
    pub async fn audit_log_for_transaction(
        &self,
        caller: &UserId,
        transaction_id: i64,
    ) -> Result<Vec<AuditLogEntry>, ContributionError> {
        self.require_admin(caller, "view the audit log").await?;
        if self.db.fetch_transaction(transaction_id).await?.is_none() {
            return Err(ContributionError::NotFoundError(format!("Transaction {transaction_id} not found")));
        }
        let entries = self.db.fetch_audit_log(transaction_id).await?;
        Ok(entries)
    }
}
