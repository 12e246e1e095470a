//! `Payment` aggregate: PENDING -> PROCESSING -> {SUCCEEDED | FAILED}, with
//! a bounded retry loop back from FAILED to PENDING.

use chrono::{DateTime, Utc};
use orderflow_core::{AggregateRoot, DomainError, DomainResult, Money, OrderId, PaymentId};
use serde::{Deserialize, Serialize};

/// Retries exhaust after this many processing attempts (§3 data model).
pub const MAX_RETRY_ATTEMPTS: u8 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PaymentMethod {
    CreditCard { last_four: String },
    PayPal { account_email: String },
    BankTransfer { account_last_four: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    id: PaymentId,
    order_id: OrderId,
    amount: Money,
    payment_method: PaymentMethod,
    status: PaymentStatus,
    failure_reason: Option<String>,
    processing_attempts: u8,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl AggregateRoot for Payment {
    type Id = PaymentId;

    fn id(&self) -> &PaymentId {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Payment {
    pub fn new(order_id: OrderId, amount: Money, payment_method: PaymentMethod) -> Self {
        let now = Utc::now();
        Self {
            id: PaymentId::new(),
            order_id,
            amount,
            payment_method,
            status: PaymentStatus::Pending,
            failure_reason: None,
            processing_attempts: 0,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn payment_method(&self) -> &PaymentMethod {
        &self.payment_method
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    pub fn processing_attempts(&self) -> u8 {
        self.processing_attempts
    }

    pub fn start_processing(&mut self) -> DomainResult<()> {
        if self.status != PaymentStatus::Pending {
            return Err(DomainError::business_rule(format!(
                "cannot start processing payment {}: status is {:?}",
                self.id, self.status
            )));
        }
        self.status = PaymentStatus::Processing;
        self.processing_attempts += 1;
        self.touch();
        Ok(())
    }

    pub fn mark_succeeded(&mut self) -> DomainResult<()> {
        if self.status != PaymentStatus::Processing {
            return Err(DomainError::business_rule(format!(
                "cannot succeed payment {}: status is {:?}",
                self.id, self.status
            )));
        }
        self.status = PaymentStatus::Succeeded;
        self.touch();
        Ok(())
    }

    pub fn mark_failed(&mut self, reason: impl Into<String>) -> DomainResult<()> {
        if self.status != PaymentStatus::Processing {
            return Err(DomainError::business_rule(format!(
                "cannot fail payment {}: status is {:?}",
                self.id, self.status
            )));
        }
        self.status = PaymentStatus::Failed;
        self.failure_reason = Some(reason.into());
        self.touch();
        Ok(())
    }

    /// FAILED -> PENDING, only while `processingAttempts < max_attempts`.
    /// The ceiling is a caller-supplied config value (§1's ambient-stack
    /// requirement that it be configurable rather than hardcoded);
    /// [`MAX_RETRY_ATTEMPTS`] is only the default that value defaults to.
    pub fn retry(&mut self, max_attempts: u8) -> DomainResult<()> {
        if self.status != PaymentStatus::Failed {
            return Err(DomainError::business_rule(format!(
                "cannot retry payment {}: status is {:?}",
                self.id, self.status
            )));
        }
        if self.processing_attempts >= max_attempts {
            return Err(DomainError::business_rule(format!(
                "payment {} has exhausted its {max_attempts} retry attempts",
                self.id
            )));
        }
        self.status = PaymentStatus::Pending;
        self.failure_reason = None;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.version += 1;
    }
}
