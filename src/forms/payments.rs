use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::payment::NewPaymentRecord;
use crate::forms::{empty_string_as_none, sanitize_plain_text};

/// Result type returned by the payment form helpers.
pub type PaymentFormResult<T> = Result<T, PaymentFormError>;

/// Errors that can occur while processing payment forms.
#[derive(Debug, Error)]
pub enum PaymentFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The collection method is empty after sanitization.
    #[error("payment method cannot be empty")]
    EmptyMethod,
    /// The provided reason is empty after sanitization.
    #[error("reason cannot be empty")]
    EmptyReason,
}

/// Payload submitted when recording a payment or a refund against an order.
#[derive(Debug, Deserialize, Validate)]
pub struct RecordPaymentForm {
    #[validate(range(min = 1))]
    pub amount_cents: i64,
    /// Free-text collection method: "cash", "upi", "manual", ...
    #[validate(length(min = 1, max = 64))]
    pub method: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub note: Option<String>,
}

impl RecordPaymentForm {
    fn into_entry(
        self,
        order_id: i32,
        recorded_by: &str,
        refund: bool,
    ) -> PaymentFormResult<NewPaymentRecord> {
        self.validate()?;

        let method = sanitize_plain_text(&self.method);
        if method.is_empty() {
            return Err(PaymentFormError::EmptyMethod);
        }

        let mut payload = if refund {
            NewPaymentRecord::refund(order_id, self.amount_cents, method, recorded_by)
        } else {
            NewPaymentRecord::payment(order_id, self.amount_cents, method, recorded_by)
        };

        if let Some(note) = self.note.as_deref() {
            payload = payload.with_note(sanitize_plain_text(note));
        }

        Ok(payload)
    }

    /// Validates and sanitizes the payload into a forward ledger entry.
    pub fn into_new_payment(
        self,
        order_id: i32,
        recorded_by: &str,
    ) -> PaymentFormResult<NewPaymentRecord> {
        self.into_entry(order_id, recorded_by, false)
    }

    /// Validates and sanitizes the payload into a refund ledger entry.
    pub fn into_new_refund(
        self,
        order_id: i32,
        recorded_by: &str,
    ) -> PaymentFormResult<NewPaymentRecord> {
        self.into_entry(order_id, recorded_by, true)
    }
}

/// Payload submitted when an admin declares a gateway payment not received.
#[derive(Debug, Deserialize, Validate)]
pub struct RejectPaymentForm {
    #[validate(length(min = 1, max = 512))]
    pub reason: String,
}

impl RejectPaymentForm {
    /// Validates and sanitizes the rejection reason.
    pub fn into_reason(self) -> PaymentFormResult<String> {
        self.validate()?;

        let reason = sanitize_plain_text(&self.reason);
        if reason.is_empty() {
            return Err(PaymentFormError::EmptyReason);
        }

        Ok(reason)
    }
}
