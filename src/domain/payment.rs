use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Direction of a ledger entry. Refunds are negative-effect entries; amounts
/// themselves stay positive.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    Payment,
    Refund,
}

impl PaymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Payment => "payment",
            PaymentKind::Refund => "refund",
        }
    }
}

impl From<&str> for PaymentKind {
    fn from(value: &str) -> Self {
        match value {
            "refund" => PaymentKind::Refund,
            _ => PaymentKind::Payment,
        }
    }
}

impl From<PaymentKind> for &'static str {
    fn from(value: PaymentKind) -> Self {
        value.as_str()
    }
}

/// Immutable entry in an order's payment ledger. Entries are only ever
/// appended; corrections are new offsetting entries.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaymentRecord {
    pub id: i32,
    pub order_id: i32,
    pub kind: PaymentKind,
    /// Always positive; `kind` carries the sign.
    pub amount_cents: i64,
    /// Free-text collection method: "cash", "upi", "manual", ...
    pub method: String,
    pub note: Option<String>,
    /// Email of the admin who recorded the entry.
    pub recorded_by: String,
    /// When the entry was recorded; doubles as the ledger date.
    pub created_at: NaiveDateTime,
}

/// Payload required to append a ledger entry.
#[derive(Debug, Clone)]
pub struct NewPaymentRecord {
    pub order_id: i32,
    pub kind: PaymentKind,
    pub amount_cents: i64,
    pub method: String,
    pub note: Option<String>,
    pub recorded_by: String,
}

impl NewPaymentRecord {
    /// Build a forward payment entry.
    pub fn payment(
        order_id: i32,
        amount_cents: i64,
        method: impl Into<String>,
        recorded_by: impl Into<String>,
    ) -> Self {
        Self {
            order_id,
            kind: PaymentKind::Payment,
            amount_cents,
            method: method.into(),
            note: None,
            recorded_by: recorded_by.into(),
        }
    }

    /// Build a refund entry.
    pub fn refund(
        order_id: i32,
        amount_cents: i64,
        method: impl Into<String>,
        recorded_by: impl Into<String>,
    ) -> Self {
        Self {
            kind: PaymentKind::Refund,
            ..Self::payment(order_id, amount_cents, method, recorded_by)
        }
    }

    /// Attach a free-text note to the entry.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
