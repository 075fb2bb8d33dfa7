use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::payment::{
    NewPaymentRecord as DomainNewPaymentRecord, PaymentRecord as DomainPaymentRecord,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::payments)]
pub struct Payment {
    pub id: i32,
    pub order_id: i32,
    pub kind: String,
    pub amount_cents: i64,
    pub method: String,
    pub note: Option<String>,
    pub recorded_by: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::payments)]
pub struct NewPayment<'a> {
    pub order_id: i32,
    pub kind: &'a str,
    pub amount_cents: i64,
    pub method: &'a str,
    pub note: Option<&'a str>,
    pub recorded_by: &'a str,
}

impl Payment {
    pub fn into_domain(self) -> DomainPaymentRecord {
        DomainPaymentRecord {
            id: self.id,
            order_id: self.order_id,
            kind: self.kind.as_str().into(),
            amount_cents: self.amount_cents,
            method: self.method,
            note: self.note,
            recorded_by: self.recorded_by,
            created_at: self.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewPaymentRecord> for NewPayment<'a> {
    fn from(value: &'a DomainNewPaymentRecord) -> Self {
        Self {
            order_id: value.order_id,
            kind: value.kind.into(),
            amount_cents: value.amount_cents,
            method: value.method.as_str(),
            note: value.note.as_deref(),
            recorded_by: value.recorded_by.as_str(),
        }
    }
}
