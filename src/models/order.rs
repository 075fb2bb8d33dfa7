use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::order::{
    NewOrder as DomainNewOrder, Order as DomainOrder, OrderItem as DomainOrderItem,
    UpdateOrder as DomainUpdateOrder,
};
use crate::models::payment::Payment as DbPayment;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::orders)]
pub struct Order {
    pub id: i32,
    pub tracking_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: String,
    pub status: String,
    pub payment_method: String,
    pub payment_reference: Option<String>,
    pub payment_verified: bool,
    pub verified_at: Option<NaiveDateTime>,
    pub verified_by: Option<String>,
    pub coupon_code: Option<String>,
    pub subtotal_cents: i64,
    pub shipping_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub currency: String,
    pub cancellation_reason: Option<String>,
    pub version: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::order_items)]
#[diesel(belongs_to(Order, foreign_key = order_id))]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder<'a> {
    pub tracking_id: &'a str,
    pub customer_name: &'a str,
    pub customer_email: &'a str,
    pub customer_phone: &'a str,
    pub shipping_address: &'a str,
    pub status: &'a str,
    pub payment_method: &'a str,
    pub payment_reference: Option<&'a str>,
    pub coupon_code: Option<&'a str>,
    pub subtotal_cents: i64,
    pub shipping_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub currency: &'a str,
    pub version: i32,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::order_items)]
pub struct NewOrderItem<'a> {
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub name: &'a str,
    pub unit_price_cents: i64,
    pub quantity: i32,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::orders)]
pub struct UpdateOrder<'a> {
    pub status: Option<&'a str>,
    pub cancellation_reason: Option<&'a str>,
    pub payment_verified: Option<bool>,
    pub verified_at: Option<NaiveDateTime>,
    pub verified_by: Option<&'a str>,
    /// Always written; the repository bumps it on every update.
    pub version: i32,
    pub updated_at: NaiveDateTime,
}

impl Order {
    pub fn into_domain(self, items: Vec<OrderItem>, payments: Vec<DbPayment>) -> DomainOrder {
        DomainOrder {
            id: self.id,
            tracking_id: self.tracking_id,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            shipping_address: self.shipping_address,
            status: self.status.as_str().into(),
            payment_method: self.payment_method.as_str().into(),
            payment_reference: self.payment_reference,
            payment_verified: self.payment_verified,
            verified_at: self.verified_at,
            verified_by: self.verified_by,
            coupon_code: self.coupon_code,
            subtotal_cents: self.subtotal_cents,
            shipping_cents: self.shipping_cents,
            discount_cents: self.discount_cents,
            total_cents: self.total_cents,
            currency: self.currency,
            cancellation_reason: self.cancellation_reason,
            items: items.into_iter().map(OrderItem::into_domain).collect(),
            payments: payments.into_iter().map(DbPayment::into_domain).collect(),
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl OrderItem {
    pub fn into_domain(self) -> DomainOrderItem {
        DomainOrderItem {
            product_id: self.product_id,
            name: self.name,
            unit_price_cents: self.unit_price_cents,
            quantity: self.quantity,
        }
    }
}

impl From<(Order, Vec<OrderItem>, Vec<DbPayment>)> for DomainOrder {
    fn from(value: (Order, Vec<OrderItem>, Vec<DbPayment>)) -> Self {
        value.0.into_domain(value.1, value.2)
    }
}

impl<'a> From<&'a DomainNewOrder> for NewOrder<'a> {
    fn from(value: &'a DomainNewOrder) -> Self {
        Self {
            tracking_id: value.tracking_id.as_str(),
            customer_name: value.customer_name.as_str(),
            customer_email: value.customer_email.as_str(),
            customer_phone: value.customer_phone.as_str(),
            shipping_address: value.shipping_address.as_str(),
            status: value.status.into(),
            payment_method: value.payment_method.into(),
            payment_reference: value.payment_reference.as_deref(),
            coupon_code: value.coupon_code.as_deref(),
            subtotal_cents: value.subtotal_cents,
            shipping_cents: value.shipping_cents,
            discount_cents: value.discount_cents,
            total_cents: value.total_cents(),
            currency: value.currency.as_str(),
            version: 0,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> NewOrderItem<'a> {
    pub fn from_domain(order_id: i32, value: &'a DomainOrderItem) -> Self {
        Self {
            order_id,
            product_id: value.product_id,
            name: value.name.as_str(),
            unit_price_cents: value.unit_price_cents,
            quantity: value.quantity,
        }
    }
}

impl<'a> UpdateOrder<'a> {
    /// Build a changeset from the domain patch, writing `new_version`.
    pub fn from_domain(value: &'a DomainUpdateOrder, new_version: i32) -> Self {
        Self {
            status: value.status.map(|status| status.into()),
            cancellation_reason: value.cancellation_reason.as_deref(),
            payment_verified: value.payment_verified,
            verified_at: value.verified_at,
            verified_by: value.verified_by.as_deref(),
            version: new_version,
            updated_at: value.updated_at,
        }
    }
}
