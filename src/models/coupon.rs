use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::coupon::{
    Coupon as DomainCoupon, NewCoupon as DomainNewCoupon, UpdateCoupon as DomainUpdateCoupon,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::coupons)]
pub struct Coupon {
    pub id: i32,
    pub code: String,
    pub discount_type: String,
    pub discount_value: i64,
    pub min_purchase_cents: i64,
    pub max_discount_cents: Option<i64>,
    pub expires_at: Option<NaiveDateTime>,
    pub usage_limit: Option<i32>,
    pub usage_count: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::coupons)]
pub struct NewCoupon<'a> {
    pub code: &'a str,
    pub discount_type: &'a str,
    pub discount_value: i64,
    pub min_purchase_cents: i64,
    pub max_discount_cents: Option<i64>,
    pub expires_at: Option<NaiveDateTime>,
    pub usage_limit: Option<i32>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::coupons)]
pub struct UpdateCoupon<'a> {
    pub discount_type: Option<&'a str>,
    pub discount_value: Option<i64>,
    pub min_purchase_cents: Option<i64>,
    pub max_discount_cents: Option<Option<i64>>,
    pub expires_at: Option<Option<NaiveDateTime>>,
    pub usage_limit: Option<Option<i32>>,
    pub is_active: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl Coupon {
    pub fn into_domain(self) -> DomainCoupon {
        DomainCoupon {
            id: self.id,
            code: self.code,
            discount_type: self.discount_type.as_str().into(),
            discount_value: self.discount_value,
            min_purchase_cents: self.min_purchase_cents,
            max_discount_cents: self.max_discount_cents,
            expires_at: self.expires_at,
            usage_limit: self.usage_limit,
            usage_count: self.usage_count,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<Coupon> for DomainCoupon {
    fn from(value: Coupon) -> Self {
        value.into_domain()
    }
}

impl<'a> From<&'a DomainNewCoupon> for NewCoupon<'a> {
    fn from(value: &'a DomainNewCoupon) -> Self {
        Self {
            code: value.code.as_str(),
            discount_type: value.discount_type.into(),
            discount_value: value.discount_value,
            min_purchase_cents: value.min_purchase_cents,
            max_discount_cents: value.max_discount_cents,
            expires_at: value.expires_at,
            usage_limit: value.usage_limit,
            is_active: value.is_active,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateCoupon> for UpdateCoupon<'a> {
    fn from(value: &'a DomainUpdateCoupon) -> Self {
        Self {
            discount_type: value.discount_type.map(|discount_type| discount_type.into()),
            discount_value: value.discount_value,
            min_purchase_cents: value.min_purchase_cents,
            max_discount_cents: value.max_discount_cents,
            expires_at: value.expires_at,
            usage_limit: value.usage_limit,
            is_active: value.is_active,
            updated_at: value.updated_at,
        }
    }
}
