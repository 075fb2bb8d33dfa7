use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::coupon::{DiscountType, NewCoupon, UpdateCoupon};
use crate::forms::sanitize_plain_text;

/// Result type returned by the coupon form helpers.
pub type CouponFormResult<T> = Result<T, CouponFormError>;

/// Errors that can occur while processing coupon forms.
#[derive(Debug, Error)]
pub enum CouponFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The code is empty after sanitization.
    #[error("coupon code cannot be empty")]
    EmptyCode,
    /// Percentage coupons must discount between 1 and 100 percent.
    #[error("percentage discount must be between 1 and 100")]
    PercentageOutOfRange,
    /// A discount cap only makes sense for percentage coupons.
    #[error("a discount cap only applies to percentage coupons")]
    MaxDiscountOnFixed,
}

fn default_true() -> bool {
    true
}

/// Shared cross-field checks for add and edit payloads.
fn check_discount(
    discount_type: DiscountType,
    discount_value: i64,
    max_discount_cents: Option<i64>,
) -> CouponFormResult<()> {
    match discount_type {
        DiscountType::Percentage if !(1..=100).contains(&discount_value) => {
            Err(CouponFormError::PercentageOutOfRange)
        }
        DiscountType::Fixed if max_discount_cents.is_some() => {
            Err(CouponFormError::MaxDiscountOnFixed)
        }
        _ => Ok(()),
    }
}

/// Payload submitted when creating a coupon.
#[derive(Debug, Deserialize, Validate)]
pub struct AddCouponForm {
    #[validate(length(min = 1, max = 64))]
    pub code: String,
    pub discount_type: DiscountType,
    #[validate(range(min = 1))]
    pub discount_value: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub min_purchase_cents: i64,
    #[validate(range(min = 1))]
    pub max_discount_cents: Option<i64>,
    pub expires_at: Option<NaiveDateTime>,
    #[validate(range(min = 1))]
    pub usage_limit: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl AddCouponForm {
    /// Validates and sanitizes the payload into a domain `NewCoupon`.
    pub fn into_new_coupon(self) -> CouponFormResult<NewCoupon> {
        self.validate()?;
        check_discount(self.discount_type, self.discount_value, self.max_discount_cents)?;

        let code = sanitize_plain_text(&self.code);
        if code.is_empty() {
            return Err(CouponFormError::EmptyCode);
        }

        let mut payload = NewCoupon::new(code, self.discount_type, self.discount_value)
            .with_min_purchase(self.min_purchase_cents)
            .with_active(self.is_active);

        if let Some(cap) = self.max_discount_cents {
            payload = payload.with_max_discount(cap);
        }
        if let Some(expires_at) = self.expires_at {
            payload = payload.with_expiry(expires_at);
        }
        if let Some(limit) = self.usage_limit {
            payload = payload.with_usage_limit(limit);
        }

        Ok(payload)
    }
}

/// Payload submitted when editing a coupon. The code itself is immutable;
/// every other knob is replaced wholesale.
#[derive(Debug, Deserialize, Validate)]
pub struct EditCouponForm {
    pub discount_type: DiscountType,
    #[validate(range(min = 1))]
    pub discount_value: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub min_purchase_cents: i64,
    #[validate(range(min = 1))]
    pub max_discount_cents: Option<i64>,
    pub expires_at: Option<NaiveDateTime>,
    #[validate(range(min = 1))]
    pub usage_limit: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl EditCouponForm {
    /// Validates the payload into a domain `UpdateCoupon` patch.
    pub fn into_update_coupon(self) -> CouponFormResult<UpdateCoupon> {
        self.validate()?;
        check_discount(self.discount_type, self.discount_value, self.max_discount_cents)?;

        Ok(UpdateCoupon::new()
            .discount(self.discount_type, self.discount_value)
            .min_purchase(self.min_purchase_cents)
            .max_discount(self.max_discount_cents)
            .expires_at(self.expires_at)
            .usage_limit(self.usage_limit)
            .active(self.is_active))
    }
}
