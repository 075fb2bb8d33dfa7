use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pagination::Pagination;

/// How a coupon's `discount_value` is interpreted.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `discount_value` is an integer percent of the subtotal.
    Percentage,
    /// `discount_value` is an amount in minor currency units.
    Fixed,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
        }
    }
}

impl From<&str> for DiscountType {
    fn from(value: &str) -> Self {
        match value {
            "percentage" => DiscountType::Percentage,
            _ => DiscountType::Fixed,
        }
    }
}

impl From<DiscountType> for &'static str {
    fn from(value: DiscountType) -> Self {
        value.as_str()
    }
}

/// Reasons a coupon cannot be applied to an order.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CouponError {
    #[error("coupon is not active")]
    Inactive,
    #[error("coupon has expired")]
    Expired,
    #[error("coupon usage limit has been reached")]
    Exhausted,
    #[error("order subtotal is below the coupon minimum purchase")]
    MinimumPurchaseNotMet,
}

/// A discount code managed by the admin console.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Coupon {
    pub id: i32,
    /// Stored uppercase; matched case-insensitively.
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    /// Minimum subtotal the coupon applies to.
    pub min_purchase_cents: i64,
    /// Cap on the computed discount; percentage coupons only.
    pub max_discount_cents: Option<i64>,
    pub expires_at: Option<NaiveDateTime>,
    /// Total number of successful applications allowed.
    pub usage_limit: Option<i32>,
    /// Incremented exactly once per order the coupon is applied to.
    pub usage_count: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Coupon {
    /// Evaluate the coupon against an order subtotal and return the discount
    /// in minor units. Checks short-circuit in a fixed order: active,
    /// expiry, usage, minimum purchase. Pure; applying the coupon (usage
    /// accounting) is a separate, side-effecting step.
    pub fn validate(&self, subtotal_cents: i64, now: NaiveDateTime) -> Result<i64, CouponError> {
        if !self.is_active {
            return Err(CouponError::Inactive);
        }

        if let Some(expires_at) = self.expires_at {
            if now > expires_at {
                return Err(CouponError::Expired);
            }
        }

        if let Some(limit) = self.usage_limit {
            if self.usage_count >= limit {
                return Err(CouponError::Exhausted);
            }
        }

        if subtotal_cents < self.min_purchase_cents {
            return Err(CouponError::MinimumPurchaseNotMet);
        }

        Ok(self.discount_cents(subtotal_cents))
    }

    /// Discount for a given subtotal, always within `[0, subtotal]`.
    fn discount_cents(&self, subtotal_cents: i64) -> i64 {
        let discount = match self.discount_type {
            DiscountType::Fixed => self.discount_value,
            DiscountType::Percentage => {
                let raw = subtotal_cents * self.discount_value / 100;
                match self.max_discount_cents {
                    Some(cap) => raw.min(cap),
                    None => raw,
                }
            }
        };

        discount.clamp(0, subtotal_cents)
    }
}

/// Payload required to insert a new coupon.
#[derive(Debug, Clone)]
pub struct NewCoupon {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub min_purchase_cents: i64,
    pub max_discount_cents: Option<i64>,
    pub expires_at: Option<NaiveDateTime>,
    pub usage_limit: Option<i32>,
    pub is_active: bool,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewCoupon {
    /// Build a new coupon payload. The code is normalized to uppercase.
    pub fn new(code: impl Into<String>, discount_type: DiscountType, discount_value: i64) -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            code: code.into().trim().to_uppercase(),
            discount_type,
            discount_value,
            min_purchase_cents: 0,
            max_discount_cents: None,
            expires_at: None,
            usage_limit: None,
            is_active: true,
            updated_at: now,
        }
    }

    pub fn with_min_purchase(mut self, min_purchase_cents: i64) -> Self {
        self.min_purchase_cents = min_purchase_cents;
        self
    }

    pub fn with_max_discount(mut self, max_discount_cents: i64) -> Self {
        self.max_discount_cents = Some(max_discount_cents);
        self
    }

    pub fn with_expiry(mut self, expires_at: NaiveDateTime) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn with_usage_limit(mut self, usage_limit: i32) -> Self {
        self.usage_limit = Some(usage_limit);
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

/// Patch data applied when updating an existing coupon. `usage_count` is
/// deliberately absent; it only moves through the usage-increment operation.
#[derive(Debug, Clone)]
pub struct UpdateCoupon {
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<i64>,
    pub min_purchase_cents: Option<i64>,
    /// `Some(None)` clears an existing cap.
    pub max_discount_cents: Option<Option<i64>>,
    pub expires_at: Option<Option<NaiveDateTime>>,
    pub usage_limit: Option<Option<i32>>,
    pub is_active: Option<bool>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateCoupon {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateCoupon {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            discount_type: None,
            discount_value: None,
            min_purchase_cents: None,
            max_discount_cents: None,
            expires_at: None,
            usage_limit: None,
            is_active: None,
            updated_at: now,
        }
    }

    pub fn discount(mut self, discount_type: DiscountType, discount_value: i64) -> Self {
        self.discount_type = Some(discount_type);
        self.discount_value = Some(discount_value);
        self
    }

    pub fn min_purchase(mut self, min_purchase_cents: i64) -> Self {
        self.min_purchase_cents = Some(min_purchase_cents);
        self
    }

    pub fn max_discount(mut self, max_discount_cents: Option<i64>) -> Self {
        self.max_discount_cents = Some(max_discount_cents);
        self
    }

    pub fn expires_at(mut self, expires_at: Option<NaiveDateTime>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn usage_limit(mut self, usage_limit: Option<i32>) -> Self {
        self.usage_limit = Some(usage_limit);
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}

/// Query definition used to list coupons.
#[derive(Debug, Clone)]
pub struct CouponListQuery {
    /// Optional search term matched against the code.
    pub search: Option<String>,
    /// Include inactive coupons in the listing.
    pub include_inactive: bool,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl Default for CouponListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl CouponListQuery {
    pub fn new() -> Self {
        Self {
            search: None,
            include_inactive: false,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn include_inactive(mut self) -> Self {
        self.include_inactive = true;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
