use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::order::{NewOrder, OrderItem, OrderStatus, PaymentMethod};
use crate::forms::{empty_string_as_none, sanitize_plain_text};

/// Result type returned by the order form helpers.
pub type OrderFormResult<T> = Result<T, OrderFormError>;

/// Errors that can occur while processing order forms.
#[derive(Debug, Error)]
pub enum OrderFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// A line item name is empty after sanitization.
    #[error("item {index} has an empty name")]
    EmptyItemName { index: usize },
    /// Gateway orders must carry the aggregator's payment reference.
    #[error("gateway payments require a payment reference")]
    MissingPaymentReference,
    /// The provided reason is empty after sanitization.
    #[error("reason cannot be empty")]
    EmptyReason,
}

/// A single line item submitted with a new order.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct OrderItemForm {
    pub product_id: Option<i32>,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(range(min = 0))]
    pub unit_price_cents: i64,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// Payload submitted when a customer places an order.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderForm {
    #[validate(length(min = 1, max = 128))]
    pub customer_name: String,
    #[validate(email)]
    pub customer_email: String,
    #[validate(length(min = 5, max = 32))]
    pub customer_phone: String,
    #[validate(length(min = 1, max = 512))]
    pub shipping_address: String,
    pub payment_method: PaymentMethod,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub payment_reference: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub coupon_code: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub shipping_cents: i64,
    #[validate(length(min = 1), nested)]
    pub items: Vec<OrderItemForm>,
}

impl CreateOrderForm {
    /// Validates and sanitizes the payload into a domain `NewOrder`. The
    /// coupon discount, if any, is resolved and applied by the service.
    pub fn into_new_order(self, tracking_id: String) -> OrderFormResult<NewOrder> {
        self.validate()?;

        if self.payment_method.requires_verification()
            && self
                .payment_reference
                .as_deref()
                .map(str::trim)
                .filter(|reference| !reference.is_empty())
                .is_none()
        {
            return Err(OrderFormError::MissingPaymentReference);
        }

        let mut items = Vec::with_capacity(self.items.len());
        for (index, item) in self.items.iter().enumerate() {
            let name = sanitize_plain_text(&item.name);
            if name.is_empty() {
                return Err(OrderFormError::EmptyItemName { index });
            }

            items.push(OrderItem {
                product_id: item.product_id,
                name,
                unit_price_cents: item.unit_price_cents,
                quantity: item.quantity,
            });
        }

        let mut payload = NewOrder::new(tracking_id, self.payment_method, items)
            .with_customer(
                sanitize_plain_text(&self.customer_name),
                self.customer_email.trim(),
                sanitize_plain_text(&self.customer_phone),
                sanitize_plain_text(&self.shipping_address),
            )
            .with_shipping(self.shipping_cents);

        if let Some(reference) = self.payment_reference.as_deref() {
            payload = payload.with_payment_reference(reference.trim());
        }

        Ok(payload)
    }
}

/// Target status submitted when advancing an order.
#[derive(Debug, Deserialize)]
pub struct AdvanceOrderForm {
    pub status: OrderStatus,
}

/// Payload submitted when an admin cancels an order.
#[derive(Debug, Deserialize, Validate)]
pub struct CancelOrderForm {
    #[validate(length(min = 1, max = 512))]
    pub reason: String,
}

impl CancelOrderForm {
    /// Validates and sanitizes the cancellation reason.
    pub fn into_reason(self) -> OrderFormResult<String> {
        self.validate()?;

        let reason = sanitize_plain_text(&self.reason);
        if reason.is_empty() {
            return Err(OrderFormError::EmptyReason);
        }

        Ok(reason)
    }
}
