use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::payment::{PaymentKind, PaymentRecord};
use crate::pagination::Pagination;

/// Fulfillment lifecycle states for an order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order has been placed and awaits dispatch.
    Pending,
    /// Order has been handed to the courier.
    InTransit,
    /// Order is on the last leg to the customer.
    OutForDelivery,
    /// Order has reached the customer. Terminal.
    Delivered,
    /// Order has been cancelled. Terminal.
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InTransit => "in_transit",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Position in the forward fulfillment sequence. `Cancelled` sits outside
    /// the sequence and has no rank.
    fn rank(self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::InTransit => Some(1),
            OrderStatus::OutForDelivery => Some(2),
            OrderStatus::Delivered => Some(3),
            OrderStatus::Cancelled => None,
        }
    }

    /// `Delivered` and `Cancelled` permit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether a status update to `next` is a legal forward move. Skipping
    /// ahead is allowed, moving backwards or out of a terminal state is not.
    pub fn can_advance_to(self, next: OrderStatus) -> bool {
        match (self.rank(), next.rank()) {
            (Some(current), Some(next)) => next > current,
            _ => false,
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        match value {
            "in_transit" => OrderStatus::InTransit,
            "out_for_delivery" => OrderStatus::OutForDelivery,
            "delivered" => OrderStatus::Delivered,
            "cancelled" => OrderStatus::Cancelled,
            _ => OrderStatus::Pending,
        }
    }
}

impl From<OrderStatus> for &'static str {
    fn from(value: OrderStatus) -> Self {
        value.as_str()
    }
}

/// How the customer chose to pay for the order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Collected in cash by the courier.
    CashOnDelivery,
    /// Card/UPI/wallet routed through the third-party aggregator.
    Gateway,
    /// UPI transfer straight to the shop's account.
    DirectUpi,
    /// Paid at the counter.
    InPerson,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "cash_on_delivery",
            PaymentMethod::Gateway => "gateway",
            PaymentMethod::DirectUpi => "direct_upi",
            PaymentMethod::InPerson => "in_person",
        }
    }

    /// Aggregator-collected payments are not trusted until an admin has
    /// reconciled them against the aggregator dashboard.
    pub fn requires_verification(self) -> bool {
        matches!(self, PaymentMethod::Gateway)
    }
}

impl From<&str> for PaymentMethod {
    fn from(value: &str) -> Self {
        match value {
            "gateway" => PaymentMethod::Gateway,
            "direct_upi" => PaymentMethod::DirectUpi,
            "in_person" => PaymentMethod::InPerson,
            _ => PaymentMethod::CashOnDelivery,
        }
    }
}

impl From<PaymentMethod> for &'static str {
    fn from(value: PaymentMethod) -> Self {
        value.as_str()
    }
}

/// A purchased line item, frozen at order creation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OrderItem {
    /// Catalog product, if the item came from the catalog.
    pub product_id: Option<i32>,
    /// Display name captured at purchase time.
    pub name: String,
    /// Unit price in minor currency units.
    pub unit_price_cents: i64,
    pub quantity: i32,
}

impl OrderItem {
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * i64::from(self.quantity)
    }
}

/// Domain representation of a customer order with its payment ledger.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Order {
    /// Unique identifier of the order.
    pub id: i32,
    /// Customer-facing tracking reference, immutable once assigned.
    pub tracking_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: String,
    /// Current fulfillment status.
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    /// External aggregator reference; empty for cash orders.
    pub payment_reference: Option<String>,
    /// Only meaningful for gateway payments.
    pub payment_verified: bool,
    pub verified_at: Option<NaiveDateTime>,
    pub verified_by: Option<String>,
    /// Coupon code applied at creation, if any.
    pub coupon_code: Option<String>,
    pub subtotal_cents: i64,
    pub shipping_cents: i64,
    pub discount_cents: i64,
    /// `subtotal + shipping - discount`, fixed at creation.
    pub total_cents: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Set only when the order is cancelled.
    pub cancellation_reason: Option<String>,
    /// Line items, immutable after creation.
    pub items: Vec<OrderItem>,
    /// Append-only payment ledger owned by this order.
    pub payments: Vec<PaymentRecord>,
    /// Optimistic-concurrency counter bumped on every write.
    pub version: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Order {
    /// Net amount received: forward payments minus refunds.
    pub fn amount_paid_cents(&self) -> i64 {
        self.payments
            .iter()
            .map(|entry| match entry.kind {
                PaymentKind::Payment => entry.amount_cents,
                PaymentKind::Refund => -entry.amount_cents,
            })
            .sum()
    }

    /// Outstanding balance, clamped at zero.
    pub fn amount_due_cents(&self) -> i64 {
        (self.total_cents - self.amount_paid_cents()).max(0)
    }

    pub fn is_fully_paid(&self) -> bool {
        self.amount_due_cents() == 0
    }
}

/// Payload required to insert a new order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub tracking_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: String,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_reference: Option<String>,
    pub coupon_code: Option<String>,
    pub subtotal_cents: i64,
    pub shipping_cents: i64,
    pub discount_cents: i64,
    pub currency: String,
    pub items: Vec<OrderItem>,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewOrder {
    /// Build a new order payload. The subtotal is derived from the line
    /// items; shipping and discount default to zero.
    pub fn new(
        tracking_id: impl Into<String>,
        payment_method: PaymentMethod,
        items: Vec<OrderItem>,
    ) -> Self {
        let now = chrono::Local::now().naive_utc();
        let subtotal_cents = items.iter().map(OrderItem::line_total_cents).sum();

        Self {
            tracking_id: tracking_id.into(),
            customer_name: String::new(),
            customer_email: String::new(),
            customer_phone: String::new(),
            shipping_address: String::new(),
            status: OrderStatus::default(),
            payment_method,
            payment_reference: None,
            coupon_code: None,
            subtotal_cents,
            shipping_cents: 0,
            discount_cents: 0,
            currency: "INR".to_string(),
            items,
            updated_at: now,
        }
    }

    /// Attach the customer contact snapshot.
    pub fn with_customer(
        mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        shipping_address: impl Into<String>,
    ) -> Self {
        self.customer_name = name.into();
        self.customer_email = email.into();
        self.customer_phone = phone.into();
        self.shipping_address = shipping_address.into();
        self
    }

    /// Set the shipping charge.
    pub fn with_shipping(mut self, shipping_cents: i64) -> Self {
        self.shipping_cents = shipping_cents;
        self
    }

    /// Record the coupon discount applied to this order.
    pub fn with_discount(mut self, discount_cents: i64, coupon_code: impl Into<String>) -> Self {
        self.discount_cents = discount_cents;
        self.coupon_code = Some(coupon_code.into());
        self
    }

    /// Attach the external payment reference returned by the aggregator.
    pub fn with_payment_reference(mut self, reference: impl Into<String>) -> Self {
        self.payment_reference = Some(reference.into());
        self
    }

    /// Override the default currency.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Grand total fixed at creation time.
    pub fn total_cents(&self) -> i64 {
        self.subtotal_cents + self.shipping_cents - self.discount_cents
    }
}

/// Patch data applied when updating an existing order. All writes go through
/// a conditional update on the order version.
#[derive(Debug, Clone)]
pub struct UpdateOrder {
    /// Optional status update.
    pub status: Option<OrderStatus>,
    /// Cancellation reason, set together with a `Cancelled` status.
    pub cancellation_reason: Option<String>,
    pub payment_verified: Option<bool>,
    pub verified_at: Option<NaiveDateTime>,
    pub verified_by: Option<String>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateOrder {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateOrder {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            status: None,
            cancellation_reason: None,
            payment_verified: None,
            verified_at: None,
            verified_by: None,
            updated_at: now,
        }
    }

    /// Update the fulfillment status.
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Cancel the order, storing the reason.
    pub fn cancel(mut self, reason: impl Into<String>) -> Self {
        self.status = Some(OrderStatus::Cancelled);
        self.cancellation_reason = Some(reason.into());
        self
    }

    /// Mark the gateway payment as verified by `verified_by`.
    pub fn verify(mut self, verified_by: impl Into<String>) -> Self {
        self.payment_verified = Some(true);
        self.verified_at = Some(self.updated_at);
        self.verified_by = Some(verified_by.into());
        self
    }
}

/// Query definition used to list orders.
#[derive(Debug, Clone)]
pub struct OrderListQuery {
    /// Optional status filter.
    pub status: Option<OrderStatus>,
    /// Optional search term matched against the tracking id, customer name
    /// and customer email.
    pub search: Option<String>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl Default for OrderListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderListQuery {
    /// Construct a query that targets all orders.
    pub fn new() -> Self {
        Self {
            status: None,
            search: None,
            pagination: None,
        }
    }

    /// Filter the results by the provided status.
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter the results by a search term.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
