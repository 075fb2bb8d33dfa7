use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Lifecycle states of a bespoke clothing request. The request must be
/// priced (`Quoted`) before it can move toward production.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CustomRequestStatus {
    /// Awaiting a price quote from the admin.
    Pending,
    /// Quoted; waiting on the customer's decision.
    Quoted,
    /// Customer accepted the quote.
    Approved,
    /// Being made.
    InProduction,
    /// Finished. Terminal.
    Completed,
    /// Withdrawn before quoting. Terminal.
    Cancelled,
}

impl CustomRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomRequestStatus::Pending => "pending",
            CustomRequestStatus::Quoted => "quoted",
            CustomRequestStatus::Approved => "approved",
            CustomRequestStatus::InProduction => "in_production",
            CustomRequestStatus::Completed => "completed",
            CustomRequestStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CustomRequestStatus::Completed | CustomRequestStatus::Cancelled
        )
    }

    /// Whether `next` is the single legal forward step from this state.
    /// Quoting and cancellation have their own operations and are not
    /// reachable through `advance`.
    pub fn can_advance_to(self, next: CustomRequestStatus) -> bool {
        matches!(
            (self, next),
            (CustomRequestStatus::Quoted, CustomRequestStatus::Approved)
                | (CustomRequestStatus::Approved, CustomRequestStatus::InProduction)
                | (CustomRequestStatus::InProduction, CustomRequestStatus::Completed)
        )
    }
}

impl From<&str> for CustomRequestStatus {
    fn from(value: &str) -> Self {
        match value {
            "quoted" => CustomRequestStatus::Quoted,
            "approved" => CustomRequestStatus::Approved,
            "in_production" => CustomRequestStatus::InProduction,
            "completed" => CustomRequestStatus::Completed,
            "cancelled" => CustomRequestStatus::Cancelled,
            _ => CustomRequestStatus::Pending,
        }
    }
}

impl From<CustomRequestStatus> for &'static str {
    fn from(value: CustomRequestStatus) -> Self {
        value.as_str()
    }
}

/// A bespoke, non-catalog clothing request that must be priced before the
/// normal order flow can begin.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CustomRequest {
    pub id: i32,
    /// Customer-facing reference, immutable once assigned.
    pub reference: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    /// Garment description, measurements, fabric choices.
    pub clothing_details: String,
    pub instructions: Option<String>,
    /// Uploaded design image URLs; storage is external.
    pub design_images: Vec<String>,
    pub status: CustomRequestStatus,
    /// Set when the request is quoted.
    pub quoted_price_cents: Option<i64>,
    pub quoted_by: Option<String>,
    pub quoted_at: Option<NaiveDateTime>,
    pub cancellation_reason: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new custom request.
#[derive(Debug, Clone)]
pub struct NewCustomRequest {
    pub reference: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub clothing_details: String,
    pub instructions: Option<String>,
    pub design_images: Vec<String>,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewCustomRequest {
    pub fn new(reference: impl Into<String>, clothing_details: impl Into<String>) -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            reference: reference.into(),
            customer_name: String::new(),
            customer_email: String::new(),
            customer_phone: String::new(),
            clothing_details: clothing_details.into(),
            instructions: None,
            design_images: Vec::new(),
            updated_at: now,
        }
    }

    pub fn with_customer(
        mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        self.customer_name = name.into();
        self.customer_email = email.into();
        self.customer_phone = phone.into();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_design_images(mut self, design_images: Vec<String>) -> Self {
        self.design_images = design_images;
        self
    }
}

/// Patch data applied when updating an existing custom request.
#[derive(Debug, Clone)]
pub struct UpdateCustomRequest {
    pub status: Option<CustomRequestStatus>,
    pub quoted_price_cents: Option<i64>,
    pub quoted_by: Option<String>,
    pub quoted_at: Option<NaiveDateTime>,
    pub cancellation_reason: Option<String>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateCustomRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateCustomRequest {
    pub fn new() -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            status: None,
            quoted_price_cents: None,
            quoted_by: None,
            quoted_at: None,
            cancellation_reason: None,
            updated_at: now,
        }
    }

    /// Move the request into `Quoted` with the given price.
    pub fn quote(mut self, price_cents: i64, quoted_by: impl Into<String>) -> Self {
        self.status = Some(CustomRequestStatus::Quoted);
        self.quoted_price_cents = Some(price_cents);
        self.quoted_by = Some(quoted_by.into());
        self.quoted_at = Some(self.updated_at);
        self
    }

    /// Cancel the request, storing the reason.
    pub fn cancel(mut self, reason: impl Into<String>) -> Self {
        self.status = Some(CustomRequestStatus::Cancelled);
        self.cancellation_reason = Some(reason.into());
        self
    }

    /// Update the workflow status.
    pub fn status(mut self, status: CustomRequestStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Query definition used to list custom requests.
#[derive(Debug, Clone)]
pub struct CustomRequestListQuery {
    pub status: Option<CustomRequestStatus>,
    /// Optional search term matched against the reference, customer name and
    /// customer email.
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl Default for CustomRequestListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomRequestListQuery {
    pub fn new() -> Self {
        Self {
            status: None,
            search: None,
            pagination: None,
        }
    }

    pub fn status(mut self, status: CustomRequestStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
