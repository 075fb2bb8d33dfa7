use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Lifecycle states of a post-delivery return request.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReturnStatus {
    Pending,
    /// Approved with a courier tracking id for the return shipment. Terminal.
    Approved,
    /// Rejected with a reason. Terminal.
    Rejected,
}

impl ReturnStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnStatus::Pending => "pending",
            ReturnStatus::Approved => "approved",
            ReturnStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ReturnStatus::Approved | ReturnStatus::Rejected)
    }
}

impl From<&str> for ReturnStatus {
    fn from(value: &str) -> Self {
        match value {
            "approved" => ReturnStatus::Approved,
            "rejected" => ReturnStatus::Rejected,
            _ => ReturnStatus::Pending,
        }
    }
}

impl From<ReturnStatus> for &'static str {
    fn from(value: ReturnStatus) -> Self {
        value.as_str()
    }
}

/// A customer's request to return a delivered order. At most one exists per
/// order.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReturnRequest {
    pub id: i32,
    pub order_id: i32,
    pub reason: String,
    pub description: Option<String>,
    pub status: ReturnStatus,
    /// Courier tracking id for the return shipment; set on approval.
    pub return_tracking_id: Option<String>,
    /// Set on rejection.
    pub rejection_reason: Option<String>,
    pub processed_at: Option<NaiveDateTime>,
    /// Email of the admin who resolved the request.
    pub processed_by: Option<String>,
    /// When the customer filed the request.
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new return request.
#[derive(Debug, Clone)]
pub struct NewReturnRequest {
    pub order_id: i32,
    pub reason: String,
    pub description: Option<String>,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewReturnRequest {
    pub fn new(order_id: i32, reason: impl Into<String>) -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            order_id,
            reason: reason.into(),
            description: None,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Patch data applied when resolving a return request.
#[derive(Debug, Clone)]
pub struct UpdateReturnRequest {
    pub status: Option<ReturnStatus>,
    pub return_tracking_id: Option<String>,
    pub rejection_reason: Option<String>,
    pub processed_at: Option<NaiveDateTime>,
    pub processed_by: Option<String>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateReturnRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateReturnRequest {
    pub fn new() -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            status: None,
            return_tracking_id: None,
            rejection_reason: None,
            processed_at: None,
            processed_by: None,
            updated_at: now,
        }
    }

    /// Approve the return with a courier tracking id.
    pub fn approve(
        mut self,
        return_tracking_id: impl Into<String>,
        processed_by: impl Into<String>,
    ) -> Self {
        self.status = Some(ReturnStatus::Approved);
        self.return_tracking_id = Some(return_tracking_id.into());
        self.processed_at = Some(self.updated_at);
        self.processed_by = Some(processed_by.into());
        self
    }

    /// Reject the return with a reason.
    pub fn reject(
        mut self,
        rejection_reason: impl Into<String>,
        processed_by: impl Into<String>,
    ) -> Self {
        self.status = Some(ReturnStatus::Rejected);
        self.rejection_reason = Some(rejection_reason.into());
        self.processed_at = Some(self.updated_at);
        self.processed_by = Some(processed_by.into());
        self
    }
}

/// Query definition used to list return requests.
#[derive(Debug, Clone)]
pub struct ReturnListQuery {
    pub status: Option<ReturnStatus>,
    pub pagination: Option<Pagination>,
}

impl Default for ReturnListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl ReturnListQuery {
    pub fn new() -> Self {
        Self {
            status: None,
            pagination: None,
        }
    }

    pub fn status(mut self, status: ReturnStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
