use thiserror::Error;

use crate::domain::coupon::CouponError;
use crate::repository::errors::RepositoryError;

pub mod coupons;
pub mod custom_requests;
pub mod orders;
pub mod payments;
pub mod returns;

/// Result type returned by every service operation.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced to the API layer. Everything here is synchronous and
/// local; notification failures are logged inside the services and never
/// appear in this taxonomy.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    /// A concurrent write won, or a uniqueness rule was violated.
    #[error("conflict")]
    Conflict,
    /// Bad input shape, surfaced from the form helpers.
    #[error("{0}")]
    Form(String),
    /// A state machine guard rejected the operation.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
    #[error("payment of {amount_cents} exceeds the outstanding balance of {due_cents}")]
    Overpayment { amount_cents: i64, due_cents: i64 },
    #[error("refund of {amount_cents} exceeds the amount paid of {paid_cents}")]
    RefundExceedsPaid { amount_cents: i64, paid_cents: i64 },
    /// A verified gateway payment cannot be rejected through the gate.
    #[error("payment has already been verified")]
    PaymentAlreadyVerified,
    #[error(transparent)]
    Coupon(#[from] CouponError),
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Conflict | RepositoryError::Duplicate => ServiceError::Conflict,
            other => ServiceError::Repository(other),
        }
    }
}
