use actix_web::HttpResponse;
use serde_json::json;

use crate::services::ServiceError;

pub mod coupons;
pub mod custom_requests;
pub mod orders;
pub mod payments;
pub mod returns;

/// Map a service error onto an HTTP response, logging anything internal.
pub(crate) fn error_response(operation: &str, err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().finish(),
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Conflict => {
            HttpResponse::Conflict().json(json!({ "error": "conflicting change, retry" }))
        }
        err @ (ServiceError::Form(_)
        | ServiceError::InvalidTransition(_)
        | ServiceError::Overpayment { .. }
        | ServiceError::RefundExceedsPaid { .. }
        | ServiceError::PaymentAlreadyVerified
        | ServiceError::Coupon(_)) => {
            HttpResponse::UnprocessableEntity().json(json!({ "error": err.to_string() }))
        }
        err => {
            log::error!("Failed to {operation}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
