use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::return_request::NewReturnRequest;
use crate::forms::{empty_string_as_none, sanitize_plain_text};

/// Result type returned by the return form helpers.
pub type ReturnFormResult<T> = Result<T, ReturnFormError>;

/// Errors that can occur while processing return forms.
#[derive(Debug, Error)]
pub enum ReturnFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided reason is empty after sanitization.
    #[error("reason cannot be empty")]
    EmptyReason,
    /// The return tracking id is empty after sanitization.
    #[error("return tracking id cannot be empty")]
    EmptyTrackingId,
}

/// Payload submitted when a customer files a return request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReturnForm {
    pub order_id: i32,
    #[validate(length(min = 1, max = 255))]
    pub reason: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
}

impl CreateReturnForm {
    /// Validates and sanitizes the payload into a domain `NewReturnRequest`.
    pub fn into_new_return_request(self) -> ReturnFormResult<NewReturnRequest> {
        self.validate()?;

        let reason = sanitize_plain_text(&self.reason);
        if reason.is_empty() {
            return Err(ReturnFormError::EmptyReason);
        }

        let mut payload = NewReturnRequest::new(self.order_id, reason);

        if let Some(description) = self.description.as_deref() {
            let description = sanitize_plain_text(description);
            if !description.is_empty() {
                payload = payload.with_description(description);
            }
        }

        Ok(payload)
    }
}

/// Payload submitted when an admin approves a return.
#[derive(Debug, Deserialize, Validate)]
pub struct ApproveReturnForm {
    #[validate(length(min = 1, max = 128))]
    pub return_tracking_id: String,
}

impl ApproveReturnForm {
    /// Validates and sanitizes the return shipment tracking id.
    pub fn into_tracking_id(self) -> ReturnFormResult<String> {
        self.validate()?;

        let tracking_id = sanitize_plain_text(&self.return_tracking_id);
        if tracking_id.is_empty() {
            return Err(ReturnFormError::EmptyTrackingId);
        }

        Ok(tracking_id)
    }
}

/// Payload submitted when an admin rejects a return.
#[derive(Debug, Deserialize, Validate)]
pub struct RejectReturnForm {
    #[validate(length(min = 1, max = 512))]
    pub rejection_reason: String,
}

impl RejectReturnForm {
    /// Validates and sanitizes the rejection reason.
    pub fn into_reason(self) -> ReturnFormResult<String> {
        self.validate()?;

        let reason = sanitize_plain_text(&self.rejection_reason);
        if reason.is_empty() {
            return Err(ReturnFormError::EmptyReason);
        }

        Ok(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_return_form_converts() {
        let form = CreateReturnForm {
            order_id: 9,
            reason: " wrong  size ".to_string(),
            description: Some("too tight at the shoulders".to_string()),
        };

        let payload = form.into_new_return_request().expect("expected success");

        assert_eq!(payload.order_id, 9);
        assert_eq!(payload.reason, "wrong size");
        assert_eq!(
            payload.description.as_deref(),
            Some("too tight at the shoulders")
        );
    }

    #[test]
    fn approve_form_rejects_blank_tracking_id() {
        let form = ApproveReturnForm {
            return_tracking_id: "   ".to_string(),
        };

        let result = form.into_tracking_id();

        assert!(matches!(result, Err(ReturnFormError::EmptyTrackingId)));
    }
}
