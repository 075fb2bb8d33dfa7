use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::custom_request::{CustomRequestStatus, NewCustomRequest};
use crate::domain::order::PaymentMethod;
use crate::forms::{empty_string_as_none, sanitize_plain_text};

/// Most design uploads are one or two reference photos; anything beyond
/// this is either abuse or a mistake.
const MAX_DESIGN_IMAGES: usize = 10;

/// Result type returned by the custom request form helpers.
pub type CustomRequestFormResult<T> = Result<T, CustomRequestFormError>;

/// Errors that can occur while processing custom request forms.
#[derive(Debug, Error)]
pub enum CustomRequestFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// Too many design image URLs were submitted.
    #[error("at most {} design images are allowed", MAX_DESIGN_IMAGES)]
    TooManyImages,
    /// A design image URL is unusable.
    #[error("design image {index} is not a valid URL")]
    InvalidImageUrl { index: usize },
    /// The provided reason is empty after sanitization.
    #[error("reason cannot be empty")]
    EmptyReason,
}

/// Payload submitted when a customer requests a bespoke garment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomRequestForm {
    #[validate(length(min = 1, max = 128))]
    pub customer_name: String,
    #[validate(email)]
    pub customer_email: String,
    #[validate(length(min = 5, max = 32))]
    pub customer_phone: String,
    /// Garment description, measurements, fabric choices.
    #[validate(length(min = 1, max = 4000))]
    pub clothing_details: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub instructions: Option<String>,
    /// URLs of already-uploaded design references.
    #[serde(default)]
    pub design_images: Vec<String>,
}

impl CreateCustomRequestForm {
    /// Validates and sanitizes the payload into a domain `NewCustomRequest`.
    pub fn into_new_custom_request(
        self,
        reference: String,
    ) -> CustomRequestFormResult<NewCustomRequest> {
        self.validate()?;

        let mut design_images = Vec::with_capacity(self.design_images.len());
        for (index, url) in self.design_images.iter().enumerate() {
            let url = url.trim();
            if url.is_empty() {
                continue;
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) || url.len() > 512 {
                return Err(CustomRequestFormError::InvalidImageUrl { index });
            }
            design_images.push(url.to_string());
        }

        if design_images.len() > MAX_DESIGN_IMAGES {
            return Err(CustomRequestFormError::TooManyImages);
        }

        let mut payload =
            NewCustomRequest::new(reference, sanitize_plain_text(&self.clothing_details))
                .with_customer(
                    sanitize_plain_text(&self.customer_name),
                    self.customer_email.trim(),
                    sanitize_plain_text(&self.customer_phone),
                )
                .with_design_images(design_images);

        if let Some(instructions) = self.instructions.as_deref() {
            let instructions = sanitize_plain_text(instructions);
            if !instructions.is_empty() {
                payload = payload.with_instructions(instructions);
            }
        }

        Ok(payload)
    }
}

/// Payload submitted when an admin quotes a price.
#[derive(Debug, Deserialize, Validate)]
pub struct SendQuoteForm {
    #[validate(range(min = 1))]
    pub price_cents: i64,
}

impl SendQuoteForm {
    /// Validates the quoted price.
    pub fn into_price(self) -> CustomRequestFormResult<i64> {
        self.validate()?;
        Ok(self.price_cents)
    }
}

/// Payload submitted when cancelling a pending request.
#[derive(Debug, Deserialize, Validate)]
pub struct CancelCustomRequestForm {
    #[validate(length(min = 1, max = 512))]
    pub reason: String,
}

impl CancelCustomRequestForm {
    /// Validates and sanitizes the cancellation reason.
    pub fn into_reason(self) -> CustomRequestFormResult<String> {
        self.validate()?;

        let reason = sanitize_plain_text(&self.reason);
        if reason.is_empty() {
            return Err(CustomRequestFormError::EmptyReason);
        }

        Ok(reason)
    }
}

/// Target status submitted when advancing a request through production.
#[derive(Debug, Deserialize)]
pub struct AdvanceCustomRequestForm {
    pub status: CustomRequestStatus,
}

/// Payload submitted when turning an approved request into an order.
#[derive(Debug, Deserialize, Validate)]
pub struct ConvertRequestForm {
    #[validate(length(min = 1, max = 512))]
    pub shipping_address: String,
    pub payment_method: PaymentMethod,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub payment_reference: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub shipping_cents: i64,
}
