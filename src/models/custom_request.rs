use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::custom_request::{
    CustomRequest as DomainCustomRequest, NewCustomRequest as DomainNewCustomRequest,
    UpdateCustomRequest as DomainUpdateCustomRequest,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::custom_requests)]
pub struct CustomRequest {
    pub id: i32,
    pub reference: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub clothing_details: String,
    pub instructions: Option<String>,
    pub status: String,
    pub quoted_price_cents: Option<i64>,
    pub quoted_by: Option<String>,
    pub quoted_at: Option<NaiveDateTime>,
    pub cancellation_reason: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::custom_request_images)]
#[diesel(belongs_to(CustomRequest, foreign_key = custom_request_id))]
pub struct CustomRequestImage {
    pub id: i32,
    pub custom_request_id: i32,
    pub url: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::custom_requests)]
pub struct NewCustomRequest<'a> {
    pub reference: &'a str,
    pub customer_name: &'a str,
    pub customer_email: &'a str,
    pub customer_phone: &'a str,
    pub clothing_details: &'a str,
    pub instructions: Option<&'a str>,
    pub status: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::custom_request_images)]
pub struct NewCustomRequestImage<'a> {
    pub custom_request_id: i32,
    pub url: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::custom_requests)]
pub struct UpdateCustomRequest<'a> {
    pub status: Option<&'a str>,
    pub quoted_price_cents: Option<i64>,
    pub quoted_by: Option<&'a str>,
    pub quoted_at: Option<NaiveDateTime>,
    pub cancellation_reason: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl CustomRequest {
    pub fn into_domain(self, images: Vec<CustomRequestImage>) -> DomainCustomRequest {
        DomainCustomRequest {
            id: self.id,
            reference: self.reference,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            clothing_details: self.clothing_details,
            instructions: self.instructions,
            design_images: images.into_iter().map(|image| image.url).collect(),
            status: self.status.as_str().into(),
            quoted_price_cents: self.quoted_price_cents,
            quoted_by: self.quoted_by,
            quoted_at: self.quoted_at,
            cancellation_reason: self.cancellation_reason,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<(CustomRequest, Vec<CustomRequestImage>)> for DomainCustomRequest {
    fn from(value: (CustomRequest, Vec<CustomRequestImage>)) -> Self {
        value.0.into_domain(value.1)
    }
}

impl<'a> From<&'a DomainNewCustomRequest> for NewCustomRequest<'a> {
    fn from(value: &'a DomainNewCustomRequest) -> Self {
        Self {
            reference: value.reference.as_str(),
            customer_name: value.customer_name.as_str(),
            customer_email: value.customer_email.as_str(),
            customer_phone: value.customer_phone.as_str(),
            clothing_details: value.clothing_details.as_str(),
            instructions: value.instructions.as_deref(),
            status: crate::domain::custom_request::CustomRequestStatus::Pending.into(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateCustomRequest> for UpdateCustomRequest<'a> {
    fn from(value: &'a DomainUpdateCustomRequest) -> Self {
        Self {
            status: value.status.map(|status| status.into()),
            quoted_price_cents: value.quoted_price_cents,
            quoted_by: value.quoted_by.as_deref(),
            quoted_at: value.quoted_at,
            cancellation_reason: value.cancellation_reason.as_deref(),
            updated_at: value.updated_at,
        }
    }
}
