use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::return_request::{
    NewReturnRequest as DomainNewReturnRequest, ReturnRequest as DomainReturnRequest,
    UpdateReturnRequest as DomainUpdateReturnRequest,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::return_requests)]
pub struct ReturnRequest {
    pub id: i32,
    pub order_id: i32,
    pub reason: String,
    pub description: Option<String>,
    pub status: String,
    pub return_tracking_id: Option<String>,
    pub rejection_reason: Option<String>,
    pub processed_at: Option<NaiveDateTime>,
    pub processed_by: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::return_requests)]
pub struct NewReturnRequest<'a> {
    pub order_id: i32,
    pub reason: &'a str,
    pub description: Option<&'a str>,
    pub status: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::return_requests)]
pub struct UpdateReturnRequest<'a> {
    pub status: Option<&'a str>,
    pub return_tracking_id: Option<&'a str>,
    pub rejection_reason: Option<&'a str>,
    pub processed_at: Option<NaiveDateTime>,
    pub processed_by: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl ReturnRequest {
    pub fn into_domain(self) -> DomainReturnRequest {
        DomainReturnRequest {
            id: self.id,
            order_id: self.order_id,
            reason: self.reason,
            description: self.description,
            status: self.status.as_str().into(),
            return_tracking_id: self.return_tracking_id,
            rejection_reason: self.rejection_reason,
            processed_at: self.processed_at,
            processed_by: self.processed_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<ReturnRequest> for DomainReturnRequest {
    fn from(value: ReturnRequest) -> Self {
        value.into_domain()
    }
}

impl<'a> From<&'a DomainNewReturnRequest> for NewReturnRequest<'a> {
    fn from(value: &'a DomainNewReturnRequest) -> Self {
        Self {
            order_id: value.order_id,
            reason: value.reason.as_str(),
            description: value.description.as_deref(),
            status: crate::domain::return_request::ReturnStatus::Pending.into(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateReturnRequest> for UpdateReturnRequest<'a> {
    fn from(value: &'a DomainUpdateReturnRequest) -> Self {
        Self {
            status: value.status.map(|status| status.into()),
            return_tracking_id: value.return_tracking_id.as_deref(),
            rejection_reason: value.rejection_reason.as_deref(),
            processed_at: value.processed_at,
            processed_by: value.processed_by.as_deref(),
            updated_at: value.updated_at,
        }
    }
}
