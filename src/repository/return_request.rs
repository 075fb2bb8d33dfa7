use diesel::prelude::*;

use crate::{
    domain::return_request::{
        NewReturnRequest as DomainNewReturnRequest, ReturnListQuery,
        ReturnRequest as DomainReturnRequest, UpdateReturnRequest as DomainUpdateReturnRequest,
    },
    models::return_request::{
        NewReturnRequest as DbNewReturnRequest, ReturnRequest as DbReturnRequest,
        UpdateReturnRequest as DbUpdateReturnRequest,
    },
    repository::{DieselRepository, ReturnRequestReader, ReturnRequestWriter},
    repository::errors::RepositoryResult,
};

impl ReturnRequestReader for DieselRepository {
    fn get_return_request_by_id(&self, id: i32) -> RepositoryResult<Option<DomainReturnRequest>> {
        use crate::schema::return_requests;

        let mut conn = self.conn()?;
        let request = return_requests::table
            .filter(return_requests::id.eq(id))
            .first::<DbReturnRequest>(&mut conn)
            .optional()?;

        Ok(request.map(DomainReturnRequest::from))
    }

    fn get_return_request_by_order_id(
        &self,
        order_id: i32,
    ) -> RepositoryResult<Option<DomainReturnRequest>> {
        use crate::schema::return_requests;

        let mut conn = self.conn()?;
        let request = return_requests::table
            .filter(return_requests::order_id.eq(order_id))
            .first::<DbReturnRequest>(&mut conn)
            .optional()?;

        Ok(request.map(DomainReturnRequest::from))
    }

    fn list_return_requests(
        &self,
        query: ReturnListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainReturnRequest>)> {
        use crate::schema::return_requests;

        let mut conn = self.conn()?;

        let ReturnListQuery { status, pagination } = query;

        let status_filter = status.map(|status| status.as_str().to_string());

        let mut count_query = return_requests::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(ref status_value) = status_filter {
            count_query = count_query.filter(return_requests::status.eq(status_value.as_str()));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items_query = return_requests::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(ref status_value) = status_filter {
            items_query = items_query.filter(return_requests::status.eq(status_value.as_str()));
        }

        items_query = items_query.order(return_requests::created_at.desc());

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items_query = items_query.offset(offset).limit(limit);
        }

        let items = items_query
            .load::<DbReturnRequest>(&mut conn)?
            .into_iter()
            .map(DomainReturnRequest::from)
            .collect();

        Ok((total, items))
    }
}

impl ReturnRequestWriter for DieselRepository {
    fn create_return_request(
        &self,
        new_request: &DomainNewReturnRequest,
    ) -> RepositoryResult<DomainReturnRequest> {
        use crate::schema::return_requests;

        let mut conn = self.conn()?;

        let created = diesel::insert_into(return_requests::table)
            .values(&DbNewReturnRequest::from(new_request))
            .get_result::<DbReturnRequest>(&mut conn)?;

        Ok(created.into_domain())
    }

    fn update_return_request(
        &self,
        request_id: i32,
        updates: &DomainUpdateReturnRequest,
    ) -> RepositoryResult<DomainReturnRequest> {
        use crate::schema::return_requests;

        let mut conn = self.conn()?;

        let updated =
            diesel::update(return_requests::table.filter(return_requests::id.eq(request_id)))
                .set(&DbUpdateReturnRequest::from(updates))
                .get_result::<DbReturnRequest>(&mut conn)?;

        Ok(updated.into_domain())
    }
}
