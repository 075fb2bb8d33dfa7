use std::collections::HashMap;

use diesel::prelude::*;

use crate::{
    domain::custom_request::{
        CustomRequest as DomainCustomRequest, CustomRequestListQuery,
        NewCustomRequest as DomainNewCustomRequest,
        UpdateCustomRequest as DomainUpdateCustomRequest,
    },
    models::custom_request::{
        CustomRequest as DbCustomRequest, CustomRequestImage as DbCustomRequestImage,
        NewCustomRequest as DbNewCustomRequest, NewCustomRequestImage as DbNewCustomRequestImage,
        UpdateCustomRequest as DbUpdateCustomRequest,
    },
    repository::{CustomRequestReader, CustomRequestWriter, DieselRepository},
    repository::errors::{RepositoryError, RepositoryResult},
};

fn load_images(
    conn: &mut crate::db::DbConnection,
    request_id: i32,
) -> Result<Vec<DbCustomRequestImage>, diesel::result::Error> {
    use crate::schema::custom_request_images;

    custom_request_images::table
        .filter(custom_request_images::custom_request_id.eq(request_id))
        .order(custom_request_images::id.asc())
        .load::<DbCustomRequestImage>(conn)
}

impl CustomRequestReader for DieselRepository {
    fn get_custom_request_by_id(&self, id: i32) -> RepositoryResult<Option<DomainCustomRequest>> {
        use crate::schema::custom_requests;

        let mut conn = self.conn()?;
        let request = custom_requests::table
            .filter(custom_requests::id.eq(id))
            .first::<DbCustomRequest>(&mut conn)
            .optional()?;

        let Some(request) = request else {
            return Ok(None);
        };

        let images = load_images(&mut conn, request.id)?;

        Ok(Some(DomainCustomRequest::from((request, images))))
    }

    fn get_custom_request_by_reference(
        &self,
        reference: &str,
    ) -> RepositoryResult<Option<DomainCustomRequest>> {
        use crate::schema::custom_requests;

        let mut conn = self.conn()?;
        let request = custom_requests::table
            .filter(custom_requests::reference.eq(reference))
            .first::<DbCustomRequest>(&mut conn)
            .optional()?;

        let Some(request) = request else {
            return Ok(None);
        };

        let images = load_images(&mut conn, request.id)?;

        Ok(Some(DomainCustomRequest::from((request, images))))
    }

    fn list_custom_requests(
        &self,
        query: CustomRequestListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainCustomRequest>)> {
        use crate::schema::{custom_request_images, custom_requests};

        let mut conn = self.conn()?;

        let CustomRequestListQuery {
            status,
            search,
            pagination,
        } = query;

        let status_filter = status.map(|status| status.as_str().to_string());
        let search_pattern = search.as_ref().map(|term| format!("%{}%", term));

        let mut count_query = custom_requests::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(ref status_value) = status_filter {
            count_query = count_query.filter(custom_requests::status.eq(status_value.as_str()));
        }

        if let Some(ref pattern) = search_pattern {
            count_query = count_query.filter(
                custom_requests::reference
                    .like(pattern.clone())
                    .or(custom_requests::customer_name.like(pattern.clone()))
                    .or(custom_requests::customer_email.like(pattern.clone())),
            );
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items_query = custom_requests::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(ref status_value) = status_filter {
            items_query = items_query.filter(custom_requests::status.eq(status_value.as_str()));
        }

        if let Some(ref pattern) = search_pattern {
            items_query = items_query.filter(
                custom_requests::reference
                    .like(pattern.clone())
                    .or(custom_requests::customer_name.like(pattern.clone()))
                    .or(custom_requests::customer_email.like(pattern.clone())),
            );
        }

        items_query = items_query.order(custom_requests::created_at.desc());

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items_query = items_query.offset(offset).limit(limit);
        }

        let db_requests = items_query.load::<DbCustomRequest>(&mut conn)?;
        if db_requests.is_empty() {
            return Ok((total, Vec::new()));
        }

        let request_ids: Vec<i32> = db_requests.iter().map(|request| request.id).collect();

        let mut images_by_request: HashMap<i32, Vec<DbCustomRequestImage>> = HashMap::new();
        let image_rows = custom_request_images::table
            .filter(custom_request_images::custom_request_id.eq_any(&request_ids))
            .order(custom_request_images::id.asc())
            .load::<DbCustomRequestImage>(&mut conn)?;
        for image in image_rows {
            images_by_request
                .entry(image.custom_request_id)
                .or_default()
                .push(image);
        }

        let requests = db_requests
            .into_iter()
            .map(|request| {
                let request_id = request.id;
                let images = images_by_request.remove(&request_id).unwrap_or_default();
                DomainCustomRequest::from((request, images))
            })
            .collect();

        Ok((total, requests))
    }
}

impl CustomRequestWriter for DieselRepository {
    fn create_custom_request(
        &self,
        new_request: &DomainNewCustomRequest,
    ) -> RepositoryResult<DomainCustomRequest> {
        use crate::schema::{custom_request_images, custom_requests};

        let mut conn = self.conn()?;

        conn.transaction::<DomainCustomRequest, RepositoryError, _>(|conn| {
            let created = diesel::insert_into(custom_requests::table)
                .values(&DbNewCustomRequest::from(new_request))
                .get_result::<DbCustomRequest>(conn)?;

            let request_id = created.id;

            if !new_request.design_images.is_empty() {
                let payload: Vec<DbNewCustomRequestImage> = new_request
                    .design_images
                    .iter()
                    .map(|url| DbNewCustomRequestImage {
                        custom_request_id: request_id,
                        url: url.as_str(),
                    })
                    .collect();

                diesel::insert_into(custom_request_images::table)
                    .values(&payload)
                    .execute(conn)?;
            }

            let images = load_images(conn, request_id)?;

            Ok(DomainCustomRequest::from((created, images)))
        })
    }

    fn update_custom_request(
        &self,
        request_id: i32,
        updates: &DomainUpdateCustomRequest,
    ) -> RepositoryResult<DomainCustomRequest> {
        use crate::schema::custom_requests;

        let mut conn = self.conn()?;

        let updated = diesel::update(custom_requests::table.filter(custom_requests::id.eq(request_id)))
            .set(&DbUpdateCustomRequest::from(updates))
            .get_result::<DbCustomRequest>(&mut conn)?;

        let images = load_images(&mut conn, request_id)?;

        Ok(updated.into_domain(images))
    }
}
