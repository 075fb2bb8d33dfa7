use diesel::prelude::*;

use crate::{
    domain::coupon::{
        Coupon as DomainCoupon, CouponListQuery, NewCoupon as DomainNewCoupon,
        UpdateCoupon as DomainUpdateCoupon,
    },
    models::coupon::{Coupon as DbCoupon, NewCoupon as DbNewCoupon, UpdateCoupon as DbUpdateCoupon},
    repository::{CouponReader, CouponWriter, DieselRepository},
    repository::errors::{RepositoryError, RepositoryResult},
};

impl CouponReader for DieselRepository {
    fn get_coupon_by_id(&self, id: i32) -> RepositoryResult<Option<DomainCoupon>> {
        use crate::schema::coupons;

        let mut conn = self.conn()?;
        let coupon = coupons::table
            .filter(coupons::id.eq(id))
            .first::<DbCoupon>(&mut conn)
            .optional()?;

        Ok(coupon.map(DomainCoupon::from))
    }

    fn get_coupon_by_code(&self, code: &str) -> RepositoryResult<Option<DomainCoupon>> {
        use crate::schema::coupons;

        // Codes are stored uppercase; normalize the lookup side.
        let normalized = code.trim().to_uppercase();

        let mut conn = self.conn()?;
        let coupon = coupons::table
            .filter(coupons::code.eq(normalized))
            .first::<DbCoupon>(&mut conn)
            .optional()?;

        Ok(coupon.map(DomainCoupon::from))
    }

    fn list_coupons(&self, query: CouponListQuery) -> RepositoryResult<(usize, Vec<DomainCoupon>)> {
        use crate::schema::coupons;

        let mut conn = self.conn()?;

        let CouponListQuery {
            search,
            include_inactive,
            pagination,
        } = query;

        let search_pattern = search.as_ref().map(|term| format!("%{}%", term.to_uppercase()));

        let mut count_query = coupons::table.into_boxed::<diesel::sqlite::Sqlite>();

        if !include_inactive {
            count_query = count_query.filter(coupons::is_active.eq(true));
        }

        if let Some(ref pattern) = search_pattern {
            count_query = count_query.filter(coupons::code.like(pattern.clone()));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items_query = coupons::table.into_boxed::<diesel::sqlite::Sqlite>();

        if !include_inactive {
            items_query = items_query.filter(coupons::is_active.eq(true));
        }

        if let Some(ref pattern) = search_pattern {
            items_query = items_query.filter(coupons::code.like(pattern.clone()));
        }

        items_query = items_query.order(coupons::code.asc());

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items_query = items_query.offset(offset).limit(limit);
        }

        let items = items_query
            .load::<DbCoupon>(&mut conn)?
            .into_iter()
            .map(DomainCoupon::from)
            .collect();

        Ok((total, items))
    }
}

impl CouponWriter for DieselRepository {
    fn create_coupon(&self, new_coupon: &DomainNewCoupon) -> RepositoryResult<DomainCoupon> {
        use crate::schema::coupons;

        let mut conn = self.conn()?;

        let created = diesel::insert_into(coupons::table)
            .values(&DbNewCoupon::from(new_coupon))
            .get_result::<DbCoupon>(&mut conn)?;

        Ok(created.into_domain())
    }

    fn update_coupon(
        &self,
        coupon_id: i32,
        updates: &DomainUpdateCoupon,
    ) -> RepositoryResult<DomainCoupon> {
        use crate::schema::coupons;

        let mut conn = self.conn()?;

        let updated = diesel::update(coupons::table.filter(coupons::id.eq(coupon_id)))
            .set(&DbUpdateCoupon::from(updates))
            .get_result::<DbCoupon>(&mut conn)?;

        Ok(updated.into_domain())
    }

    fn delete_coupon(&self, coupon_id: i32) -> RepositoryResult<()> {
        use crate::schema::coupons;

        let mut conn = self.conn()?;

        let deleted = diesel::delete(coupons::table.filter(coupons::id.eq(coupon_id)))
            .execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn increment_coupon_usage(&self, coupon_id: i32) -> RepositoryResult<DomainCoupon> {
        use crate::schema::coupons;

        let mut conn = self.conn()?;

        let updated = diesel::update(coupons::table.filter(coupons::id.eq(coupon_id)))
            .set((
                coupons::usage_count.eq(coupons::usage_count + 1),
                coupons::updated_at.eq(diesel::dsl::now),
            ))
            .get_result::<DbCoupon>(&mut conn)?;

        Ok(updated.into_domain())
    }
}
