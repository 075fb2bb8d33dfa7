use crate::db::{DbConnection, DbPool};
use crate::domain::coupon::{Coupon, CouponListQuery, NewCoupon, UpdateCoupon};
use crate::domain::custom_request::{
    CustomRequest, CustomRequestListQuery, NewCustomRequest, UpdateCustomRequest,
};
use crate::domain::order::{NewOrder, Order, OrderListQuery, UpdateOrder};
use crate::domain::payment::NewPaymentRecord;
use crate::domain::return_request::{
    NewReturnRequest, ReturnListQuery, ReturnRequest, UpdateReturnRequest,
};
use crate::repository::errors::RepositoryResult;

pub mod coupon;
pub mod custom_request;
pub mod errors;
pub mod order;
pub mod return_request;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over orders and their ledgers.
pub trait OrderReader {
    fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<Order>>;
    fn get_order_by_tracking_id(&self, tracking_id: &str) -> RepositoryResult<Option<Order>>;
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
}

/// Write operations over orders. Updates and ledger appends are conditional
/// on the caller's `expected_version`; a lost race yields
/// `RepositoryError::Conflict`.
pub trait OrderWriter {
    fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order>;
    fn update_order(
        &self,
        order_id: i32,
        expected_version: i32,
        updates: &UpdateOrder,
    ) -> RepositoryResult<Order>;
    /// Append a ledger entry and bump the order version in one transaction.
    fn add_payment(
        &self,
        order_id: i32,
        expected_version: i32,
        entry: &NewPaymentRecord,
    ) -> RepositoryResult<Order>;
}

/// Read-only operations over coupon records.
pub trait CouponReader {
    fn get_coupon_by_id(&self, id: i32) -> RepositoryResult<Option<Coupon>>;
    /// Lookup by code, case-insensitively.
    fn get_coupon_by_code(&self, code: &str) -> RepositoryResult<Option<Coupon>>;
    fn list_coupons(&self, query: CouponListQuery) -> RepositoryResult<(usize, Vec<Coupon>)>;
}

/// Write operations over coupon records.
pub trait CouponWriter {
    fn create_coupon(&self, new_coupon: &NewCoupon) -> RepositoryResult<Coupon>;
    fn update_coupon(&self, coupon_id: i32, updates: &UpdateCoupon) -> RepositoryResult<Coupon>;
    fn delete_coupon(&self, coupon_id: i32) -> RepositoryResult<()>;
    /// Bump `usage_count` by one after a successful order application.
    fn increment_coupon_usage(&self, coupon_id: i32) -> RepositoryResult<Coupon>;
}

/// Read-only operations over return requests.
pub trait ReturnRequestReader {
    fn get_return_request_by_id(&self, id: i32) -> RepositoryResult<Option<ReturnRequest>>;
    fn get_return_request_by_order_id(
        &self,
        order_id: i32,
    ) -> RepositoryResult<Option<ReturnRequest>>;
    fn list_return_requests(
        &self,
        query: ReturnListQuery,
    ) -> RepositoryResult<(usize, Vec<ReturnRequest>)>;
}

/// Write operations over return requests.
pub trait ReturnRequestWriter {
    fn create_return_request(
        &self,
        new_request: &NewReturnRequest,
    ) -> RepositoryResult<ReturnRequest>;
    fn update_return_request(
        &self,
        request_id: i32,
        updates: &UpdateReturnRequest,
    ) -> RepositoryResult<ReturnRequest>;
}

/// Read-only operations over custom clothing requests.
pub trait CustomRequestReader {
    fn get_custom_request_by_id(&self, id: i32) -> RepositoryResult<Option<CustomRequest>>;
    fn get_custom_request_by_reference(
        &self,
        reference: &str,
    ) -> RepositoryResult<Option<CustomRequest>>;
    fn list_custom_requests(
        &self,
        query: CustomRequestListQuery,
    ) -> RepositoryResult<(usize, Vec<CustomRequest>)>;
}

/// Write operations over custom clothing requests.
pub trait CustomRequestWriter {
    fn create_custom_request(
        &self,
        new_request: &NewCustomRequest,
    ) -> RepositoryResult<CustomRequest>;
    fn update_custom_request(
        &self,
        request_id: i32,
        updates: &UpdateCustomRequest,
    ) -> RepositoryResult<CustomRequest>;
}
