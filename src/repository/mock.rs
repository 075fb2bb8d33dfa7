use mockall::mock;

use super::{
    CouponReader, CouponWriter, CustomRequestReader, CustomRequestWriter, OrderReader,
    OrderWriter, ReturnRequestReader, ReturnRequestWriter,
};
use crate::domain::{
    coupon::{Coupon, CouponListQuery, NewCoupon, UpdateCoupon},
    custom_request::{CustomRequest, CustomRequestListQuery, NewCustomRequest, UpdateCustomRequest},
    order::{NewOrder, Order, OrderListQuery, UpdateOrder},
    payment::NewPaymentRecord,
    return_request::{NewReturnRequest, ReturnListQuery, ReturnRequest, UpdateReturnRequest},
};
use crate::repository::errors::RepositoryResult;

mock! {
    pub OrderReader {}

    impl OrderReader for OrderReader {
        fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<Order>>;
        fn get_order_by_tracking_id(&self, tracking_id: &str) -> RepositoryResult<Option<Order>>;
        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
    }
}

mock! {
    pub OrderWriter {}

    impl OrderWriter for OrderWriter {
        fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order>;
        fn update_order(&self, order_id: i32, expected_version: i32, updates: &UpdateOrder) -> RepositoryResult<Order>;
        fn add_payment(&self, order_id: i32, expected_version: i32, entry: &NewPaymentRecord) -> RepositoryResult<Order>;
    }
}

mock! {
    pub CouponReader {}

    impl CouponReader for CouponReader {
        fn get_coupon_by_id(&self, id: i32) -> RepositoryResult<Option<Coupon>>;
        fn get_coupon_by_code(&self, code: &str) -> RepositoryResult<Option<Coupon>>;
        fn list_coupons(&self, query: CouponListQuery) -> RepositoryResult<(usize, Vec<Coupon>)>;
    }
}

mock! {
    pub CouponWriter {}

    impl CouponWriter for CouponWriter {
        fn create_coupon(&self, new_coupon: &NewCoupon) -> RepositoryResult<Coupon>;
        fn update_coupon(&self, coupon_id: i32, updates: &UpdateCoupon) -> RepositoryResult<Coupon>;
        fn delete_coupon(&self, coupon_id: i32) -> RepositoryResult<()>;
        fn increment_coupon_usage(&self, coupon_id: i32) -> RepositoryResult<Coupon>;
    }
}

mock! {
    pub ReturnRequestReader {}

    impl ReturnRequestReader for ReturnRequestReader {
        fn get_return_request_by_id(&self, id: i32) -> RepositoryResult<Option<ReturnRequest>>;
        fn get_return_request_by_order_id(&self, order_id: i32) -> RepositoryResult<Option<ReturnRequest>>;
        fn list_return_requests(&self, query: ReturnListQuery) -> RepositoryResult<(usize, Vec<ReturnRequest>)>;
    }
}

mock! {
    pub ReturnRequestWriter {}

    impl ReturnRequestWriter for ReturnRequestWriter {
        fn create_return_request(&self, new_request: &NewReturnRequest) -> RepositoryResult<ReturnRequest>;
        fn update_return_request(&self, request_id: i32, updates: &UpdateReturnRequest) -> RepositoryResult<ReturnRequest>;
    }
}

mock! {
    pub CustomRequestReader {}

    impl CustomRequestReader for CustomRequestReader {
        fn get_custom_request_by_id(&self, id: i32) -> RepositoryResult<Option<CustomRequest>>;
        fn get_custom_request_by_reference(&self, reference: &str) -> RepositoryResult<Option<CustomRequest>>;
        fn list_custom_requests(&self, query: CustomRequestListQuery) -> RepositoryResult<(usize, Vec<CustomRequest>)>;
    }
}

mock! {
    pub CustomRequestWriter {}

    impl CustomRequestWriter for CustomRequestWriter {
        fn create_custom_request(&self, new_request: &NewCustomRequest) -> RepositoryResult<CustomRequest>;
        fn update_custom_request(&self, request_id: i32, updates: &UpdateCustomRequest) -> RepositoryResult<CustomRequest>;
    }
}
