use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::order::{Order, OrderListQuery, OrderStatus, UpdateOrder};
use crate::forms::orders::{CancelOrderForm, CreateOrderForm};
use crate::notify::{NotificationKind, Notifier, notify_customer};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{CouponReader, CouponWriter, OrderReader, OrderWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the orders listing.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    /// Optional status filter.
    pub status: Option<OrderStatus>,
    /// Optional search string entered by the user.
    pub search: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

/// JSON view of an order, with the ledger-derived figures alongside.
#[derive(Debug, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub amount_paid_cents: i64,
    pub amount_due_cents: i64,
    pub fully_paid: bool,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        let amount_paid_cents = order.amount_paid_cents();
        let amount_due_cents = order.amount_due_cents();
        let fully_paid = order.is_fully_paid();

        Self {
            order,
            amount_paid_cents,
            amount_due_cents,
            fully_paid,
        }
    }
}

/// Data returned for the orders listing.
pub struct OrdersPageData {
    pub orders: Paginated<OrderView>,
    /// Search query echoed back when present.
    pub search: Option<String>,
}

pub(crate) fn new_tracking_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("ORD-{}", uuid[..12].to_uppercase())
}

/// Place a new order. Customer-facing: any authenticated caller may order.
///
/// The coupon, if any, is validated against the order subtotal before the
/// write; its usage counter is bumped exactly once afterwards. A failed
/// bump is logged and reconciled by hand, it never fails the order.
pub fn create_order<R, N>(
    repo: &R,
    notifier: &N,
    form: CreateOrderForm,
    now: NaiveDateTime,
) -> ServiceResult<OrderView>
where
    R: OrderWriter + CouponReader + CouponWriter + ?Sized,
    N: Notifier + ?Sized,
{
    let coupon_code = form.coupon_code.clone();

    let mut payload = form
        .into_new_order(new_tracking_id())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let applied_coupon = match coupon_code {
        Some(code) => {
            let coupon = repo
                .get_coupon_by_code(&code)
                .map_err(ServiceError::from)?
                .ok_or(ServiceError::NotFound)?;

            let discount_cents = coupon.validate(payload.subtotal_cents, now)?;
            payload = payload.with_discount(discount_cents, coupon.code.clone());
            Some(coupon)
        }
        None => None,
    };

    let order = repo.create_order(&payload).map_err(ServiceError::from)?;

    if let Some(coupon) = applied_coupon {
        if let Err(err) = repo.increment_coupon_usage(coupon.id) {
            log::error!(
                "Failed to increment usage for coupon {} after order {}: {err}",
                coupon.code,
                order.id
            );
        }
    }

    notify_customer(
        notifier,
        &order.customer_email,
        &order.customer_phone,
        NotificationKind::OrderPlaced,
        json!({
            "tracking_id": order.tracking_id,
            "total_cents": order.total_cents,
            "currency": order.currency,
        }),
    );

    Ok(OrderView::from(order))
}

/// Loads the admin orders listing.
pub fn list_orders<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: OrdersQuery,
) -> ServiceResult<OrdersPageData>
where
    R: OrderReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let OrdersQuery {
        status,
        search,
        page,
    } = query;

    let page = page.unwrap_or(1);
    let mut list_query = OrderListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(status) = status {
        list_query = list_query.status(status);
    }

    if let Some(term) = search.as_deref() {
        list_query = list_query.search(term);
    }

    let (total, items) = repo.list_orders(list_query).map_err(ServiceError::from)?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    let views: Vec<OrderView> = items.into_iter().map(OrderView::from).collect();
    let orders = Paginated::new(views, page, total_pages);

    Ok(OrdersPageData { orders, search })
}

/// Admin fetch of a single order with its ledger.
pub fn get_order<R>(repo: &R, user: &AuthenticatedUser, order_id: i32) -> ServiceResult<OrderView>
where
    R: OrderReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let order = repo
        .get_order_by_id(order_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    Ok(OrderView::from(order))
}

/// Customer-facing lookup by tracking id.
pub fn track_order<R>(repo: &R, tracking_id: &str) -> ServiceResult<OrderView>
where
    R: OrderReader + ?Sized,
{
    let order = repo
        .get_order_by_tracking_id(tracking_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    Ok(OrderView::from(order))
}

/// Move the order forward through the fulfillment sequence. Cancellation is
/// not reachable through this operation; it has its own paths.
pub fn advance_status<R, N>(
    repo: &R,
    notifier: &N,
    user: &AuthenticatedUser,
    order_id: i32,
    new_status: OrderStatus,
) -> ServiceResult<OrderView>
where
    R: OrderReader + OrderWriter + ?Sized,
    N: Notifier + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let order = repo
        .get_order_by_id(order_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if !order.status.can_advance_to(new_status) {
        return Err(ServiceError::InvalidTransition(format!(
            "cannot move order from {} to {}",
            order.status.as_str(),
            new_status.as_str()
        )));
    }

    let updated = repo
        .update_order(order.id, order.version, &UpdateOrder::new().status(new_status))
        .map_err(ServiceError::from)?;

    notify_customer(
        notifier,
        &updated.customer_email,
        &updated.customer_phone,
        NotificationKind::OrderStatusChanged,
        json!({
            "tracking_id": updated.tracking_id,
            "status": updated.status.as_str(),
        }),
    );

    Ok(OrderView::from(updated))
}

/// Explicit admin cancellation with a reason. Terminal: once cancelled, the
/// order accepts no further transitions or ledger writes.
pub fn cancel_order<R, N>(
    repo: &R,
    notifier: &N,
    user: &AuthenticatedUser,
    order_id: i32,
    form: CancelOrderForm,
) -> ServiceResult<OrderView>
where
    R: OrderReader + OrderWriter + ?Sized,
    N: Notifier + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let reason = form
        .into_reason()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let order = repo
        .get_order_by_id(order_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if order.status.is_terminal() {
        return Err(ServiceError::InvalidTransition(format!(
            "cannot cancel an order that is {}",
            order.status.as_str()
        )));
    }

    let updated = repo
        .update_order(order.id, order.version, &UpdateOrder::new().cancel(reason.clone()))
        .map_err(ServiceError::from)?;

    notify_customer(
        notifier,
        &updated.customer_email,
        &updated.customer_phone,
        NotificationKind::OrderCancelled,
        json!({
            "tracking_id": updated.tracking_id,
            "reason": reason,
        }),
    );

    Ok(OrderView::from(updated))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::domain::coupon::{Coupon, DiscountType};
    use crate::domain::order::{OrderItem, PaymentMethod};
    use crate::domain::payment::{PaymentKind, PaymentRecord};
    use crate::forms::orders::OrderItemForm;
    use crate::notify::mock::MockNotifier;
    use crate::repository::mock::{
        MockCouponReader, MockCouponWriter, MockOrderReader, MockOrderWriter,
    };
    use crate::repository::errors::{RepositoryError, RepositoryResult};
    use crate::repository::{CouponReader, CouponWriter, OrderReader, OrderWriter};
    use crate::domain::coupon::{CouponListQuery, NewCoupon, UpdateCoupon};
    use crate::domain::order::NewOrder;
    use crate::domain::payment::NewPaymentRecord;

    pub(crate) fn datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default()
    }

    pub(crate) fn sample_order(id: i32, total_cents: i64) -> Order {
        Order {
            id,
            tracking_id: format!("ORD-{id:06}"),
            customer_name: "Asha Rao".to_string(),
            customer_email: "asha@example.com".to_string(),
            customer_phone: "+911234567890".to_string(),
            shipping_address: "12 Lake Road, Pune".to_string(),
            status: OrderStatus::Pending,
            payment_method: PaymentMethod::CashOnDelivery,
            payment_reference: None,
            payment_verified: false,
            verified_at: None,
            verified_by: None,
            coupon_code: None,
            subtotal_cents: total_cents,
            shipping_cents: 0,
            discount_cents: 0,
            total_cents,
            currency: "INR".to_string(),
            cancellation_reason: None,
            items: Vec::new(),
            payments: Vec::new(),
            version: 3,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    pub(crate) fn paid_entry(order_id: i32, amount_cents: i64) -> PaymentRecord {
        PaymentRecord {
            id: 1,
            order_id,
            kind: PaymentKind::Payment,
            amount_cents,
            method: "cash".to_string(),
            note: None,
            recorded_by: "admin@example.com".to_string(),
            created_at: datetime(),
        }
    }

    pub(crate) fn admin() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "user-1".to_string(),
            email: "admin@example.com".to_string(),
            name: "Admin".to_string(),
            roles: vec![SERVICE_ACCESS_ROLE.to_string()],
            exp: 0,
        }
    }

    pub(crate) fn customer() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "user-2".to_string(),
            email: "asha@example.com".to_string(),
            name: "Asha".to_string(),
            roles: Vec::new(),
            exp: 0,
        }
    }

    fn quiet_notifier() -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().returning(|_| Ok(()));
        notifier
    }

    fn order_form(coupon_code: Option<&str>) -> CreateOrderForm {
        CreateOrderForm {
            customer_name: "Asha Rao".to_string(),
            customer_email: "asha@example.com".to_string(),
            customer_phone: "+911234567890".to_string(),
            shipping_address: "12 Lake Road, Pune".to_string(),
            payment_method: PaymentMethod::CashOnDelivery,
            payment_reference: None,
            coupon_code: coupon_code.map(str::to_string),
            shipping_cents: 0,
            items: vec![OrderItemForm {
                product_id: Some(4),
                name: "Silk scarf".to_string(),
                unit_price_cents: 500,
                quantity: 2,
            }],
        }
    }

    fn percentage_coupon() -> Coupon {
        Coupon {
            id: 11,
            code: "WELCOME20".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: 20,
            min_purchase_cents: 500,
            max_discount_cents: Some(150),
            expires_at: None,
            usage_limit: None,
            usage_count: 0,
            is_active: true,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    struct FakeRepo {
        order_reader: MockOrderReader,
        order_writer: MockOrderWriter,
        coupon_reader: MockCouponReader,
        coupon_writer: MockCouponWriter,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                order_reader: MockOrderReader::new(),
                order_writer: MockOrderWriter::new(),
                coupon_reader: MockCouponReader::new(),
                coupon_writer: MockCouponWriter::new(),
            }
        }
    }

    impl OrderReader for FakeRepo {
        fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<Order>> {
            self.order_reader.get_order_by_id(id)
        }

        fn get_order_by_tracking_id(&self, tracking_id: &str) -> RepositoryResult<Option<Order>> {
            self.order_reader.get_order_by_tracking_id(tracking_id)
        }

        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)> {
            self.order_reader.list_orders(query)
        }
    }

    impl OrderWriter for FakeRepo {
        fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order> {
            self.order_writer.create_order(new_order)
        }

        fn update_order(
            &self,
            order_id: i32,
            expected_version: i32,
            updates: &UpdateOrder,
        ) -> RepositoryResult<Order> {
            self.order_writer
                .update_order(order_id, expected_version, updates)
        }

        fn add_payment(
            &self,
            order_id: i32,
            expected_version: i32,
            entry: &NewPaymentRecord,
        ) -> RepositoryResult<Order> {
            self.order_writer
                .add_payment(order_id, expected_version, entry)
        }
    }

    impl CouponReader for FakeRepo {
        fn get_coupon_by_id(&self, id: i32) -> RepositoryResult<Option<Coupon>> {
            self.coupon_reader.get_coupon_by_id(id)
        }

        fn get_coupon_by_code(&self, code: &str) -> RepositoryResult<Option<Coupon>> {
            self.coupon_reader.get_coupon_by_code(code)
        }

        fn list_coupons(&self, query: CouponListQuery) -> RepositoryResult<(usize, Vec<Coupon>)> {
            self.coupon_reader.list_coupons(query)
        }
    }

    impl CouponWriter for FakeRepo {
        fn create_coupon(&self, new_coupon: &NewCoupon) -> RepositoryResult<Coupon> {
            self.coupon_writer.create_coupon(new_coupon)
        }

        fn update_coupon(&self, coupon_id: i32, updates: &UpdateCoupon) -> RepositoryResult<Coupon> {
            self.coupon_writer.update_coupon(coupon_id, updates)
        }

        fn delete_coupon(&self, coupon_id: i32) -> RepositoryResult<()> {
            self.coupon_writer.delete_coupon(coupon_id)
        }

        fn increment_coupon_usage(&self, coupon_id: i32) -> RepositoryResult<Coupon> {
            self.coupon_writer.increment_coupon_usage(coupon_id)
        }
    }

    #[test]
    fn create_order_applies_capped_percentage_discount() {
        let mut repo = FakeRepo::new();
        let notifier = quiet_notifier();

        repo.coupon_reader
            .expect_get_coupon_by_code()
            .times(1)
            .withf(|code| code == "WELCOME20")
            .returning(move |_| Ok(Some(percentage_coupon())));

        repo.order_writer
            .expect_create_order()
            .times(1)
            .withf(|payload| {
                assert_eq!(payload.subtotal_cents, 1000);
                // 20% of 1000 is 200; the cap brings it to 150.
                assert_eq!(payload.discount_cents, 150);
                assert_eq!(payload.total_cents(), 850);
                assert_eq!(payload.coupon_code.as_deref(), Some("WELCOME20"));
                assert!(payload.tracking_id.starts_with("ORD-"));
                true
            })
            .returning(move |payload| {
                let mut order = sample_order(5, payload.total_cents());
                order.discount_cents = payload.discount_cents;
                order.coupon_code = payload.coupon_code.clone();
                Ok(order)
            });

        repo.coupon_writer
            .expect_increment_coupon_usage()
            .times(1)
            .withf(|coupon_id| *coupon_id == 11)
            .returning(move |_| Ok(percentage_coupon()));

        let result = create_order(&repo, &notifier, order_form(Some("WELCOME20")), datetime());

        let view = result.expect("expected success");
        assert_eq!(view.order.total_cents, 850);
        assert_eq!(view.amount_due_cents, 850);
        assert!(!view.fully_paid);
    }

    #[test]
    fn create_order_rejects_unusable_coupon_before_writing() {
        let mut repo = FakeRepo::new();
        let notifier = MockNotifier::new();

        repo.coupon_reader
            .expect_get_coupon_by_code()
            .times(1)
            .returning(move |_| {
                let mut coupon = percentage_coupon();
                coupon.is_active = false;
                Ok(Some(coupon))
            });

        // No create_order, no usage increment, no notification.
        let result = create_order(&repo, &notifier, order_form(Some("WELCOME20")), datetime());

        assert!(matches!(
            result,
            Err(ServiceError::Coupon(
                crate::domain::coupon::CouponError::Inactive
            ))
        ));
    }

    #[test]
    fn create_order_survives_a_failed_usage_increment() {
        let mut repo = FakeRepo::new();
        let notifier = quiet_notifier();

        repo.coupon_reader
            .expect_get_coupon_by_code()
            .returning(move |_| Ok(Some(percentage_coupon())));

        repo.order_writer
            .expect_create_order()
            .returning(move |payload| Ok(sample_order(5, payload.total_cents())));

        repo.coupon_writer
            .expect_increment_coupon_usage()
            .times(1)
            .returning(|_| Err(RepositoryError::NotFound));

        // The order write already happened; the increment failure is logged
        // and reconciled out of band.
        let result = create_order(&repo, &notifier, order_form(Some("WELCOME20")), datetime());

        assert!(result.is_ok());
    }

    #[test]
    fn create_order_without_coupon_touches_no_coupons() {
        let mut repo = FakeRepo::new();
        let notifier = quiet_notifier();

        repo.order_writer
            .expect_create_order()
            .times(1)
            .withf(|payload| {
                assert_eq!(payload.discount_cents, 0);
                assert!(payload.coupon_code.is_none());
                true
            })
            .returning(move |payload| Ok(sample_order(6, payload.total_cents())));

        let result = create_order(&repo, &notifier, order_form(None), datetime());

        assert!(result.is_ok());
    }

    #[test]
    fn advance_status_requires_role() {
        let repo = FakeRepo::new();
        let notifier = MockNotifier::new();

        let result = advance_status(
            &repo,
            &notifier,
            &customer(),
            1,
            OrderStatus::InTransit,
        );

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn advance_status_moves_forward_and_notifies() {
        let mut repo = FakeRepo::new();
        let mut notifier = MockNotifier::new();

        repo.order_reader
            .expect_get_order_by_id()
            .times(1)
            .returning(move |_| Ok(Some(sample_order(1, 1000))));

        repo.order_writer
            .expect_update_order()
            .times(1)
            .withf(|order_id, expected_version, updates| {
                assert_eq!(*order_id, 1);
                assert_eq!(*expected_version, 3);
                assert_eq!(updates.status, Some(OrderStatus::InTransit));
                assert!(updates.cancellation_reason.is_none());
                true
            })
            .returning(move |_, _, _| {
                let mut order = sample_order(1, 1000);
                order.status = OrderStatus::InTransit;
                order.version = 4;
                Ok(order)
            });

        notifier
            .expect_notify()
            .times(2)
            .withf(|notification| {
                assert_eq!(notification.kind, NotificationKind::OrderStatusChanged);
                assert_eq!(
                    notification.payload.get("status").and_then(|v| v.as_str()),
                    Some("in_transit")
                );
                true
            })
            .returning(|_| Ok(()));

        let view = advance_status(&repo, &notifier, &admin(), 1, OrderStatus::InTransit)
            .expect("expected success");

        assert_eq!(view.order.status, OrderStatus::InTransit);
    }

    #[test]
    fn advance_status_rejects_backward_moves() {
        let mut repo = FakeRepo::new();
        let notifier = MockNotifier::new();

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| {
                let mut order = sample_order(1, 1000);
                order.status = OrderStatus::OutForDelivery;
                Ok(Some(order))
            });

        let result = advance_status(&repo, &notifier, &admin(), 1, OrderStatus::InTransit);

        assert!(matches!(result, Err(ServiceError::InvalidTransition(_))));
    }

    #[test]
    fn advance_status_rejects_cancelled_orders() {
        let mut repo = FakeRepo::new();
        let notifier = MockNotifier::new();

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| {
                let mut order = sample_order(1, 1000);
                order.status = OrderStatus::Cancelled;
                order.cancellation_reason = Some("payment not received".to_string());
                Ok(Some(order))
            });

        let result = advance_status(&repo, &notifier, &admin(), 1, OrderStatus::Delivered);

        assert!(matches!(result, Err(ServiceError::InvalidTransition(_))));
    }

    #[test]
    fn advance_status_cannot_reach_cancelled() {
        let mut repo = FakeRepo::new();
        let notifier = MockNotifier::new();

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| Ok(Some(sample_order(1, 1000))));

        let result = advance_status(&repo, &notifier, &admin(), 1, OrderStatus::Cancelled);

        assert!(matches!(result, Err(ServiceError::InvalidTransition(_))));
    }

    #[test]
    fn cancel_order_stores_the_reason() {
        let mut repo = FakeRepo::new();
        let notifier = quiet_notifier();

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| Ok(Some(sample_order(1, 1000))));

        repo.order_writer
            .expect_update_order()
            .times(1)
            .withf(|_, _, updates| {
                assert_eq!(updates.status, Some(OrderStatus::Cancelled));
                assert_eq!(
                    updates.cancellation_reason.as_deref(),
                    Some("customer asked to cancel")
                );
                true
            })
            .returning(move |_, _, _| {
                let mut order = sample_order(1, 1000);
                order.status = OrderStatus::Cancelled;
                order.cancellation_reason = Some("customer asked to cancel".to_string());
                Ok(order)
            });

        let form = CancelOrderForm {
            reason: " customer asked to cancel ".to_string(),
        };

        let view = cancel_order(&repo, &notifier, &admin(), 1, form).expect("expected success");

        assert_eq!(view.order.status, OrderStatus::Cancelled);
    }

    #[test]
    fn cancel_order_rejects_terminal_states() {
        let mut repo = FakeRepo::new();
        let notifier = MockNotifier::new();

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| {
                let mut order = sample_order(1, 1000);
                order.status = OrderStatus::Delivered;
                Ok(Some(order))
            });

        let form = CancelOrderForm {
            reason: "late delivery".to_string(),
        };

        let result = cancel_order(&repo, &notifier, &admin(), 1, form);

        assert!(matches!(result, Err(ServiceError::InvalidTransition(_))));
    }

    #[test]
    fn cancel_order_surfaces_version_conflicts() {
        let mut repo = FakeRepo::new();
        let notifier = MockNotifier::new();

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| Ok(Some(sample_order(1, 1000))));

        repo.order_writer
            .expect_update_order()
            .returning(|_, _, _| Err(RepositoryError::Conflict));

        let form = CancelOrderForm {
            reason: "duplicate order".to_string(),
        };

        let result = cancel_order(&repo, &notifier, &admin(), 1, form);

        assert!(matches!(result, Err(ServiceError::Conflict)));
    }

    #[test]
    fn list_orders_requires_role() {
        let repo = FakeRepo::new();

        let result = list_orders(&repo, &customer(), OrdersQuery::default());

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn list_orders_returns_paginated_views() {
        let mut repo = FakeRepo::new();

        repo.order_reader
            .expect_list_orders()
            .times(1)
            .withf(|query| {
                assert_eq!(query.status, Some(OrderStatus::Pending));
                assert_eq!(query.search.as_deref(), Some("asha"));
                match &query.pagination {
                    Some(pagination) => {
                        assert_eq!(pagination.page, 2);
                        assert_eq!(pagination.per_page, DEFAULT_ITEMS_PER_PAGE);
                    }
                    None => panic!("expected pagination to be set"),
                }
                true
            })
            .returning(move |_| {
                let mut order = sample_order(1, 1000);
                order.payments = vec![paid_entry(1, 400)];
                Ok((51, vec![order]))
            });

        let query = OrdersQuery {
            status: Some(OrderStatus::Pending),
            search: Some("asha".to_string()),
            page: Some(2),
        };

        let data = list_orders(&repo, &admin(), query).expect("expected success");

        assert_eq!(data.orders.page, 2);
        assert_eq!(data.orders.total_pages, 3);
        assert_eq!(data.orders.items.len(), 1);
        assert_eq!(data.orders.items[0].amount_paid_cents, 400);
        assert_eq!(data.orders.items[0].amount_due_cents, 600);
    }

    #[test]
    fn track_order_finds_by_tracking_id() {
        let mut repo = FakeRepo::new();

        repo.order_reader
            .expect_get_order_by_tracking_id()
            .times(1)
            .withf(|tracking_id| tracking_id == "ORD-000007")
            .returning(move |_| Ok(Some(sample_order(7, 1000))));

        let view = track_order(&repo, "ORD-000007").expect("expected success");

        assert_eq!(view.order.id, 7);
    }

    #[test]
    fn track_order_unknown_id_is_not_found() {
        let mut repo = FakeRepo::new();

        repo.order_reader
            .expect_get_order_by_tracking_id()
            .returning(|_| Ok(None));

        let result = track_order(&repo, "ORD-MISSING");

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
