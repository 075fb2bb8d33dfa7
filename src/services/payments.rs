use serde_json::json;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::order::{Order, OrderStatus, UpdateOrder};
use crate::domain::payment::NewPaymentRecord;
use crate::forms::payments::{RecordPaymentForm, RejectPaymentForm};
use crate::notify::{NotificationKind, Notifier, notify_customer};
use crate::repository::{OrderReader, OrderWriter};
use crate::services::orders::OrderView;
use crate::services::{ServiceError, ServiceResult};

fn load_order<R>(repo: &R, order_id: i32) -> ServiceResult<Order>
where
    R: OrderReader + ?Sized,
{
    repo.get_order_by_id(order_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

fn reject_if_cancelled(order: &Order, operation: &str) -> ServiceResult<()> {
    if order.status == OrderStatus::Cancelled {
        return Err(ServiceError::InvalidTransition(format!(
            "cannot {operation} on a cancelled order"
        )));
    }

    Ok(())
}

/// Mark a gateway payment as reconciled against the aggregator dashboard.
/// Idempotent: verifying an already-verified order returns it unchanged.
pub fn verify_payment<R, N>(
    repo: &R,
    notifier: &N,
    user: &AuthenticatedUser,
    order_id: i32,
) -> ServiceResult<OrderView>
where
    R: OrderReader + OrderWriter + ?Sized,
    N: Notifier + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let order = load_order(repo, order_id)?;

    if !order.payment_method.requires_verification() {
        return Err(ServiceError::Form(
            "payment method does not require verification".to_string(),
        ));
    }

    reject_if_cancelled(&order, "verify a payment")?;

    if order.payment_verified {
        return Ok(OrderView::from(order));
    }

    let updated = repo
        .update_order(
            order.id,
            order.version,
            &UpdateOrder::new().verify(user.email.as_str()),
        )
        .map_err(ServiceError::from)?;

    notify_customer(
        notifier,
        &updated.customer_email,
        &updated.customer_phone,
        NotificationKind::PaymentVerified,
        json!({
            "tracking_id": updated.tracking_id,
            "payment_reference": updated.payment_reference,
        }),
    );

    Ok(OrderView::from(updated))
}

/// Declare a gateway payment not received. Cancels the order; this is the
/// only cancellation path gated on the payment being unverified.
pub fn reject_payment<R, N>(
    repo: &R,
    notifier: &N,
    user: &AuthenticatedUser,
    order_id: i32,
    form: RejectPaymentForm,
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

    let order = load_order(repo, order_id)?;

    if !order.payment_method.requires_verification() {
        return Err(ServiceError::Form(
            "payment method does not require verification".to_string(),
        ));
    }

    reject_if_cancelled(&order, "reject a payment")?;

    if order.payment_verified {
        return Err(ServiceError::PaymentAlreadyVerified);
    }

    let updated = repo
        .update_order(order.id, order.version, &UpdateOrder::new().cancel(reason.clone()))
        .map_err(ServiceError::from)?;

    notify_customer(
        notifier,
        &updated.customer_email,
        &updated.customer_phone,
        NotificationKind::PaymentRejected,
        json!({
            "tracking_id": updated.tracking_id,
            "reason": reason,
        }),
    );

    Ok(OrderView::from(updated))
}

/// Append a forward payment to the order's ledger. The amount must not
/// exceed the outstanding balance; the ledger is left untouched otherwise.
pub fn record_payment<R, N>(
    repo: &R,
    notifier: &N,
    user: &AuthenticatedUser,
    order_id: i32,
    form: RecordPaymentForm,
) -> ServiceResult<OrderView>
where
    R: OrderReader + OrderWriter + ?Sized,
    N: Notifier + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let order = load_order(repo, order_id)?;
    reject_if_cancelled(&order, "record a payment")?;

    let entry = form
        .into_new_payment(order.id, user.email.as_str())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let due_cents = order.amount_due_cents();
    if entry.amount_cents > due_cents {
        return Err(ServiceError::Overpayment {
            amount_cents: entry.amount_cents,
            due_cents,
        });
    }

    let updated = repo
        .add_payment(order.id, order.version, &entry)
        .map_err(ServiceError::from)?;

    notify_customer(
        notifier,
        &updated.customer_email,
        &updated.customer_phone,
        NotificationKind::PaymentRecorded,
        json!({
            "tracking_id": updated.tracking_id,
            "amount_cents": entry.amount_cents,
            "amount_due_cents": updated.amount_due_cents(),
        }),
    );

    Ok(OrderView::from(updated))
}

/// Convenience operation: clear the outstanding balance with a single
/// "manual" ledger entry. No-op when nothing is due.
pub fn mark_fully_paid<R, N>(
    repo: &R,
    notifier: &N,
    user: &AuthenticatedUser,
    order_id: i32,
) -> ServiceResult<OrderView>
where
    R: OrderReader + OrderWriter + ?Sized,
    N: Notifier + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let order = load_order(repo, order_id)?;
    reject_if_cancelled(&order, "record a payment")?;

    let due_cents = order.amount_due_cents();
    if due_cents == 0 {
        return Ok(OrderView::from(order));
    }

    let entry = NewPaymentRecord::payment(order.id, due_cents, "manual", user.email.as_str())
        .with_note("marked paid");

    let updated = repo
        .add_payment(order.id, order.version, &entry)
        .map_err(ServiceError::from)?;

    notify_customer(
        notifier,
        &updated.customer_email,
        &updated.customer_phone,
        NotificationKind::PaymentRecorded,
        json!({
            "tracking_id": updated.tracking_id,
            "amount_cents": due_cents,
            "amount_due_cents": 0,
        }),
    );

    Ok(OrderView::from(updated))
}

/// Append a refund to the order's ledger. Refunds are allowed on cancelled
/// orders; that is the usual case. The refund may not exceed the net amount
/// paid so far.
pub fn record_refund<R, N>(
    repo: &R,
    notifier: &N,
    user: &AuthenticatedUser,
    order_id: i32,
    form: RecordPaymentForm,
) -> ServiceResult<OrderView>
where
    R: OrderReader + OrderWriter + ?Sized,
    N: Notifier + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let order = load_order(repo, order_id)?;

    let entry = form
        .into_new_refund(order.id, user.email.as_str())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let paid_cents = order.amount_paid_cents();
    if entry.amount_cents > paid_cents {
        return Err(ServiceError::RefundExceedsPaid {
            amount_cents: entry.amount_cents,
            paid_cents,
        });
    }

    let updated = repo
        .add_payment(order.id, order.version, &entry)
        .map_err(ServiceError::from)?;

    notify_customer(
        notifier,
        &updated.customer_email,
        &updated.customer_phone,
        NotificationKind::RefundRecorded,
        json!({
            "tracking_id": updated.tracking_id,
            "amount_cents": entry.amount_cents,
        }),
    );

    Ok(OrderView::from(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::PaymentMethod;
    use crate::domain::payment::PaymentKind;
    use crate::notify::mock::MockNotifier;
    use crate::repository::mock::{MockOrderReader, MockOrderWriter};
    use crate::repository::errors::RepositoryResult;
    use crate::domain::order::{NewOrder, OrderListQuery};
    use crate::services::orders::tests::{admin, customer, paid_entry, sample_order};

    struct FakeRepo {
        order_reader: MockOrderReader,
        order_writer: MockOrderWriter,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                order_reader: MockOrderReader::new(),
                order_writer: MockOrderWriter::new(),
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

    fn quiet_notifier() -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().returning(|_| Ok(()));
        notifier
    }

    fn gateway_order(id: i32, total_cents: i64) -> Order {
        let mut order = sample_order(id, total_cents);
        order.payment_method = PaymentMethod::Gateway;
        order.payment_reference = Some("pay_001".to_string());
        order
    }

    fn payment_form(amount_cents: i64) -> RecordPaymentForm {
        RecordPaymentForm {
            amount_cents,
            method: "upi".to_string(),
            note: None,
        }
    }

    #[test]
    fn two_payments_settle_the_order() {
        // Total 1000, payments of 400 then 600.
        let mut repo = FakeRepo::new();
        let notifier = quiet_notifier();

        let mut order = sample_order(1, 1000);
        order.payments = vec![paid_entry(1, 400)];

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| Ok(Some(order.clone())));

        repo.order_writer
            .expect_add_payment()
            .times(1)
            .withf(|order_id, expected_version, entry| {
                assert_eq!(*order_id, 1);
                assert_eq!(*expected_version, 3);
                assert_eq!(entry.kind, PaymentKind::Payment);
                assert_eq!(entry.amount_cents, 600);
                assert_eq!(entry.recorded_by, "admin@example.com");
                true
            })
            .returning(move |_, _, entry| {
                let mut order = sample_order(1, 1000);
                order.payments = vec![paid_entry(1, 400), {
                    let mut second = paid_entry(1, entry.amount_cents);
                    second.id = 2;
                    second
                }];
                order.version = 4;
                Ok(order)
            });

        let view = record_payment(&repo, &notifier, &admin(), 1, payment_form(600))
            .expect("expected success");

        assert_eq!(view.order.payments.len(), 2);
        assert_eq!(view.amount_paid_cents, 1000);
        assert_eq!(view.amount_due_cents, 0);
        assert!(view.fully_paid);
    }

    #[test]
    fn overpayment_is_rejected_and_ledger_untouched() {
        // 1200 against an outstanding balance of 1000.
        let mut repo = FakeRepo::new();
        let notifier = MockNotifier::new();

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| Ok(Some(sample_order(1, 1000))));

        // add_payment must never be called.
        let result = record_payment(&repo, &notifier, &admin(), 1, payment_form(1200));

        assert!(matches!(
            result,
            Err(ServiceError::Overpayment {
                amount_cents: 1200,
                due_cents: 1000,
            })
        ));
    }

    #[test]
    fn record_payment_fails_on_cancelled_orders() {
        let mut repo = FakeRepo::new();
        let notifier = MockNotifier::new();

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| {
                let mut order = sample_order(1, 1000);
                order.status = OrderStatus::Cancelled;
                Ok(Some(order))
            });

        let result = record_payment(&repo, &notifier, &admin(), 1, payment_form(100));

        assert!(matches!(result, Err(ServiceError::InvalidTransition(_))));
    }

    #[test]
    fn record_payment_requires_role() {
        let repo = FakeRepo::new();
        let notifier = MockNotifier::new();

        let result = record_payment(&repo, &notifier, &customer(), 1, payment_form(100));

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn mark_fully_paid_clears_the_balance() {
        let mut repo = FakeRepo::new();
        let notifier = quiet_notifier();

        let mut order = sample_order(1, 1000);
        order.payments = vec![paid_entry(1, 400)];

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| Ok(Some(order.clone())));

        repo.order_writer
            .expect_add_payment()
            .times(1)
            .withf(|_, _, entry| {
                assert_eq!(entry.amount_cents, 600);
                assert_eq!(entry.method, "manual");
                assert_eq!(entry.note.as_deref(), Some("marked paid"));
                true
            })
            .returning(move |_, _, _| {
                let mut order = sample_order(1, 1000);
                order.payments = vec![paid_entry(1, 400), {
                    let mut second = paid_entry(1, 600);
                    second.id = 2;
                    second
                }];
                Ok(order)
            });

        let view =
            mark_fully_paid(&repo, &notifier, &admin(), 1).expect("expected success");

        assert!(view.fully_paid);
    }

    #[test]
    fn mark_fully_paid_is_a_noop_when_settled() {
        let mut repo = FakeRepo::new();
        let notifier = MockNotifier::new();

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| {
                let mut order = sample_order(1, 1000);
                order.payments = vec![paid_entry(1, 1000)];
                Ok(Some(order))
            });

        // No write, no notification.
        let view =
            mark_fully_paid(&repo, &notifier, &admin(), 1).expect("expected success");

        assert_eq!(view.amount_due_cents, 0);
        assert_eq!(view.order.payments.len(), 1);
    }

    #[test]
    fn verify_payment_stamps_the_actor() {
        let mut repo = FakeRepo::new();
        let notifier = quiet_notifier();

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| Ok(Some(gateway_order(2, 1500))));

        repo.order_writer
            .expect_update_order()
            .times(1)
            .withf(|order_id, _, updates| {
                assert_eq!(*order_id, 2);
                assert_eq!(updates.payment_verified, Some(true));
                assert_eq!(updates.verified_by.as_deref(), Some("admin@example.com"));
                assert!(updates.verified_at.is_some());
                true
            })
            .returning(move |_, _, _| {
                let mut order = gateway_order(2, 1500);
                order.payment_verified = true;
                order.verified_by = Some("admin@example.com".to_string());
                Ok(order)
            });

        let view = verify_payment(&repo, &notifier, &admin(), 2).expect("expected success");

        assert!(view.order.payment_verified);
    }

    #[test]
    fn verify_payment_is_idempotent() {
        let mut repo = FakeRepo::new();
        let notifier = MockNotifier::new();

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| {
                let mut order = gateway_order(2, 1500);
                order.payment_verified = true;
                Ok(Some(order))
            });

        // No write, no notification.
        let view = verify_payment(&repo, &notifier, &admin(), 2).expect("expected success");

        assert!(view.order.payment_verified);
    }

    #[test]
    fn verify_payment_rejects_cash_orders() {
        let mut repo = FakeRepo::new();
        let notifier = MockNotifier::new();

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| Ok(Some(sample_order(1, 1000))));

        let result = verify_payment(&repo, &notifier, &admin(), 1);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn reject_payment_cancels_and_freezes_the_order() {
        // Unverified gateway payment, admin declares it missing.
        let mut repo = FakeRepo::new();
        let notifier = quiet_notifier();

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| Ok(Some(gateway_order(3, 2000))));

        repo.order_writer
            .expect_update_order()
            .times(1)
            .withf(|_, _, updates| {
                assert_eq!(updates.status, Some(OrderStatus::Cancelled));
                assert_eq!(
                    updates.cancellation_reason.as_deref(),
                    Some("not found in dashboard")
                );
                true
            })
            .returning(move |_, _, _| {
                let mut order = gateway_order(3, 2000);
                order.status = OrderStatus::Cancelled;
                order.cancellation_reason = Some("not found in dashboard".to_string());
                Ok(order)
            });

        let form = RejectPaymentForm {
            reason: "not found in dashboard".to_string(),
        };

        let view =
            reject_payment(&repo, &notifier, &admin(), 3, form).expect("expected success");

        assert_eq!(view.order.status, OrderStatus::Cancelled);
        assert_eq!(
            view.order.cancellation_reason.as_deref(),
            Some("not found in dashboard")
        );
    }

    #[test]
    fn reject_payment_refuses_verified_payments() {
        let mut repo = FakeRepo::new();
        let notifier = MockNotifier::new();

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| {
                let mut order = gateway_order(3, 2000);
                order.payment_verified = true;
                Ok(Some(order))
            });

        let form = RejectPaymentForm {
            reason: "looks off".to_string(),
        };

        let result = reject_payment(&repo, &notifier, &admin(), 3, form);

        assert!(matches!(result, Err(ServiceError::PaymentAlreadyVerified)));
    }

    #[test]
    fn refund_cannot_exceed_the_amount_paid() {
        let mut repo = FakeRepo::new();
        let notifier = MockNotifier::new();

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| {
                let mut order = sample_order(1, 1000);
                order.payments = vec![paid_entry(1, 400)];
                Ok(Some(order))
            });

        let result = record_refund(&repo, &notifier, &admin(), 1, payment_form(500));

        assert!(matches!(
            result,
            Err(ServiceError::RefundExceedsPaid {
                amount_cents: 500,
                paid_cents: 400,
            })
        ));
    }

    #[test]
    fn refunds_are_allowed_on_cancelled_orders() {
        let mut repo = FakeRepo::new();
        let notifier = quiet_notifier();

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| {
                let mut order = sample_order(1, 1000);
                order.status = OrderStatus::Cancelled;
                order.payments = vec![paid_entry(1, 1000)];
                Ok(Some(order))
            });

        repo.order_writer
            .expect_add_payment()
            .times(1)
            .withf(|_, _, entry| {
                assert_eq!(entry.kind, PaymentKind::Refund);
                assert_eq!(entry.amount_cents, 1000);
                true
            })
            .returning(move |_, _, entry| {
                let mut order = sample_order(1, 1000);
                order.status = OrderStatus::Cancelled;
                order.payments = vec![paid_entry(1, 1000), {
                    let mut refund = paid_entry(1, entry.amount_cents);
                    refund.id = 2;
                    refund.kind = PaymentKind::Refund;
                    refund
                }];
                Ok(order)
            });

        let view = record_refund(&repo, &notifier, &admin(), 1, payment_form(1000))
            .expect("expected success");

        assert_eq!(view.amount_paid_cents, 0);
    }
}
