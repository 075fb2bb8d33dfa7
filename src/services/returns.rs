use serde::Deserialize;
use serde_json::json;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::order::OrderStatus;
use crate::domain::return_request::{
    ReturnListQuery, ReturnRequest, ReturnStatus, UpdateReturnRequest,
};
use crate::forms::returns::{ApproveReturnForm, CreateReturnForm, RejectReturnForm};
use crate::notify::{NotificationKind, Notifier, notify_customer};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{OrderReader, ReturnRequestReader, ReturnRequestWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the returns listing.
#[derive(Debug, Default, Deserialize)]
pub struct ReturnsQuery {
    /// Optional status filter.
    pub status: Option<ReturnStatus>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

/// Data returned for the returns listing.
pub struct ReturnsPageData {
    pub requests: Paginated<ReturnRequest>,
}

/// File a return request for a delivered order. Customer-facing. At most
/// one request ever exists per order; refiling after a rejection is not
/// currently supported.
pub fn create_return_request<R, N>(
    repo: &R,
    notifier: &N,
    form: CreateReturnForm,
) -> ServiceResult<ReturnRequest>
where
    R: OrderReader + ReturnRequestReader + ReturnRequestWriter + ?Sized,
    N: Notifier + ?Sized,
{
    let payload = form
        .into_new_return_request()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let order = repo
        .get_order_by_id(payload.order_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if order.status != OrderStatus::Delivered {
        return Err(ServiceError::InvalidTransition(format!(
            "returns can only be requested for a delivered order, not {}",
            order.status.as_str()
        )));
    }

    if repo
        .get_return_request_by_order_id(order.id)
        .map_err(ServiceError::from)?
        .is_some()
    {
        return Err(ServiceError::Conflict);
    }

    let request = repo
        .create_return_request(&payload)
        .map_err(ServiceError::from)?;

    notify_customer(
        notifier,
        &order.customer_email,
        &order.customer_phone,
        NotificationKind::ReturnRequested,
        json!({
            "tracking_id": order.tracking_id,
            "reason": request.reason,
        }),
    );

    Ok(request)
}

/// Loads the admin returns listing.
pub fn list_return_requests<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ReturnsQuery,
) -> ServiceResult<ReturnsPageData>
where
    R: ReturnRequestReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let ReturnsQuery { status, page } = query;

    let page = page.unwrap_or(1);
    let mut list_query = ReturnListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(status) = status {
        list_query = list_query.status(status);
    }

    let (total, items) = repo
        .list_return_requests(list_query)
        .map_err(ServiceError::from)?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(ReturnsPageData {
        requests: Paginated::new(items, page, total_pages),
    })
}

fn load_pending_request<R>(repo: &R, request_id: i32) -> ServiceResult<ReturnRequest>
where
    R: ReturnRequestReader + ?Sized,
{
    let request = repo
        .get_return_request_by_id(request_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if request.status.is_terminal() {
        return Err(ServiceError::InvalidTransition(format!(
            "return request has already been {}",
            request.status.as_str()
        )));
    }

    Ok(request)
}

/// Notify the order's customer about a return resolution. A missing order
/// is a data inconsistency worth a log line, not a failure.
fn notify_return_outcome<R, N>(
    repo: &R,
    notifier: &N,
    request: &ReturnRequest,
    kind: NotificationKind,
    payload: serde_json::Value,
) where
    R: OrderReader + ?Sized,
    N: Notifier + ?Sized,
{
    match repo.get_order_by_id(request.order_id) {
        Ok(Some(order)) => {
            notify_customer(
                notifier,
                &order.customer_email,
                &order.customer_phone,
                kind,
                payload,
            );
        }
        Ok(None) => {
            log::warn!(
                "Return request {} references missing order {}",
                request.id,
                request.order_id
            );
        }
        Err(err) => {
            log::error!(
                "Failed to load order {} for return notification: {err}",
                request.order_id
            );
        }
    }
}

/// Approve a pending return, attaching the courier tracking id for the
/// return shipment. Terminal.
pub fn approve_return<R, N>(
    repo: &R,
    notifier: &N,
    user: &AuthenticatedUser,
    request_id: i32,
    form: ApproveReturnForm,
) -> ServiceResult<ReturnRequest>
where
    R: OrderReader + ReturnRequestReader + ReturnRequestWriter + ?Sized,
    N: Notifier + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let tracking_id = form
        .into_tracking_id()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let request = load_pending_request(repo, request_id)?;

    let updated = repo
        .update_return_request(
            request.id,
            &UpdateReturnRequest::new().approve(tracking_id.clone(), user.email.as_str()),
        )
        .map_err(ServiceError::from)?;

    notify_return_outcome(
        repo,
        notifier,
        &updated,
        NotificationKind::ReturnApproved,
        json!({
            "return_tracking_id": tracking_id,
        }),
    );

    Ok(updated)
}

/// Reject a pending return with a reason. Terminal.
pub fn reject_return<R, N>(
    repo: &R,
    notifier: &N,
    user: &AuthenticatedUser,
    request_id: i32,
    form: RejectReturnForm,
) -> ServiceResult<ReturnRequest>
where
    R: OrderReader + ReturnRequestReader + ReturnRequestWriter + ?Sized,
    N: Notifier + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let reason = form
        .into_reason()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let request = load_pending_request(repo, request_id)?;

    let updated = repo
        .update_return_request(
            request.id,
            &UpdateReturnRequest::new().reject(reason.clone(), user.email.as_str()),
        )
        .map_err(ServiceError::from)?;

    notify_return_outcome(
        repo,
        notifier,
        &updated,
        NotificationKind::ReturnRejected,
        json!({
            "reason": reason,
        }),
    );

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{Order, OrderListQuery};
    use crate::domain::return_request::NewReturnRequest;
    use crate::notify::mock::MockNotifier;
    use crate::repository::mock::{
        MockOrderReader, MockReturnRequestReader, MockReturnRequestWriter,
    };
    use crate::repository::errors::RepositoryResult;
    use crate::services::orders::tests::{admin, customer, datetime, sample_order};

    struct FakeRepo {
        order_reader: MockOrderReader,
        return_reader: MockReturnRequestReader,
        return_writer: MockReturnRequestWriter,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                order_reader: MockOrderReader::new(),
                return_reader: MockReturnRequestReader::new(),
                return_writer: MockReturnRequestWriter::new(),
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

    impl ReturnRequestReader for FakeRepo {
        fn get_return_request_by_id(&self, id: i32) -> RepositoryResult<Option<ReturnRequest>> {
            self.return_reader.get_return_request_by_id(id)
        }

        fn get_return_request_by_order_id(
            &self,
            order_id: i32,
        ) -> RepositoryResult<Option<ReturnRequest>> {
            self.return_reader.get_return_request_by_order_id(order_id)
        }

        fn list_return_requests(
            &self,
            query: ReturnListQuery,
        ) -> RepositoryResult<(usize, Vec<ReturnRequest>)> {
            self.return_reader.list_return_requests(query)
        }
    }

    impl ReturnRequestWriter for FakeRepo {
        fn create_return_request(
            &self,
            new_request: &NewReturnRequest,
        ) -> RepositoryResult<ReturnRequest> {
            self.return_writer.create_return_request(new_request)
        }

        fn update_return_request(
            &self,
            request_id: i32,
            updates: &UpdateReturnRequest,
        ) -> RepositoryResult<ReturnRequest> {
            self.return_writer.update_return_request(request_id, updates)
        }
    }

    fn quiet_notifier() -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().returning(|_| Ok(()));
        notifier
    }

    fn delivered_order(id: i32) -> Order {
        let mut order = sample_order(id, 1000);
        order.status = OrderStatus::Delivered;
        order
    }

    fn pending_request(id: i32, order_id: i32) -> ReturnRequest {
        ReturnRequest {
            id,
            order_id,
            reason: "wrong size".to_string(),
            description: None,
            status: ReturnStatus::Pending,
            return_tracking_id: None,
            rejection_reason: None,
            processed_at: None,
            processed_by: None,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn create_form(order_id: i32) -> CreateReturnForm {
        CreateReturnForm {
            order_id,
            reason: "wrong size".to_string(),
            description: None,
        }
    }

    #[test]
    fn create_return_requires_a_delivered_order() {
        let mut repo = FakeRepo::new();
        let notifier = MockNotifier::new();

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| Ok(Some(sample_order(4, 1000))));

        let result = create_return_request(&repo, &notifier, create_form(4));

        assert!(matches!(result, Err(ServiceError::InvalidTransition(_))));
    }

    #[test]
    fn create_return_stores_the_request() {
        let mut repo = FakeRepo::new();
        let notifier = quiet_notifier();

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| Ok(Some(delivered_order(4))));

        repo.return_reader
            .expect_get_return_request_by_order_id()
            .times(1)
            .returning(|_| Ok(None));

        repo.return_writer
            .expect_create_return_request()
            .times(1)
            .withf(|payload| {
                assert_eq!(payload.order_id, 4);
                assert_eq!(payload.reason, "wrong size");
                true
            })
            .returning(move |_| Ok(pending_request(1, 4)));

        let request =
            create_return_request(&repo, &notifier, create_form(4)).expect("expected success");

        assert_eq!(request.status, ReturnStatus::Pending);
    }

    #[test]
    fn only_one_return_per_order() {
        let mut repo = FakeRepo::new();
        let notifier = MockNotifier::new();

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| Ok(Some(delivered_order(4))));

        repo.return_reader
            .expect_get_return_request_by_order_id()
            .returning(move |_| Ok(Some(pending_request(1, 4))));

        let result = create_return_request(&repo, &notifier, create_form(4));

        assert!(matches!(result, Err(ServiceError::Conflict)));
    }

    #[test]
    fn approve_return_stamps_resolution() {
        let mut repo = FakeRepo::new();
        let notifier = quiet_notifier();

        repo.return_reader
            .expect_get_return_request_by_id()
            .returning(move |_| Ok(Some(pending_request(1, 4))));

        repo.return_writer
            .expect_update_return_request()
            .times(1)
            .withf(|request_id, updates| {
                assert_eq!(*request_id, 1);
                assert_eq!(updates.status, Some(ReturnStatus::Approved));
                assert_eq!(updates.return_tracking_id.as_deref(), Some("RET-555"));
                assert_eq!(updates.processed_by.as_deref(), Some("admin@example.com"));
                assert!(updates.processed_at.is_some());
                true
            })
            .returning(move |_, _| {
                let mut request = pending_request(1, 4);
                request.status = ReturnStatus::Approved;
                request.return_tracking_id = Some("RET-555".to_string());
                Ok(request)
            });

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| Ok(Some(delivered_order(4))));

        let form = ApproveReturnForm {
            return_tracking_id: "RET-555".to_string(),
        };

        let request =
            approve_return(&repo, &notifier, &admin(), 1, form).expect("expected success");

        assert_eq!(request.status, ReturnStatus::Approved);
    }

    #[test]
    fn resolved_requests_cannot_be_reprocessed() {
        let mut repo = FakeRepo::new();
        let notifier = MockNotifier::new();

        repo.return_reader
            .expect_get_return_request_by_id()
            .returning(move |_| {
                let mut request = pending_request(1, 4);
                request.status = ReturnStatus::Rejected;
                Ok(Some(request))
            });

        let form = ApproveReturnForm {
            return_tracking_id: "RET-555".to_string(),
        };

        let result = approve_return(&repo, &notifier, &admin(), 1, form);

        assert!(matches!(result, Err(ServiceError::InvalidTransition(_))));
    }

    #[test]
    fn reject_return_requires_role() {
        let repo = FakeRepo::new();
        let notifier = MockNotifier::new();

        let form = RejectReturnForm {
            rejection_reason: "outside the return window".to_string(),
        };

        let result = reject_return(&repo, &notifier, &customer(), 1, form);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn reject_return_stores_the_reason() {
        let mut repo = FakeRepo::new();
        let notifier = quiet_notifier();

        repo.return_reader
            .expect_get_return_request_by_id()
            .returning(move |_| Ok(Some(pending_request(1, 4))));

        repo.return_writer
            .expect_update_return_request()
            .times(1)
            .withf(|_, updates| {
                assert_eq!(updates.status, Some(ReturnStatus::Rejected));
                assert_eq!(
                    updates.rejection_reason.as_deref(),
                    Some("outside the return window")
                );
                true
            })
            .returning(move |_, _| {
                let mut request = pending_request(1, 4);
                request.status = ReturnStatus::Rejected;
                request.rejection_reason = Some("outside the return window".to_string());
                Ok(request)
            });

        repo.order_reader
            .expect_get_order_by_id()
            .returning(move |_| Ok(Some(delivered_order(4))));

        let form = RejectReturnForm {
            rejection_reason: "outside the return window".to_string(),
        };

        let request =
            reject_return(&repo, &notifier, &admin(), 1, form).expect("expected success");

        assert_eq!(request.status, ReturnStatus::Rejected);
    }
}
