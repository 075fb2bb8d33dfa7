use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::custom_request::{
    CustomRequest, CustomRequestListQuery, CustomRequestStatus, UpdateCustomRequest,
};
use crate::domain::order::{NewOrder, OrderItem};
use crate::forms::custom_requests::{
    CancelCustomRequestForm, ConvertRequestForm, CreateCustomRequestForm, SendQuoteForm,
};
use crate::notify::{NotificationKind, Notifier, notify_customer};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{CustomRequestReader, CustomRequestWriter, OrderWriter};
use crate::services::orders::{OrderView, new_tracking_id};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the custom requests listing.
#[derive(Debug, Default, Deserialize)]
pub struct CustomRequestsQuery {
    /// Optional status filter.
    pub status: Option<CustomRequestStatus>,
    /// Optional search string entered by the user.
    pub search: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

/// Data returned for the custom requests listing.
pub struct CustomRequestsPageData {
    pub requests: Paginated<CustomRequest>,
    pub search: Option<String>,
}

fn new_reference() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("REQ-{}", uuid[..12].to_uppercase())
}

fn load_request<R>(repo: &R, request_id: i32) -> ServiceResult<CustomRequest>
where
    R: CustomRequestReader + ?Sized,
{
    repo.get_custom_request_by_id(request_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Submit a bespoke clothing request. Customer-facing; the request starts
/// unpriced and waits for an admin quote.
pub fn create_custom_request<R, N>(
    repo: &R,
    notifier: &N,
    form: CreateCustomRequestForm,
) -> ServiceResult<CustomRequest>
where
    R: CustomRequestWriter + ?Sized,
    N: Notifier + ?Sized,
{
    let payload = form
        .into_new_custom_request(new_reference())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let request = repo
        .create_custom_request(&payload)
        .map_err(ServiceError::from)?;

    notify_customer(
        notifier,
        &request.customer_email,
        &request.customer_phone,
        NotificationKind::CustomRequestReceived,
        json!({
            "reference": request.reference,
        }),
    );

    Ok(request)
}

/// Loads the admin custom requests listing.
pub fn list_custom_requests<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CustomRequestsQuery,
) -> ServiceResult<CustomRequestsPageData>
where
    R: CustomRequestReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let CustomRequestsQuery {
        status,
        search,
        page,
    } = query;

    let page = page.unwrap_or(1);
    let mut list_query = CustomRequestListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(status) = status {
        list_query = list_query.status(status);
    }

    if let Some(term) = search.as_deref() {
        list_query = list_query.search(term);
    }

    let (total, items) = repo
        .list_custom_requests(list_query)
        .map_err(ServiceError::from)?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(CustomRequestsPageData {
        requests: Paginated::new(items, page, total_pages),
        search,
    })
}

/// Admin fetch of a single custom request.
pub fn get_custom_request<R>(
    repo: &R,
    user: &AuthenticatedUser,
    request_id: i32,
) -> ServiceResult<CustomRequest>
where
    R: CustomRequestReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    load_request(repo, request_id)
}

/// Price a pending request and move it to `Quoted`. The accept/decline
/// affordance shown to the customer lives outside this core.
pub fn send_quote<R, N>(
    repo: &R,
    notifier: &N,
    user: &AuthenticatedUser,
    request_id: i32,
    form: SendQuoteForm,
) -> ServiceResult<CustomRequest>
where
    R: CustomRequestReader + CustomRequestWriter + ?Sized,
    N: Notifier + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let price_cents = form
        .into_price()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let request = load_request(repo, request_id)?;

    if request.status != CustomRequestStatus::Pending {
        return Err(ServiceError::InvalidTransition(format!(
            "cannot quote a request that is {}",
            request.status.as_str()
        )));
    }

    let updated = repo
        .update_custom_request(
            request.id,
            &UpdateCustomRequest::new().quote(price_cents, user.email.as_str()),
        )
        .map_err(ServiceError::from)?;

    notify_customer(
        notifier,
        &updated.customer_email,
        &updated.customer_phone,
        NotificationKind::QuoteSent,
        json!({
            "reference": updated.reference,
            "quoted_price_cents": price_cents,
        }),
    );

    Ok(updated)
}

/// Withdraw a request before it has been quoted. Quoted and in-production
/// requests cannot currently be cancelled through this workflow.
pub fn cancel_custom_request<R, N>(
    repo: &R,
    notifier: &N,
    user: &AuthenticatedUser,
    request_id: i32,
    form: CancelCustomRequestForm,
) -> ServiceResult<CustomRequest>
where
    R: CustomRequestReader + CustomRequestWriter + ?Sized,
    N: Notifier + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let reason = form
        .into_reason()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let request = load_request(repo, request_id)?;

    if request.status != CustomRequestStatus::Pending {
        return Err(ServiceError::InvalidTransition(format!(
            "cannot cancel a request that is {}",
            request.status.as_str()
        )));
    }

    let updated = repo
        .update_custom_request(request.id, &UpdateCustomRequest::new().cancel(reason.clone()))
        .map_err(ServiceError::from)?;

    notify_customer(
        notifier,
        &updated.customer_email,
        &updated.customer_phone,
        NotificationKind::CustomRequestCancelled,
        json!({
            "reference": updated.reference,
            "reason": reason,
        }),
    );

    Ok(updated)
}

/// Single-step forward move through `Quoted -> Approved -> InProduction ->
/// Completed`. Each step is admin-triggered; there are no timers.
pub fn advance_custom_request<R, N>(
    repo: &R,
    notifier: &N,
    user: &AuthenticatedUser,
    request_id: i32,
    next_status: CustomRequestStatus,
) -> ServiceResult<CustomRequest>
where
    R: CustomRequestReader + CustomRequestWriter + ?Sized,
    N: Notifier + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let request = load_request(repo, request_id)?;

    if !request.status.can_advance_to(next_status) {
        return Err(ServiceError::InvalidTransition(format!(
            "cannot move request from {} to {}",
            request.status.as_str(),
            next_status.as_str()
        )));
    }

    let updated = repo
        .update_custom_request(request.id, &UpdateCustomRequest::new().status(next_status))
        .map_err(ServiceError::from)?;

    notify_customer(
        notifier,
        &updated.customer_email,
        &updated.customer_phone,
        NotificationKind::CustomRequestStatusChanged,
        json!({
            "reference": updated.reference,
            "status": updated.status.as_str(),
        }),
    );

    Ok(updated)
}

/// Turn an approved, priced request into a regular order so the quoted
/// amount flows through the payment ledger. The request keeps its own
/// production lifecycle.
pub fn convert_request_to_order<R, N>(
    repo: &R,
    notifier: &N,
    user: &AuthenticatedUser,
    request_id: i32,
    form: ConvertRequestForm,
) -> ServiceResult<OrderView>
where
    R: CustomRequestReader + OrderWriter + ?Sized,
    N: Notifier + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let request = load_request(repo, request_id)?;

    if request.status != CustomRequestStatus::Approved {
        return Err(ServiceError::InvalidTransition(format!(
            "cannot place an order for a request that is {}",
            request.status.as_str()
        )));
    }

    let Some(quoted_price_cents) = request.quoted_price_cents else {
        return Err(ServiceError::Form(
            "request has no quoted price".to_string(),
        ));
    };

    let item = OrderItem {
        product_id: None,
        name: format!("Custom tailoring {}", request.reference),
        unit_price_cents: quoted_price_cents,
        quantity: 1,
    };

    let mut payload = NewOrder::new(new_tracking_id(), form.payment_method, vec![item])
        .with_customer(
            request.customer_name.clone(),
            request.customer_email.clone(),
            request.customer_phone.clone(),
            form.shipping_address.trim(),
        )
        .with_shipping(form.shipping_cents);

    if let Some(reference) = form.payment_reference.as_deref() {
        payload = payload.with_payment_reference(reference.trim());
    }

    let order = repo.create_order(&payload).map_err(ServiceError::from)?;

    notify_customer(
        notifier,
        &order.customer_email,
        &order.customer_phone,
        NotificationKind::OrderPlaced,
        json!({
            "tracking_id": order.tracking_id,
            "reference": request.reference,
            "total_cents": order.total_cents,
        }),
    );

    Ok(OrderView::from(order))
}
