use actix_web::{HttpResponse, Responder, get, post, web};

use crate::auth::AuthenticatedUser;
use crate::forms::orders::{AdvanceOrderForm, CancelOrderForm, CreateOrderForm};
use crate::notify::LogNotifier;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::orders::{self, OrdersQuery};

#[get("/v1/orders")]
/// Return the admin orders listing as JSON.
pub async fn list_orders(
    params: web::Query<OrdersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match orders::list_orders(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => HttpResponse::Ok().json(data.orders),
        Err(err) => error_response("list orders", err),
    }
}

#[get("/v1/orders/{order_id}")]
/// Return a single order with its items and ledger.
pub async fn get_order(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match orders::get_order(repo.get_ref(), &user, path.into_inner()) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => error_response("get order", err),
    }
}

#[get("/v1/track/{tracking_id}")]
/// Customer-facing lookup by tracking id.
pub async fn track_order(
    path: web::Path<String>,
    _user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match orders::track_order(repo.get_ref(), &path.into_inner()) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => error_response("track order", err),
    }
}

#[post("/v1/orders")]
/// Place a new order.
pub async fn create_order(
    _user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<LogNotifier>,
    form: web::Json<CreateOrderForm>,
) -> impl Responder {
    let now = chrono::Local::now().naive_utc();

    match orders::create_order(
        repo.get_ref(),
        notifier.get_ref(),
        form.into_inner(),
        now,
    ) {
        Ok(view) => HttpResponse::Created().json(view),
        Err(err) => error_response("create order", err),
    }
}

#[post("/v1/orders/{order_id}/status")]
/// Advance the fulfillment status of an order.
pub async fn advance_order_status(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<LogNotifier>,
    form: web::Json<AdvanceOrderForm>,
) -> impl Responder {
    match orders::advance_status(
        repo.get_ref(),
        notifier.get_ref(),
        &user,
        path.into_inner(),
        form.into_inner().status,
    ) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => error_response("advance order status", err),
    }
}

#[post("/v1/orders/{order_id}/cancel")]
/// Cancel an order with a reason.
pub async fn cancel_order(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<LogNotifier>,
    form: web::Json<CancelOrderForm>,
) -> impl Responder {
    match orders::cancel_order(
        repo.get_ref(),
        notifier.get_ref(),
        &user,
        path.into_inner(),
        form.into_inner(),
    ) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => error_response("cancel order", err),
    }
}
