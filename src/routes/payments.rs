use actix_web::{HttpResponse, Responder, post, web};

use crate::auth::AuthenticatedUser;
use crate::forms::payments::{RecordPaymentForm, RejectPaymentForm};
use crate::notify::LogNotifier;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::payments;

#[post("/v1/orders/{order_id}/payments")]
/// Record a payment against an order's ledger.
pub async fn record_payment(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<LogNotifier>,
    form: web::Json<RecordPaymentForm>,
) -> impl Responder {
    match payments::record_payment(
        repo.get_ref(),
        notifier.get_ref(),
        &user,
        path.into_inner(),
        form.into_inner(),
    ) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => error_response("record payment", err),
    }
}

#[post("/v1/orders/{order_id}/payments/mark-paid")]
/// Clear the outstanding balance with a manual ledger entry.
pub async fn mark_fully_paid(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<LogNotifier>,
) -> impl Responder {
    match payments::mark_fully_paid(repo.get_ref(), notifier.get_ref(), &user, path.into_inner()) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => error_response("mark order paid", err),
    }
}

#[post("/v1/orders/{order_id}/payments/refund")]
/// Record a refund against an order's ledger.
pub async fn record_refund(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<LogNotifier>,
    form: web::Json<RecordPaymentForm>,
) -> impl Responder {
    match payments::record_refund(
        repo.get_ref(),
        notifier.get_ref(),
        &user,
        path.into_inner(),
        form.into_inner(),
    ) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => error_response("record refund", err),
    }
}

#[post("/v1/orders/{order_id}/payment/verify")]
/// Mark a gateway payment as reconciled.
pub async fn verify_payment(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<LogNotifier>,
) -> impl Responder {
    match payments::verify_payment(repo.get_ref(), notifier.get_ref(), &user, path.into_inner()) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => error_response("verify payment", err),
    }
}

#[post("/v1/orders/{order_id}/payment/reject")]
/// Declare a gateway payment not received, cancelling the order.
pub async fn reject_payment(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<LogNotifier>,
    form: web::Json<RejectPaymentForm>,
) -> impl Responder {
    match payments::reject_payment(
        repo.get_ref(),
        notifier.get_ref(),
        &user,
        path.into_inner(),
        form.into_inner(),
    ) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => error_response("reject payment", err),
    }
}
