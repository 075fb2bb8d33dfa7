use actix_web::{HttpResponse, Responder, get, post, web};

use crate::auth::AuthenticatedUser;
use crate::forms::custom_requests::{
    AdvanceCustomRequestForm, CancelCustomRequestForm, ConvertRequestForm,
    CreateCustomRequestForm, SendQuoteForm,
};
use crate::notify::LogNotifier;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::custom_requests::{self, CustomRequestsQuery};

#[get("/v1/custom-requests")]
/// Return the admin custom requests listing as JSON.
pub async fn list_custom_requests(
    params: web::Query<CustomRequestsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match custom_requests::list_custom_requests(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => HttpResponse::Ok().json(data.requests),
        Err(err) => error_response("list custom requests", err),
    }
}

#[get("/v1/custom-requests/{request_id}")]
/// Return a single custom request.
pub async fn get_custom_request(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match custom_requests::get_custom_request(repo.get_ref(), &user, path.into_inner()) {
        Ok(request) => HttpResponse::Ok().json(request),
        Err(err) => error_response("get custom request", err),
    }
}

#[post("/v1/custom-requests")]
/// Submit a bespoke clothing request.
pub async fn create_custom_request(
    _user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<LogNotifier>,
    form: web::Json<CreateCustomRequestForm>,
) -> impl Responder {
    match custom_requests::create_custom_request(
        repo.get_ref(),
        notifier.get_ref(),
        form.into_inner(),
    ) {
        Ok(request) => HttpResponse::Created().json(request),
        Err(err) => error_response("create custom request", err),
    }
}

#[post("/v1/custom-requests/{request_id}/quote")]
/// Price a pending request.
pub async fn send_quote(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<LogNotifier>,
    form: web::Json<SendQuoteForm>,
) -> impl Responder {
    match custom_requests::send_quote(
        repo.get_ref(),
        notifier.get_ref(),
        &user,
        path.into_inner(),
        form.into_inner(),
    ) {
        Ok(request) => HttpResponse::Ok().json(request),
        Err(err) => error_response("send quote", err),
    }
}

#[post("/v1/custom-requests/{request_id}/cancel")]
/// Withdraw a pending request.
pub async fn cancel_custom_request(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<LogNotifier>,
    form: web::Json<CancelCustomRequestForm>,
) -> impl Responder {
    match custom_requests::cancel_custom_request(
        repo.get_ref(),
        notifier.get_ref(),
        &user,
        path.into_inner(),
        form.into_inner(),
    ) {
        Ok(request) => HttpResponse::Ok().json(request),
        Err(err) => error_response("cancel custom request", err),
    }
}

#[post("/v1/custom-requests/{request_id}/status")]
/// Advance a request one step through production.
pub async fn advance_custom_request(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<LogNotifier>,
    form: web::Json<AdvanceCustomRequestForm>,
) -> impl Responder {
    match custom_requests::advance_custom_request(
        repo.get_ref(),
        notifier.get_ref(),
        &user,
        path.into_inner(),
        form.into_inner().status,
    ) {
        Ok(request) => HttpResponse::Ok().json(request),
        Err(err) => error_response("advance custom request", err),
    }
}

#[post("/v1/custom-requests/{request_id}/order")]
/// Turn an approved request into a regular order.
pub async fn convert_custom_request(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<LogNotifier>,
    form: web::Json<ConvertRequestForm>,
) -> impl Responder {
    match custom_requests::convert_request_to_order(
        repo.get_ref(),
        notifier.get_ref(),
        &user,
        path.into_inner(),
        form.into_inner(),
    ) {
        Ok(view) => HttpResponse::Created().json(view),
        Err(err) => error_response("convert custom request", err),
    }
}
