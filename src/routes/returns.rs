use actix_web::{HttpResponse, Responder, get, post, web};

use crate::auth::AuthenticatedUser;
use crate::forms::returns::{ApproveReturnForm, CreateReturnForm, RejectReturnForm};
use crate::notify::LogNotifier;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::returns::{self, ReturnsQuery};

#[get("/v1/returns")]
/// Return the admin returns listing as JSON.
pub async fn list_returns(
    params: web::Query<ReturnsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match returns::list_return_requests(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => HttpResponse::Ok().json(data.requests),
        Err(err) => error_response("list returns", err),
    }
}

#[post("/v1/returns")]
/// File a return request for a delivered order.
pub async fn create_return(
    _user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<LogNotifier>,
    form: web::Json<CreateReturnForm>,
) -> impl Responder {
    match returns::create_return_request(repo.get_ref(), notifier.get_ref(), form.into_inner()) {
        Ok(request) => HttpResponse::Created().json(request),
        Err(err) => error_response("create return request", err),
    }
}

#[post("/v1/returns/{request_id}/approve")]
/// Approve a pending return with the return shipment tracking id.
pub async fn approve_return(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<LogNotifier>,
    form: web::Json<ApproveReturnForm>,
) -> impl Responder {
    match returns::approve_return(
        repo.get_ref(),
        notifier.get_ref(),
        &user,
        path.into_inner(),
        form.into_inner(),
    ) {
        Ok(request) => HttpResponse::Ok().json(request),
        Err(err) => error_response("approve return", err),
    }
}

#[post("/v1/returns/{request_id}/reject")]
/// Reject a pending return with a reason.
pub async fn reject_return(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<LogNotifier>,
    form: web::Json<RejectReturnForm>,
) -> impl Responder {
    match returns::reject_return(
        repo.get_ref(),
        notifier.get_ref(),
        &user,
        path.into_inner(),
        form.into_inner(),
    ) {
        Ok(request) => HttpResponse::Ok().json(request),
        Err(err) => error_response("reject return", err),
    }
}
