use actix_web::{HttpResponse, Responder, get, post, web};

use crate::auth::AuthenticatedUser;
use crate::forms::coupons::{AddCouponForm, EditCouponForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::coupons::{self, CheckCouponQuery, CouponsQuery};

#[get("/v1/coupons")]
/// Return the admin coupons listing as JSON.
pub async fn list_coupons(
    params: web::Query<CouponsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match coupons::list_coupons(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => HttpResponse::Ok().json(data.coupons),
        Err(err) => error_response("list coupons", err),
    }
}

#[get("/v1/coupons/check")]
/// Preview a coupon against a cart subtotal.
pub async fn check_coupon(
    params: web::Query<CheckCouponQuery>,
    _user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let now = chrono::Local::now().naive_utc();

    match coupons::check_coupon(repo.get_ref(), params.into_inner(), now) {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(err) => error_response("check coupon", err),
    }
}

#[post("/v1/coupons")]
/// Create a new coupon.
pub async fn add_coupon(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddCouponForm>,
) -> impl Responder {
    match coupons::create_coupon(repo.get_ref(), &user, form.into_inner()) {
        Ok(coupon) => HttpResponse::Created().json(coupon),
        Err(err) => error_response("create coupon", err),
    }
}

#[post("/v1/coupons/{coupon_id}")]
/// Replace the editable knobs of a coupon.
pub async fn edit_coupon(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<EditCouponForm>,
) -> impl Responder {
    match coupons::update_coupon(repo.get_ref(), &user, path.into_inner(), form.into_inner()) {
        Ok(coupon) => HttpResponse::Ok().json(coupon),
        Err(err) => error_response("update coupon", err),
    }
}

#[post("/v1/coupons/{coupon_id}/delete")]
/// Delete a coupon.
pub async fn delete_coupon(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match coupons::delete_coupon(repo.get_ref(), &user, path.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response("delete coupon", err),
    }
}
