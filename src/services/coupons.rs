use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::coupon::{Coupon, CouponListQuery};
use crate::forms::coupons::{AddCouponForm, EditCouponForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{CouponReader, CouponWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the coupons listing.
#[derive(Debug, Default, Deserialize)]
pub struct CouponsQuery {
    /// Optional search string entered by the user.
    pub search: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
    /// Whether inactive coupons should be included.
    #[serde(default)]
    pub show_inactive: bool,
}

/// Data returned for the coupons listing.
pub struct CouponsPageData {
    pub coupons: Paginated<Coupon>,
    pub search: Option<String>,
    pub show_inactive: bool,
}

/// Parameters of a customer-facing coupon check.
#[derive(Debug, Deserialize)]
pub struct CheckCouponQuery {
    pub code: String,
    pub subtotal_cents: i64,
}

/// Outcome of a successful coupon check.
#[derive(Debug, Serialize)]
pub struct CouponCheckResult {
    pub code: String,
    pub discount_cents: i64,
}

/// Customer-facing preview of a coupon against a cart subtotal. Never
/// touches the usage counter; application happens at order creation.
pub fn check_coupon<R>(
    repo: &R,
    query: CheckCouponQuery,
    now: NaiveDateTime,
) -> ServiceResult<CouponCheckResult>
where
    R: CouponReader + ?Sized,
{
    let coupon = repo
        .get_coupon_by_code(&query.code)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let discount_cents = coupon.validate(query.subtotal_cents, now)?;

    Ok(CouponCheckResult {
        code: coupon.code,
        discount_cents,
    })
}

/// Loads the admin coupons listing.
pub fn list_coupons<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CouponsQuery,
) -> ServiceResult<CouponsPageData>
where
    R: CouponReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let CouponsQuery {
        search,
        page,
        show_inactive,
    } = query;

    let page = page.unwrap_or(1);
    let mut list_query = CouponListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(term) = search.as_deref() {
        list_query = list_query.search(term);
    }

    if show_inactive {
        list_query = list_query.include_inactive();
    }

    let (total, items) = repo.list_coupons(list_query).map_err(ServiceError::from)?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    let coupons = Paginated::new(items, page, total_pages);

    Ok(CouponsPageData {
        coupons,
        search,
        show_inactive,
    })
}

/// Creates a new coupon. Duplicate codes surface as `Conflict`.
pub fn create_coupon<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddCouponForm,
) -> ServiceResult<Coupon>
where
    R: CouponWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_new_coupon()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_coupon(&payload).map_err(ServiceError::from)
}

/// Replaces the editable knobs of an existing coupon.
pub fn update_coupon<R>(
    repo: &R,
    user: &AuthenticatedUser,
    coupon_id: i32,
    form: EditCouponForm,
) -> ServiceResult<Coupon>
where
    R: CouponWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let updates = form
        .into_update_coupon()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_coupon(coupon_id, &updates)
        .map_err(ServiceError::from)
}

/// Deletes a coupon. Orders that already used it keep their recorded
/// discount and code snapshot.
pub fn delete_coupon<R>(repo: &R, user: &AuthenticatedUser, coupon_id: i32) -> ServiceResult<()>
where
    R: CouponWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_coupon(coupon_id).map_err(ServiceError::from)
}
