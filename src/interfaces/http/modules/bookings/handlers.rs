//! Booking HTTP handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::dto::*;
use crate::application::BookingService;
use crate::interfaces::http::common::{
    domain_error_response, ApiPath, ApiQuery, ApiResult, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct BookingAppState {
    pub bookings: Arc<BookingService>,
}

#[utoipa::path(
    get,
    path = "/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(BookingListQuery),
    responses(
        (status = 200, description = "Bookings visible to the caller, newest first", body = Vec<BookingDto>),
        (status = 400, description = "Unknown status filter")
    )
)]
pub async fn list_bookings(
    State(state): State<BookingAppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiQuery(query): ApiQuery<BookingListQuery>,
) -> ApiResult<Json<Vec<BookingDto>>> {
    let filter = query.into_filter().map_err(domain_error_response)?;
    let views = state
        .bookings
        .list(&caller.actor(), filter)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(views.into_iter().map(BookingDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/bookings/{booking_id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("booking_id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = BookingDto),
        (status = 403, description = "Not enough permissions"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<BookingAppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiPath(booking_id): ApiPath<i32>,
) -> ApiResult<Json<BookingDto>> {
    let view = state
        .bookings
        .get(&caller.actor(), booking_id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(view.into()))
}

#[utoipa::path(
    post,
    path = "/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBookingRequest,
    responses(
        (status = 200, description = "Booking created in pending status", body = BookingDto),
        (status = 400, description = "Invalid interval, start in the past, or room already booked"),
        (status = 404, description = "Room not found")
    )
)]
pub async fn create_booking(
    State(state): State<BookingAppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> ApiResult<Json<BookingDto>> {
    let view = state
        .bookings
        .create(&caller.actor(), request.into())
        .await
        .map_err(domain_error_response)?;
    Ok(Json(view.into()))
}

#[utoipa::path(
    put,
    path = "/bookings/{booking_id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("booking_id" = i32, Path, description = "Booking ID")),
    request_body = UpdateBookingRequest,
    responses(
        (status = 200, description = "Booking updated", body = BookingDto),
        (status = 400, description = "Terminal booking, invalid interval or status, or overlap"),
        (status = 403, description = "Not enough permissions"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn update_booking(
    State(state): State<BookingAppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiPath(booking_id): ApiPath<i32>,
    ValidatedJson(request): ValidatedJson<UpdateBookingRequest>,
) -> ApiResult<Json<BookingDto>> {
    let dto = request.into_dto().map_err(domain_error_response)?;
    let view = state
        .bookings
        .update(&caller.actor(), booking_id, dto)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(view.into()))
}

#[utoipa::path(
    delete,
    path = "/bookings/{booking_id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("booking_id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 204, description = "Booking cancelled"),
        (status = 400, description = "Booking is already cancelled or completed"),
        (status = 403, description = "Not enough permissions"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingAppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiPath(booking_id): ApiPath<i32>,
) -> ApiResult<StatusCode> {
    state
        .bookings
        .cancel(&caller.actor(), booking_id)
        .await
        .map_err(domain_error_response)?;
    Ok(StatusCode::NO_CONTENT)
}
