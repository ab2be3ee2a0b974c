//! Room HTTP handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::dto::*;
use crate::application::RoomService;
use crate::domain::TimeRange;
use crate::interfaces::http::common::{
    domain_error_response, ApiPath, ApiQuery, ApiResult, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct RoomAppState {
    pub rooms: Arc<RoomService>,
}

#[utoipa::path(
    get,
    path = "/rooms",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    params(RoomListQuery),
    responses(
        (status = 200, description = "Rooms matching the filters", body = Vec<RoomDto>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_rooms(
    State(state): State<RoomAppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiQuery(query): ApiQuery<RoomListQuery>,
) -> ApiResult<Json<Vec<RoomDto>>> {
    let rooms = state
        .rooms
        .list(&caller.actor(), query.into())
        .await
        .map_err(domain_error_response)?;
    Ok(Json(rooms.into_iter().map(RoomDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/rooms/{room_id}",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    params(("room_id" = i32, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room details", body = RoomDto),
        (status = 404, description = "Room not found")
    )
)]
pub async fn get_room(
    State(state): State<RoomAppState>,
    ApiPath(room_id): ApiPath<i32>,
) -> ApiResult<Json<RoomDto>> {
    let room = state
        .rooms
        .get_active(room_id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(room.into()))
}

#[utoipa::path(
    post,
    path = "/rooms",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    request_body = CreateRoomRequest,
    responses(
        (status = 200, description = "Room created", body = RoomDto),
        (status = 403, description = "Not enough permissions"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_room(
    State(state): State<RoomAppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateRoomRequest>,
) -> ApiResult<Json<RoomDto>> {
    let room = state
        .rooms
        .create(&caller.actor(), request.into())
        .await
        .map_err(domain_error_response)?;
    Ok(Json(room.into()))
}

#[utoipa::path(
    put,
    path = "/rooms/{room_id}",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    params(("room_id" = i32, Path, description = "Room ID")),
    request_body = UpdateRoomRequest,
    responses(
        (status = 200, description = "Room updated", body = RoomDto),
        (status = 403, description = "Not enough permissions"),
        (status = 404, description = "Room not found")
    )
)]
pub async fn update_room(
    State(state): State<RoomAppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiPath(room_id): ApiPath<i32>,
    ValidatedJson(request): ValidatedJson<UpdateRoomRequest>,
) -> ApiResult<Json<RoomDto>> {
    let room = state
        .rooms
        .update(&caller.actor(), room_id, request.into())
        .await
        .map_err(domain_error_response)?;
    Ok(Json(room.into()))
}

#[utoipa::path(
    delete,
    path = "/rooms/{room_id}",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    params(("room_id" = i32, Path, description = "Room ID")),
    responses(
        (status = 204, description = "Room deleted"),
        (status = 400, description = "Room has bookings; deactivate it instead"),
        (status = 403, description = "Not enough permissions"),
        (status = 404, description = "Room not found")
    )
)]
pub async fn delete_room(
    State(state): State<RoomAppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiPath(room_id): ApiPath<i32>,
) -> ApiResult<StatusCode> {
    state
        .rooms
        .delete(&caller.actor(), room_id)
        .await
        .map_err(domain_error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/rooms/{room_id}/availability",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    params(("room_id" = i32, Path, description = "Room ID"), AvailabilityQuery),
    responses(
        (status = 200, description = "Free and busy slices tiling the window", body = Vec<AvailabilitySlotDto>),
        (status = 400, description = "Window end is not after its start"),
        (status = 404, description = "Room not found")
    )
)]
pub async fn get_room_availability(
    State(state): State<RoomAppState>,
    ApiPath(room_id): ApiPath<i32>,
    ApiQuery(query): ApiQuery<AvailabilityQuery>,
) -> ApiResult<Json<Vec<AvailabilitySlotDto>>> {
    let window =
        TimeRange::new(query.start_date, query.end_date).map_err(domain_error_response)?;
    let segments = state
        .rooms
        .availability(room_id, &window)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(
        segments.into_iter().map(AvailabilitySlotDto::from).collect(),
    ))
}
