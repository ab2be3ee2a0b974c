//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Form, Json};

use super::dto::{RegisterRequest, TokenRequest, TokenResponse, UserDto};
use crate::application::UserService;
use crate::interfaces::http::common::{domain_error_response, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct AuthHandlerState {
    pub users: Arc<UserService>,
}

#[utoipa::path(
    post,
    path = "/token",
    tag = "Authentication",
    request_body(content = TokenRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Access token issued", body = TokenResponse),
        (status = 401, description = "Incorrect username or password")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    Form(request): Form<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let auth = state
        .users
        .login(&request.username, &request.password)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(TokenResponse {
        access_token: auth.access_token,
        token_type: auth.token_type,
    }))
}

#[utoipa::path(
    post,
    path = "/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = UserDto),
        (status = 400, description = "Invalid username or password"),
        (status = 409, description = "Username or email already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Json<UserDto>> {
    let user = state
        .users
        .register(request.into())
        .await
        .map_err(domain_error_response)?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    State(state): State<AuthHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> ApiResult<Json<UserDto>> {
    let user = state
        .users
        .get_user(caller.user_id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(user.into()))
}
