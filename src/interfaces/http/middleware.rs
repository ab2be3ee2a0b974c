//! Bearer-token authentication middleware for Axum

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::application::UserService;
use crate::domain::user::{User, UserRole};
use crate::domain::Actor;
use crate::interfaces::http::common::{api_error, domain_error_response, ApiError};

#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<UserService>,
}

/// Caller resolved from the bearer token, stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub username: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn challenge((status, body): ApiError) -> Response {
    (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_token)
        .map(String::from);

    let Some(token) = token else {
        return challenge(api_error(StatusCode::UNAUTHORIZED, "Not authenticated"));
    };

    match state.users.authenticate(&token).await {
        Ok(user) => {
            debug!(user_id = user.id, "Request authenticated");
            request
                .extensions_mut()
                .insert(AuthenticatedUser::from(&user));
            next.run(request).await
        }
        Err(e) => challenge(domain_error_response(e)),
    }
}
