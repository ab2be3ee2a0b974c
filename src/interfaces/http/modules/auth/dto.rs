//! Authentication DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::RegisterUser;
use crate::domain::User;

/// OAuth2 password-flow form (`application/x-www-form-urlencoded`)
#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenRequest {
    /// Username or email
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: String,
    #[validate(length(min = 6, max = 128, message = "password must be 6-128 characters"))]
    pub password: String,
    #[validate(length(max = 100))]
    pub full_name: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
}

impl From<RegisterRequest> for RegisterUser {
    fn from(r: RegisterRequest) -> Self {
        Self {
            email: r.email,
            username: r.username,
            password: r.password,
            full_name: r.full_name,
            phone: r.phone,
        }
    }
}

/// Public user profile; never carries the password hash
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    /// `user` or `admin`
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            username: u.username,
            full_name: u.full_name,
            phone: u.phone,
            role: u.role.to_string(),
            is_active: u.is_active,
            created_at: u.created_at,
        }
    }
}
