use super::UserRole;

/// New account with an already hashed password
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
}
