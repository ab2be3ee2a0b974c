//! User management service: application-layer orchestration
//!
//! HTTP handlers and the auth middleware are thin wrappers around it.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::user::{CreateUserDto, User, UserRole};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::infrastructure::crypto::jwt::{create_token, verify_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password_with_cost, verify_password};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Self-service registration input
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub email: String,
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self {
            repos,
            jwt_config,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Override the bcrypt work factor (tests use the minimum of 4).
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by username or email + password and issue a JWT.
    pub async fn login(&self, username_or_email: &str, password: &str) -> DomainResult<AuthResult> {
        let user = match self.repos.users().find_by_username(username_or_email).await? {
            Some(user) => Some(user),
            None => self.repos.users().find_by_email(username_or_email).await?,
        };

        let Some(user) = user else {
            return Err(DomainError::Unauthorized("Incorrect username or password".into()));
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Incorrect username or password".into()));
        }

        if !user.is_active {
            return Err(DomainError::Unauthorized("Inactive user".into()));
        }

        let access_token = create_token(user.id, &user.username, user.role, &self.jwt_config)
            .map_err(|e| DomainError::Validation(format!("Failed to create token: {}", e)))?;

        info!(user_id = user.id, username = %user.username, "User logged in");

        Ok(AuthResult {
            access_token,
            token_type: "bearer".into(),
            expires_in: self.jwt_config.expiration_minutes * 60,
            user,
        })
    }

    /// Resolve a bearer token to an active user.
    ///
    /// The role is taken from the stored user, not from the token.
    pub async fn authenticate(&self, token: &str) -> DomainResult<User> {
        let claims = verify_token(token, &self.jwt_config)
            .map_err(|_| DomainError::Unauthorized("Could not validate credentials".into()))?;
        let user_id = claims
            .user_id()
            .ok_or_else(|| DomainError::Unauthorized("Could not validate credentials".into()))?;

        let user = self
            .repos
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("Could not validate credentials".into()))?;

        if !user.is_active {
            return Err(DomainError::Unauthorized("Inactive user".into()));
        }
        Ok(user)
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new user with the `user` role.
    pub async fn register(&self, input: RegisterUser) -> DomainResult<User> {
        validate_username(&input.username)?;
        if input.password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if !input.email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".into()));
        }

        if self.repos.users().find_by_username(&input.username).await?.is_some() {
            return Err(DomainError::AlreadyExists("Username already registered".into()));
        }
        if self.repos.users().find_by_email(&input.email).await?.is_some() {
            return Err(DomainError::AlreadyExists("Email already registered".into()));
        }

        let user = self
            .create_user(
                input.email,
                input.username,
                &input.password,
                input.full_name,
                input.phone,
                UserRole::User,
            )
            .await?;

        info!(user_id = user.id, username = %user.username, "New user registered");
        Ok(user)
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn get_user(&self, id: i32) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", id))
    }

    // ── Bootstrap ───────────────────────────────────────────────

    /// Create an administrator when the user table is empty.
    ///
    /// Returns the created admin, or `None` if users already exist.
    pub async fn ensure_default_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<Option<User>> {
        if self.repos.users().count().await? > 0 {
            return Ok(None);
        }
        let admin = self
            .create_user(
                email.to_string(),
                username.to_string(),
                password,
                Some("Administrator".into()),
                None,
                UserRole::Admin,
            )
            .await?;
        warn!(
            username = %admin.username,
            "Default admin created. Change the password after first login"
        );
        Ok(Some(admin))
    }

    async fn create_user(
        &self,
        email: String,
        username: String,
        password: &str,
        full_name: Option<String>,
        phone: Option<String>,
        role: UserRole,
    ) -> DomainResult<User> {
        let password_hash = hash_password_with_cost(password, self.bcrypt_cost)
            .map_err(|e| DomainError::Validation(format!("Failed to hash password: {}", e)))?;

        self.repos
            .users()
            .create(CreateUserDto {
                email,
                username,
                password_hash,
                full_name,
                phone,
                role,
            })
            .await
    }
}

/// Usernames are non-empty and limited to ASCII letters, digits, `_` and `-`.
pub fn validate_username(username: &str) -> DomainResult<()> {
    let valid = !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(DomainError::Validation(
            "Username may contain only letters, digits, '_' and '-'".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    fn service() -> UserService {
        let jwt = JwtConfig {
            secret: "unit-test".into(),
            ..JwtConfig::default()
        };
        UserService::new(Arc::new(InMemoryRepositoryProvider::new()), jwt).with_bcrypt_cost(4)
    }

    fn alice() -> RegisterUser {
        RegisterUser {
            email: "alice@example.com".into(),
            username: "alice".into(),
            password: "secret1".into(),
            full_name: Some("Alice Smith".into()),
            phone: None,
        }
    }

    #[tokio::test]
    async fn register_then_login_and_authenticate() {
        let svc = service();
        let user = svc.register(alice()).await.unwrap();
        assert_eq!(user.role, UserRole::User);
        assert_ne!(user.password_hash, "secret1");

        let auth = svc.login("alice", "secret1").await.unwrap();
        assert_eq!(auth.token_type, "bearer");
        assert_eq!(auth.expires_in, 30 * 60);

        let by_email = svc.login("alice@example.com", "secret1").await.unwrap();
        assert_eq!(by_email.user.id, user.id);

        let resolved = svc.authenticate(&auth.access_token).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let svc = service();
        svc.register(alice()).await.unwrap();
        assert!(matches!(
            svc.login("alice", "nope!!").await,
            Err(DomainError::Unauthorized(_))
        ));
        assert!(matches!(
            svc.login("nobody", "secret1").await,
            Err(DomainError::Unauthorized(_))
        ));
        assert!(matches!(
            svc.authenticate("not-a-jwt").await,
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn registration_rules() {
        let svc = service();
        svc.register(alice()).await.unwrap();

        let dup_name = RegisterUser { email: "other@example.com".into(), ..alice() };
        assert!(matches!(svc.register(dup_name).await, Err(DomainError::AlreadyExists(_))));

        let dup_mail = RegisterUser { username: "alice2".into(), ..alice() };
        assert!(matches!(svc.register(dup_mail).await, Err(DomainError::AlreadyExists(_))));

        let short = RegisterUser { username: "bob".into(), email: "bob@example.com".into(), password: "12345".into(), ..alice() };
        assert!(matches!(svc.register(short).await, Err(DomainError::Validation(_))));

        let bad_name = RegisterUser { username: "bob smith".into(), email: "bob@example.com".into(), ..alice() };
        assert!(matches!(svc.register(bad_name).await, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn default_admin_only_on_empty_store() {
        let svc = service();
        let admin = svc
            .ensure_default_admin("admin", "admin@example.com", "admin123")
            .await
            .unwrap()
            .unwrap();
        assert!(admin.is_admin());

        let again = svc
            .ensure_default_admin("admin", "admin@example.com", "admin123")
            .await
            .unwrap();
        assert!(again.is_none());
    }

    #[test]
    fn username_charset() {
        assert!(validate_username("john_doe-42").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("john.doe").is_err());
        assert!(validate_username("джон").is_err());
    }
}
