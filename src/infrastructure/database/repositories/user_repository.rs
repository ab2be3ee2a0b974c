//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, Set, SqlErr,
};

use super::db_err;
use crate::domain::user::{CreateUserDto, User, UserRepository, UserRole};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn role_to_db(role: UserRole) -> user::UserRole {
    match role {
        UserRole::User => user::UserRole::User,
        UserRole::Admin => user::UserRole::Admin,
    }
}

fn model_to_domain(m: user::Model) -> User {
    User {
        id: m.id,
        email: m.email,
        username: m.username,
        password_hash: m.password_hash,
        full_name: m.full_name,
        phone: m.phone,
        role: match m.role {
            user::UserRole::User => UserRole::User,
            user::UserRole::Admin => UserRole::Admin,
        },
        is_active: m.is_active,
        created_at: m.created_at,
    }
}

// ── UserRepository impl ─────────────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, dto: CreateUserDto) -> DomainResult<User> {
        debug!("Creating user: {}", dto.username);

        let model = user::ActiveModel {
            id: NotSet,
            email: Set(dto.email),
            username: Set(dto.username),
            password_hash: Set(dto.password_hash),
            full_name: Set(dto.full_name),
            phone: Set(dto.phone),
            role: Set(role_to_db(dto.role)),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        };

        match model.insert(&self.db).await {
            Ok(saved) => Ok(model_to_domain(saved)),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Err(
                DomainError::AlreadyExists("Username or email already registered".into()),
            ),
            Err(e) => Err(db_err(e)),
        }
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn count(&self) -> DomainResult<u64> {
        user::Entity::find().count(&self.db).await.map_err(db_err)
    }
}
