use async_trait::async_trait;

use super::{CreateUserDto, User};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `AlreadyExists` when the username or email is taken.
    async fn create(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    async fn count(&self) -> DomainResult<u64>;
}
