//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::booking::BookingRepository;
use super::room::RoomRepository;
use super::user::UserRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let room = repos.rooms().find_by_id(1).await?;
///     let booking = repos.bookings().find_by_id(42).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn rooms(&self) -> &dyn RoomRepository;
    fn bookings(&self) -> &dyn BookingRepository;
    fn users(&self) -> &dyn UserRepository;
}
