pub mod entities;
pub mod migrator;
pub mod repositories;

pub use repositories::SeaOrmRepositoryProvider;

use sea_orm::{Database, DatabaseConnection};
use tracing::info;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./coworking.db?mode=rwc")
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./coworking.db?mode=rwc".to_string(),
        }
    }
}

/// Initialize database connection
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database: {}", config.url);
    let db = Database::connect(&config.url).await?;
    info!("Database connected successfully");
    Ok(db)
}

/// Fresh in-memory SQLite database with all migrations applied
#[cfg(test)]
pub(crate) async fn test_database() -> DatabaseConnection {
    use sea_orm_migration::MigratorTrait;

    let db = Database::connect("sqlite::memory:").await.unwrap();
    migrator::Migrator::up(&db, None).await.unwrap();
    db
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::{BookingStatus, NewBooking, TimeRange};
    use crate::domain::room::{Amenities, CreateRoomDto, GetRoomsDto, UpdateRoomDto};
    use crate::domain::user::{CreateUserDto, UserRole};
    use crate::domain::{DomainError, RepositoryProvider};
    use chrono::{DateTime, Duration, DurationRound, Utc};

    fn hour(offset: i64) -> DateTime<Utc> {
        let base = (Utc::now() + Duration::days(3))
            .duration_trunc(Duration::hours(1))
            .unwrap();
        base + Duration::hours(offset)
    }

    fn slot(from: i64, to: i64) -> TimeRange {
        TimeRange::new(hour(from), hour(to)).unwrap()
    }

    async fn provider_with_user() -> (SeaOrmRepositoryProvider, i32) {
        let repos = SeaOrmRepositoryProvider::new(test_database().await);
        let user = repos
            .users()
            .create(CreateUserDto {
                email: "carol@example.com".into(),
                username: "carol".into(),
                password_hash: "hash".into(),
                full_name: None,
                phone: None,
                role: UserRole::User,
            })
            .await
            .unwrap();
        (repos, user.id)
    }

    #[tokio::test]
    async fn seed_rooms_are_present() {
        let (repos, _) = provider_with_user().await;
        let rooms = repos.rooms().list(&GetRoomsDto::default()).await.unwrap();
        let names: Vec<_> = rooms.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Moscow", "Tokyo", "New York", "Berlin"]);

        let with_projector = GetRoomsDto {
            has_projector: Some(true),
            min_capacity: Some(20),
            ..Default::default()
        };
        let big = repos.rooms().list(&with_projector).await.unwrap();
        assert_eq!(big.len(), 1);
        assert_eq!(big[0].name, "New York");
    }

    #[tokio::test]
    async fn insert_if_free_rejects_overlap_and_allows_adjacent() {
        let (repos, user_id) = provider_with_user().await;
        let bookings = repos.bookings();

        let first = bookings
            .insert_if_free(NewBooking::pending(1, user_id, slot(10, 11), 1000.0, None))
            .await
            .unwrap();
        assert_eq!(first.status, BookingStatus::Pending);

        let err = bookings
            .insert_if_free(NewBooking::pending(1, user_id, slot(10, 12), 2000.0, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        bookings
            .insert_if_free(NewBooking::pending(1, user_id, slot(11, 12), 1000.0, None))
            .await
            .unwrap();
        bookings
            .insert_if_free(NewBooking::pending(2, user_id, slot(10, 11), 500.0, None))
            .await
            .unwrap();

        let window = slot(9, 13);
        let active = bookings.find_active_in_window(1, &window).await.unwrap();
        assert_eq!(active.len(), 2);
        assert!(active[0].start_time() < active[1].start_time());
    }

    #[tokio::test]
    async fn reschedule_excludes_self_and_cancel_frees_slot() {
        let (repos, user_id) = provider_with_user().await;
        let bookings = repos.bookings();

        let a = bookings
            .insert_if_free(NewBooking::pending(1, user_id, slot(10, 11), 1000.0, None))
            .await
            .unwrap();
        let b = bookings
            .insert_if_free(NewBooking::pending(1, user_id, slot(12, 13), 1000.0, None))
            .await
            .unwrap();

        let mut stretched = a.clone();
        stretched.reschedule(slot(10, 12), 2000.0).unwrap();
        let saved = bookings
            .update_if_free(stretched, BookingStatus::Pending)
            .await
            .unwrap();
        assert_eq!(saved.range, slot(10, 12));

        let mut onto_b = saved.clone();
        onto_b.reschedule(slot(11, 13), 2000.0).unwrap();
        let err = bookings
            .update_if_free(onto_b, BookingStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let mut cancelled = b.clone();
        cancelled.cancel().unwrap();
        bookings.update(cancelled, BookingStatus::Pending).await.unwrap();

        let mut retry = saved;
        retry.reschedule(slot(11, 13), 2000.0).unwrap();
        bookings.update_if_free(retry, BookingStatus::Pending).await.unwrap();
    }

    #[tokio::test]
    async fn listing_filters_and_orders_newest_first() {
        let (repos, user_id) = provider_with_user().await;
        let bookings = repos.bookings();
        for (room, from, to) in [(1, 8, 9), (1, 14, 15), (3, 10, 11)] {
            bookings
                .insert_if_free(NewBooking::pending(room, user_id, slot(from, to), 0.0, None))
                .await
                .unwrap();
        }

        let all = bookings.list(&Default::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].start_time() >= w[1].start_time()));

        let room_one = crate::domain::booking::GetBookingsDto {
            room_id: Some(1),
            end_until: Some(hour(10)),
            ..Default::default()
        };
        let found = bookings.list(&room_one).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].range, slot(8, 9));
    }

    #[tokio::test]
    async fn inactive_or_referenced_rooms() {
        let (repos, user_id) = provider_with_user().await;

        let room = repos.rooms().find_by_id(4).await.unwrap().unwrap();
        let deactivated = UpdateRoomDto {
            is_active: Some(false),
            ..Default::default()
        }
        .apply(&room)
        .unwrap();
        repos.rooms().update(deactivated).await.unwrap();

        let err = repos
            .bookings()
            .insert_if_free(NewBooking::pending(4, user_id, slot(10, 11), 0.0, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        repos
            .bookings()
            .insert_if_free(NewBooking::pending(2, user_id, slot(10, 11), 0.0, None))
            .await
            .unwrap();
        assert!(matches!(
            repos.rooms().delete(2).await,
            Err(DomainError::InvalidState(_))
        ));

        let spare = repos
            .rooms()
            .create(CreateRoomDto {
                name: "Paris".into(),
                description: None,
                capacity: 6,
                price_per_hour: 700.0,
                amenities: Amenities::default(),
                image_url: None,
            })
            .await
            .unwrap();
        repos.rooms().delete(spare.id).await.unwrap();
        assert!(repos.rooms().find_by_id(spare.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_users_are_rejected() {
        let (repos, _) = provider_with_user().await;
        let err = repos
            .users()
            .create(CreateUserDto {
                email: "carol@example.com".into(),
                username: "carol2".into(),
                password_hash: "hash".into(),
                full_name: None,
                phone: None,
                role: UserRole::User,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists(_)));
        assert_eq!(repos.users().count().await.unwrap(), 1);
        assert!(repos.users().find_by_email("carol@example.com").await.unwrap().is_some());
    }
}
