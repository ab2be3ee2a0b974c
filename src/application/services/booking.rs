//! Booking ledger service
//!
//! Runs the booking lifecycle on top of the scheduling rules: validation
//! and pricing happen here, the overlap check itself runs inside the
//! repository's per-room critical section.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::access::{can_access, can_set_status, Actor};
use crate::domain::booking::{
    has_conflict, price, Booking, BookingStatus, CreateBookingDto, GetBookingsDto, NewBooking,
    TimeRange, UpdateBookingDto,
};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Booking enriched with display names for listings
#[derive(Debug, Clone)]
pub struct BookingView {
    pub booking: Booking,
    pub room_name: Option<String>,
    /// Set only when an administrator looks at another user's booking
    pub user_name: Option<String>,
}

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
}

impl BookingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Whether `range` overlaps an active booking of `room_id` other than `exclude`.
    pub async fn has_conflict(
        &self,
        room_id: i32,
        range: &TimeRange,
        exclude: Option<i32>,
    ) -> DomainResult<bool> {
        let bookings = self
            .repos
            .bookings()
            .find_active_in_window(room_id, range)
            .await?;
        Ok(has_conflict(&bookings, room_id, range, exclude))
    }

    pub async fn create(&self, actor: &Actor, dto: CreateBookingDto) -> DomainResult<BookingView> {
        let room = self
            .repos
            .rooms()
            .find_by_id(dto.room_id)
            .await?
            .filter(|r| r.is_bookable())
            .ok_or_else(|| DomainError::not_found("Room", "id", dto.room_id))?;

        let range = dto.range()?;
        ensure_future(&range)?;

        let total_price = price(&room, &range);
        let new = NewBooking::pending(room.id, actor.user_id, range, total_price, dto.notes);

        let booking = match self.repos.bookings().insert_if_free(new).await {
            Ok(booking) => booking,
            Err(e) => {
                if matches!(e, DomainError::Conflict(_)) {
                    metrics::counter!("booking_conflicts_total").increment(1);
                    warn!(room_id = room.id, start = %range.start(), end = %range.end(), "Booking rejected: overlap");
                }
                return Err(e);
            }
        };

        metrics::counter!("bookings_created_total").increment(1);
        info!(
            booking_id = booking.id,
            room_id = room.id,
            user_id = actor.user_id,
            total_price = booking.total_price,
            "Booking created"
        );

        Ok(BookingView {
            booking,
            room_name: Some(room.name),
            user_name: None,
        })
    }

    pub async fn get(&self, actor: &Actor, id: i32) -> DomainResult<BookingView> {
        let booking = self.load_accessible(actor, id).await?;
        self.view(actor, booking).await
    }

    /// Admins see every booking, users only their own.
    pub async fn list(&self, actor: &Actor, mut filter: GetBookingsDto) -> DomainResult<Vec<BookingView>> {
        if !actor.is_admin() {
            filter.user_id = Some(actor.user_id);
        }
        let bookings = self.repos.bookings().list(&filter).await?;

        let mut room_names: HashMap<i32, Option<String>> = HashMap::new();
        let mut user_names: HashMap<i32, Option<String>> = HashMap::new();
        let mut views = Vec::with_capacity(bookings.len());

        for booking in bookings {
            if !room_names.contains_key(&booking.room_id) {
                let name = self.room_name(booking.room_id).await?;
                room_names.insert(booking.room_id, name);
            }
            let room_name = room_names.get(&booking.room_id).cloned().flatten();

            let user_name = if actor.is_admin() && booking.user_id != actor.user_id {
                if !user_names.contains_key(&booking.user_id) {
                    let name = self.user_name(booking.user_id).await?;
                    user_names.insert(booking.user_id, name);
                }
                user_names.get(&booking.user_id).cloned().flatten()
            } else {
                None
            };

            views.push(BookingView { booking, room_name, user_name });
        }

        Ok(views)
    }

    /// Apply a partial update.
    ///
    /// A moved interval is re-validated, re-checked for overlaps excluding
    /// the booking itself, and re-priced. A notes-only patch skips all of it.
    pub async fn update(
        &self,
        actor: &Actor,
        id: i32,
        dto: UpdateBookingDto,
    ) -> DomainResult<BookingView> {
        let mut booking = self.load_accessible(actor, id).await?;
        if booking.status.is_terminal() {
            return Err(DomainError::InvalidState(
                "Cannot update cancelled or completed booking".into(),
            ));
        }
        if let Some(status) = dto.status {
            if !can_set_status(actor, &booking, status) {
                return Err(DomainError::Forbidden("Not enough permissions".into()));
            }
        }

        let expected = booking.status;
        let new_range = dto.resolve_range(&booking)?;

        if let Some(range) = new_range {
            ensure_future(&range)?;
            let room = self
                .repos
                .rooms()
                .find_by_id(booking.room_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Room", "id", booking.room_id))?;
            booking.reschedule(range, price(&room, &range))?;
        }

        if let Some(notes) = dto.notes {
            booking.notes = Some(notes);
        }

        if let Some(status) = dto.status {
            booking.transition_to(status)?;
        }

        let saved = if new_range.is_some() {
            self.repos
                .bookings()
                .update_if_free(booking, expected)
                .await
                .inspect_err(|e| {
                    if matches!(e, DomainError::Conflict(_)) {
                        metrics::counter!("booking_conflicts_total").increment(1);
                        warn!(booking_id = id, "Booking update rejected: overlap");
                    }
                })?
        } else {
            self.repos.bookings().update(booking, expected).await?
        };

        if saved.status != expected {
            info!(booking_id = id, from = %expected, to = %saved.status, "Booking status changed");
            if saved.status == BookingStatus::Cancelled {
                metrics::counter!("bookings_cancelled_total").increment(1);
            }
        } else {
            debug!(booking_id = id, rescheduled = new_range.is_some(), "Booking updated");
        }

        self.view(actor, saved).await
    }

    pub async fn cancel(&self, actor: &Actor, id: i32) -> DomainResult<()> {
        let mut booking = self.load_accessible(actor, id).await?;
        let expected = booking.status;
        booking.cancel()?;
        self.repos.bookings().update(booking, expected).await?;

        metrics::counter!("bookings_cancelled_total").increment(1);
        info!(booking_id = id, user_id = actor.user_id, "Booking cancelled");
        Ok(())
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn load_accessible(&self, actor: &Actor, id: i32) -> DomainResult<Booking> {
        let booking = self
            .repos
            .bookings()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", "id", id))?;
        if !can_access(actor, &booking) {
            return Err(DomainError::Forbidden("Not enough permissions".into()));
        }
        Ok(booking)
    }

    async fn view(&self, actor: &Actor, booking: Booking) -> DomainResult<BookingView> {
        let room_name = self.room_name(booking.room_id).await?;
        let user_name = if actor.is_admin() && booking.user_id != actor.user_id {
            self.user_name(booking.user_id).await?
        } else {
            None
        };
        Ok(BookingView { booking, room_name, user_name })
    }

    async fn room_name(&self, room_id: i32) -> DomainResult<Option<String>> {
        Ok(self.repos.rooms().find_by_id(room_id).await?.map(|r| r.name))
    }

    async fn user_name(&self, user_id: i32) -> DomainResult<Option<String>> {
        Ok(self
            .repos
            .users()
            .find_by_id(user_id)
            .await?
            .map(|u| u.display_name().to_string()))
    }
}

fn ensure_future(range: &TimeRange) -> DomainResult<()> {
    if range.starts_before(Utc::now()) {
        return Err(DomainError::Validation("Cannot book in the past".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::room::{Amenities, CreateRoomDto};
    use crate::domain::user::CreateUserDto;
    use crate::domain::booking::availability;
    use crate::domain::UserRole;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;
    use chrono::{DateTime, Duration, DurationRound};

    struct Fixture {
        svc: BookingService,
        repos: Arc<InMemoryRepositoryProvider>,
        room_id: i32,
        owner: Actor,
        other: Actor,
        admin: Actor,
        /// Tomorrow, on the hour
        day: DateTime<Utc>,
    }

    async fn fixture() -> Fixture {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let room = repos
            .rooms()
            .create(CreateRoomDto {
                name: "Moscow".into(),
                description: None,
                capacity: 10,
                price_per_hour: 1000.0,
                amenities: Amenities::default(),
                image_url: None,
            })
            .await
            .unwrap();

        let mut actors = Vec::new();
        for (name, role) in [("alice", UserRole::User), ("bob", UserRole::User), ("root", UserRole::Admin)] {
            let user = repos
                .users()
                .create(CreateUserDto {
                    email: format!("{}@example.com", name),
                    username: name.into(),
                    password_hash: "x".into(),
                    full_name: None,
                    phone: None,
                    role,
                })
                .await
                .unwrap();
            actors.push(Actor::from(&user));
        }

        let day = (Utc::now() + Duration::days(1))
            .duration_trunc(Duration::hours(1))
            .unwrap();

        Fixture {
            svc: BookingService::new(repos.clone()),
            repos,
            room_id: room.id,
            owner: actors[0],
            other: actors[1],
            admin: actors[2],
            day,
        }
    }

    impl Fixture {
        fn at(&self, hour: i64, minute: i64) -> DateTime<Utc> {
            self.day + Duration::hours(hour) + Duration::minutes(minute)
        }

        fn request(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> CreateBookingDto {
            CreateBookingDto {
                room_id: self.room_id,
                start_time: start,
                end_time: end,
                notes: None,
            }
        }

        async fn book(&self, from: i64, to: i64) -> DomainResult<BookingView> {
            let req = self.request(self.at(from, 0), self.at(to, 0));
            self.svc.create(&self.owner, req).await
        }
    }

    #[tokio::test]
    async fn create_prices_and_names_booking() {
        let f = fixture().await;
        let view = f.book(10, 12).await.unwrap();
        assert_eq!(view.booking.status, BookingStatus::Pending);
        assert_eq!(view.booking.total_price, 2000.0);
        assert_eq!(view.room_name.as_deref(), Some("Moscow"));
        assert_eq!(view.booking.user_id, f.owner.user_id);
    }

    #[tokio::test]
    async fn overlapping_create_conflicts_and_back_to_back_succeeds() {
        let f = fixture().await;
        f.book(10, 11).await.unwrap();

        let overlap = f.request(f.at(10, 30), f.at(11, 30));
        let err = f.svc.create(&f.other, overlap).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let adjacent = f.request(f.at(11, 0), f.at(12, 0));
        f.svc.create(&f.other, adjacent).await.unwrap();

        let all = f.repos.bookings().list(&GetBookingsDto::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn create_validates_room_order_and_time() {
        let f = fixture().await;

        let mut missing = f.request(f.at(10, 0), f.at(11, 0));
        missing.room_id = 404;
        assert!(matches!(
            f.svc.create(&f.owner, missing).await,
            Err(DomainError::NotFound { .. })
        ));

        let inverted = f.request(f.at(11, 0), f.at(10, 0));
        assert!(matches!(
            f.svc.create(&f.owner, inverted).await,
            Err(DomainError::Validation(_))
        ));

        let past_start = Utc::now() - Duration::hours(2);
        let past = f.request(past_start, past_start + Duration::hours(1));
        let err = f.svc.create(&f.owner, past).await.unwrap_err();
        assert_eq!(err.message(), "Cannot book in the past");
    }

    #[tokio::test]
    async fn cancelled_interval_becomes_available_again() {
        let f = fixture().await;
        let view = f.book(10, 11).await.unwrap();
        let window = TimeRange::new(f.at(10, 0), f.at(11, 0)).unwrap();

        assert!(f.svc.has_conflict(f.room_id, &window, None).await.unwrap());
        f.svc.cancel(&f.owner, view.booking.id).await.unwrap();
        assert!(!f.svc.has_conflict(f.room_id, &window, None).await.unwrap());

        let active = f.repos.bookings().find_active_in_window(f.room_id, &window).await.unwrap();
        let segments = availability(&active, f.room_id, &window);
        assert_eq!(segments.len(), 1);
        assert!(segments[0].available);

        f.svc.create(&f.other, f.request(f.at(10, 0), f.at(11, 0))).await.unwrap();
    }

    #[tokio::test]
    async fn update_onto_other_booking_conflicts() {
        let f = fixture().await;
        let first = f.book(10, 11).await.unwrap().booking;
        f.book(12, 13).await.unwrap();

        let moved = UpdateBookingDto {
            start_time: Some(f.at(11, 30)),
            end_time: Some(f.at(12, 30)),
            ..Default::default()
        };
        let err = f.svc.update(&f.owner, first.id, moved).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let stored = f.repos.bookings().find_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(stored.range, first.range);
        assert_eq!(stored.total_price, first.total_price);
    }

    #[tokio::test]
    async fn update_overlapping_itself_is_allowed_and_repriced() {
        let f = fixture().await;
        let booking = f.book(10, 11).await.unwrap().booking;

        let stretched = UpdateBookingDto {
            start_time: Some(f.at(10, 30)),
            end_time: Some(f.at(12, 0)),
            ..Default::default()
        };
        let view = f.svc.update(&f.owner, booking.id, stretched).await.unwrap();
        assert_eq!(view.booking.start_time(), f.at(10, 30));
        assert_eq!(view.booking.total_price, 1500.0);
    }

    #[tokio::test]
    async fn notes_only_update_keeps_interval_and_price() {
        let f = fixture().await;
        let booking = f.book(10, 11).await.unwrap().booking;

        let notes = UpdateBookingDto {
            notes: Some("Need a projector".into()),
            ..Default::default()
        };
        let view = f.svc.update(&f.owner, booking.id, notes).await.unwrap();
        assert_eq!(view.booking.notes.as_deref(), Some("Need a projector"));
        assert_eq!(view.booking.range, booking.range);
        assert_eq!(view.booking.total_price, booking.total_price);
    }

    #[tokio::test]
    async fn terminal_bookings_reject_update_and_cancel() {
        let f = fixture().await;

        let cancelled = f.book(10, 11).await.unwrap().booking;
        f.svc.cancel(&f.owner, cancelled.id).await.unwrap();

        let completed = f.book(12, 13).await.unwrap().booking;
        for status in [BookingStatus::Confirmed, BookingStatus::Completed] {
            let dto = UpdateBookingDto { status: Some(status), ..Default::default() };
            f.svc.update(&f.admin, completed.id, dto).await.unwrap();
        }

        for id in [cancelled.id, completed.id] {
            let dto = UpdateBookingDto {
                notes: Some("late edit".into()),
                ..Default::default()
            };
            assert!(matches!(
                f.svc.update(&f.owner, id, dto).await,
                Err(DomainError::InvalidState(_))
            ));
            let err = f.svc.cancel(&f.owner, id).await.unwrap_err();
            assert_eq!(err.message(), "Booking is already cancelled or completed");
        }
    }

    #[tokio::test]
    async fn strangers_are_forbidden() {
        let f = fixture().await;
        let booking = f.book(10, 11).await.unwrap().booking;

        assert!(matches!(
            f.svc.get(&f.other, booking.id).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            f.svc.cancel(&f.other, booking.id).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            f.svc.get(&f.owner, 9999).await,
            Err(DomainError::NotFound { .. })
        ));

        let view = f.svc.get(&f.admin, booking.id).await.unwrap();
        assert_eq!(view.user_name.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn owners_cannot_confirm() {
        let f = fixture().await;
        let booking = f.book(10, 11).await.unwrap().booking;

        let confirm = UpdateBookingDto {
            status: Some(BookingStatus::Confirmed),
            ..Default::default()
        };
        assert!(matches!(
            f.svc.update(&f.owner, booking.id, confirm.clone()).await,
            Err(DomainError::Forbidden(_))
        ));
        let view = f.svc.update(&f.admin, booking.id, confirm).await.unwrap();
        assert_eq!(view.booking.status, BookingStatus::Confirmed);

        let complete_from_pending = f.book(12, 13).await.unwrap().booking;
        let complete = UpdateBookingDto {
            status: Some(BookingStatus::Completed),
            ..Default::default()
        };
        assert!(matches!(
            f.svc.update(&f.admin, complete_from_pending.id, complete).await,
            Err(DomainError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn listing_is_scoped_and_newest_first() {
        let f = fixture().await;
        f.book(9, 10).await.unwrap();
        f.book(14, 15).await.unwrap();
        f.svc
            .create(&f.other, f.request(f.at(11, 0), f.at(12, 0)))
            .await
            .unwrap();

        let mine = f.svc.list(&f.owner, GetBookingsDto::default()).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine[0].booking.start_time() > mine[1].booking.start_time());
        assert!(mine.iter().all(|v| v.user_name.is_none()));

        let all = f.svc.list(&f.admin, GetBookingsDto::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|v| v.room_name.as_deref() == Some("Moscow")));
        assert!(all.iter().all(|v| v.user_name.is_some()));

        let later = GetBookingsDto {
            start_from: Some(f.at(11, 0)),
            ..Default::default()
        };
        assert_eq!(f.svc.list(&f.admin, later).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn active_bookings_never_overlap_after_mixed_operations() {
        let f = fixture().await;
        let attempts = [(9, 11), (10, 12), (11, 13), (12, 14), (8, 9), (13, 15), (9, 10)];
        for (from, to) in attempts {
            let _ = f.book(from, to).await;
        }
        let all = f.repos.bookings().list(&GetBookingsDto::default()).await.unwrap();
        let active: Vec<_> = all.iter().filter(|b| b.holds_room()).collect();
        for (i, a) in active.iter().enumerate() {
            for b in &active[i + 1..] {
                assert!(!a.range.overlaps(&b.range), "{:?} overlaps {:?}", a.range, b.range);
            }
        }
    }
}
