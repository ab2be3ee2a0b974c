//! Booking repository interface
//!
//! The check-then-write operations are the only way to persist a booking
//! interval. Implementations serialize them per room so that two writers
//! racing for overlapping intervals cannot both commit.

use async_trait::async_trait;

use super::{Booking, BookingStatus, GetBookingsDto, NewBooking, TimeRange};
use crate::domain::DomainResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>>;

    async fn list(&self, filter: &GetBookingsDto) -> DomainResult<Vec<Booking>>;

    /// Pending or confirmed bookings of `room_id` intersecting `window`,
    /// ordered by start time ascending.
    async fn find_active_in_window(
        &self,
        room_id: i32,
        window: &TimeRange,
    ) -> DomainResult<Vec<Booking>>;

    /// Insert a pending booking unless its interval overlaps an active one.
    ///
    /// Fails with `NotFound` if the room is missing or inactive and with
    /// `Conflict` on overlap. Nothing is written on failure.
    async fn insert_if_free(&self, booking: NewBooking) -> DomainResult<Booking>;

    /// Persist a booking whose interval moved, re-checking overlaps while
    /// ignoring the booking itself.
    ///
    /// `expected` is the status the caller read; a concurrent change yields
    /// `InvalidState`.
    async fn update_if_free(
        &self,
        booking: Booking,
        expected: BookingStatus,
    ) -> DomainResult<Booking>;

    /// Persist status or notes changes with the same `expected` status guard.
    async fn update(&self, booking: Booking, expected: BookingStatus) -> DomainResult<Booking>;
}
