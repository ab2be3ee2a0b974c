use chrono::{DateTime, Utc};

use super::{Booking, BookingStatus};
use crate::shared::Pagination;

/// Booking listing filter; results are ordered by start time, newest first.
#[derive(Debug, Clone, Default)]
pub struct GetBookingsDto {
    /// Restrict to one owner; `None` lists every user's bookings
    pub user_id: Option<i32>,
    pub room_id: Option<i32>,
    pub status: Option<BookingStatus>,
    /// Keep bookings starting at or after this instant
    pub start_from: Option<DateTime<Utc>>,
    /// Keep bookings ending at or before this instant
    pub end_until: Option<DateTime<Utc>>,
    pub pagination: Pagination,
}

impl GetBookingsDto {
    pub fn matches(&self, booking: &Booking) -> bool {
        self.user_id.map_or(true, |id| booking.user_id == id)
            && self.room_id.map_or(true, |id| booking.room_id == id)
            && self.status.map_or(true, |s| booking.status == s)
            && self.start_from.map_or(true, |t| booking.start_time() >= t)
            && self.end_until.map_or(true, |t| booking.end_time() <= t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::{NewBooking, TimeRange};
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn filters_combine() {
        let range = TimeRange::new(at(10), at(12)).unwrap();
        let b = Booking::from_new(5, NewBooking::pending(2, 7, range, 0.0, None));

        assert!(GetBookingsDto::default().matches(&b));
        let filter = GetBookingsDto {
            user_id: Some(7),
            room_id: Some(2),
            status: Some(BookingStatus::Pending),
            start_from: Some(at(10)),
            end_until: Some(at(12)),
            ..Default::default()
        };
        assert!(filter.matches(&b));

        assert!(!GetBookingsDto { user_id: Some(8), ..Default::default() }.matches(&b));
        assert!(!GetBookingsDto { status: Some(BookingStatus::Confirmed), ..Default::default() }.matches(&b));
        assert!(!GetBookingsDto { start_from: Some(at(11)), ..Default::default() }.matches(&b));
        assert!(!GetBookingsDto { end_until: Some(at(11)), ..Default::default() }.matches(&b));
    }
}
