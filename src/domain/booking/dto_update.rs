use chrono::{DateTime, Utc};

use super::{Booking, BookingStatus, TimeRange};
use crate::domain::DomainResult;

/// Partial booking update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateBookingDto {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub status: Option<BookingStatus>,
}

impl UpdateBookingDto {
    /// New interval for `booking`, or `None` when the patch leaves it unchanged.
    ///
    /// A single supplied endpoint is combined with the stored other endpoint.
    pub fn resolve_range(&self, booking: &Booking) -> DomainResult<Option<TimeRange>> {
        if self.start_time.is_none() && self.end_time.is_none() {
            return Ok(None);
        }
        let start = self.start_time.unwrap_or(booking.start_time());
        let end = self.end_time.unwrap_or(booking.end_time());
        let range = TimeRange::new(start, end)?;
        if range == booking.range {
            return Ok(None);
        }
        Ok(Some(range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::NewBooking;
    use crate::domain::DomainError;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 3, 1, hour, 0, 0).unwrap()
    }

    fn booking() -> Booking {
        let range = TimeRange::new(at(10), at(12)).unwrap();
        Booking::from_new(1, NewBooking::pending(1, 1, range, 2000.0, None))
    }

    #[test]
    fn notes_only_patch_keeps_interval() {
        let dto = UpdateBookingDto {
            notes: Some("projector please".into()),
            ..Default::default()
        };
        assert_eq!(dto.resolve_range(&booking()).unwrap(), None);
    }

    #[test]
    fn identical_times_are_not_a_change() {
        let dto = UpdateBookingDto {
            start_time: Some(at(10)),
            end_time: Some(at(12)),
            ..Default::default()
        };
        assert_eq!(dto.resolve_range(&booking()).unwrap(), None);
    }

    #[test]
    fn single_endpoint_merges_with_stored_one() {
        let dto = UpdateBookingDto {
            end_time: Some(at(14)),
            ..Default::default()
        };
        let range = dto.resolve_range(&booking()).unwrap().unwrap();
        assert_eq!((range.start(), range.end()), (at(10), at(14)));
    }

    #[test]
    fn merged_interval_must_stay_ordered() {
        let dto = UpdateBookingDto {
            start_time: Some(at(13)),
            ..Default::default()
        };
        assert!(matches!(
            dto.resolve_range(&booking()),
            Err(DomainError::Validation(_))
        ));
    }
}
