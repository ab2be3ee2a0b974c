use chrono::{DateTime, Utc};

use super::TimeRange;
use crate::domain::DomainResult;

/// Booking request as submitted by a user
#[derive(Debug, Clone)]
pub struct CreateBookingDto {
    pub room_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub notes: Option<String>,
}

impl CreateBookingDto {
    pub fn range(&self) -> DomainResult<TimeRange> {
        TimeRange::new(self.start_time, self.end_time)
    }
}
