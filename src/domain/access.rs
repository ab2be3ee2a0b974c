//! Capability checks
//!
//! Plain functions over the caller identity; transports translate a `false`
//! into their own permission error.

use super::booking::{Booking, BookingStatus};
use super::user::{User, UserRole};

/// Authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i32,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: i32, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.role)
    }
}

/// Admins reach every booking, users only their own.
pub fn can_access(actor: &Actor, booking: &Booking) -> bool {
    actor.is_admin() || booking.user_id == actor.user_id
}

pub fn can_manage_rooms(actor: &Actor) -> bool {
    actor.is_admin()
}

/// Owners may only cancel; confirming and completing are administrative.
pub fn can_set_status(actor: &Actor, booking: &Booking, status: BookingStatus) -> bool {
    if !can_access(actor, booking) {
        return false;
    }
    actor.is_admin() || status == BookingStatus::Cancelled || status == booking.status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::{NewBooking, TimeRange};
    use chrono::{Duration, Utc};

    fn booking_of(user_id: i32) -> Booking {
        let start = Utc::now() + Duration::days(1);
        let range = TimeRange::new(start, start + Duration::hours(1)).unwrap();
        Booking::from_new(1, NewBooking::pending(1, user_id, range, 0.0, None))
    }

    #[test]
    fn owners_and_admins_access_bookings() {
        let booking = booking_of(5);
        assert!(can_access(&Actor::new(5, UserRole::User), &booking));
        assert!(!can_access(&Actor::new(6, UserRole::User), &booking));
        assert!(can_access(&Actor::new(6, UserRole::Admin), &booking));
    }

    #[test]
    fn only_admins_manage_rooms() {
        assert!(can_manage_rooms(&Actor::new(1, UserRole::Admin)));
        assert!(!can_manage_rooms(&Actor::new(1, UserRole::User)));
    }

    #[test]
    fn owners_can_only_cancel() {
        let booking = booking_of(5);
        let owner = Actor::new(5, UserRole::User);
        assert!(can_set_status(&owner, &booking, BookingStatus::Cancelled));
        assert!(can_set_status(&owner, &booking, BookingStatus::Pending));
        assert!(!can_set_status(&owner, &booking, BookingStatus::Confirmed));
        assert!(!can_set_status(&owner, &booking, BookingStatus::Completed));

        let stranger = Actor::new(9, UserRole::User);
        assert!(!can_set_status(&stranger, &booking, BookingStatus::Cancelled));

        let admin = Actor::new(9, UserRole::Admin);
        assert!(can_set_status(&admin, &booking, BookingStatus::Confirmed));
    }
}
