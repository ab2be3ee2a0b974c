//! Room domain entity

use crate::domain::{DomainError, DomainResult};

/// Amenity flags of a room
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Amenities {
    pub has_projector: bool,
    pub has_whiteboard: bool,
    pub has_video_conf: bool,
}

/// A bookable coworking room
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Number of seats, always positive
    pub capacity: i32,
    /// Hourly rate, never negative
    pub price_per_hour: f64,
    pub amenities: Amenities,
    /// Inactive rooms cannot be booked and are hidden from listings
    pub is_active: bool,
    pub image_url: Option<String>,
}

impl Room {
    /// Check the static attributes shared by create and update flows.
    pub fn validate_attributes(capacity: i32, price_per_hour: f64) -> DomainResult<()> {
        if capacity <= 0 {
            return Err(DomainError::Validation("Capacity must be positive".into()));
        }
        if !price_per_hour.is_finite() || price_per_hour < 0.0 {
            return Err(DomainError::Validation("Price must be non-negative".into()));
        }
        Ok(())
    }

    pub fn is_bookable(&self) -> bool {
        self.is_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_room() -> Room {
        Room {
            id: 1,
            name: "Tokyo".into(),
            description: None,
            capacity: 2,
            price_per_hour: 500.0,
            amenities: Amenities {
                has_whiteboard: true,
                ..Amenities::default()
            },
            is_active: true,
            image_url: None,
        }
    }

    #[test]
    fn attribute_validation() {
        assert!(Room::validate_attributes(1, 0.0).is_ok());
        assert!(matches!(
            Room::validate_attributes(0, 10.0),
            Err(DomainError::Validation(_))
        ));
        assert!(Room::validate_attributes(4, -0.5).is_err());
        assert!(Room::validate_attributes(4, f64::NAN).is_err());
    }

    #[test]
    fn deactivated_room_is_not_bookable() {
        let mut room = sample_room();
        assert!(room.is_bookable());
        room.is_active = false;
        assert!(!room.is_bookable());
    }
}
