use super::Room;
use crate::domain::DomainResult;

/// Partial room update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateRoomDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub capacity: Option<i32>,
    pub price_per_hour: Option<f64>,
    pub has_projector: Option<bool>,
    pub has_whiteboard: Option<bool>,
    pub has_video_conf: Option<bool>,
    pub is_active: Option<bool>,
    pub image_url: Option<String>,
}

impl UpdateRoomDto {
    /// Apply the patch to `room`, rejecting it as a whole if the result is invalid.
    pub fn apply(self, room: &Room) -> DomainResult<Room> {
        let mut updated = room.clone();
        if let Some(name) = self.name {
            updated.name = name;
        }
        if let Some(description) = self.description {
            updated.description = Some(description);
        }
        if let Some(capacity) = self.capacity {
            updated.capacity = capacity;
        }
        if let Some(price) = self.price_per_hour {
            updated.price_per_hour = price;
        }
        if let Some(v) = self.has_projector {
            updated.amenities.has_projector = v;
        }
        if let Some(v) = self.has_whiteboard {
            updated.amenities.has_whiteboard = v;
        }
        if let Some(v) = self.has_video_conf {
            updated.amenities.has_video_conf = v;
        }
        if let Some(active) = self.is_active {
            updated.is_active = active;
        }
        if let Some(url) = self.image_url {
            updated.image_url = Some(url);
        }
        Room::validate_attributes(updated.capacity, updated.price_per_hour)?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::room::Amenities;
    use crate::domain::DomainError;

    fn room() -> Room {
        Room {
            id: 7,
            name: "Moscow".into(),
            description: None,
            capacity: 10,
            price_per_hour: 1000.0,
            amenities: Amenities::default(),
            is_active: true,
            image_url: None,
        }
    }

    #[test]
    fn patch_touches_only_given_fields() {
        let patch = UpdateRoomDto {
            price_per_hour: Some(1200.0),
            has_projector: Some(true),
            is_active: Some(false),
            ..UpdateRoomDto::default()
        };
        let updated = patch.apply(&room()).unwrap();
        assert_eq!(updated.name, "Moscow");
        assert_eq!(updated.capacity, 10);
        assert_eq!(updated.price_per_hour, 1200.0);
        assert!(updated.amenities.has_projector);
        assert!(!updated.is_active);
    }

    #[test]
    fn invalid_patch_is_rejected() {
        let patch = UpdateRoomDto {
            capacity: Some(-1),
            ..UpdateRoomDto::default()
        };
        assert!(matches!(patch.apply(&room()), Err(DomainError::Validation(_))));
    }
}
