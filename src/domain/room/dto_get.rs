use super::Room;
use crate::shared::Pagination;

/// Room listing filter. Only active rooms are listed unless `include_inactive` is set.
#[derive(Debug, Clone, Default)]
pub struct GetRoomsDto {
    /// Case-insensitive substring of the room name
    pub name: Option<String>,
    pub min_capacity: Option<i32>,
    pub max_price: Option<f64>,
    pub has_projector: Option<bool>,
    pub has_whiteboard: Option<bool>,
    pub has_video_conf: Option<bool>,
    pub include_inactive: bool,
    pub pagination: Pagination,
}

impl GetRoomsDto {
    pub fn matches(&self, room: &Room) -> bool {
        if !self.include_inactive && !room.is_active {
            return false;
        }
        if let Some(name) = &self.name {
            if !room.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if self.min_capacity.is_some_and(|min| room.capacity < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| room.price_per_hour > max) {
            return false;
        }
        let flags = [
            (self.has_projector, room.amenities.has_projector),
            (self.has_whiteboard, room.amenities.has_whiteboard),
            (self.has_video_conf, room.amenities.has_video_conf),
        ];
        flags
            .iter()
            .all(|(wanted, actual)| wanted.map_or(true, |w| w == *actual))
    }
}
