use super::{Amenities, Room};
use crate::domain::DomainResult;

#[derive(Debug, Clone)]
pub struct CreateRoomDto {
    pub name: String,
    pub description: Option<String>,
    pub capacity: i32,
    pub price_per_hour: f64,
    pub amenities: Amenities,
    pub image_url: Option<String>,
}

impl CreateRoomDto {
    pub fn validate(&self) -> DomainResult<()> {
        Room::validate_attributes(self.capacity, self.price_per_hour)
    }
}
