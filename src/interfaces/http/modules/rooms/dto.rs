//! Room DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::booking::Segment;
use crate::domain::room::{CreateRoomDto, GetRoomsDto, UpdateRoomDto};
use crate::domain::{Amenities, Room};
use crate::interfaces::http::common::datetime;
use crate::shared::Pagination;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub capacity: i32,
    pub price_per_hour: f64,
    pub has_projector: bool,
    pub has_whiteboard: bool,
    pub has_video_conf: bool,
    pub is_active: bool,
    pub image_url: Option<String>,
}

impl From<Room> for RoomDto {
    fn from(r: Room) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            capacity: r.capacity,
            price_per_hour: r.price_per_hour,
            has_projector: r.amenities.has_projector,
            has_whiteboard: r.amenities.has_whiteboard,
            has_video_conf: r.amenities.has_video_conf,
            is_active: r.is_active,
            image_url: r.image_url,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "capacity must be positive"))]
    pub capacity: i32,
    #[validate(range(min = 0.0, message = "price_per_hour must not be negative"))]
    pub price_per_hour: f64,
    #[serde(default)]
    pub has_projector: bool,
    #[serde(default)]
    pub has_whiteboard: bool,
    #[serde(default)]
    pub has_video_conf: bool,
    pub image_url: Option<String>,
}

impl From<CreateRoomRequest> for CreateRoomDto {
    fn from(r: CreateRoomRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            capacity: r.capacity,
            price_per_hour: r.price_per_hour,
            amenities: Amenities {
                has_projector: r.has_projector,
                has_whiteboard: r.has_whiteboard,
                has_video_conf: r.has_video_conf,
            },
            image_url: r.image_url,
        }
    }
}

/// Partial update; omitted fields keep their value
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateRoomRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "capacity must be positive"))]
    pub capacity: Option<i32>,
    #[validate(range(min = 0.0, message = "price_per_hour must not be negative"))]
    pub price_per_hour: Option<f64>,
    pub has_projector: Option<bool>,
    pub has_whiteboard: Option<bool>,
    pub has_video_conf: Option<bool>,
    /// `false` takes the room out of service without deleting it
    pub is_active: Option<bool>,
    pub image_url: Option<String>,
}

impl From<UpdateRoomRequest> for UpdateRoomDto {
    fn from(r: UpdateRoomRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            capacity: r.capacity,
            price_per_hour: r.price_per_hour,
            has_projector: r.has_projector,
            has_whiteboard: r.has_whiteboard,
            has_video_conf: r.has_video_conf,
            is_active: r.is_active,
            image_url: r.image_url,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RoomListQuery {
    /// Case-insensitive name fragment
    pub name: Option<String>,
    pub min_capacity: Option<i32>,
    pub max_price: Option<f64>,
    pub has_projector: Option<bool>,
    pub has_whiteboard: Option<bool>,
    pub has_video_conf: Option<bool>,
    /// Admins only; ignored for other callers
    #[serde(default)]
    pub include_inactive: bool,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

impl From<RoomListQuery> for GetRoomsDto {
    fn from(q: RoomListQuery) -> Self {
        Self {
            name: q.name.filter(|n| !n.trim().is_empty()),
            min_capacity: q.min_capacity,
            max_price: q.max_price,
            has_projector: q.has_projector,
            has_whiteboard: q.has_whiteboard,
            has_video_conf: q.has_video_conf,
            include_inactive: q.include_inactive,
            pagination: Pagination::new(q.skip, q.limit),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    /// Window start (RFC 3339, or naive UTC)
    #[serde(deserialize_with = "datetime::deserialize")]
    #[param(value_type = String)]
    pub start_date: DateTime<Utc>,
    /// Window end, exclusive
    #[serde(deserialize_with = "datetime::deserialize")]
    #[param(value_type = String)]
    pub end_date: DateTime<Utc>,
}

/// One free or busy slice of the requested window
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailabilitySlotDto {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub available: bool,
    /// Occupying booking for busy slices
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<i32>,
}

impl From<Segment> for AvailabilitySlotDto {
    fn from(s: Segment) -> Self {
        Self {
            start_time: s.start,
            end_time: s.end,
            available: s.available,
            booking_id: s.booking_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn free_slice_omits_booking_id() {
        let start = Utc.with_ymd_and_hms(2030, 3, 1, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2030, 3, 1, 10, 0, 0).unwrap();
        let free = AvailabilitySlotDto::from(Segment {
            start,
            end,
            available: true,
            booking_id: None,
        });
        let busy = AvailabilitySlotDto::from(Segment {
            start,
            end,
            available: false,
            booking_id: Some(7),
        });

        let free = serde_json::to_value(free).unwrap();
        assert!(free.get("booking_id").is_none());
        assert_eq!(free["available"], true);
        assert_eq!(serde_json::to_value(busy).unwrap()["booking_id"], 7);
    }
}
