//! Booking DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::BookingView;
use crate::domain::booking::{CreateBookingDto, GetBookingsDto, UpdateBookingDto};
use crate::domain::{BookingStatus, DomainResult};
use crate::interfaces::http::common::datetime;
use crate::shared::Pagination;

fn parse_status(raw: Option<&str>) -> DomainResult<Option<BookingStatus>> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .transpose()
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingDto {
    pub id: i32,
    pub room_id: i32,
    pub user_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// `pending`, `confirmed`, `cancelled` or `completed`
    pub status: String,
    pub total_price: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub room_name: Option<String>,
    /// Present when an administrator views another user's booking
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

impl From<BookingView> for BookingDto {
    fn from(v: BookingView) -> Self {
        let b = v.booking;
        Self {
            id: b.id,
            room_id: b.room_id,
            user_id: b.user_id,
            start_time: b.start_time(),
            end_time: b.end_time(),
            status: b.status.to_string(),
            total_price: b.total_price,
            notes: b.notes,
            created_at: b.created_at,
            room_name: v.room_name,
            user_name: v.user_name,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    pub room_id: i32,
    #[serde(deserialize_with = "datetime::deserialize")]
    pub start_time: DateTime<Utc>,
    #[serde(deserialize_with = "datetime::deserialize")]
    pub end_time: DateTime<Utc>,
    #[validate(length(max = 1000, message = "notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

impl From<CreateBookingRequest> for CreateBookingDto {
    fn from(r: CreateBookingRequest) -> Self {
        Self {
            room_id: r.room_id,
            start_time: r.start_time,
            end_time: r.end_time,
            notes: r.notes,
        }
    }
}

/// Partial update; omitted fields keep their value
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBookingRequest {
    #[serde(default, deserialize_with = "datetime::option::deserialize")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "datetime::option::deserialize")]
    pub end_time: Option<DateTime<Utc>>,
    #[validate(length(max = 1000, message = "notes must be at most 1000 characters"))]
    pub notes: Option<String>,
    /// `pending`, `confirmed`, `cancelled` or `completed`
    pub status: Option<String>,
}

impl UpdateBookingRequest {
    pub fn into_dto(self) -> DomainResult<UpdateBookingDto> {
        Ok(UpdateBookingDto {
            status: parse_status(self.status.as_deref())?,
            start_time: self.start_time,
            end_time: self.end_time,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookingListQuery {
    pub room_id: Option<i32>,
    /// `pending`, `confirmed`, `cancelled` or `completed`
    pub status: Option<String>,
    /// Keep bookings starting at or after this instant
    #[serde(default, deserialize_with = "datetime::option::deserialize")]
    #[param(value_type = Option<String>)]
    pub start_date: Option<DateTime<Utc>>,
    /// Keep bookings ending at or before this instant
    #[serde(default, deserialize_with = "datetime::option::deserialize")]
    #[param(value_type = Option<String>)]
    pub end_date: Option<DateTime<Utc>>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

impl BookingListQuery {
    /// Owner scoping is applied by the service, not here.
    pub fn into_filter(self) -> DomainResult<GetBookingsDto> {
        Ok(GetBookingsDto {
            user_id: None,
            room_id: self.room_id,
            status: parse_status(self.status.as_deref())?,
            start_from: self.start_date,
            end_until: self.end_date,
            pagination: Pagination::new(self.skip, self.limit),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn status_strings_map_onto_the_single_enum() {
        let req = UpdateBookingRequest {
            status: Some("Cancelled".into()),
            ..Default::default()
        };
        assert_eq!(req.into_dto().unwrap().status, Some(BookingStatus::Cancelled));

        let req = UpdateBookingRequest {
            status: Some("archived".into()),
            ..Default::default()
        };
        assert!(matches!(req.into_dto(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn blank_status_filter_means_any() {
        let q = BookingListQuery {
            status: Some(" ".into()),
            ..Default::default()
        };
        assert_eq!(q.into_filter().unwrap().status, None);
    }

    #[test]
    fn create_request_accepts_naive_timestamps() {
        let req: CreateBookingRequest = serde_json::from_str(
            r#"{"room_id":1,"start_time":"2030-03-01T10:00:00","end_time":"2030-03-01T11:00:00"}"#,
        )
        .unwrap();
        let dto = CreateBookingDto::from(req);
        assert_eq!(dto.range().unwrap().duration(), chrono::Duration::hours(1));
    }
}
