//! Application services

mod booking;
mod room;

pub use booking::{BookingService, BookingView};
pub use room::RoomService;
