//! Booking aggregate
//!
//! Contains the Booking entity with its lifecycle, the store-agnostic
//! scheduling rules (conflicts, availability, pricing), DTOs, and the
//! repository interface.

pub mod model;
pub mod repository;
pub mod schedule;

mod dto_create;
mod dto_get;
mod dto_update;

pub use model::{Booking, BookingStatus, NewBooking, TimeRange};
pub use schedule::{availability, conflicting, has_conflict, price, Segment};

pub use dto_create::CreateBookingDto;
pub use dto_get::GetBookingsDto;
pub use dto_update::UpdateBookingDto;

pub use repository::BookingRepository;
