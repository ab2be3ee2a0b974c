//! Application layer - use cases over the domain
//!
//! Services receive an explicit repository provider; handlers stay thin
//! wrappers around them.

pub mod identity;
pub mod services;

pub use identity::{AuthResult, RegisterUser, UserService};
pub use services::{BookingService, BookingView, RoomService};
