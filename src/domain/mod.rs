pub mod access;
pub mod booking;
pub mod repositories;
pub mod room;
pub mod user;

// Re-export commonly used types
pub use access::Actor;
pub use booking::{Booking, BookingStatus, TimeRange};
pub use repositories::{DomainResult, RepositoryProvider};
pub use room::{Amenities, Room};
pub use user::{User, UserRole};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::DomainError;
