//! Room aggregate
//!
//! Contains the Room entity, DTOs, and repository interface.

pub mod model;
pub mod repository;

mod dto_create;
mod dto_get;
mod dto_update;

pub use model::{Amenities, Room};

pub use dto_create::CreateRoomDto;
pub use dto_get::GetRoomsDto;
pub use dto_update::UpdateRoomDto;

pub use repository::RoomRepository;
