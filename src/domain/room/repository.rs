//! Room repository interface

use async_trait::async_trait;

use super::{CreateRoomDto, GetRoomsDto, Room};
use crate::domain::DomainResult;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create(&self, dto: CreateRoomDto) -> DomainResult<Room>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>>;

    /// Rooms matching the filter, ordered by id
    async fn list(&self, filter: &GetRoomsDto) -> DomainResult<Vec<Room>>;

    async fn update(&self, room: Room) -> DomainResult<Room>;

    /// Hard-delete a room.
    ///
    /// Fails with `InvalidState` while any booking (in any status) references it,
    /// checked atomically with concurrent booking writes for the same room.
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
