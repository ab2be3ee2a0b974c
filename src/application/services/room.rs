//! Room registry service

use std::sync::Arc;

use tracing::info;

use crate::domain::access::{can_manage_rooms, Actor};
use crate::domain::booking::{availability, Segment, TimeRange};
use crate::domain::room::{CreateRoomDto, GetRoomsDto, Room, UpdateRoomDto};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

pub struct RoomService {
    repos: Arc<dyn RepositoryProvider>,
}

impl RoomService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    fn require_admin(actor: &Actor) -> DomainResult<()> {
        if !can_manage_rooms(actor) {
            return Err(DomainError::Forbidden("Not enough permissions".into()));
        }
        Ok(())
    }

    /// Inactive rooms are listed for administrators only.
    pub async fn list(&self, actor: &Actor, mut filter: GetRoomsDto) -> DomainResult<Vec<Room>> {
        filter.include_inactive &= actor.is_admin();
        self.repos.rooms().list(&filter).await
    }

    /// Active room by id; inactive rooms are reported as missing.
    pub async fn get_active(&self, id: i32) -> DomainResult<Room> {
        self.repos
            .rooms()
            .find_by_id(id)
            .await?
            .filter(Room::is_bookable)
            .ok_or_else(|| DomainError::not_found("Room", "id", id))
    }

    pub async fn create(&self, actor: &Actor, dto: CreateRoomDto) -> DomainResult<Room> {
        Self::require_admin(actor)?;
        dto.validate()?;
        let room = self.repos.rooms().create(dto).await?;
        info!(room_id = room.id, name = %room.name, "Room created");
        Ok(room)
    }

    /// Admins may update inactive rooms, which is how a room gets reactivated.
    pub async fn update(&self, actor: &Actor, id: i32, dto: UpdateRoomDto) -> DomainResult<Room> {
        Self::require_admin(actor)?;
        let room = self
            .repos
            .rooms()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Room", "id", id))?;
        let updated = dto.apply(&room)?;
        let saved = self.repos.rooms().update(updated).await?;
        info!(room_id = id, is_active = saved.is_active, "Room updated");
        Ok(saved)
    }

    pub async fn delete(&self, actor: &Actor, id: i32) -> DomainResult<()> {
        Self::require_admin(actor)?;
        self.repos.rooms().delete(id).await?;
        info!(room_id = id, "Room deleted");
        Ok(())
    }

    /// Free/busy segments tiling `window` for an active room.
    pub async fn availability(&self, room_id: i32, window: &TimeRange) -> DomainResult<Vec<Segment>> {
        let room = self.get_active(room_id).await?;
        let bookings = self
            .repos
            .bookings()
            .find_active_in_window(room.id, window)
            .await?;
        Ok(availability(&bookings, room.id, window))
    }
}
