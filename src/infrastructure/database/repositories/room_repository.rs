//! SeaORM implementation of RoomRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{claim_room, db_err};
use crate::domain::room::{Amenities, CreateRoomDto, GetRoomsDto, Room, RoomRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{booking, room};

pub struct SeaOrmRoomRepository {
    db: DatabaseConnection,
}

impl SeaOrmRoomRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: room::Model) -> Room {
    Room {
        id: m.id,
        name: m.name,
        description: m.description,
        capacity: m.capacity,
        price_per_hour: m.price_per_hour,
        amenities: Amenities {
            has_projector: m.has_projector,
            has_whiteboard: m.has_whiteboard,
            has_video_conf: m.has_video_conf,
        },
        is_active: m.is_active,
        image_url: m.image_url,
    }
}

// ── RoomRepository impl ─────────────────────────────────────────

#[async_trait]
impl RoomRepository for SeaOrmRoomRepository {
    async fn create(&self, dto: CreateRoomDto) -> DomainResult<Room> {
        debug!("Creating room: {}", dto.name);

        let model = room::ActiveModel {
            id: NotSet,
            name: Set(dto.name),
            description: Set(dto.description),
            capacity: Set(dto.capacity),
            price_per_hour: Set(dto.price_per_hour),
            has_projector: Set(dto.amenities.has_projector),
            has_whiteboard: Set(dto.amenities.has_whiteboard),
            has_video_conf: Set(dto.amenities.has_video_conf),
            is_active: Set(true),
            image_url: Set(dto.image_url),
        };
        let saved = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>> {
        let model = room::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn list(&self, filter: &GetRoomsDto) -> DomainResult<Vec<Room>> {
        let mut query = room::Entity::find();

        if !filter.include_inactive {
            query = query.filter(room::Column::IsActive.eq(true));
        }
        if let Some(name) = &filter.name {
            query = query.filter(room::Column::Name.contains(name));
        }
        if let Some(min) = filter.min_capacity {
            query = query.filter(room::Column::Capacity.gte(min));
        }
        if let Some(max) = filter.max_price {
            query = query.filter(room::Column::PricePerHour.lte(max));
        }
        if let Some(v) = filter.has_projector {
            query = query.filter(room::Column::HasProjector.eq(v));
        }
        if let Some(v) = filter.has_whiteboard {
            query = query.filter(room::Column::HasWhiteboard.eq(v));
        }
        if let Some(v) = filter.has_video_conf {
            query = query.filter(room::Column::HasVideoConf.eq(v));
        }

        let models = query
            .order_by_asc(room::Column::Id)
            .offset(filter.pagination.skip)
            .limit(filter.pagination.limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, r: Room) -> DomainResult<Room> {
        debug!("Updating room: {}", r.id);

        let txn = self.db.begin().await.map_err(db_err)?;
        if !claim_room(&txn, r.id, false).await? {
            return Err(DomainError::not_found("Room", "id", r.id));
        }

        let model = room::ActiveModel {
            id: Set(r.id),
            name: Set(r.name),
            description: Set(r.description),
            capacity: Set(r.capacity),
            price_per_hour: Set(r.price_per_hour),
            has_projector: Set(r.amenities.has_projector),
            has_whiteboard: Set(r.amenities.has_whiteboard),
            has_video_conf: Set(r.amenities.has_video_conf),
            is_active: Set(r.is_active),
            image_url: Set(r.image_url),
        };
        let saved = model.update(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(model_to_domain(saved))
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        debug!("Deleting room: {}", id);

        let txn = self.db.begin().await.map_err(db_err)?;
        if !claim_room(&txn, id, false).await? {
            return Err(DomainError::not_found("Room", "id", id));
        }

        let references = booking::Entity::find()
            .filter(booking::Column::RoomId.eq(id))
            .count(&txn)
            .await
            .map_err(db_err)?;
        if references > 0 {
            return Err(DomainError::InvalidState(
                "Room has bookings; deactivate it instead".into(),
            ));
        }

        room::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(())
    }
}
