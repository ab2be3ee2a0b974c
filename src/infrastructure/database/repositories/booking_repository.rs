//! SeaORM implementation of BookingRepository
//!
//! Interval writes run in one transaction: claim the room row, re-read the
//! stored status, fetch overlapping active bookings, run the pure conflict
//! check, then write. Any early return drops the transaction, which rolls
//! it back.

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, NotSet, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{claim_room, db_err};
use crate::domain::booking::{
    conflicting, Booking, BookingRepository, BookingStatus, GetBookingsDto, NewBooking, TimeRange,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::booking;

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn status_to_db(status: BookingStatus) -> booking::BookingStatus {
    match status {
        BookingStatus::Pending => booking::BookingStatus::Pending,
        BookingStatus::Confirmed => booking::BookingStatus::Confirmed,
        BookingStatus::Cancelled => booking::BookingStatus::Cancelled,
        BookingStatus::Completed => booking::BookingStatus::Completed,
    }
}

fn status_from_db(status: booking::BookingStatus) -> BookingStatus {
    match status {
        booking::BookingStatus::Pending => BookingStatus::Pending,
        booking::BookingStatus::Confirmed => BookingStatus::Confirmed,
        booking::BookingStatus::Cancelled => BookingStatus::Cancelled,
        booking::BookingStatus::Completed => BookingStatus::Completed,
    }
}

fn model_to_domain(m: booking::Model) -> DomainResult<Booking> {
    Ok(Booking {
        id: m.id,
        room_id: m.room_id,
        user_id: m.user_id,
        range: TimeRange::new(m.start_time, m.end_time)?,
        created_at: m.created_at,
        status: status_from_db(m.status),
        total_price: m.total_price,
        notes: m.notes,
    })
}

fn models_to_domain(models: Vec<booking::Model>) -> DomainResult<Vec<Booking>> {
    models.into_iter().map(model_to_domain).collect()
}

fn domain_to_active(b: Booking) -> booking::ActiveModel {
    booking::ActiveModel {
        id: Set(b.id),
        user_id: Set(b.user_id),
        room_id: Set(b.room_id),
        start_time: Set(b.range.start()),
        end_time: Set(b.range.end()),
        created_at: Set(b.created_at),
        status: Set(status_to_db(b.status)),
        total_price: Set(b.total_price),
        notes: Set(b.notes),
    }
}

fn active_statuses() -> [booking::BookingStatus; 2] {
    BookingStatus::ACTIVE.map(status_to_db)
}

async fn active_overlapping<C: ConnectionTrait>(
    conn: &C,
    room_id: i32,
    window: &TimeRange,
) -> DomainResult<Vec<Booking>> {
    let models = booking::Entity::find()
        .filter(booking::Column::RoomId.eq(room_id))
        .filter(booking::Column::Status.is_in(active_statuses()))
        .filter(booking::Column::StartTime.lt(window.end()))
        .filter(booking::Column::EndTime.gt(window.start()))
        .order_by_asc(booking::Column::StartTime)
        .order_by_asc(booking::Column::Id)
        .all(conn)
        .await
        .map_err(db_err)?;
    models_to_domain(models)
}

async fn ensure_free(
    txn: &DatabaseTransaction,
    room_id: i32,
    range: &TimeRange,
    exclude: Option<i32>,
) -> DomainResult<()> {
    let overlapping = active_overlapping(txn, room_id, range).await?;
    if let Some(existing) = conflicting(&overlapping, room_id, range, exclude) {
        debug!(
            "Room {} interval {}..{} collides with booking {}",
            room_id,
            range.start(),
            range.end(),
            existing.id
        );
        return Err(DomainError::Conflict(
            "Room is already booked for this time".into(),
        ));
    }
    Ok(())
}

async fn ensure_status(
    txn: &DatabaseTransaction,
    booking_id: i32,
    expected: BookingStatus,
) -> DomainResult<()> {
    let stored = booking::Entity::find_by_id(booking_id)
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| DomainError::not_found("Booking", "id", booking_id))?;
    let stored = status_from_db(stored.status);
    if stored != expected {
        return Err(DomainError::InvalidState(format!(
            "Booking status changed concurrently to {}",
            stored
        )));
    }
    Ok(())
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn list(&self, filter: &GetBookingsDto) -> DomainResult<Vec<Booking>> {
        let mut query = booking::Entity::find();

        if let Some(user_id) = filter.user_id {
            query = query.filter(booking::Column::UserId.eq(user_id));
        }
        if let Some(room_id) = filter.room_id {
            query = query.filter(booking::Column::RoomId.eq(room_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(booking::Column::Status.eq(status_to_db(status)));
        }
        if let Some(from) = filter.start_from {
            query = query.filter(booking::Column::StartTime.gte(from));
        }
        if let Some(until) = filter.end_until {
            query = query.filter(booking::Column::EndTime.lte(until));
        }

        let models = query
            .order_by_desc(booking::Column::StartTime)
            .order_by_desc(booking::Column::Id)
            .offset(filter.pagination.skip)
            .limit(filter.pagination.limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn find_active_in_window(
        &self,
        room_id: i32,
        window: &TimeRange,
    ) -> DomainResult<Vec<Booking>> {
        active_overlapping(&self.db, room_id, window).await
    }

    async fn insert_if_free(&self, b: NewBooking) -> DomainResult<Booking> {
        debug!("Inserting booking: room={} {}..{}", b.room_id, b.range.start(), b.range.end());

        let txn = self.db.begin().await.map_err(db_err)?;
        if !claim_room(&txn, b.room_id, true).await? {
            return Err(DomainError::not_found("Room", "id", b.room_id));
        }
        ensure_free(&txn, b.room_id, &b.range, None).await?;

        let model = booking::ActiveModel {
            id: NotSet,
            user_id: Set(b.user_id),
            room_id: Set(b.room_id),
            start_time: Set(b.range.start()),
            end_time: Set(b.range.end()),
            created_at: Set(b.created_at),
            status: Set(booking::BookingStatus::Pending),
            total_price: Set(b.total_price),
            notes: Set(b.notes),
        };
        let saved = model.insert(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        model_to_domain(saved)
    }

    async fn update_if_free(
        &self,
        b: Booking,
        expected: BookingStatus,
    ) -> DomainResult<Booking> {
        debug!("Rescheduling booking {}: {}..{}", b.id, b.range.start(), b.range.end());

        let txn = self.db.begin().await.map_err(db_err)?;
        if !claim_room(&txn, b.room_id, false).await? {
            return Err(DomainError::not_found("Room", "id", b.room_id));
        }
        ensure_status(&txn, b.id, expected).await?;
        if b.holds_room() {
            ensure_free(&txn, b.room_id, &b.range, Some(b.id)).await?;
        }

        let saved = domain_to_active(b).update(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        model_to_domain(saved)
    }

    async fn update(&self, b: Booking, expected: BookingStatus) -> DomainResult<Booking> {
        debug!("Updating booking {} (status {})", b.id, b.status);

        let txn = self.db.begin().await.map_err(db_err)?;
        claim_room(&txn, b.room_id, false).await?;
        ensure_status(&txn, b.id, expected).await?;

        let saved = domain_to_active(b).update(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        model_to_domain(saved)
    }
}
