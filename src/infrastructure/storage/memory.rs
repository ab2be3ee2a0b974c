//! In-memory repository provider
//!
//! Check-then-write operations on bookings hold a per-room async mutex,
//! giving the same per-room serialization the database provider gets from
//! its transactions.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::booking::{
    conflicting, Booking, BookingRepository, BookingStatus, GetBookingsDto, NewBooking, TimeRange,
};
use crate::domain::room::{CreateRoomDto, GetRoomsDto, Room, RoomRepository};
use crate::domain::user::{CreateUserDto, User, UserRepository};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

#[derive(Default)]
struct MemoryStore {
    rooms: DashMap<i32, Room>,
    bookings: DashMap<i32, Booking>,
    users: DashMap<i32, User>,
    room_locks: DashMap<i32, Arc<Mutex<()>>>,
    room_counter: AtomicI32,
    booking_counter: AtomicI32,
    user_counter: AtomicI32,
}

impl MemoryStore {
    fn next_id(counter: &AtomicI32) -> i32 {
        counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn lock_room(&self, room_id: i32) -> OwnedMutexGuard<()> {
        let lock = self.room_locks.entry(room_id).or_default().clone();
        lock.lock_owned().await
    }

    fn room_bookings(&self, room_id: i32) -> Vec<Booking> {
        self.bookings
            .iter()
            .filter(|entry| entry.room_id == room_id)
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn check_expected(&self, booking_id: i32, expected: BookingStatus) -> DomainResult<()> {
        let stored = self
            .bookings
            .get(&booking_id)
            .map(|b| b.status)
            .ok_or_else(|| DomainError::not_found("Booking", "id", booking_id))?;
        if stored != expected {
            return Err(DomainError::InvalidState(format!(
                "Booking status changed concurrently to {}",
                stored
            )));
        }
        Ok(())
    }
}

/// Repository provider keeping everything in process memory
#[derive(Clone)]
pub struct InMemoryRepositoryProvider {
    rooms: InMemoryRoomRepository,
    bookings: InMemoryBookingRepository,
    users: InMemoryUserRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        Self {
            rooms: InMemoryRoomRepository { store: store.clone() },
            bookings: InMemoryBookingRepository { store: store.clone() },
            users: InMemoryUserRepository { store },
        }
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn rooms(&self) -> &dyn RoomRepository {
        &self.rooms
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }
}

// ── Rooms ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct InMemoryRoomRepository {
    store: Arc<MemoryStore>,
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create(&self, dto: CreateRoomDto) -> DomainResult<Room> {
        let id = MemoryStore::next_id(&self.store.room_counter);
        let room = Room {
            id,
            name: dto.name,
            description: dto.description,
            capacity: dto.capacity,
            price_per_hour: dto.price_per_hour,
            amenities: dto.amenities,
            is_active: true,
            image_url: dto.image_url,
        };
        self.store.rooms.insert(id, room.clone());
        Ok(room)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>> {
        Ok(self.store.rooms.get(&id).map(|r| r.clone()))
    }

    async fn list(&self, filter: &GetRoomsDto) -> DomainResult<Vec<Room>> {
        let mut rooms: Vec<Room> = self
            .store
            .rooms
            .iter()
            .filter(|r| filter.matches(r.value()))
            .map(|r| r.value().clone())
            .collect();
        rooms.sort_by_key(|r| r.id);
        Ok(filter.pagination.apply(rooms))
    }

    async fn update(&self, room: Room) -> DomainResult<Room> {
        let _guard = self.store.lock_room(room.id).await;
        match self.store.rooms.get_mut(&room.id) {
            Some(mut stored) => {
                *stored = room.clone();
                Ok(room)
            }
            None => Err(DomainError::not_found("Room", "id", room.id)),
        }
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let _guard = self.store.lock_room(id).await;
        if !self.store.rooms.contains_key(&id) {
            return Err(DomainError::not_found("Room", "id", id));
        }
        if self.store.bookings.iter().any(|b| b.room_id == id) {
            return Err(DomainError::InvalidState(
                "Room has bookings; deactivate it instead".into(),
            ));
        }
        self.store.rooms.remove(&id);
        Ok(())
    }
}

// ── Bookings ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct InMemoryBookingRepository {
    store: Arc<MemoryStore>,
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        Ok(self.store.bookings.get(&id).map(|b| b.clone()))
    }

    async fn list(&self, filter: &GetBookingsDto) -> DomainResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .store
            .bookings
            .iter()
            .filter(|b| filter.matches(b.value()))
            .map(|b| b.value().clone())
            .collect();
        bookings.sort_by(|a, b| b.start_time().cmp(&a.start_time()).then(b.id.cmp(&a.id)));
        Ok(filter.pagination.apply(bookings))
    }

    async fn find_active_in_window(
        &self,
        room_id: i32,
        window: &TimeRange,
    ) -> DomainResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .store
            .room_bookings(room_id)
            .into_iter()
            .filter(|b| b.holds_room() && b.range.overlaps(window))
            .collect();
        bookings.sort_by_key(|b| (b.start_time(), b.id));
        Ok(bookings)
    }

    async fn insert_if_free(&self, booking: NewBooking) -> DomainResult<Booking> {
        let _guard = self.store.lock_room(booking.room_id).await;

        let bookable = self
            .store
            .rooms
            .get(&booking.room_id)
            .is_some_and(|r| r.is_bookable());
        if !bookable {
            return Err(DomainError::not_found("Room", "id", booking.room_id));
        }

        let existing = self.store.room_bookings(booking.room_id);
        if conflicting(&existing, booking.room_id, &booking.range, None).is_some() {
            return Err(DomainError::Conflict(
                "Room is already booked for this time".into(),
            ));
        }

        let id = MemoryStore::next_id(&self.store.booking_counter);
        let booking = Booking::from_new(id, booking);
        self.store.bookings.insert(id, booking.clone());
        Ok(booking)
    }

    async fn update_if_free(
        &self,
        booking: Booking,
        expected: BookingStatus,
    ) -> DomainResult<Booking> {
        let _guard = self.store.lock_room(booking.room_id).await;
        self.store.check_expected(booking.id, expected)?;

        if booking.holds_room() {
            let existing = self.store.room_bookings(booking.room_id);
            if conflicting(&existing, booking.room_id, &booking.range, Some(booking.id)).is_some() {
                return Err(DomainError::Conflict(
                    "Room is already booked for this time".into(),
                ));
            }
        }

        self.store.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn update(&self, booking: Booking, expected: BookingStatus) -> DomainResult<Booking> {
        let _guard = self.store.lock_room(booking.room_id).await;
        self.store.check_expected(booking.id, expected)?;
        self.store.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }
}

// ── Users ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct InMemoryUserRepository {
    store: Arc<MemoryStore>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, dto: CreateUserDto) -> DomainResult<User> {
        let taken = self
            .store
            .users
            .iter()
            .any(|u| u.username == dto.username || u.email == dto.email);
        if taken {
            return Err(DomainError::AlreadyExists(
                "Username or email already registered".into(),
            ));
        }
        let id = MemoryStore::next_id(&self.store.user_counter);
        let user = User {
            id,
            email: dto.email,
            username: dto.username,
            password_hash: dto.password_hash,
            full_name: dto.full_name,
            phone: dto.phone,
            role: dto.role,
            is_active: true,
            created_at: Utc::now(),
        };
        self.store.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        Ok(self.store.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self
            .store
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .store
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.value().clone()))
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.store.users.len() as u64)
    }
}
