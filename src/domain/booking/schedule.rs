//! Store-agnostic scheduling rules
//!
//! Conflict detection, availability derivation, and pricing operate on an
//! injected slice of bookings so they can be exercised without a database.
//! Callers are responsible for fetching the relevant bookings; every
//! function here still filters by room and status on its own.

use chrono::{DateTime, Utc};

use super::model::{Booking, TimeRange};
use crate::domain::room::Room;

// ── Conflict Checker ───────────────────────────────────────────

/// First active booking of `room_id` overlapping `range`, ignoring `exclude`.
pub fn conflicting<'a>(
    bookings: &'a [Booking],
    room_id: i32,
    range: &TimeRange,
    exclude: Option<i32>,
) -> Option<&'a Booking> {
    bookings.iter().find(|b| {
        b.room_id == room_id
            && b.holds_room()
            && Some(b.id) != exclude
            && b.range.overlaps(range)
    })
}

pub fn has_conflict(
    bookings: &[Booking],
    room_id: i32,
    range: &TimeRange,
    exclude: Option<i32>,
) -> bool {
    conflicting(bookings, room_id, range, exclude).is_some()
}

// ── Availability Deriver ───────────────────────────────────────

/// Free or busy sub-interval of an availability window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available: bool,
    pub booking_id: Option<i32>,
}

impl Segment {
    fn free(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end, available: true, booking_id: None }
    }

    fn busy(start: DateTime<Utc>, end: DateTime<Utc>, booking_id: i32) -> Self {
        Self { start, end, available: false, booking_id: Some(booking_id) }
    }
}

/// Ordered free/busy segments exactly tiling `window`.
///
/// Busy segments are clamped to the window, so a booking that started
/// before `window.start` shows up as busy from the window start.
pub fn availability(bookings: &[Booking], room_id: i32, window: &TimeRange) -> Vec<Segment> {
    let mut busy: Vec<&Booking> = bookings
        .iter()
        .filter(|b| b.room_id == room_id && b.holds_room() && b.range.overlaps(window))
        .collect();
    busy.sort_by_key(|b| (b.start_time(), b.id));

    let mut segments = Vec::with_capacity(busy.len() * 2 + 1);
    let mut cursor = window.start();

    for booking in busy {
        let start = booking.start_time().max(window.start());
        let end = booking.end_time().min(window.end());
        if end <= cursor {
            continue;
        }
        if cursor < start {
            segments.push(Segment::free(cursor, start));
        }
        segments.push(Segment::busy(start.max(cursor), end, booking.id));
        cursor = end;
    }

    if cursor < window.end() {
        segments.push(Segment::free(cursor, window.end()));
    }

    segments
}

// ── Price Calculator ───────────────────────────────────────────

/// Hourly rate times duration, with sub-hour precision in milliseconds.
pub fn price(room: &Room, range: &TimeRange) -> f64 {
    let millis = range.duration().num_milliseconds() as f64;
    (room.price_per_hour * millis / 3_600_000.0).max(0.0)
}

// ── Tests ──────────────────────────────────────────────────────
