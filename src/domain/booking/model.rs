//! Booking domain entity

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};

use crate::domain::{DomainError, DomainResult};

/// Booking status
///
/// `Pending` and `Confirmed` hold the room; `Cancelled` and `Completed`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Statuses that occupy the room and take part in conflict checks
    pub const ACTIVE: [BookingStatus; 2] = [BookingStatus::Pending, BookingStatus::Confirmed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// pending → confirmed → completed, pending/confirmed → cancelled.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::Cancelled)
                | (Self::Confirmed, Self::Completed)
        )
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(DomainError::Validation(format!(
                "Invalid status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Half-open interval `[start, end)` with `start < end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<Self> {
        if start >= end {
            return Err(DomainError::Validation(
                "End time must be after start time".into(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn starts_before(&self, instant: DateTime<Utc>) -> bool {
        self.start < instant
    }
}

/// A booking about to be inserted (no id yet)
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub room_id: i32,
    pub user_id: i32,
    pub range: TimeRange,
    pub total_price: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewBooking {
    pub fn pending(
        room_id: i32,
        user_id: i32,
        range: TimeRange,
        total_price: f64,
        notes: Option<String>,
    ) -> Self {
        Self {
            room_id,
            user_id,
            range,
            total_price,
            notes,
            created_at: Utc::now(),
        }
    }
}

/// Room reservation
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: i32,
    pub room_id: i32,
    pub user_id: i32,
    pub range: TimeRange,
    pub created_at: DateTime<Utc>,
    pub status: BookingStatus,
    /// Derived from the room rate and `range`; recomputed whenever `range` moves
    pub total_price: f64,
    pub notes: Option<String>,
}

impl Booking {
    pub fn from_new(id: i32, new: NewBooking) -> Self {
        Self {
            id,
            room_id: new.room_id,
            user_id: new.user_id,
            range: new.range,
            created_at: new.created_at,
            status: BookingStatus::Pending,
            total_price: new.total_price,
            notes: new.notes,
        }
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.range.start()
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.range.end()
    }

    /// Whether this booking occupies its room
    pub fn holds_room(&self) -> bool {
        self.status.is_active()
    }

    /// Reject any mutation once the booking reached a terminal state.
    pub fn ensure_mutable(&self) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(DomainError::InvalidState(format!(
                "Cannot modify {} booking",
                self.status
            )));
        }
        Ok(())
    }

    /// Move the booking to a new interval at a freshly computed price.
    pub fn reschedule(&mut self, range: TimeRange, total_price: f64) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.range = range;
        self.total_price = total_price;
        Ok(())
    }

    pub fn transition_to(&mut self, next: BookingStatus) -> DomainResult<()> {
        if self.status == next {
            return self.ensure_mutable();
        }
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidState(format!(
                "Cannot change booking status from {} to {}",
                self.status, next
            )));
        }
        self.status = next;
        Ok(())
    }

    pub fn cancel(&mut self) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(DomainError::InvalidState(
                "Booking is already cancelled or completed".into(),
            ));
        }
        self.status = BookingStatus::Cancelled;
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────
