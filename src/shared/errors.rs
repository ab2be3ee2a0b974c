use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Malformed input: inverted interval, past start, bad capacity/price.
    #[error("Validation: {0}")]
    Validation(String),

    /// Overlapping interval on the same room.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Mutation of a booking in a terminal state, or a forbidden transition.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    /// Caller-facing message without the category prefix
    pub fn message(&self) -> String {
        match self {
            Self::NotFound { entity, .. } => format!("{} not found", entity),
            Self::Validation(msg)
            | Self::Conflict(msg)
            | Self::InvalidState(msg)
            | Self::AlreadyExists(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg) => msg.clone(),
            Self::Database(_) => "Internal server error".to_string(),
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity() {
        let e = DomainError::not_found("Room", "id", 42);
        assert_eq!(e.to_string(), "Not found: Room with id=42");
    }

    #[test]
    fn caller_message_drops_category_and_hides_db_details() {
        assert_eq!(DomainError::not_found("Booking", "id", 7).message(), "Booking not found");
        assert_eq!(
            DomainError::Conflict("Room is already booked for this time".into()).message(),
            "Room is already booked for this time"
        );
        assert_eq!(
            DomainError::Database("disk I/O error".into()).message(),
            "Internal server error"
        );
    }
}
