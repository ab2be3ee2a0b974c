//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod booking_repository;
pub mod repository_provider;
pub mod room_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use log::error;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::room;

fn db_err(e: DbErr) -> DomainError {
    error!("Database error: {}", e);
    DomainError::from(e)
}

/// Take the write lock on a room row for the rest of the transaction.
///
/// A no-op self-assignment on the row: SQLite escalates the transaction to
/// its single writer lock, row-locking databases lock just this row. Every
/// booking write for the room runs through here first, so check-then-write
/// sequences on one room are serialized. Returns `false` when no matching
/// room exists.
async fn claim_room<C: ConnectionTrait>(
    conn: &C,
    room_id: i32,
    require_active: bool,
) -> DomainResult<bool> {
    let touch: SimpleExpr = Expr::col(room::Column::Id).into();
    let mut query = room::Entity::update_many()
        .col_expr(room::Column::Id, touch)
        .filter(room::Column::Id.eq(room_id));
    if require_active {
        query = query.filter(room::Column::IsActive.eq(true));
    }
    let result = query.exec(conn).await.map_err(db_err)?;
    Ok(result.rows_affected > 0)
}
