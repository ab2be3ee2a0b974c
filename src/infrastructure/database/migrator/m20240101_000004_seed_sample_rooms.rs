//! Seed the sample rooms

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_rooms::Rooms;

/// (name, description, capacity, price_per_hour, projector, whiteboard, video_conf)
const SAMPLE_ROOMS: [(&str, &str, i32, f64, bool, bool, bool); 4] = [
    ("Moscow", "Conference room for team meetings", 10, 1000.0, true, true, true),
    ("Tokyo", "Small room for one-on-one meetings", 2, 500.0, false, true, false),
    ("New York", "Large hall for presentations and events", 30, 2000.0, true, true, true),
    ("Berlin", "Workspace for focused team work", 8, 800.0, false, true, false),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert.into_table(Rooms::Table).columns([
            Rooms::Name,
            Rooms::Description,
            Rooms::Capacity,
            Rooms::PricePerHour,
            Rooms::HasProjector,
            Rooms::HasWhiteboard,
            Rooms::HasVideoConf,
            Rooms::IsActive,
        ]);

        for (name, description, capacity, price, projector, whiteboard, video) in SAMPLE_ROOMS {
            insert
                .values([
                    name.into(),
                    description.into(),
                    capacity.into(),
                    price.into(),
                    projector.into(),
                    whiteboard.into(),
                    video.into(),
                    true.into(),
                ])
                .map_err(|e| DbErr::Migration(e.to_string()))?;
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let names = SAMPLE_ROOMS.map(|room| room.0);
        let delete = Query::delete()
            .from_table(Rooms::Table)
            .and_where(Expr::col(Rooms::Name).is_in(names))
            .to_owned();
        manager.exec_stmt(delete).await
    }
}
