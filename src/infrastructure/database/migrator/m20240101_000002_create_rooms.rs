//! Create rooms table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rooms::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rooms::Name).string().not_null())
                    .col(ColumnDef::new(Rooms::Description).text())
                    .col(ColumnDef::new(Rooms::Capacity).integer().not_null())
                    .col(ColumnDef::new(Rooms::PricePerHour).double().not_null())
                    .col(
                        ColumnDef::new(Rooms::HasProjector)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Rooms::HasWhiteboard)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Rooms::HasVideoConf)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Rooms::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Rooms::ImageUrl).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rooms_name")
                    .table(Rooms::Table)
                    .col(Rooms::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rooms::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Rooms {
    Table,
    Id,
    Name,
    Description,
    Capacity,
    PricePerHour,
    HasProjector,
    HasWhiteboard,
    HasVideoConf,
    IsActive,
    ImageUrl,
}
