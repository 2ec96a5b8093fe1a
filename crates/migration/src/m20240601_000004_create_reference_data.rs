//! Create the reference-data tables: `prisons`, `managements`, `courts`.
//!
//! Plain records without foreign keys.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Prisons::Table)
                    .if_not_exists()
                    .col(pk_auto(Prisons::Id))
                    .col(string_len(Prisons::Name, 128))
                    .col(string_len(Prisons::Code, 32).unique_key())
                    .col(string_len(Prisons::Location, 255))
                    .col(integer(Prisons::Capacity))
                    .col(timestamp_with_time_zone(Prisons::CreatedAt))
                    .col(timestamp_with_time_zone(Prisons::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Managements::Table)
                    .if_not_exists()
                    .col(pk_auto(Managements::Id))
                    .col(string_len(Managements::Name, 128).unique_key())
                    .col(
                        ColumnDef::new(Managements::Description)
                            .text()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(Managements::CreatedAt))
                    .col(timestamp_with_time_zone(Managements::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Courts::Table)
                    .if_not_exists()
                    .col(pk_auto(Courts::Id))
                    .col(string_len(Courts::Name, 128))
                    .col(string_len(Courts::Location, 255))
                    .col(timestamp_with_time_zone(Courts::CreatedAt))
                    .col(timestamp_with_time_zone(Courts::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Courts::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Managements::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Prisons::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Prisons {
    Table,
    Id,
    Name,
    Code,
    Location,
    Capacity,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Managements {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Courts {
    Table,
    Id,
    Name,
    Location,
    CreatedAt,
    UpdatedAt,
}
