use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Lots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Lots::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Lots::OwnerId).big_integer().not_null())
                    .col(ColumnDef::new(Lots::EstateType).string_len(16).not_null())
                    .col(ColumnDef::new(Lots::Rooms).integer().not_null())
                    .col(ColumnDef::new(Lots::Area).integer().not_null())
                    .col(ColumnDef::new(Lots::Floor).integer().not_null())
                    .col(ColumnDef::new(Lots::MaxFloor).integer().not_null())
                    .col(ColumnDef::new(Lots::City).string().not_null())
                    .col(ColumnDef::new(Lots::District).string().not_null())
                    .col(ColumnDef::new(Lots::Street).string().not_null())
                    .col(ColumnDef::new(Lots::Building).string().not_null())
                    .col(ColumnDef::new(Lots::Price).big_integer().not_null())
                    .col(
                        ColumnDef::new(Lots::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Lots::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_lots_owner_id")
                    .table(Lots::Table)
                    .col(Lots::OwnerId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Lots::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Lots {
    Table,
    Id,
    OwnerId,
    EstateType,
    Rooms,
    Area,
    Floor,
    MaxFloor,
    City,
    District,
    Street,
    Building,
    Price,
    CreatedAt,
    UpdatedAt,
}
