use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServicesProducts::Table)
                    .if_not_exists()
                    .col(uuid(ServicesProducts::Id).primary_key())
                    .col(string_len(ServicesProducts::Name, 128).not_null())
                    .col(uuid(ServicesProducts::SectorId).not_null())
                    .col(timestamp_with_time_zone(ServicesProducts::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_product_sector")
                            .from(ServicesProducts::Table, ServicesProducts::SectorId)
                            .to(Sectors::Table, Sectors::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServicesProducts::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServicesProducts {
    Table,
    Id,
    Name,
    SectorId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Sectors { Table, Id }
