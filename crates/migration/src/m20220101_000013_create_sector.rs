use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // RESTRICT: sectors must be removed before their industry
        manager
            .create_table(
                Table::create()
                    .table(Sectors::Table)
                    .if_not_exists()
                    .col(uuid(Sectors::Id).primary_key())
                    .col(string_len(Sectors::Name, 128).not_null())
                    .col(uuid(Sectors::IndustryId).not_null())
                    .col(timestamp_with_time_zone(Sectors::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sector_industry")
                            .from(Sectors::Table, Sectors::IndustryId)
                            .to(Industries::Table, Industries::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Sectors::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Sectors {
    Table,
    Id,
    Name,
    IndustryId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Industries { Table, Id }
