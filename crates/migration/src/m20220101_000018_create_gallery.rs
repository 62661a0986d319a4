use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Gallery::Table)
                    .if_not_exists()
                    .col(uuid(Gallery::Id).primary_key())
                    .col(uuid(Gallery::FranchiseId).not_null())
                    .col(text(Gallery::ImageUrl).not_null())
                    .col(text(Gallery::ImageAltText).null())
                    .col(integer(Gallery::DisplayOrder).not_null().default(0))
                    .col(timestamp_with_time_zone(Gallery::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gallery_franchise")
                            .from(Gallery::Table, Gallery::FranchiseId)
                            .to(FranchiseListings::Table, FranchiseListings::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Gallery::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Gallery {
    Table,
    Id,
    FranchiseId,
    ImageUrl,
    ImageAltText,
    DisplayOrder,
    CreatedAt,
}

#[derive(DeriveIden)]
enum FranchiseListings { Table, Id }
