use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TeamActionImages::Table)
                    .if_not_exists()
                    .col(uuid(TeamActionImages::Id).primary_key())
                    .col(text(TeamActionImages::ImageUrl).null())
                    .col(text(TeamActionImages::ImageData).null())
                    .col(string_len(TeamActionImages::Heading, 255).null())
                    .col(text(TeamActionImages::Description).null())
                    .col(integer(TeamActionImages::SortOrder).null())
                    .col(timestamp_with_time_zone(TeamActionImages::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(TeamActionImages::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum TeamActionImages {
    Table,
    Id,
    ImageUrl,
    ImageData,
    Heading,
    Description,
    SortOrder,
    CreatedAt,
}
