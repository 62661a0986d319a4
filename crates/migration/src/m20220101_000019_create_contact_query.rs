use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContactQueries::Table)
                    .if_not_exists()
                    .col(uuid(ContactQueries::Id).primary_key())
                    .col(string_len(ContactQueries::Name, 128).not_null())
                    .col(string_len(ContactQueries::Email, 255).not_null())
                    .col(string_len(ContactQueries::Phone, 32).null())
                    .col(string_len(ContactQueries::Subject, 255).not_null())
                    .col(text(ContactQueries::Message).not_null())
                    .col(string_len(ContactQueries::Status, 16).not_null().default("new"))
                    .col(text(ContactQueries::AdminNotes).null())
                    .col(timestamp_with_time_zone(ContactQueries::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ContactQueries::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ContactQueries::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ContactQueries {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Subject,
    Message,
    Status,
    AdminNotes,
    CreatedAt,
    UpdatedAt,
}
