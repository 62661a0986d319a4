//! Create `admins` table holding back-office accounts and their password hashes.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(uuid(Admins::Id).primary_key())
                    .col(string_len(Admins::Email, 255).unique_key().not_null())
                    .col(string_len(Admins::Name, 128).not_null())
                    .col(string_len(Admins::PasswordHash, 255).not_null())
                    .col(timestamp_with_time_zone(Admins::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Admins::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Admins {
    Table,
    Id,
    Email,
    Name,
    PasswordHash,
    CreatedAt,
}
