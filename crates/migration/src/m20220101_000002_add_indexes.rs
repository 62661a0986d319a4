use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEXES: &[&str] = &[
    "idx_sector_industry",
    "idx_service_product_sector",
    "idx_city_state",
    "idx_franchise_listing_industry",
    "idx_franchise_listing_active_created",
    "idx_gallery_franchise_order",
    "idx_contact_query_status",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Taxonomy children: FK lookups used by the "refuse delete" checks
        manager
            .create_index(
                Index::create()
                    .name("idx_sector_industry")
                    .table(Sectors::Table)
                    .col(Sectors::IndustryId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_service_product_sector")
                    .table(ServicesProducts::Table)
                    .col(ServicesProducts::SectorId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_city_state")
                    .table(Cities::Table)
                    .col(Cities::StateId)
                    .to_owned(),
            )
            .await?;

        // Listings: industry facet and the public "active, newest first" scan
        manager
            .create_index(
                Index::create()
                    .name("idx_franchise_listing_industry")
                    .table(FranchiseListings::Table)
                    .col(FranchiseListings::IndustryId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_franchise_listing_active_created")
                    .table(FranchiseListings::Table)
                    .col(FranchiseListings::IsActive)
                    .col(FranchiseListings::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Gallery: per-listing ordered reads
        manager
            .create_index(
                Index::create()
                    .name("idx_gallery_franchise_order")
                    .table(Gallery::Table)
                    .col(Gallery::FranchiseId)
                    .col(Gallery::DisplayOrder)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contact_query_status")
                    .table(ContactQueries::Table)
                    .col(ContactQueries::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in INDEXES {
            manager.drop_index(Index::drop().name(*name).to_owned()).await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Sectors { Table, IndustryId }

#[derive(DeriveIden)]
enum ServicesProducts { Table, SectorId }

#[derive(DeriveIden)]
enum Cities { Table, StateId }

#[derive(DeriveIden)]
enum FranchiseListings { Table, IndustryId, IsActive, CreatedAt }

#[derive(DeriveIden)]
enum Gallery { Table, FranchiseId, DisplayOrder }

#[derive(DeriveIden)]
enum ContactQueries { Table, Status }
