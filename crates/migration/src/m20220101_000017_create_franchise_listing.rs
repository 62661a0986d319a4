//! Create `franchise_listings`, the catalog table.
//! `preferred_locations` is a text array of place names; `expansion_states` holds state ids.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FranchiseListings::Table)
                    .if_not_exists()
                    .col(uuid(FranchiseListings::Id).primary_key())
                    .col(string_len(FranchiseListings::BrandName, 255).not_null())
                    .col(text(FranchiseListings::Tagline).null())
                    .col(text(FranchiseListings::Description).null())
                    .col(text(FranchiseListings::AboutBrand).null())
                    .col(text(FranchiseListings::LogoUrl).null())
                    .col(uuid(FranchiseListings::IndustryId).null())
                    .col(double(FranchiseListings::MinInvestment).null())
                    .col(double(FranchiseListings::MaxInvestment).null())
                    .col(double(FranchiseListings::FranchiseFee).null())
                    .col(double(FranchiseListings::RoyaltyPercentage).null())
                    .col(double(FranchiseListings::MinArea).null())
                    .col(double(FranchiseListings::MaxArea).null())
                    .col(string_len(FranchiseListings::AreaUnit, 16).not_null().default("sqft"))
                    .col(integer(FranchiseListings::EstablishmentYear).null())
                    .col(integer(FranchiseListings::FranchiseCommencedYear).null())
                    .col(integer(FranchiseListings::FranchiseOutlets).null())
                    .col(double(FranchiseListings::AnticipatedRoi).null())
                    .col(integer(FranchiseListings::PaybackPeriod).null())
                    .col(
                        ColumnDef::new(FranchiseListings::PreferredLocations)
                            .array(ColumnType::Text)
                            .not_null()
                            .default(Expr::cust("'{}'")),
                    )
                    .col(
                        ColumnDef::new(FranchiseListings::ExpansionStates)
                            .array(ColumnType::Uuid)
                            .not_null()
                            .default(Expr::cust("'{}'")),
                    )
                    .col(boolean(FranchiseListings::ExclusiveTerritory).not_null().default(false))
                    .col(integer(FranchiseListings::FranchiseTermYears).null())
                    .col(boolean(FranchiseListings::TermRenewable).not_null().default(false))
                    .col(boolean(FranchiseListings::TrainingProvided).not_null().default(false))
                    .col(text(FranchiseListings::TrainingLocation).null())
                    .col(boolean(FranchiseListings::FieldAssistance).not_null().default(false))
                    .col(boolean(FranchiseListings::ExpertGuidance).not_null().default(false))
                    .col(boolean(FranchiseListings::OperatingManuals).not_null().default(false))
                    .col(string_len(FranchiseListings::ContactPhone, 32).null())
                    .col(string_len(FranchiseListings::ContactEmail, 255).null())
                    .col(text(FranchiseListings::ContactAddress).null())
                    .col(string_len(FranchiseListings::Status, 16).not_null().default("active"))
                    .col(boolean(FranchiseListings::IsActive).not_null().default(true))
                    .col(timestamp_with_time_zone(FranchiseListings::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(FranchiseListings::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_franchise_listing_industry")
                            .from(FranchiseListings::Table, FranchiseListings::IndustryId)
                            .to(Industries::Table, Industries::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(FranchiseListings::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum FranchiseListings {
    Table,
    Id,
    BrandName,
    Tagline,
    Description,
    AboutBrand,
    LogoUrl,
    IndustryId,
    MinInvestment,
    MaxInvestment,
    FranchiseFee,
    RoyaltyPercentage,
    MinArea,
    MaxArea,
    AreaUnit,
    EstablishmentYear,
    FranchiseCommencedYear,
    FranchiseOutlets,
    AnticipatedRoi,
    PaybackPeriod,
    PreferredLocations,
    ExpansionStates,
    ExclusiveTerritory,
    FranchiseTermYears,
    TermRenewable,
    TrainingProvided,
    TrainingLocation,
    FieldAssistance,
    ExpertGuidance,
    OperatingManuals,
    ContactPhone,
    ContactEmail,
    ContactAddress,
    Status,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Industries { Table, Id }
