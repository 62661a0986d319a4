//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20220101_000011_create_admin;
mod m20220101_000012_create_industry;
mod m20220101_000013_create_sector;
mod m20220101_000014_create_service_product;
mod m20220101_000015_create_state;
mod m20220101_000016_create_city;
mod m20220101_000017_create_franchise_listing;
mod m20220101_000018_create_gallery;
mod m20220101_000019_create_contact_query;
mod m20220101_000020_create_team_action_image;
mod m20220101_000002_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20220101_000011_create_admin::Migration),
            Box::new(m20220101_000012_create_industry::Migration),
            Box::new(m20220101_000013_create_sector::Migration),
            Box::new(m20220101_000014_create_service_product::Migration),
            Box::new(m20220101_000015_create_state::Migration),
            Box::new(m20220101_000016_create_city::Migration),
            Box::new(m20220101_000017_create_franchise_listing::Migration),
            Box::new(m20220101_000018_create_gallery::Migration),
            Box::new(m20220101_000019_create_contact_query::Migration),
            Box::new(m20220101_000020_create_team_action_image::Migration),
            // Indexes should always be applied last
            Box::new(m20220101_000002_add_indexes::Migration),
        ]
    }
}
