use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;

use models::{franchise_listing, industry};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_franchises: u64,
    pub active_franchises: u64,
    pub inactive_franchises: u64,
    pub total_industries: u64,
    pub total_gallery_images: u64,
}

/// Admin overview counts, queried concurrently.
pub async fn stats(db: &DatabaseConnection) -> Result<DashboardStats, ServiceError> {
    let total = franchise_listing::Entity::find().count(db);
    let active = franchise_listing::Entity::find()
        .filter(franchise_listing::Column::IsActive.eq(true))
        .count(db);
    let industries = industry::Entity::find().count(db);
    let gallery = async { Ok::<u64, sea_orm::DbErr>(crate::gallery_service::gallery_count(db).await) };

    let (total_franchises, active_franchises, total_industries, total_gallery_images) =
        tokio::try_join!(total, active, industries, gallery)?;

    Ok(DashboardStats {
        total_franchises,
        active_franchises,
        inactive_franchises: total_franchises.saturating_sub(active_franchises),
        total_industries,
        total_gallery_images,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn inactive_is_total_minus_active() -> Result<(), anyhow::Error> {
        let count = |n: i64| vec![BTreeMap::from([("num_items", Value::BigInt(Some(n)))])];
        // every count returns 3, whichever order the joined queries run in
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count(3), count(3), count(3), count(3)])
            .into_connection();
        let s = stats(&db).await?;
        assert_eq!(s.total_franchises, 3);
        assert_eq!(s.active_franchises, 3);
        assert_eq!(s.inactive_franchises, 0);
        assert_eq!(s.total_gallery_images, 3);
        Ok(())
    }
}
