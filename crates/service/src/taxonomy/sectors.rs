use uuid::Uuid;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use tracing::{info, instrument};

use models::{industry, sector, service_product, validation};
use crate::errors::ServiceError;
use super::{ChildPatch, NamedRef};

/// Sector row with its industry attached.
#[derive(Debug, Clone, Serialize)]
pub struct SectorView {
    pub id: Uuid,
    pub name: String,
    pub industry_id: Uuid,
    pub created_at: DateTime<FixedOffset>,
    pub industry: Option<NamedRef>,
}

impl SectorView {
    fn from_pair(s: sector::Model, i: Option<industry::Model>) -> Self {
        Self {
            id: s.id,
            name: s.name,
            industry_id: s.industry_id,
            created_at: s.created_at,
            industry: i.map(|i| NamedRef { id: i.id, name: i.name }),
        }
    }
}

pub async fn list_sectors(db: &DatabaseConnection) -> Result<Vec<SectorView>, ServiceError> {
    let rows = sector::Entity::find()
        .find_also_related(industry::Entity)
        .order_by_asc(sector::Column::Name)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|(s, i)| SectorView::from_pair(s, i)).collect())
}

pub async fn list_sectors_by_industry(db: &DatabaseConnection, industry_id: Uuid) -> Result<Vec<sector::Model>, ServiceError> {
    Ok(sector::Entity::find()
        .filter(sector::Column::IndustryId.eq(industry_id))
        .order_by_asc(sector::Column::Name)
        .all(db)
        .await?)
}

async fn ensure_industry(db: &DatabaseConnection, industry_id: Uuid) -> Result<(), ServiceError> {
    industry::Entity::find_by_id(industry_id)
        .one(db).await?
        .map(|_| ())
        .ok_or_else(|| ServiceError::not_found("industry"))
}

#[instrument(skip(db))]
pub async fn create_sector(db: &DatabaseConnection, name: &str, industry_id: Uuid) -> Result<sector::Model, ServiceError> {
    let name = validation::validate_name("sector name", name)?;
    ensure_industry(db, industry_id).await?;
    let created = sector::create(db, &name, industry_id).await?;
    info!(id = %created.id, %industry_id, "sector_created");
    Ok(created)
}

#[instrument(skip(db))]
pub async fn update_sector(db: &DatabaseConnection, id: Uuid, patch: ChildPatch) -> Result<sector::Model, ServiceError> {
    let mut am: sector::ActiveModel = sector::Entity::find_by_id(id)
        .one(db).await?
        .ok_or_else(|| ServiceError::not_found("sector"))?
        .into();
    if let Some(name) = patch.name.as_deref() {
        am.name = Set(validation::validate_name("sector name", name)?);
    }
    if let Some(industry_id) = patch.parent_id {
        ensure_industry(db, industry_id).await?;
        am.industry_id = Set(industry_id);
    }
    Ok(am.update(db).await?)
}

/// Refused while services/products still reference the sector.
#[instrument(skip(db))]
pub async fn delete_sector(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let children = service_product::Entity::find()
        .filter(service_product::Column::SectorId.eq(id))
        .count(db)
        .await?;
    if children > 0 {
        return Err(ServiceError::Conflict(
            "Cannot delete sector with existing services/products. Delete them first.".into(),
        ));
    }
    let res = sector::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("sector"));
    }
    info!(%id, "sector_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn list_attaches_parent_industry() -> Result<(), anyhow::Error> {
        let ind = industry::Model { id: Uuid::new_v4(), name: "Food".into(), created_at: Utc::now().into() };
        let sec = sector::Model { id: Uuid::new_v4(), name: "Cafe".into(), industry_id: ind.id, created_at: Utc::now().into() };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![(sec.clone(), Some(ind.clone()))]])
            .into_connection();

        let views = list_sectors(&db).await?;
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].industry, Some(NamedRef { id: ind.id, name: "Food".into() }));
        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_unknown_industry() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<industry::Model>::new()])
            .into_connection();
        let err = create_sector(&db, "Cafe", Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_rejects_blank_name_before_querying() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = create_sector(&db, "   ", Uuid::new_v4()).await.unwrap_err();
        assert!(err.is_client_error());
    }
}
