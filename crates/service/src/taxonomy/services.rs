use uuid::Uuid;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use std::collections::HashMap;
use tracing::{info, instrument};

use models::{industry, sector, service_product, validation};
use crate::errors::ServiceError;
use super::{ChildPatch, NamedRef};

/// Service/product row with its sector and the sector's industry.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceView {
    pub id: Uuid,
    pub name: String,
    pub sector_id: Uuid,
    pub created_at: DateTime<FixedOffset>,
    pub sector: Option<NamedRef>,
    pub industry: Option<NamedRef>,
}

pub async fn list_services(db: &DatabaseConnection) -> Result<Vec<ServiceView>, ServiceError> {
    let rows = service_product::Entity::find()
        .find_also_related(sector::Entity)
        .order_by_asc(service_product::Column::Name)
        .all(db)
        .await?;

    // 一次查询取回所有涉及的 industry，避免逐行查询
    let industry_ids: Vec<Uuid> = rows.iter().filter_map(|(_, s)| s.as_ref().map(|s| s.industry_id)).collect();
    let industries: HashMap<Uuid, String> = if industry_ids.is_empty() {
        HashMap::new()
    } else {
        industry::Entity::find()
            .filter(industry::Column::Id.is_in(industry_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|i| (i.id, i.name))
            .collect()
    };

    Ok(rows
        .into_iter()
        .map(|(p, s)| {
            let industry = s.as_ref().and_then(|s| {
                industries.get(&s.industry_id).map(|name| NamedRef { id: s.industry_id, name: name.clone() })
            });
            ServiceView {
                id: p.id,
                name: p.name,
                sector_id: p.sector_id,
                created_at: p.created_at,
                sector: s.map(|s| NamedRef { id: s.id, name: s.name }),
                industry,
            }
        })
        .collect())
}

pub async fn list_services_by_sector(db: &DatabaseConnection, sector_id: Uuid) -> Result<Vec<service_product::Model>, ServiceError> {
    Ok(service_product::Entity::find()
        .filter(service_product::Column::SectorId.eq(sector_id))
        .order_by_asc(service_product::Column::Name)
        .all(db)
        .await?)
}

pub async fn get_service(db: &DatabaseConnection, id: Uuid) -> Result<Option<service_product::Model>, ServiceError> {
    Ok(service_product::Entity::find_by_id(id).one(db).await?)
}

async fn ensure_sector(db: &DatabaseConnection, sector_id: Uuid) -> Result<(), ServiceError> {
    sector::Entity::find_by_id(sector_id)
        .one(db).await?
        .map(|_| ())
        .ok_or_else(|| ServiceError::not_found("sector"))
}

#[instrument(skip(db))]
pub async fn create_service(db: &DatabaseConnection, name: &str, sector_id: Uuid) -> Result<service_product::Model, ServiceError> {
    let name = validation::validate_name("service name", name)?;
    ensure_sector(db, sector_id).await?;
    let created = service_product::create(db, &name, sector_id).await?;
    info!(id = %created.id, %sector_id, "service_created");
    Ok(created)
}

#[instrument(skip(db))]
pub async fn update_service(db: &DatabaseConnection, id: Uuid, patch: ChildPatch) -> Result<service_product::Model, ServiceError> {
    let mut am: service_product::ActiveModel = service_product::Entity::find_by_id(id)
        .one(db).await?
        .ok_or_else(|| ServiceError::not_found("service"))?
        .into();
    if let Some(name) = patch.name.as_deref() {
        am.name = Set(validation::validate_name("service name", name)?);
    }
    if let Some(sector_id) = patch.parent_id {
        ensure_sector(db, sector_id).await?;
        am.sector_id = Set(sector_id);
    }
    Ok(am.update(db).await?)
}

#[instrument(skip(db))]
pub async fn delete_service(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = service_product::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("service"));
    }
    info!(%id, "service_deleted");
    Ok(())
}
