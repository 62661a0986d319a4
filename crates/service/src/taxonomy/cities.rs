use uuid::Uuid;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::{info, instrument};

use models::{city, state, validation};
use crate::errors::ServiceError;
use super::{ChildPatch, NamedRef};

#[derive(Debug, Clone, Serialize)]
pub struct CityView {
    pub id: Uuid,
    pub name: String,
    pub state_id: Uuid,
    pub created_at: DateTime<FixedOffset>,
    pub state: Option<NamedRef>,
}

pub async fn list_cities(db: &DatabaseConnection) -> Result<Vec<CityView>, ServiceError> {
    let rows = city::Entity::find()
        .find_also_related(state::Entity)
        .order_by_asc(city::Column::Name)
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(c, s)| CityView {
            id: c.id,
            name: c.name,
            state_id: c.state_id,
            created_at: c.created_at,
            state: s.map(|s| NamedRef { id: s.id, name: s.name }),
        })
        .collect())
}

pub async fn list_cities_by_state(db: &DatabaseConnection, state_id: Uuid) -> Result<Vec<city::Model>, ServiceError> {
    Ok(city::Entity::find()
        .filter(city::Column::StateId.eq(state_id))
        .order_by_asc(city::Column::Name)
        .all(db)
        .await?)
}

pub async fn get_city(db: &DatabaseConnection, id: Uuid) -> Result<Option<city::Model>, ServiceError> {
    Ok(city::Entity::find_by_id(id).one(db).await?)
}

async fn ensure_state(db: &DatabaseConnection, state_id: Uuid) -> Result<(), ServiceError> {
    state::Entity::find_by_id(state_id)
        .one(db).await?
        .map(|_| ())
        .ok_or_else(|| ServiceError::not_found("state"))
}

#[instrument(skip(db))]
pub async fn create_city(db: &DatabaseConnection, name: &str, state_id: Uuid) -> Result<city::Model, ServiceError> {
    let name = validation::validate_name("city name", name)?;
    ensure_state(db, state_id).await?;
    let created = city::create(db, &name, state_id).await?;
    info!(id = %created.id, %state_id, "city_created");
    Ok(created)
}

#[instrument(skip(db))]
pub async fn update_city(db: &DatabaseConnection, id: Uuid, patch: ChildPatch) -> Result<city::Model, ServiceError> {
    let mut am: city::ActiveModel = city::Entity::find_by_id(id)
        .one(db).await?
        .ok_or_else(|| ServiceError::not_found("city"))?
        .into();
    if let Some(name) = patch.name.as_deref() {
        am.name = Set(validation::validate_name("city name", name)?);
    }
    if let Some(state_id) = patch.parent_id {
        ensure_state(db, state_id).await?;
        am.state_id = Set(state_id);
    }
    Ok(am.update(db).await?)
}

#[instrument(skip(db))]
pub async fn delete_city(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = city::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("city"));
    }
    info!(%id, "city_deleted");
    Ok(())
}
