use uuid::Uuid;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use tracing::{info, instrument};

use models::{city, state, validation};
use crate::errors::ServiceError;

pub async fn list_states(db: &DatabaseConnection) -> Result<Vec<state::Model>, ServiceError> {
    Ok(state::Entity::find().order_by_asc(state::Column::Name).all(db).await?)
}

pub async fn get_state(db: &DatabaseConnection, id: Uuid) -> Result<Option<state::Model>, ServiceError> {
    Ok(state::Entity::find_by_id(id).one(db).await?)
}

#[instrument(skip(db))]
pub async fn create_state(db: &DatabaseConnection, name: &str) -> Result<state::Model, ServiceError> {
    let created = state::create(db, name).await?;
    info!(id = %created.id, "state_created");
    Ok(created)
}

#[instrument(skip(db))]
pub async fn update_state(db: &DatabaseConnection, id: Uuid, name: &str) -> Result<state::Model, ServiceError> {
    let name = validation::validate_name("state name", name)?;
    let mut am: state::ActiveModel = state::Entity::find_by_id(id)
        .one(db).await?
        .ok_or_else(|| ServiceError::not_found("state"))?
        .into();
    am.name = Set(name);
    Ok(am.update(db).await?)
}

/// Refused while cities still reference the state.
#[instrument(skip(db))]
pub async fn delete_state(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let children = city::Entity::find()
        .filter(city::Column::StateId.eq(id))
        .count(db)
        .await?;
    if children > 0 {
        return Err(ServiceError::Conflict(
            "Cannot delete state with existing cities. Delete cities first.".into(),
        ));
    }
    let res = state::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("state"));
    }
    info!(%id, "state_deleted");
    Ok(())
}
