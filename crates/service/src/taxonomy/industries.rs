use uuid::Uuid;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use tracing::{info, instrument};

use models::{industry, sector, validation};
use crate::errors::ServiceError;

pub async fn list_industries(db: &DatabaseConnection) -> Result<Vec<industry::Model>, ServiceError> {
    Ok(industry::Entity::find().order_by_asc(industry::Column::Name).all(db).await?)
}

pub async fn get_industry(db: &DatabaseConnection, id: Uuid) -> Result<Option<industry::Model>, ServiceError> {
    Ok(industry::Entity::find_by_id(id).one(db).await?)
}

#[instrument(skip(db))]
pub async fn create_industry(db: &DatabaseConnection, name: &str) -> Result<industry::Model, ServiceError> {
    let created = industry::create(db, name).await?;
    info!(id = %created.id, "industry_created");
    Ok(created)
}

#[instrument(skip(db))]
pub async fn update_industry(db: &DatabaseConnection, id: Uuid, name: &str) -> Result<industry::Model, ServiceError> {
    let name = validation::validate_name("industry name", name)?;
    let mut am: industry::ActiveModel = industry::Entity::find_by_id(id)
        .one(db).await?
        .ok_or_else(|| ServiceError::not_found("industry"))?
        .into();
    am.name = Set(name);
    Ok(am.update(db).await?)
}

/// Refused while sectors still reference the industry.
#[instrument(skip(db))]
pub async fn delete_industry(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let children = sector::Entity::find()
        .filter(sector::Column::IndustryId.eq(id))
        .count(db)
        .await?;
    if children > 0 {
        return Err(ServiceError::Conflict(
            "Cannot delete industry with existing sectors. Delete sectors first.".into(),
        ));
    }
    let res = industry::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("industry"));
    }
    info!(%id, "industry_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn industry_crud_and_guarded_delete() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let Ok(db) = get_db().await else { return Ok(()) };

        let name = format!("svc_industry_{}", Uuid::new_v4());
        let ind = create_industry(&db, &name).await?;
        assert_eq!(ind.name, name);

        let new_name = format!("renamed_{}", Uuid::new_v4());
        let renamed = update_industry(&db, ind.id, &format!("  {new_name}  ")).await?;
        assert_eq!(renamed.name, new_name);

        let sec = crate::taxonomy::sectors::create_sector(&db, "Child", ind.id).await?;
        let err = delete_industry(&db, ind.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        crate::taxonomy::sectors::delete_sector(&db, sec.id).await?;
        delete_industry(&db, ind.id).await?;
        assert!(get_industry(&db, ind.id).await?.is_none());
        assert!(matches!(delete_industry(&db, ind.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
