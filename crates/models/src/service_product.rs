use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, sector, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services_products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub sector_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Sector }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Sector => Entity::belongs_to(sector::Entity).from(Column::SectorId).to(sector::Column::Id).into() }
    }
}

impl Related<sector::Entity> for Entity {
    fn to() -> RelationDef { Relation::Sector.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(db: &DatabaseConnection, name: &str, sector_id: Uuid) -> Result<Model, errors::ModelError> {
    let name = validation::validate_name("service name", name)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        sector_id: Set(sector_id),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
