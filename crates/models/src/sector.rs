use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, industry, service_product, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sectors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub industry_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Industry, ServiceProduct }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Industry => Entity::belongs_to(industry::Entity).from(Column::IndustryId).to(industry::Column::Id).into(),
            Relation::ServiceProduct => Entity::has_many(service_product::Entity).into(),
        }
    }
}

impl Related<industry::Entity> for Entity {
    fn to() -> RelationDef { Relation::Industry.def() }
}

impl Related<service_product::Entity> for Entity {
    fn to() -> RelationDef { Relation::ServiceProduct.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(db: &DatabaseConnection, name: &str, industry_id: Uuid) -> Result<Model, errors::ModelError> {
    let name = validation::validate_name("sector name", name)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        industry_id: Set(industry_id),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
