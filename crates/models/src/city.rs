use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, state, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub state_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { State }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::State => Entity::belongs_to(state::Entity).from(Column::StateId).to(state::Column::Id).into() }
    }
}

impl Related<state::Entity> for Entity {
    fn to() -> RelationDef { Relation::State.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(db: &DatabaseConnection, name: &str, state_id: Uuid) -> Result<Model, errors::ModelError> {
    let name = validation::validate_name("city name", name)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        state_id: Set(state_id),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
