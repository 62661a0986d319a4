use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, franchise_listing};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gallery")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub franchise_id: Uuid,
    pub image_url: String,
    pub image_alt_text: Option<String>,
    pub display_order: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Franchise }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Franchise => Entity::belongs_to(franchise_listing::Entity)
                .from(Column::FranchiseId)
                .to(franchise_listing::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<franchise_listing::Entity> for Entity {
    fn to() -> RelationDef { Relation::Franchise.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    franchise_id: Uuid,
    image_url: &str,
    alt_text: Option<String>,
    display_order: i32,
) -> Result<Model, errors::ModelError> {
    if image_url.trim().is_empty() {
        return Err(errors::ModelError::Validation("image_url required".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        franchise_id: Set(franchise_id),
        image_url: Set(image_url.to_string()),
        image_alt_text: Set(alt_text),
        display_order: Set(display_order),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
