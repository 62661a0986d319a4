use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

pub const STATUS_NEW: &str = "new";
pub const STATUSES: [&str; 4] = ["new", "read", "replied", "closed"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contact_queries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub status: String,
    pub admin_notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_status(status: &str) -> Result<(), ModelError> {
    if STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(ModelError::Validation(format!("invalid status '{status}' (expected one of {})", STATUSES.join(", "))))
    }
}

/// Insert an already-normalized submission with status `new`.
pub async fn create(
    db: &DatabaseConnection,
    name: String,
    email: String,
    phone: Option<String>,
    subject: String,
    message: String,
) -> Result<Model, ModelError> {
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(email),
        phone: Set(phone),
        subject: Set(subject),
        message: Set(message),
        status: Set(STATUS_NEW.into()),
        admin_notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::validate_status;

    #[test]
    fn known_statuses_only() {
        for s in ["new", "read", "replied", "closed"] {
            assert!(validate_status(s).is_ok());
        }
        assert!(validate_status("archived").is_err());
        assert!(validate_status("NEW").is_err());
    }
}
