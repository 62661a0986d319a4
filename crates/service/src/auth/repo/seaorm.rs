use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use uuid::Uuid;

use crate::auth::domain::{AuthAdmin, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use models::errors::ModelError;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

fn to_admin(m: models::admin::Model) -> AuthAdmin {
    AuthAdmin { id: m.id, email: m.email, name: m.name }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AuthAdmin>, AuthError> {
        let res = models::admin::find_by_email(&self.db, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(to_admin))
    }

    async fn find_admin_by_id(&self, id: Uuid) -> Result<Option<AuthAdmin>, AuthError> {
        let res = models::admin::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(to_admin))
    }

    async fn create_admin(&self, email: &str, name: &str, password_hash: String) -> Result<AuthAdmin, AuthError> {
        let created = models::admin::create(&self.db, email, name, password_hash)
            .await
            .map_err(|e| match e {
                ModelError::Validation(msg) => AuthError::Validation(msg),
                ModelError::Db(msg) if msg.contains("duplicate key") => AuthError::Conflict,
                ModelError::Db(msg) => AuthError::Repository(msg),
            })?;
        Ok(to_admin(created))
    }

    async fn get_credentials(&self, admin_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = models::admin::Entity::find_by_id(admin_id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|a| Credentials { admin_id: a.id, password_hash: a.password_hash }))
    }

    async fn count_admins(&self) -> Result<u64, AuthError> {
        models::admin::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))
    }
}
