use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{AuthAdmin, Credentials};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AuthAdmin>, AuthError>;
    async fn find_admin_by_id(&self, id: Uuid) -> Result<Option<AuthAdmin>, AuthError>;
    async fn create_admin(&self, email: &str, name: &str, password_hash: String) -> Result<AuthAdmin, AuthError>;
    async fn get_credentials(&self, admin_id: Uuid) -> Result<Option<Credentials>, AuthError>;
    async fn count_admins(&self) -> Result<u64, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        admins: Mutex<HashMap<String, (AuthAdmin, String)>>, // key: lower-cased email
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_admin_by_email(&self, email: &str) -> Result<Option<AuthAdmin>, AuthError> {
            let admins = self.admins.lock().unwrap();
            Ok(admins.get(&email.trim().to_lowercase()).map(|(a, _)| a.clone()))
        }

        async fn find_admin_by_id(&self, id: Uuid) -> Result<Option<AuthAdmin>, AuthError> {
            let admins = self.admins.lock().unwrap();
            Ok(admins.values().find(|(a, _)| a.id == id).map(|(a, _)| a.clone()))
        }

        async fn create_admin(&self, email: &str, name: &str, password_hash: String) -> Result<AuthAdmin, AuthError> {
            let mut admins = self.admins.lock().unwrap();
            let key = email.trim().to_lowercase();
            if admins.contains_key(&key) {
                return Err(AuthError::Conflict);
            }
            let admin = AuthAdmin { id: Uuid::new_v4(), email: key.clone(), name: name.to_string() };
            admins.insert(key, (admin.clone(), password_hash));
            Ok(admin)
        }

        async fn get_credentials(&self, admin_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            let admins = self.admins.lock().unwrap();
            Ok(admins
                .values()
                .find(|(a, _)| a.id == admin_id)
                .map(|(a, h)| Credentials { admin_id: a.id, password_hash: h.clone() }))
        }

        async fn count_admins(&self) -> Result<u64, AuthError> {
            Ok(self.admins.lock().unwrap().len() as u64)
        }
    }
}
