use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Admin account creation input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdminInput {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Admin identity (business view, never carries the hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthAdmin {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

/// Stored password hash for an admin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub admin_id: Uuid,
    pub password_hash: String,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub admin: AuthAdmin,
    pub token: String,
    pub expires_at: i64,
}

/// JWT payload: `sub` is the admin email, `aid` the admin id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub aid: String,
    pub iat: usize,
    pub exp: usize,
}

/// Answer for "is anyone signed in?"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthStatus {
    pub is_authenticated: bool,
    pub admin: Option<AuthAdmin>,
}
