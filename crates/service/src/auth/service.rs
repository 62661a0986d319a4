use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::domain::{AuthAdmin, AuthSession, AuthStatus, Claims, CreateAdminInput, LoginInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: "dev-secret-change-me".into(), token_ttl_hours: 12 }
    }
}

/// Verify an HS256 token and return its claims; expired tokens are rejected.
pub fn decode_token(secret: &str, token: &str) -> Result<Claims, AuthError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Create an admin account with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::CreateAdminInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::default());
    /// let input = CreateAdminInput { email: "Owner@Example.com".into(), name: "Owner".into(), password: "Secret123".into() };
    /// let admin = tokio_test::block_on(svc.create_admin(input)).unwrap();
    /// assert_eq!(admin.email, "owner@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_admin(&self, input: CreateAdminInput) -> Result<AuthAdmin, AuthError> {
        let email = input.email.trim().to_lowercase();
        if !models::validation::is_valid_email(&email) {
            return Err(AuthError::Validation("invalid email".into()));
        }
        if input.name.trim().is_empty() {
            return Err(AuthError::Validation("name required".into()));
        }
        if input.password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        if let Some(existing) = self.repo.find_admin_by_email(&email).await? {
            debug!("admin exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let admin = self.repo.create_admin(&email, input.name.trim(), hash).await?;
        info!(admin_id = %admin.id, email = %admin.email, "admin_created");
        Ok(admin)
    }

    /// Authenticate an admin and issue a token.
    ///
    /// Unknown email and wrong password produce the same error.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{CreateAdminInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 12 });
    /// let _ = tokio_test::block_on(svc.create_admin(CreateAdminInput { email: "u@e.com".into(), name: "N".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.admin.email, "u@e.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let admin = self.repo
            .find_admin_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(admin.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            warn!(admin_id = %admin.id, "login_rejected");
            return Err(AuthError::Unauthorized);
        }

        let now = chrono::Utc::now();
        let exp = (now + chrono::Duration::hours(self.cfg.token_ttl_hours)).timestamp();
        let claims = Claims {
            sub: admin.email.clone(),
            aid: admin.id.to_string(),
            iat: now.timestamp() as usize,
            exp: exp as usize,
        };
        let token = encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))?;

        info!(admin_id = %admin.id, "admin_logged_in");
        Ok(AuthSession { admin, token, expires_at: exp })
    }

    /// Admin behind a token; `None` when the token is invalid or the admin was removed.
    pub async fn current_admin(&self, token: &str) -> Result<Option<AuthAdmin>, AuthError> {
        let claims = match decode_token(&self.cfg.jwt_secret, token) {
            Ok(c) => c,
            Err(e) => {
                debug!(err = %e, "token rejected");
                return Ok(None);
            }
        };
        let Ok(id) = Uuid::parse_str(&claims.aid) else { return Ok(None) };
        self.repo.find_admin_by_id(id).await
    }

    pub async fn check_status(&self, token: Option<&str>) -> Result<AuthStatus, AuthError> {
        let admin = match token {
            Some(t) if !t.is_empty() => self.current_admin(t).await?,
            _ => None,
        };
        Ok(AuthStatus { is_authenticated: admin.is_some(), admin })
    }

    /// Create the first admin when none exist yet; no-op otherwise.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn bootstrap_admin(&self, input: CreateAdminInput) -> Result<Option<AuthAdmin>, AuthError> {
        if self.repo.count_admins().await? > 0 {
            debug!("admins present; bootstrap skipped");
            return Ok(None);
        }
        let admin = self.create_admin(input).await?;
        info!(admin_id = %admin.id, "bootstrap_admin_created");
        Ok(Some(admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc() -> AuthService<MockAuthRepository> {
        AuthService::new(Arc::new(MockAuthRepository::default()), AuthConfig { jwt_secret: "test-secret".into(), token_ttl_hours: 1 })
    }

    fn admin_input(email: &str) -> CreateAdminInput {
        CreateAdminInput { email: email.into(), name: "Ops".into(), password: "Passw0rd!".into() }
    }

    #[tokio::test]
    async fn login_issues_verifiable_token() {
        let svc = svc();
        let created = svc.create_admin(admin_input("ops@example.com")).await.unwrap();
        let session = svc.login(LoginInput { email: "OPS@example.com".into(), password: "Passw0rd!".into() }).await.unwrap();
        let claims = decode_token("test-secret", &session.token).unwrap();
        assert_eq!(claims.sub, "ops@example.com");
        assert_eq!(claims.aid, created.id.to_string());
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let svc = svc();
        svc.create_admin(admin_input("ops@example.com")).await.unwrap();
        let bad_pw = svc.login(LoginInput { email: "ops@example.com".into(), password: "nope-nope".into() }).await.unwrap_err();
        let unknown = svc.login(LoginInput { email: "who@example.com".into(), password: "Passw0rd!".into() }).await.unwrap_err();
        assert_eq!(bad_pw.code(), unknown.code());
        assert!(matches!(bad_pw, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn create_admin_validates_and_rejects_duplicates() {
        let svc = svc();
        assert!(matches!(svc.create_admin(admin_input("not-an-email")).await, Err(AuthError::Validation(_))));
        let short = CreateAdminInput { password: "short".into(), ..admin_input("a@b.co") };
        assert!(matches!(svc.create_admin(short).await, Err(AuthError::Validation(_))));
        svc.create_admin(admin_input("a@b.co")).await.unwrap();
        assert!(matches!(svc.create_admin(admin_input("A@B.co")).await, Err(AuthError::Conflict)));
    }

    #[tokio::test]
    async fn status_reflects_token_validity() {
        let svc = svc();
        svc.create_admin(admin_input("ops@example.com")).await.unwrap();
        let session = svc.login(LoginInput { email: "ops@example.com".into(), password: "Passw0rd!".into() }).await.unwrap();

        let ok = svc.check_status(Some(&session.token)).await.unwrap();
        assert!(ok.is_authenticated);
        assert_eq!(ok.admin.map(|a| a.email), Some("ops@example.com".to_string()));

        let bad = svc.check_status(Some("garbage")).await.unwrap();
        assert!(!bad.is_authenticated);
        assert!(svc.check_status(None).await.unwrap().admin.is_none());
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_rejected() {
        let svc = svc();
        svc.create_admin(admin_input("ops@example.com")).await.unwrap();
        let session = svc.login(LoginInput { email: "ops@example.com".into(), password: "Passw0rd!".into() }).await.unwrap();
        assert!(decode_token("other-secret", &session.token).is_err());
    }

    #[tokio::test]
    async fn bootstrap_only_when_empty() {
        let svc = svc();
        assert!(svc.bootstrap_admin(admin_input("first@example.com")).await.unwrap().is_some());
        assert!(svc.bootstrap_admin(admin_input("second@example.com")).await.unwrap().is_none());
    }
}
