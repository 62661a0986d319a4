use thiserror::Error;

/// Failures of the admin login and account flows.
///
/// Unknown email and wrong password both map to `Unauthorized` so callers
/// cannot tell which admin accounts exist.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("an admin with this email already exists")]
    Conflict,
    #[error("invalid email or password")]
    Unauthorized,
    #[error("password hashing failed: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("admin store error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Numeric code used in logs; client errors are 4xxx, server side 5xxx.
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 4000,
            AuthError::Unauthorized => 4010,
            AuthError::Conflict => 4090,
            AuthError::HashError(_) => 5001,
            AuthError::TokenError(_) => 5002,
            AuthError::Repository(_) => 5003,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.code() < 5000
    }
}

#[cfg(test)]
mod tests {
    use super::AuthError;

    #[test]
    fn client_and_server_codes_split() {
        assert!(AuthError::Unauthorized.is_client_error());
        assert!(AuthError::Validation("x".into()).is_client_error());
        assert!(!AuthError::Repository("down".into()).is_client_error());
        assert!(!AuthError::TokenError("bad key".into()).is_client_error());
    }
}
