//! Identity verification port.
//!
//! Authentication itself happens elsewhere; the core only needs to turn a
//! presented token into the identity it describes.

use uuid::Uuid;

use crate::domain::AuthenticatedUser;

/// Claims carried by identity tokens.
#[derive(Debug, Clone)]
pub struct IdentityClaims {
    pub author_id: Uuid,
    pub display_name: String,
    pub contact: Option<String>,
    pub exp: i64,
}

impl From<IdentityClaims> for AuthenticatedUser {
    fn from(claims: IdentityClaims) -> Self {
        AuthenticatedUser::new(claims.author_id, claims.display_name, claims.contact)
    }
}

/// Token verification service.
pub trait TokenService: Send + Sync {
    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<IdentityClaims, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,
}
