//! Bearer-token sessions backed by JWT.
//!
//! Tokens carry the user id in the `sub` claim and expire after the
//! configured number of seconds.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session management error
#[derive(Debug, Error)]
pub enum SessionError {
    /// JWT encoding failed
    #[error("Failed to encode JWT: {0}")]
    JwtEncode(#[from] jsonwebtoken::errors::Error),

    /// Token expired
    #[error("Session token expired")]
    TokenExpired,

    /// Invalid token
    #[error("Invalid session token")]
    InvalidToken,

    /// No bearer token in the request
    #[error("Missing bearer token")]
    MissingToken,
}

/// JWT claims for session tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User identifier
    pub sub: String,

    /// Token expiration timestamp (Unix epoch)
    pub exp: u64,

    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
}

/// Session manager handles JWT token generation and validation
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_secs: u64,
}

impl SessionManager {
    /// Create a new session manager with the given JWT secret and expiry
    pub fn new(jwt_secret: &str, token_expiry_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            token_expiry_secs,
        }
    }

    /// Lifetime of issued tokens in seconds
    pub fn token_expiry_secs(&self) -> u64 {
        self.token_expiry_secs
    }

    /// Generate a new session token for the given user
    pub fn generate_token(&self, user_id: &str) -> Result<String, SessionError> {
        let now = unix_now();

        let claims = SessionClaims {
            sub: user_id.to_string(),
            exp: now + self.token_expiry_secs,
            iat: now,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a session token and extract claims
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let validation = Validation::default();
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::TokenExpired,
                _ => SessionError::InvalidToken,
            })?;

        if token_data.claims.sub.is_empty() {
            return Err(SessionError::InvalidToken);
        }

        Ok(token_data.claims)
    }
}

fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}
