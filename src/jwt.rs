//! Access token generation and validation.
//!
//! Access tokens are HS256-signed JWTs carrying only the user id. They are
//! never stored: validity is the signature plus the clock, so they cannot be
//! revoked before they expire.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// Value of the `iss` claim on every token this service mints.
pub const ISSUER: &str = "chirpy";

/// Access token lifetime: 1 hour
pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Issuer
    pub iss: String,
    /// Subject (user UUID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Not a structurally valid token for this service.
    #[error("malformed token")]
    Malformed,
    /// The signature does not verify under the configured secret.
    #[error("invalid token signature")]
    SignatureInvalid,
    /// The token's `exp` has been reached.
    #[error("token expired")]
    Expired,
    /// The `sub` claim is empty or not a UUID.
    #[error("invalid token subject")]
    InvalidSubject,
    /// Signing failed.
    #[error("failed to encode token: {0}")]
    Encoding(jsonwebtoken::errors::Error),
    /// System clock is before the Unix epoch.
    #[error("system time error")]
    TimeError,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSubject => TokenError::InvalidSubject,
            _ => TokenError::Malformed,
        }
    }
}

/// Signing and verification keys derived from the process-wide secret.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Mint an access token for `subject`, valid for `ttl`.
    pub fn mint(&self, subject: Uuid, ttl: Duration) -> Result<String, TokenError> {
        let now = unix_now()?;

        let claims = AccessClaims {
            iss: ISSUER.to_string(),
            sub: subject.to_string(),
            iat: now,
            exp: now + ttl.as_secs(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Encoding)
    }

    /// Validate an access token and return the user id it was minted for.
    ///
    /// The signature is verified before any claim is looked at. Expiry is
    /// strict: a token is expired from the second `exp` is reached, with no
    /// allowance for clock skew.
    pub fn validate(&self, token: &str) -> Result<Uuid, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let token_data =
            jsonwebtoken::decode::<AccessClaims>(token, &self.decoding_key, &validation)?;
        let claims = token_data.claims;

        // jsonwebtoken treats exp == now as still valid
        if claims.exp <= unix_now()? {
            return Err(TokenError::Expired);
        }

        if claims.sub.is_empty() {
            return Err(TokenError::InvalidSubject);
        }
        Uuid::parse_str(&claims.sub).map_err(|_| TokenError::InvalidSubject)
    }
}

/// Mint an access token with a one-off key.
pub fn make_jwt(subject: Uuid, secret: &[u8], ttl: Duration) -> Result<String, TokenError> {
    JwtConfig::new(secret).mint(subject, ttl)
}

/// Validate an access token with a one-off key.
pub fn validate_jwt(token: &str, secret: &[u8]) -> Result<Uuid, TokenError> {
    JwtConfig::new(secret).validate(token)
}

fn unix_now() -> Result<u64, TokenError> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| TokenError::TimeError)?
        .as_secs())
}
