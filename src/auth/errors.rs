//! Authentication error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::header::HeaderError;
use super::refresh::RefreshTokenError;
use crate::jwt::TokenError;

/// Internal auth error kind used by the core authentication logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuthErrorKind {
    NotAuthenticated,
    MalformedCredential,
    InvalidToken,
    TokenExpired,
    TokenRevoked,
    InvalidApiKey,
    Internal,
}

/// Authentication errors (returns a JSON body).
#[derive(Debug)]
pub struct ApiAuthError {
    pub(super) kind: AuthErrorKind,
}

impl ApiAuthError {
    pub(super) fn new(kind: AuthErrorKind) -> Self {
        Self { kind }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            AuthErrorKind::MalformedCredential => StatusCode::BAD_REQUEST,
            AuthErrorKind::NotAuthenticated
            | AuthErrorKind::InvalidToken
            | AuthErrorKind::TokenExpired
            | AuthErrorKind::TokenRevoked
            | AuthErrorKind::InvalidApiKey => StatusCode::UNAUTHORIZED,
            AuthErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self.kind {
            AuthErrorKind::NotAuthenticated => "Not authenticated",
            AuthErrorKind::MalformedCredential => "Malformed credentials",
            AuthErrorKind::InvalidToken => "Invalid token",
            AuthErrorKind::TokenExpired => "Token expired",
            AuthErrorKind::TokenRevoked => "Token has been revoked",
            AuthErrorKind::InvalidApiKey => "Invalid API key",
            AuthErrorKind::Internal => "Something went wrong",
        }
    }
}

impl From<HeaderError> for ApiAuthError {
    fn from(e: HeaderError) -> Self {
        match e {
            HeaderError::MissingHeader => Self::new(AuthErrorKind::NotAuthenticated),
            HeaderError::Malformed => Self::new(AuthErrorKind::MalformedCredential),
        }
    }
}

impl From<TokenError> for ApiAuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Malformed => Self::new(AuthErrorKind::MalformedCredential),
            TokenError::SignatureInvalid | TokenError::InvalidSubject => {
                Self::new(AuthErrorKind::InvalidToken)
            }
            TokenError::Expired => Self::new(AuthErrorKind::TokenExpired),
            TokenError::Encoding(_) | TokenError::TimeError => {
                tracing::error!(error = %e, "Access token operation failed");
                Self::new(AuthErrorKind::Internal)
            }
        }
    }
}

impl From<RefreshTokenError> for ApiAuthError {
    fn from(e: RefreshTokenError) -> Self {
        match e {
            RefreshTokenError::NotFound => Self::new(AuthErrorKind::InvalidToken),
            RefreshTokenError::Revoked => Self::new(AuthErrorKind::TokenRevoked),
            RefreshTokenError::Expired => Self::new(AuthErrorKind::TokenExpired),
            RefreshTokenError::Database(ref db_err) => {
                tracing::error!(error = %db_err, "Refresh token lookup failed");
                Self::new(AuthErrorKind::Internal)
            }
        }
    }
}

impl IntoResponse for ApiAuthError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        (
            self.status_code(),
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}
