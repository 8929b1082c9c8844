//! `Authorization` header parsing.

use axum::http::{HeaderMap, header};
use thiserror::Error;

const BEARER_PREFIX: &str = "Bearer ";
const API_KEY_PREFIX: &str = "ApiKey ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("missing authorization header")]
    MissingHeader,
    #[error("malformed authorization header")]
    Malformed,
}

/// Return the token material of an `Authorization: Bearer <token>` header.
pub fn get_bearer_token(headers: &HeaderMap) -> Result<&str, HeaderError> {
    get_prefixed(headers, BEARER_PREFIX)
}

/// Return the key of an `Authorization: ApiKey <key>` header.
pub fn get_api_key(headers: &HeaderMap) -> Result<&str, HeaderError> {
    get_prefixed(headers, API_KEY_PREFIX)
}

/// Constant-time comparison of a presented API key against the configured one.
pub fn api_key_matches(presented: &str, configured: &str) -> bool {
    let (a, b) = (presented.as_bytes(), configured.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

fn get_prefixed<'a>(headers: &'a HeaderMap, prefix: &str) -> Result<&'a str, HeaderError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(HeaderError::MissingHeader)?
        .to_str()
        .map_err(|_| HeaderError::Malformed)?;

    let token = value
        .strip_prefix(prefix)
        .ok_or(HeaderError::Malformed)?
        .trim();

    if token.is_empty() {
        return Err(HeaderError::Malformed);
    }
    Ok(token)
}
