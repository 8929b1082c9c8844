//! Authentication user types.

use uuid::Uuid;

/// User identified by a valid access token.
///
/// Nothing is loaded from the database; the token's subject is the only
/// link to the user for the duration of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}
