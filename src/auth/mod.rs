//! Bearer-token authentication.
//!
//! Two-token system: short-lived access tokens (1 hour, stateless JWTs) sent
//! on every protected call, and long-lived refresh tokens (60 days, opaque,
//! database-tracked) exchanged for new access tokens. A webhook caller
//! authenticates with a static API key instead.

mod errors;
mod extractors;
mod header;
mod refresh;
mod state;
mod types;

pub use errors::ApiAuthError;
pub use extractors::{Auth, BearerToken, WebhookAuth};
pub use header::{HeaderError, api_key_matches, get_api_key, get_bearer_token};
pub use refresh::{REFRESH_TOKEN_TTL_DAYS, RefreshTokenError, RefreshTokenManager};
pub use state::{HasAuthBackend, HasWebhookKey};
pub use types::AuthenticatedUser;
