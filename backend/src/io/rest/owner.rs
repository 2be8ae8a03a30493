use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

use crate::AppState;

/// Header carrying the authenticated user id, set by the auth proxy in front of us
pub const USER_ID_HEADER: &str = "x-user-id";

/// The account a request acts for.
///
/// Falls back to the configured default account when the header is missing
/// or blank. Only the IO layer knows about that fallback; services always
/// receive an explicit owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner(pub String);

impl Owner {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Owner {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let from_header = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        Ok(Owner(
            from_header
                .map(str::to_string)
                .unwrap_or_else(|| state.default_user_id.clone()),
        ))
    }
}
