use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::api::problem::{unauthorized, ProblemResponse};

/// Header carrying the authenticated user's id, set by the upstream gateway.
pub const CALLER_ID_HEADER: &str = "x-user-id";

/// Id of the user on whose behalf the request is made.
///
/// Rejects with `401` when the header is absent or not a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerId(pub i64);

impl CallerId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let instance = parts.uri.path();
        let raw = parts
            .headers
            .get(CALLER_ID_HEADER)
            .ok_or_else(|| unauthorized("missing caller identity", instance))?;

        raw.to_str()
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .map(CallerId)
            .ok_or_else(|| unauthorized("invalid caller identity", instance))
    }
}
