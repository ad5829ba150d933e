use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::api::router::AppState;
use crate::error::TaskError;

/// Bearer-token claims. Issuance lives with the external auth service; this
/// side only verifies.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

pub struct JwtKeys {
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TaskError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|_| TaskError::unauthorized())
    }
}

/// The authenticated requester's user id. Every task route takes this, and it
/// is the only place an identity can come from.
pub struct AuthUser(pub String);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = TaskError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(TaskError::unauthorized)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(TaskError::unauthorized)?;
        let claims = state.jwt.verify(token)?;
        Ok(AuthUser(claims.sub))
    }
}
