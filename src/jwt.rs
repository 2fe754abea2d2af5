use std::convert::Infallible;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::UserContext;
use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: Arc<Vec<u8>>,
    pub exp_hours: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<Vec<u8>>, exp_hours: i64) -> Self {
        Self {
            secret: Arc::new(secret.into()),
            exp_hours,
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| AppError::configuration("JWT_SECRET not set"))?;
        let exp_hours = std::env::var("JWT_EXP_HOURS")
            .map(|val| val.parse::<i64>())
            .unwrap_or(Ok(24))
            .map_err(|_| AppError::configuration("JWT_EXP_HOURS must be a valid integer"))?;

        Ok(Self::new(secret.into_bytes(), exp_hours))
    }

    pub fn encode(&self, user_id: Uuid, role: Option<&str>, superuser: bool) -> Result<String, AppError> {
        use chrono::{Duration, Utc};

        let now = Utc::now();
        let exp = now + Duration::hours(self.exp_hours);

        let claims = Claims {
            sub: user_id,
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
            role: role.map(str::to_string),
            superuser,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &EncodingKey::from_secret(&self.secret))
            .map_err(|err| AppError::token(err.to_string()))
    }

    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map(|data| data.claims)
            .map_err(|err| AppError::token(err.to_string()))
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub superuser: bool,
}

impl Claims {
    pub fn user_context(&self) -> UserContext {
        let user = UserContext::authenticated(self.sub).with_superuser(self.superuser);
        match &self.role {
            Some(role) => user.with_role(role.clone()),
            None => user,
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Session snapshot for the current request. Never rejects: a missing or
/// invalid token yields an anonymous user.
#[derive(Debug, Clone)]
pub struct SessionUser(pub UserContext);

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(SessionUser(UserContext::anonymous()));
        };

        match state.jwt.decode(token) {
            Ok(claims) => Ok(SessionUser(claims.user_context())),
            Err(err) => {
                tracing::debug!(error = %err, "ignoring invalid session token");
                Ok(SessionUser(UserContext::anonymous()))
            }
        }
    }
}

/// Signed-in user; rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Option<String>,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| AppError::unauthorized("Authorization header missing"))?;

        let claims = state.jwt.decode(token)?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_round_trip_into_user_context() {
        let jwt = JwtConfig::new("test-secret", 1);
        let user_id = Uuid::new_v4();

        let token = jwt.encode(user_id, Some("ADMIN"), false).expect("token");
        let user = jwt.decode(&token).expect("claims").user_context();

        assert!(user.is_authenticated);
        assert!(!user.is_superuser);
        assert_eq!(user.user_id, Some(user_id));
        assert_eq!(user.role_name(), Some("ADMIN"));
    }

    #[test]
    fn test_token_without_role() {
        let jwt = JwtConfig::new("test-secret", 1);
        let token = jwt.encode(Uuid::new_v4(), None, true).expect("token");
        let user = jwt.decode(&token).expect("claims").user_context();

        assert!(user.is_superuser);
        assert_eq!(user.current_role, None);
    }

    #[test]
    fn test_foreign_secret_is_rejected() {
        let token = JwtConfig::new("one", 1)
            .encode(Uuid::new_v4(), None, false)
            .expect("token");
        assert!(matches!(JwtConfig::new("two", 1).decode(&token), Err(AppError::Token(_))));
    }
}
