use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use super::error::ApiError;
use crate::{
    domain::{entities::user::User, services::user::UserError},
    infrastructure::{auth, config::Config},
    presentation::{UserSvc, token::Token},
};

/// Resolves the bearer token to a stored user. Missing, invalid or stale
/// tokens all resolve to `None`.
async fn user_from_parts<S>(parts: &mut Parts, state: &S) -> Result<Option<User>, ApiError>
where
    S: Send + Sync,
{
    let Ok(Token(token)) = Token::from_request_parts(parts, state).await;
    if token.is_empty() {
        return Ok(None);
    }

    let secret = parts
        .extensions
        .get::<Config>()
        .map(|config| config.secret.clone())
        .ok_or_else(|| ApiError::Internal("config extension missing".to_string()))?;

    let claims = match auth::decode_jwt(&secret, &token) {
        Ok(claims) => claims,
        Err(e) => {
            debug!("rejected token: {e}");
            return Ok(None);
        }
    };

    let user_svc = parts
        .extensions
        .get::<UserSvc>()
        .cloned()
        .ok_or_else(|| ApiError::Internal("user service extension missing".to_string()))?;

    match user_svc.fetch_user_by_id(claims.sub).await {
        Ok(user) => Ok(Some(user)),
        Err(UserError::UserNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Logged in user, 401 otherwise.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        user_from_parts(parts, state)
            .await?
            .map(CurrentUser)
            .ok_or_else(ApiError::authentication_required)
    }
}

/// Logged in user when a valid token is sent, anonymous otherwise.
pub struct MaybeUser(pub Option<User>);

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(user_from_parts(parts, state).await?))
    }
}

pub struct AdminUser(pub User);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = user_from_parts(parts, state)
            .await?
            .ok_or_else(ApiError::authentication_required)?;

        if !user.is_admin() {
            return Err(ApiError::Forbidden("Admin access required".to_string()));
        }

        Ok(AdminUser(user))
    }
}

/// Numeric path id. Anything unparsable cannot name a stored row, so it
/// answers 404 like an unknown id would.
pub struct Id(pub i64);

impl<S> FromRequestParts<S> for Id
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<i64>::from_request_parts(parts, state)
            .await
            .map(|Path(id)| Id(id))
            .map_err(|_| ApiError::NotFound("Not found".to_string()))
    }
}
