pub mod admin;
pub mod catalogue;
pub mod guard;
pub mod schema;
pub mod user;

use async_graphql::{
    Context, Result,
    http::{GraphQLPlaygroundConfig, playground_source},
};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::Extension,
    response::{self, IntoResponse},
};

use self::schema::NoctoonSchema;
use super::token::Token;
use crate::{
    domain::{entities::user::User, services::user::UserError},
    infrastructure::{
        auth::{self, Claims},
        config::Config,
    },
    presentation::UserSvc,
};

pub async fn graphql_handler(
    token: Token,
    Extension(config): Extension<Config>,
    Extension(schema): Extension<NoctoonSchema>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut req = req.into_inner();

    if let Ok(claims) = auth::decode_jwt(&config.secret, &token.0) {
        req = req.data(claims);
    }

    schema.execute(req).await.into()
}

pub async fn graphql_playground() -> impl IntoResponse {
    response::Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}

pub(crate) fn claims<'a>(ctx: &Context<'a>) -> Result<&'a Claims> {
    ctx.data::<Claims>()
        .map_err(|_| "Authentication required".into())
}

/// The stored user behind the token. Tokens of deleted users are treated
/// like missing ones.
pub(crate) async fn current_user(ctx: &Context<'_>) -> Result<User> {
    let claims = claims(ctx)?;

    match ctx.data::<UserSvc>()?.fetch_user_by_id(claims.sub).await {
        Ok(user) => Ok(user),
        Err(UserError::UserNotFound) => Err("Authentication required".into()),
        Err(e) => Err(e.into()),
    }
}
