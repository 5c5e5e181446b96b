use async_graphql::{Context, Enum, InputObject, Object, Result, SimpleObject};
use chrono::NaiveDateTime;
use rayon::prelude::*;

use super::{catalogue::Comment, current_user};
use crate::{
    domain::entities::{self, engagement::Engagement},
    infrastructure::{
        auth::{self, Claims},
        config::Config,
    },
    presentation::{CommentSvc, EngagementSvc, ProgressSvc, UserSvc},
};

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl From<entities::user::Role> for Role {
    fn from(val: entities::user::Role) -> Self {
        match val {
            entities::user::Role::User => Self::User,
            entities::user::Role::Admin => Self::Admin,
        }
    }
}

#[derive(SimpleObject, Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub avatar: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<entities::user::User> for User {
    fn from(val: entities::user::User) -> Self {
        Self {
            id: val.id,
            username: val.username,
            role: val.role.into(),
            avatar: val.avatar,
            created_at: val.created_at,
        }
    }
}

#[derive(SimpleObject, Debug, Clone)]
pub struct ReadingProgress {
    pub series_id: i64,
    pub chapter_id: i64,
    pub progress: i64,
    pub updated_at: NaiveDateTime,
}

impl From<entities::progress::ReadingProgress> for ReadingProgress {
    fn from(val: entities::progress::ReadingProgress) -> Self {
        Self {
            series_id: val.series_id,
            chapter_id: val.chapter_id,
            progress: val.progress,
            updated_at: val.updated_at,
        }
    }
}

#[derive(SimpleObject)]
pub struct AuthPayload {
    token: String,
    user: User,
}

fn auth_payload(ctx: &Context<'_>, user: entities::user::User) -> Result<AuthPayload> {
    let secret = &ctx.data::<Config>()?.secret;
    let token = auth::encode_jwt(secret, &Claims::for_user(&user))?;

    Ok(AuthPayload {
        token,
        user: user.into(),
    })
}

#[derive(InputObject)]
struct LoginInput {
    username: String,
    #[graphql(secret)]
    password: String,
}

#[derive(Default)]
pub struct UserRoot;

#[Object]
impl UserRoot {
    async fn login(&self, ctx: &Context<'_>, login: LoginInput) -> Result<AuthPayload> {
        let user = ctx
            .data::<UserSvc>()?
            .login(&login.username, &login.password)
            .await
            .map_err(|_| "Invalid credentials")?;

        auth_payload(ctx, user)
    }

    async fn me(&self, ctx: &Context<'_>) -> Result<User> {
        Ok(current_user(ctx).await?.into())
    }

    async fn liked_series(&self, ctx: &Context<'_>) -> Result<Vec<i64>> {
        series_ids(ctx, Engagement::Like).await
    }

    async fn favorite_series(&self, ctx: &Context<'_>) -> Result<Vec<i64>> {
        series_ids(ctx, Engagement::Favorite).await
    }

    /// All of the caller's progress when `series_id` is omitted.
    async fn reading_progress(
        &self,
        ctx: &Context<'_>,
        series_id: Option<i64>,
    ) -> Result<Vec<ReadingProgress>> {
        let user = current_user(ctx).await?;
        let progress_svc = ctx.data::<ProgressSvc>()?;

        let progress: Vec<entities::progress::ReadingProgress> = match series_id {
            Some(series_id) => progress_svc
                .fetch_progress(user.id, series_id)
                .await?
                .into_iter()
                .collect(),
            None => progress_svc.fetch_progress_by_user_id(user.id).await?,
        };

        Ok(progress
            .into_par_iter()
            .map(ReadingProgress::from)
            .collect())
    }
}

/// Anonymous callers get an empty list.
async fn series_ids(ctx: &Context<'_>, kind: Engagement) -> Result<Vec<i64>> {
    let Ok(claims) = ctx.data::<Claims>() else {
        return Ok(vec![]);
    };

    Ok(ctx
        .data::<EngagementSvc>()?
        .fetch_series_ids(kind, claims.sub)
        .await?)
}

#[derive(Default)]
pub struct UserMutationRoot;

#[Object]
impl UserMutationRoot {
    async fn register(&self, ctx: &Context<'_>, login: LoginInput) -> Result<AuthPayload> {
        let user = ctx
            .data::<UserSvc>()?
            .register(&login.username, &login.password)
            .await?;

        auth_payload(ctx, user)
    }

    async fn toggle_like(&self, ctx: &Context<'_>, series_id: i64) -> Result<bool> {
        let user = current_user(ctx).await?;

        Ok(ctx
            .data::<EngagementSvc>()?
            .toggle(Engagement::Like, user.id, series_id)
            .await?)
    }

    async fn toggle_favorite(&self, ctx: &Context<'_>, series_id: i64) -> Result<bool> {
        let user = current_user(ctx).await?;

        Ok(ctx
            .data::<EngagementSvc>()?
            .toggle(Engagement::Favorite, user.id, series_id)
            .await?)
    }

    async fn add_comment(&self, ctx: &Context<'_>, series_id: i64, text: String) -> Result<Comment> {
        let author = current_user(ctx).await?;

        Ok(ctx
            .data::<CommentSvc>()?
            .add_comment(&author, series_id, &text)
            .await?
            .into())
    }

    async fn update_reading_progress(
        &self,
        ctx: &Context<'_>,
        series_id: i64,
        chapter_id: i64,
        #[graphql(default)] progress: i64,
    ) -> Result<ReadingProgress> {
        let user = current_user(ctx).await?;

        Ok(ctx
            .data::<ProgressSvc>()?
            .update_progress(user.id, series_id, chapter_id, progress)
            .await?
            .into())
    }
}

#[cfg(test)]
mod test {
    use async_graphql::Request;
    use serde_json::json;

    use crate::{
        infrastructure::{auth::Claims, config::Config},
        presentation::{graphql::schema::SchemaBuilder, test_util::test_app},
    };

    #[tokio::test]
    async fn test_register_and_engage() {
        let app = test_app().await;
        let schema = SchemaBuilder::new()
            .data(app.config.clone())
            .services(app.services.clone())
            .build();

        let res = schema
            .execute(
                r#"mutation { register(login: { username: "okur", password: "password123" }) { token user { username role } } }"#,
            )
            .await;
        assert!(res.errors.is_empty(), "{:?}", res.errors);
        let data = res.data.into_json().unwrap();
        assert_eq!(data["register"]["user"], json!({ "username": "okur", "role": "USER" }));
        let token = data["register"]["token"].as_str().unwrap().to_string();
        let claims = crate::infrastructure::auth::decode_jwt(&app.config.secret, &token).unwrap();

        let res = schema.execute("mutation { toggleLike(seriesId: 1) }").await;
        assert_eq!(res.errors[0].message, "Authentication required");

        let res = schema
            .execute(Request::new("mutation { toggleLike(seriesId: 1) }").data(claims.clone()))
            .await;
        assert_eq!(res.data.into_json().unwrap(), json!({ "toggleLike": true }));

        let res = schema
            .execute(
                Request::new(
                    r#"mutation { addComment(seriesId: 1, text: "<b>güzel</b>") { username text } }"#,
                )
                .data(claims.clone()),
            )
            .await;
        assert_eq!(
            res.data.into_json().unwrap(),
            json!({ "addComment": { "username": "okur", "text": "&lt;b&gt;güzel&lt;&#x2F;b&gt;" } })
        );

        let res = schema
            .execute(Request::new("{ likedSeries favoriteSeries }").data(claims))
            .await;
        assert_eq!(
            res.data.into_json().unwrap(),
            json!({ "likedSeries": [1], "favoriteSeries": [] })
        );
    }

    #[tokio::test]
    async fn test_reading_progress() {
        let app = test_app().await;
        let schema = SchemaBuilder::new()
            .data(Config::default())
            .services(app.services.clone())
            .build();
        let user = app.services.user_svc.register("okur", "password123").await.unwrap();
        let claims = Claims::for_user(&user);

        let res = schema
            .execute(
                Request::new(
                    "mutation { updateReadingProgress(seriesId: 1, chapterId: 2, progress: 140) { chapterId progress } }",
                )
                .data(claims.clone()),
            )
            .await;
        assert_eq!(
            res.data.into_json().unwrap(),
            json!({ "updateReadingProgress": { "chapterId": 2, "progress": 100 } })
        );

        let res = schema
            .execute(Request::new("{ readingProgress(seriesId: 2) { progress } }").data(claims))
            .await;
        assert_eq!(
            res.data.into_json().unwrap(),
            json!({ "readingProgress": [] })
        );
    }

    #[tokio::test]
    async fn test_token_of_unknown_user() {
        let app = test_app().await;
        let schema = SchemaBuilder::new().services(app.services.clone()).build();
        let ghost = Claims {
            sub: 9999,
            username: "hayalet".to_string(),
            is_admin: true,
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        };

        for query in [
            "mutation { toggleLike(seriesId: 1) }",
            "mutation { updateReadingProgress(seriesId: 1, chapterId: 1, progress: 10) { progress } }",
            "{ stats { totalSeries } }",
        ] {
            let res = schema.execute(Request::new(query).data(ghost.clone())).await;
            assert_eq!(res.errors.len(), 1, "{query}");
            assert_eq!(res.errors[0].message, "Authentication required", "{query}");
        }

        let (_, stats) = app
            .send(
                "GET",
                "/api/admin/stats",
                Some(&app.token_for("admin").await),
                None,
            )
            .await;
        assert_eq!(stats["totalLikes"], 0);
    }
}
