use async_graphql::{Context, InputObject, Object, Result, SimpleObject};
use chrono::NaiveDateTime;
use rayon::prelude::*;

use super::{
    catalogue::{Chapter, Comment, Series, SeriesStatus},
    guard::AdminGuard,
    user::User,
};
use crate::{
    domain::{
        entities::{self, series::SeriesPatch},
        services::{chapter::NewChapter, series::NewSeries},
    },
    presentation::{AdminSvc, ChapterSvc, CommentSvc, SeriesSvc, UserSvc},
};

#[derive(SimpleObject, Debug, Clone)]
pub struct Stats {
    pub total_series: i64,
    pub total_users: i64,
    pub total_comments: i64,
    pub total_likes: i64,
    pub total_favorites: i64,
}

impl From<entities::stats::Stats> for Stats {
    fn from(val: entities::stats::Stats) -> Self {
        Self {
            total_series: val.total_series,
            total_users: val.total_users,
            total_comments: val.total_comments,
            total_likes: val.total_likes,
            total_favorites: val.total_favorites,
        }
    }
}

#[derive(SimpleObject, Debug, Clone)]
pub struct UploadSignature {
    pub signature: String,
    pub timestamp: i64,
    pub cloud_name: String,
    pub api_key: String,
    pub folder: String,
}

impl From<entities::upload::UploadSignature> for UploadSignature {
    fn from(val: entities::upload::UploadSignature) -> Self {
        Self {
            signature: val.signature,
            timestamp: val.timestamp,
            cloud_name: val.cloud_name,
            api_key: val.api_key,
            folder: val.folder,
        }
    }
}

#[derive(Default)]
pub struct AdminRoot;

#[Object]
impl AdminRoot {
    #[graphql(guard = "AdminGuard::new()")]
    async fn stats(&self, ctx: &Context<'_>) -> Result<Stats> {
        Ok(ctx.data::<AdminSvc>()?.fetch_stats().await?.into())
    }

    #[graphql(guard = "AdminGuard::new()")]
    async fn recent_comments(&self, ctx: &Context<'_>) -> Result<Vec<Comment>> {
        let comments = ctx
            .data::<CommentSvc>()?
            .fetch_recent_comments()
            .await?
            .into_par_iter()
            .map(Comment::from)
            .collect();

        Ok(comments)
    }

    #[graphql(guard = "AdminGuard::new()")]
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let users = ctx
            .data::<UserSvc>()?
            .fetch_all_users()
            .await?
            .into_par_iter()
            .map(User::from)
            .collect();

        Ok(users)
    }

    #[graphql(guard = "AdminGuard::new()")]
    async fn upload_signature(&self, ctx: &Context<'_>) -> Result<UploadSignature> {
        Ok(ctx.data::<AdminSvc>()?.sign_upload()?.into())
    }
}

#[derive(InputObject)]
struct SeriesInput {
    title: String,
    description: Option<String>,
    genre: String,
    cover: String,
    author: Option<String>,
    status: Option<SeriesStatus>,
}

#[derive(InputObject)]
struct SeriesPatchInput {
    title: Option<String>,
    description: Option<String>,
    genre: Option<String>,
    cover: Option<String>,
    author: Option<String>,
    status: Option<SeriesStatus>,
    rating: Option<i64>,
}

#[derive(InputObject)]
struct ChapterInput {
    number: i64,
    title: String,
    pages: Vec<String>,
    publish_at: Option<NaiveDateTime>,
}

#[derive(Default)]
pub struct AdminMutationRoot;

#[Object]
impl AdminMutationRoot {
    #[graphql(guard = "AdminGuard::new()")]
    async fn create_series(&self, ctx: &Context<'_>, input: SeriesInput) -> Result<Series> {
        let series = ctx
            .data::<SeriesSvc>()?
            .create_series(NewSeries {
                title: input.title,
                description: input.description,
                genre: input.genre,
                cover: input.cover,
                author: input.author,
                status: input.status.map(Into::into),
            })
            .await?;

        Ok(series.into())
    }

    #[graphql(guard = "AdminGuard::new()")]
    async fn update_series(
        &self,
        ctx: &Context<'_>,
        id: i64,
        input: SeriesPatchInput,
    ) -> Result<Series> {
        let series = ctx
            .data::<SeriesSvc>()?
            .update_series(
                id,
                SeriesPatch {
                    title: input.title,
                    description: input.description,
                    genre: input.genre,
                    cover: input.cover,
                    status: input.status.map(Into::into),
                    author: input.author,
                    rating: input.rating,
                },
            )
            .await?;

        Ok(series.into())
    }

    #[graphql(guard = "AdminGuard::new()")]
    async fn delete_series(&self, ctx: &Context<'_>, id: i64) -> Result<bool> {
        ctx.data::<SeriesSvc>()?.delete_series(id).await?;

        Ok(true)
    }

    #[graphql(guard = "AdminGuard::new()")]
    async fn create_chapter(
        &self,
        ctx: &Context<'_>,
        series_id: i64,
        input: ChapterInput,
    ) -> Result<Chapter> {
        let chapter = ctx
            .data::<ChapterSvc>()?
            .create_chapter(
                series_id,
                NewChapter {
                    number: input.number,
                    title: input.title,
                    pages: input.pages,
                    publish_at: input.publish_at,
                },
            )
            .await?;

        Ok(chapter.into())
    }

    #[graphql(guard = "AdminGuard::new()")]
    async fn delete_chapter(&self, ctx: &Context<'_>, id: i64) -> Result<bool> {
        ctx.data::<ChapterSvc>()?.delete_chapter(id).await?;

        Ok(true)
    }

    #[graphql(guard = "AdminGuard::new()")]
    async fn delete_comment(&self, ctx: &Context<'_>, id: i64) -> Result<bool> {
        ctx.data::<CommentSvc>()?.delete_comment(id).await?;

        Ok(true)
    }
}
