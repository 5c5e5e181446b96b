use axum::{
    Json,
    extract::{
        Extension, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use super::{
    error::ApiError,
    extractor::{CurrentUser, Id},
};
use crate::{
    domain::entities::{
        chapter::Chapter,
        comment::Comment,
        engagement::Engagement,
        progress::ReadingProgress,
        series::{Series, SeriesFilter, SeriesSort, SeriesStatus},
    },
    presentation::{ChapterSvc, CommentSvc, EngagementSvc, ProgressSvc, SeriesSvc},
};

#[derive(Debug, Default, Deserialize)]
pub struct SeriesQuery {
    genre: Option<String>,
    status: Option<SeriesStatus>,
    q: Option<String>,
    sort: Option<SeriesSort>,
}

impl From<SeriesQuery> for SeriesFilter {
    fn from(query: SeriesQuery) -> Self {
        Self {
            genre: query.genre.filter(|g| !g.trim().is_empty()),
            status: query.status,
            query: query.q.filter(|q| !q.trim().is_empty()),
            sort: query.sort.unwrap_or_default(),
        }
    }
}

pub async fn genres(Extension(series_svc): Extension<SeriesSvc>) -> Json<Vec<String>> {
    Json(series_svc.genres())
}

pub async fn list_series(
    Extension(series_svc): Extension<SeriesSvc>,
    query: Result<Query<SeriesQuery>, QueryRejection>,
) -> Result<Json<Vec<Series>>, ApiError> {
    let Query(query) = query?;

    Ok(Json(series_svc.fetch_series(&query.into()).await?))
}

pub async fn get_series(
    Id(id): Id,
    Extension(series_svc): Extension<SeriesSvc>,
) -> Result<Json<Series>, ApiError> {
    Ok(Json(series_svc.view_series(id).await?))
}

pub async fn list_chapters(
    Id(id): Id,
    Extension(chapter_svc): Extension<ChapterSvc>,
) -> Result<Json<Vec<Chapter>>, ApiError> {
    Ok(Json(chapter_svc.fetch_chapters_by_series_id(id).await?))
}

pub async fn list_comments(
    Id(id): Id,
    Extension(comment_svc): Extension<CommentSvc>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    Ok(Json(comment_svc.fetch_comments_by_series_id(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    text: Option<String>,
}

pub async fn add_comment(
    Id(id): Id,
    CurrentUser(user): CurrentUser,
    Extension(comment_svc): Extension<CommentSvc>,
    payload: Result<Json<CommentBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let Json(body) = payload?;
    let text = body.text.ok_or_else(ApiError::invalid_input)?;

    let comment = comment_svc.add_comment(&user, id, &text).await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

#[derive(Debug, Serialize)]
pub struct LikeReply {
    pub liked: bool,
}

#[derive(Debug, Serialize)]
pub struct FavoriteReply {
    pub favorited: bool,
}

pub async fn toggle_like(
    Id(id): Id,
    CurrentUser(user): CurrentUser,
    Extension(engagement_svc): Extension<EngagementSvc>,
) -> Result<Json<LikeReply>, ApiError> {
    let liked = engagement_svc.toggle(Engagement::Like, user.id, id).await?;

    Ok(Json(LikeReply { liked }))
}

pub async fn toggle_favorite(
    Id(id): Id,
    CurrentUser(user): CurrentUser,
    Extension(engagement_svc): Extension<EngagementSvc>,
) -> Result<Json<FavoriteReply>, ApiError> {
    let favorited = engagement_svc
        .toggle(Engagement::Favorite, user.id, id)
        .await?;

    Ok(Json(FavoriteReply { favorited }))
}

pub async fn get_progress(
    Id(id): Id,
    CurrentUser(user): CurrentUser,
    Extension(progress_svc): Extension<ProgressSvc>,
) -> Result<Json<Option<ReadingProgress>>, ApiError> {
    Ok(Json(progress_svc.fetch_progress(user.id, id).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressBody {
    chapter_id: Option<i64>,
    progress: Option<i64>,
}

pub async fn update_progress(
    Id(id): Id,
    CurrentUser(user): CurrentUser,
    Extension(progress_svc): Extension<ProgressSvc>,
    payload: Result<Json<ProgressBody>, JsonRejection>,
) -> Result<Json<ReadingProgress>, ApiError> {
    let Json(body) = payload?;
    let chapter_id = body.chapter_id.ok_or_else(ApiError::invalid_input)?;

    let progress = progress_svc
        .update_progress(user.id, id, chapter_id, body.progress.unwrap_or(0))
        .await?;

    Ok(Json(progress))
}
