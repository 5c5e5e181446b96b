use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{
    SuccessReply,
    error::ApiError,
    extractor::{AdminUser, Id},
};
use crate::{
    domain::{
        entities::{
            chapter::Chapter,
            comment::Comment,
            series::{Series, SeriesPatch, SeriesStatus},
            stats::Stats,
            upload::UploadSignature,
            user::User,
        },
        services::{chapter::NewChapter, series::NewSeries},
    },
    presentation::{AdminSvc, ChapterSvc, CommentSvc, SeriesSvc, UserSvc},
};

pub async fn stats(
    _: AdminUser,
    Extension(admin_svc): Extension<AdminSvc>,
) -> Result<Json<Stats>, ApiError> {
    Ok(Json(admin_svc.fetch_stats().await?))
}

pub async fn recent_comments(
    _: AdminUser,
    Extension(comment_svc): Extension<CommentSvc>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    Ok(Json(comment_svc.fetch_recent_comments().await?))
}

pub async fn users(
    _: AdminUser,
    Extension(user_svc): Extension<UserSvc>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(user_svc.fetch_all_users().await?))
}

pub async fn sign_upload(
    _: AdminUser,
    Extension(admin_svc): Extension<AdminSvc>,
) -> Result<Json<UploadSignature>, ApiError> {
    Ok(Json(admin_svc.sign_upload()?))
}

#[derive(Debug, Deserialize)]
pub struct SeriesBody {
    title: Option<String>,
    description: Option<String>,
    genre: Option<String>,
    cover: Option<String>,
    author: Option<String>,
    status: Option<SeriesStatus>,
    rating: Option<i64>,
}

pub async fn create_series(
    AdminUser(admin): AdminUser,
    Extension(series_svc): Extension<SeriesSvc>,
    payload: Result<Json<SeriesBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Series>), ApiError> {
    let Json(body) = payload?;

    let series = series_svc
        .create_series(NewSeries {
            title: body.title.unwrap_or_default(),
            description: body.description,
            genre: body.genre.unwrap_or_default(),
            cover: body.cover.unwrap_or_default(),
            author: body.author,
            status: body.status,
        })
        .await?;
    info!("{} published series {}", admin.username, series.id);

    Ok((StatusCode::CREATED, Json(series)))
}

pub async fn update_series(
    Id(id): Id,
    _: AdminUser,
    Extension(series_svc): Extension<SeriesSvc>,
    payload: Result<Json<SeriesBody>, JsonRejection>,
) -> Result<Json<Series>, ApiError> {
    let Json(body) = payload?;

    let series = series_svc
        .update_series(
            id,
            SeriesPatch {
                title: body.title,
                description: body.description,
                genre: body.genre,
                cover: body.cover,
                status: body.status,
                author: body.author,
                rating: body.rating,
            },
        )
        .await?;

    Ok(Json(series))
}

pub async fn delete_series(
    Id(id): Id,
    _: AdminUser,
    Extension(series_svc): Extension<SeriesSvc>,
) -> Result<Json<SuccessReply>, ApiError> {
    series_svc.delete_series(id).await?;

    Ok(Json(SuccessReply::ok()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterBody {
    number: Option<i64>,
    title: Option<String>,
    pages: Option<serde_json::Value>,
    publish_at: Option<DateTime<Utc>>,
}

impl ChapterBody {
    /// `pages` must be an array made only of strings.
    fn into_new_chapter(self) -> Result<NewChapter, ApiError> {
        let pages = match self.pages {
            Some(serde_json::Value::Array(pages)) => pages
                .into_iter()
                .map(|page| match page {
                    serde_json::Value::String(url) => Some(url),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>(),
            _ => None,
        };
        let pages = pages.ok_or_else(|| {
            ApiError::BadRequest("Number, title, and pages array are required".to_string())
        })?;

        Ok(NewChapter {
            number: self.number.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            pages,
            publish_at: self.publish_at.map(|at| at.naive_utc()),
        })
    }
}

pub async fn create_chapter(
    Id(id): Id,
    _: AdminUser,
    Extension(chapter_svc): Extension<ChapterSvc>,
    payload: Result<Json<ChapterBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Chapter>), ApiError> {
    let Json(body) = payload?;

    let chapter = chapter_svc
        .create_chapter(id, body.into_new_chapter()?)
        .await?;

    Ok((StatusCode::CREATED, Json(chapter)))
}

pub async fn delete_chapter(
    Id(id): Id,
    _: AdminUser,
    Extension(chapter_svc): Extension<ChapterSvc>,
) -> Result<Json<SuccessReply>, ApiError> {
    chapter_svc.delete_chapter(id).await?;

    Ok(Json(SuccessReply::ok()))
}

pub async fn delete_comment(
    Id(id): Id,
    _: AdminUser,
    Extension(comment_svc): Extension<CommentSvc>,
) -> Result<Json<SuccessReply>, ApiError> {
    comment_svc.delete_comment(id).await?;

    Ok(Json(SuccessReply::ok()))
}
