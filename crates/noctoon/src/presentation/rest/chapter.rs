use axum::{Json, extract::Extension};

use super::{error::ApiError, extractor::Id};
use crate::{domain::entities::chapter::Chapter, presentation::ChapterSvc};

pub async fn get_chapter(
    Id(id): Id,
    Extension(chapter_svc): Extension<ChapterSvc>,
) -> Result<Json<Chapter>, ApiError> {
    Ok(Json(chapter_svc.fetch_chapter_by_id(id).await?))
}
