use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::chapter::Chapter;

#[derive(Debug, Error)]
pub enum ChapterRepositoryError {
    #[error("query return nothing")]
    NotFound,
    #[error("database return error: {0}")]
    DbError(#[from] sqlx::Error),
    #[error("other error: {0}")]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait ChapterRepository: Send + Sync {
    async fn get_chapters_by_series_id(
        &self,
        series_id: i64,
    ) -> Result<Vec<Chapter>, ChapterRepositoryError>;

    async fn get_chapter_by_id(&self, id: i64) -> Result<Chapter, ChapterRepositoryError>;

    async fn insert_chapter(&self, chapter: &Chapter) -> Result<Chapter, ChapterRepositoryError>;

    async fn delete_chapter(&self, id: i64) -> Result<(), ChapterRepositoryError>;
}
