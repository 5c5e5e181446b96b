use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::progress::ReadingProgress;

#[derive(Debug, Error)]
pub enum ProgressRepositoryError {
    #[error("database return error: {0}")]
    DbError(#[from] sqlx::Error),
}

#[async_trait]
pub trait ProgressRepository: Send + Sync {
    async fn get_progress(
        &self,
        user_id: i64,
        series_id: i64,
    ) -> Result<Option<ReadingProgress>, ProgressRepositoryError>;

    async fn get_progress_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Vec<ReadingProgress>, ProgressRepositoryError>;

    /// One row per (user, series); a second call overwrites the first.
    async fn upsert_progress(
        &self,
        progress: &ReadingProgress,
    ) -> Result<ReadingProgress, ProgressRepositoryError>;
}
