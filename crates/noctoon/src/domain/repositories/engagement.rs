use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::engagement::Engagement;

#[derive(Debug, Error)]
pub enum EngagementRepositoryError {
    #[error("database return error: {0}")]
    DbError(#[from] sqlx::Error),
}

#[async_trait]
pub trait EngagementRepository: Send + Sync {
    /// Removes the row when present, inserts it otherwise. Returns whether
    /// the row exists afterwards.
    async fn toggle(
        &self,
        kind: Engagement,
        user_id: i64,
        series_id: i64,
    ) -> Result<bool, EngagementRepositoryError>;

    async fn exists(
        &self,
        kind: Engagement,
        user_id: i64,
        series_id: i64,
    ) -> Result<bool, EngagementRepositoryError>;

    async fn get_series_ids_by_user_id(
        &self,
        kind: Engagement,
        user_id: i64,
    ) -> Result<Vec<i64>, EngagementRepositoryError>;

    async fn count_by_series_id(
        &self,
        kind: Engagement,
        series_id: i64,
    ) -> Result<i64, EngagementRepositoryError>;
}
