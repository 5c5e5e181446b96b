use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::series::{Series, SeriesFilter, SeriesPatch};

#[derive(Debug, Error)]
pub enum SeriesRepositoryError {
    #[error("query return nothing")]
    NotFound,
    #[error("database return error: {0}")]
    DbError(#[from] sqlx::Error),
    #[error("other error: {0}")]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait SeriesRepository: Send + Sync {
    async fn get_series(&self, filter: &SeriesFilter) -> Result<Vec<Series>, SeriesRepositoryError>;

    async fn get_series_by_id(&self, id: i64) -> Result<Series, SeriesRepositoryError>;

    async fn insert_series(&self, series: &Series) -> Result<Series, SeriesRepositoryError>;

    async fn update_series(
        &self,
        id: i64,
        patch: &SeriesPatch,
    ) -> Result<Series, SeriesRepositoryError>;

    /// Chapters, comments and engagement rows go with the series.
    async fn delete_series(&self, id: i64) -> Result<(), SeriesRepositoryError>;

    /// Bumps the view counter and returns the updated row.
    async fn increment_views(&self, id: i64) -> Result<Series, SeriesRepositoryError>;

    async fn get_series_count(&self) -> Result<i64, SeriesRepositoryError>;
}
