use thiserror::Error;

use crate::domain::{
    entities::engagement::Engagement,
    repositories::{
        engagement::{EngagementRepository, EngagementRepositoryError},
        series::{SeriesRepository, SeriesRepositoryError},
    },
};

#[derive(Debug, Error)]
pub enum EngagementError {
    #[error("series not found")]
    SeriesNotFound,
    #[error("engagement repository error: {0}")]
    EngagementRepositoryError(#[from] EngagementRepositoryError),
    #[error("series repository error: {0}")]
    SeriesRepositoryError(SeriesRepositoryError),
}

impl From<SeriesRepositoryError> for EngagementError {
    fn from(e: SeriesRepositoryError) -> Self {
        match e {
            SeriesRepositoryError::NotFound => EngagementError::SeriesNotFound,
            e => EngagementError::SeriesRepositoryError(e),
        }
    }
}

/// Likes and favorites: a repeated action undoes the previous one.
#[derive(Clone)]
pub struct EngagementService<E, S>
where
    E: EngagementRepository,
    S: SeriesRepository,
{
    engagement_repo: E,
    series_repo: S,
}

impl<E, S> EngagementService<E, S>
where
    E: EngagementRepository,
    S: SeriesRepository,
{
    pub fn new(engagement_repo: E, series_repo: S) -> Self {
        Self {
            engagement_repo,
            series_repo,
        }
    }

    /// Returns whether the user engages with the series after the toggle.
    pub async fn toggle(
        &self,
        kind: Engagement,
        user_id: i64,
        series_id: i64,
    ) -> Result<bool, EngagementError> {
        self.series_repo.get_series_by_id(series_id).await?;

        let active = self
            .engagement_repo
            .toggle(kind, user_id, series_id)
            .await?;
        debug!("user {user_id} {kind:?} series {series_id}: {active}");

        Ok(active)
    }

    pub async fn is_engaged(
        &self,
        kind: Engagement,
        user_id: i64,
        series_id: i64,
    ) -> Result<bool, EngagementError> {
        Ok(self.engagement_repo.exists(kind, user_id, series_id).await?)
    }

    pub async fn fetch_series_ids(
        &self,
        kind: Engagement,
        user_id: i64,
    ) -> Result<Vec<i64>, EngagementError> {
        Ok(self
            .engagement_repo
            .get_series_ids_by_user_id(kind, user_id)
            .await?)
    }

    pub async fn count(&self, kind: Engagement, series_id: i64) -> Result<i64, EngagementError> {
        Ok(self
            .engagement_repo
            .count_by_series_id(kind, series_id)
            .await?)
    }
}
