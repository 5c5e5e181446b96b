use thiserror::Error;

use crate::domain::{
    entities::progress::ReadingProgress,
    repositories::{
        chapter::{ChapterRepository, ChapterRepositoryError},
        progress::{ProgressRepository, ProgressRepositoryError},
        series::{SeriesRepository, SeriesRepositoryError},
    },
};

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("series not found")]
    SeriesNotFound,
    #[error("chapter does not belong to series")]
    ChapterMismatch,
    #[error("progress repository error: {0}")]
    ProgressRepositoryError(#[from] ProgressRepositoryError),
    #[error("chapter repository error: {0}")]
    ChapterRepositoryError(ChapterRepositoryError),
    #[error("series repository error: {0}")]
    SeriesRepositoryError(SeriesRepositoryError),
}

impl From<SeriesRepositoryError> for ProgressError {
    fn from(e: SeriesRepositoryError) -> Self {
        match e {
            SeriesRepositoryError::NotFound => ProgressError::SeriesNotFound,
            e => ProgressError::SeriesRepositoryError(e),
        }
    }
}

impl From<ChapterRepositoryError> for ProgressError {
    fn from(e: ChapterRepositoryError) -> Self {
        match e {
            ChapterRepositoryError::NotFound => ProgressError::ChapterMismatch,
            e => ProgressError::ChapterRepositoryError(e),
        }
    }
}

#[derive(Clone)]
pub struct ProgressService<P, C, S>
where
    P: ProgressRepository,
    C: ChapterRepository,
    S: SeriesRepository,
{
    progress_repo: P,
    chapter_repo: C,
    series_repo: S,
}

impl<P, C, S> ProgressService<P, C, S>
where
    P: ProgressRepository,
    C: ChapterRepository,
    S: SeriesRepository,
{
    pub fn new(progress_repo: P, chapter_repo: C, series_repo: S) -> Self {
        Self {
            progress_repo,
            chapter_repo,
            series_repo,
        }
    }

    pub async fn fetch_progress(
        &self,
        user_id: i64,
        series_id: i64,
    ) -> Result<Option<ReadingProgress>, ProgressError> {
        Ok(self.progress_repo.get_progress(user_id, series_id).await?)
    }

    /// Most recently updated first.
    pub async fn fetch_progress_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Vec<ReadingProgress>, ProgressError> {
        Ok(self.progress_repo.get_progress_by_user_id(user_id).await?)
    }

    /// `progress` is a percentage and gets clamped into 0..=100.
    pub async fn update_progress(
        &self,
        user_id: i64,
        series_id: i64,
        chapter_id: i64,
        progress: i64,
    ) -> Result<ReadingProgress, ProgressError> {
        self.series_repo.get_series_by_id(series_id).await?;

        let chapter = self.chapter_repo.get_chapter_by_id(chapter_id).await?;
        if chapter.series_id != series_id {
            return Err(ProgressError::ChapterMismatch);
        }

        let progress = self
            .progress_repo
            .upsert_progress(&ReadingProgress {
                user_id,
                series_id,
                chapter_id,
                progress: progress.clamp(0, 100),
                ..Default::default()
            })
            .await?;

        Ok(progress)
    }
}
