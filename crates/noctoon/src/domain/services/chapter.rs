use chrono::NaiveDateTime;
use thiserror::Error;

use crate::{
    domain::{
        entities::chapter::Chapter,
        repositories::{
            chapter::{ChapterRepository, ChapterRepositoryError},
            series::{SeriesRepository, SeriesRepositoryError},
        },
    },
    infrastructure::utils::escape_html,
};

#[derive(Debug, Error)]
pub enum ChapterError {
    #[error("chapter not found")]
    NotFound,
    #[error("series not found")]
    SeriesNotFound,
    #[error("{0}")]
    InvalidInput(String),
    #[error("chapter repository error: {0}")]
    ChapterRepositoryError(ChapterRepositoryError),
    #[error("series repository error: {0}")]
    SeriesRepositoryError(SeriesRepositoryError),
}

impl From<ChapterRepositoryError> for ChapterError {
    fn from(e: ChapterRepositoryError) -> Self {
        match e {
            ChapterRepositoryError::NotFound => ChapterError::NotFound,
            e => ChapterError::ChapterRepositoryError(e),
        }
    }
}

impl From<SeriesRepositoryError> for ChapterError {
    fn from(e: SeriesRepositoryError) -> Self {
        match e {
            SeriesRepositoryError::NotFound => ChapterError::SeriesNotFound,
            e => ChapterError::SeriesRepositoryError(e),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewChapter {
    pub number: i64,
    pub title: String,
    pub pages: Vec<String>,
    pub publish_at: Option<NaiveDateTime>,
}

#[derive(Clone)]
pub struct ChapterService<C, S>
where
    C: ChapterRepository,
    S: SeriesRepository,
{
    chapter_repo: C,
    series_repo: S,
}

impl<C, S> ChapterService<C, S>
where
    C: ChapterRepository,
    S: SeriesRepository,
{
    pub fn new(chapter_repo: C, series_repo: S) -> Self {
        Self {
            chapter_repo,
            series_repo,
        }
    }

    pub async fn fetch_chapters_by_series_id(
        &self,
        series_id: i64,
    ) -> Result<Vec<Chapter>, ChapterError> {
        Ok(self.chapter_repo.get_chapters_by_series_id(series_id).await?)
    }

    pub async fn fetch_chapter_by_id(&self, id: i64) -> Result<Chapter, ChapterError> {
        Ok(self.chapter_repo.get_chapter_by_id(id).await?)
    }

    pub async fn create_chapter(
        &self,
        series_id: i64,
        input: NewChapter,
    ) -> Result<Chapter, ChapterError> {
        let title = input.title.trim();
        let pages: Vec<String> = input.pages.iter().map(|p| p.trim().to_string()).collect();
        if input.number < 1
            || title.is_empty()
            || pages.is_empty()
            || pages.iter().any(String::is_empty)
        {
            return Err(ChapterError::InvalidInput(
                "Number, title, and pages array are required".to_string(),
            ));
        }

        self.series_repo.get_series_by_id(series_id).await?;

        let chapter = self
            .chapter_repo
            .insert_chapter(&Chapter {
                series_id,
                number: input.number,
                title: escape_html(title),
                pages,
                publish_at: input.publish_at,
                ..Default::default()
            })
            .await?;
        info!(
            "created chapter {} of series {series_id} ({} pages)",
            chapter.number,
            chapter.pages.len()
        );

        Ok(chapter)
    }

    pub async fn delete_chapter(&self, id: i64) -> Result<(), ChapterError> {
        self.chapter_repo.delete_chapter(id).await?;
        info!("deleted chapter {id}");

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        domain::entities::series::Series,
        infrastructure::{
            database,
            repositories::{chapter::ChapterRepositoryImpl, series::SeriesRepositoryImpl},
        },
    };

    async fn setup() -> (ChapterService<ChapterRepositoryImpl, SeriesRepositoryImpl>, i64) {
        let pool = database::establish_memory_connection().await.unwrap();
        let series_repo = SeriesRepositoryImpl::new(pool.clone());
        let series = series_repo
            .insert_series(&Series {
                title: "Karanlığın Çocuğu".to_string(),
                genre: "Aksiyon".to_string(),
                cover: "https://example.com/cover.jpg".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        (
            ChapterService::new(ChapterRepositoryImpl::new(pool), series_repo),
            series.id,
        )
    }

    fn new_chapter(number: i64) -> NewChapter {
        NewChapter {
            number,
            title: format!("Bölüm {number}"),
            pages: vec!["https://example.com/1.jpg".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_chapter() {
        let (svc, series_id) = setup().await;

        let chapter = svc
            .create_chapter(
                series_id,
                NewChapter {
                    title: "<i>Başlangıç</i>".to_string(),
                    pages: vec![
                        " https://example.com/1.jpg ".to_string(),
                        "https://example.com/2.jpg".to_string(),
                    ],
                    ..new_chapter(1)
                },
            )
            .await
            .unwrap();

        assert_eq!(chapter.title, "&lt;i&gt;Başlangıç&lt;&#x2F;i&gt;");
        assert_eq!(
            chapter.pages,
            vec!["https://example.com/1.jpg", "https://example.com/2.jpg"]
        );
        assert_eq!(
            svc.fetch_chapters_by_series_id(series_id).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_create_chapter_validation() {
        let (svc, series_id) = setup().await;

        for input in [
            new_chapter(0),
            NewChapter {
                title: " ".to_string(),
                ..new_chapter(1)
            },
            NewChapter {
                pages: vec![],
                ..new_chapter(1)
            },
            NewChapter {
                pages: vec!["https://example.com/1.jpg".to_string(), "  ".to_string()],
                ..new_chapter(1)
            },
        ] {
            let err = svc.create_chapter(series_id, input).await.unwrap_err();
            assert_eq!(err.to_string(), "Number, title, and pages array are required");
        }

        assert!(matches!(
            svc.create_chapter(series_id + 1, new_chapter(1)).await,
            Err(ChapterError::SeriesNotFound)
        ));
    }

    #[tokio::test]
    async fn test_missing_chapter() {
        let (svc, _) = setup().await;

        assert!(matches!(
            svc.fetch_chapter_by_id(1).await,
            Err(ChapterError::NotFound)
        ));
        assert!(matches!(svc.delete_chapter(1).await, Err(ChapterError::NotFound)));
    }
}
