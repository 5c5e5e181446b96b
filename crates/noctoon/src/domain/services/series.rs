use thiserror::Error;

use crate::{
    domain::{
        entities::series::{
            DEFAULT_RATING, GENRES, Series, SeriesFilter, SeriesPatch, SeriesStatus,
            is_known_genre,
        },
        repositories::series::{SeriesRepository, SeriesRepositoryError},
    },
    infrastructure::utils::escape_html,
};

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("series not found")]
    NotFound,
    #[error("{0}")]
    InvalidInput(String),
    #[error("repository error: {0}")]
    RepositoryError(SeriesRepositoryError),
}

impl From<SeriesRepositoryError> for SeriesError {
    fn from(e: SeriesRepositoryError) -> Self {
        match e {
            SeriesRepositoryError::NotFound => SeriesError::NotFound,
            e => SeriesError::RepositoryError(e),
        }
    }
}

/// Fields an admin supplies when publishing a new series.
#[derive(Debug, Clone, Default)]
pub struct NewSeries {
    pub title: String,
    pub description: Option<String>,
    pub genre: String,
    pub cover: String,
    pub author: Option<String>,
    pub status: Option<SeriesStatus>,
}

#[derive(Clone)]
pub struct SeriesService<R>
where
    R: SeriesRepository,
{
    repo: R,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_genre(genre: &str) -> Result<(), SeriesError> {
    if !is_known_genre(genre) {
        return Err(SeriesError::InvalidInput(format!(
            "Genre must be one of: {}",
            GENRES.join(", ")
        )));
    }
    Ok(())
}

impl<R> SeriesService<R>
where
    R: SeriesRepository,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn genres(&self) -> Vec<String> {
        GENRES.iter().map(|g| g.to_string()).collect()
    }

    pub async fn fetch_series(&self, filter: &SeriesFilter) -> Result<Vec<Series>, SeriesError> {
        Ok(self.repo.get_series(filter).await?)
    }

    /// A reader opening a series counts as a view.
    pub async fn view_series(&self, id: i64) -> Result<Series, SeriesError> {
        Ok(self.repo.increment_views(id).await?)
    }

    pub async fn fetch_series_by_id(&self, id: i64) -> Result<Series, SeriesError> {
        Ok(self.repo.get_series_by_id(id).await?)
    }

    pub async fn create_series(&self, input: NewSeries) -> Result<Series, SeriesError> {
        let title = input.title.trim();
        let genre = input.genre.trim();
        let cover = input.cover.trim();
        if title.is_empty() || genre.is_empty() || cover.is_empty() {
            return Err(SeriesError::InvalidInput(
                "Title, genre, and cover are required".to_string(),
            ));
        }
        check_genre(genre)?;

        let series = Series {
            title: escape_html(title),
            description: non_blank(input.description).map(|d| escape_html(&d)),
            genre: escape_html(genre),
            cover: cover.to_string(),
            status: input.status.unwrap_or_default(),
            author: non_blank(input.author).map(|a| escape_html(&a)),
            views: 0,
            rating: DEFAULT_RATING,
            ..Default::default()
        };

        let series = self.repo.insert_series(&series).await?;
        info!("created series {} ({})", series.id, series.title);

        Ok(series)
    }

    pub async fn update_series(&self, id: i64, patch: SeriesPatch) -> Result<Series, SeriesError> {
        let title = non_blank(patch.title.clone());
        if patch.title.is_some() && title.is_none() {
            return Err(SeriesError::InvalidInput("Title cannot be empty".to_string()));
        }

        let genre = non_blank(patch.genre.clone());
        match (&patch.genre, &genre) {
            (Some(_), None) => {
                return Err(SeriesError::InvalidInput("Genre cannot be empty".to_string()));
            }
            (_, Some(genre)) => check_genre(genre)?,
            _ => {}
        }

        let cover = non_blank(patch.cover.clone());
        if patch.cover.is_some() && cover.is_none() {
            return Err(SeriesError::InvalidInput("Cover cannot be empty".to_string()));
        }

        if let Some(rating) = patch.rating {
            if !(0..=100).contains(&rating) {
                return Err(SeriesError::InvalidInput(
                    "Rating must be between 0 and 100".to_string(),
                ));
            }
        }

        let patch = SeriesPatch {
            title: title.map(|t| escape_html(&t)),
            description: patch.description.map(|d| escape_html(d.trim())),
            genre: genre.map(|g| escape_html(&g)),
            cover,
            status: patch.status,
            author: patch.author.map(|a| escape_html(a.trim())),
            rating: patch.rating,
        };

        if patch.is_empty() {
            return self.fetch_series_by_id(id).await;
        }

        Ok(self.repo.update_series(id, &patch).await?)
    }

    pub async fn delete_series(&self, id: i64) -> Result<(), SeriesError> {
        self.repo.delete_series(id).await?;
        info!("deleted series {id}");

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::infrastructure::{database, repositories::series::SeriesRepositoryImpl};

    async fn service() -> SeriesService<SeriesRepositoryImpl> {
        let pool = database::establish_memory_connection().await.unwrap();
        SeriesService::new(SeriesRepositoryImpl::new(pool))
    }

    fn new_series(title: &str) -> NewSeries {
        NewSeries {
            title: title.to_string(),
            genre: "Aksiyon".to_string(),
            cover: "https://example.com/cover.jpg".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_series_defaults_and_escaping() {
        let svc = service().await;

        let series = svc
            .create_series(NewSeries {
                description: Some("<b>bold</b>".to_string()),
                author: Some("  ".to_string()),
                ..new_series("Tom & Jerry")
            })
            .await
            .unwrap();

        assert_eq!(series.title, "Tom &amp; Jerry");
        assert_eq!(series.description.as_deref(), Some("&lt;b&gt;bold&lt;&#x2F;b&gt;"));
        assert_eq!(series.author, None);
        assert_eq!(series.status, SeriesStatus::Ongoing);
        assert_eq!(series.views, 0);
        assert_eq!(series.rating, DEFAULT_RATING);
    }

    #[tokio::test]
    async fn test_create_series_requires_fields() {
        let svc = service().await;

        let err = svc.create_series(new_series("  ")).await.unwrap_err();
        assert_eq!(err.to_string(), "Title, genre, and cover are required");

        let err = svc
            .create_series(NewSeries {
                genre: "Western".to_string(),
                ..new_series("Kader Oyunu")
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SeriesError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_view_series_counts_views() {
        let svc = service().await;
        let series = svc.create_series(new_series("Yıldız Tozu")).await.unwrap();

        assert_eq!(svc.view_series(series.id).await.unwrap().views, 1);
        assert_eq!(svc.view_series(series.id).await.unwrap().views, 2);
        assert!(matches!(
            svc.view_series(series.id + 1).await,
            Err(SeriesError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_series_validation() {
        let svc = service().await;
        let series = svc.create_series(new_series("Demir Şövalye")).await.unwrap();

        assert!(matches!(
            svc.update_series(
                series.id,
                SeriesPatch {
                    rating: Some(101),
                    ..Default::default()
                }
            )
            .await,
            Err(SeriesError::InvalidInput(_))
        ));

        let updated = svc
            .update_series(
                series.id,
                SeriesPatch {
                    genre: Some("Tarihi".to_string()),
                    status: Some(SeriesStatus::Completed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.genre, "Tarihi");
        assert_eq!(updated.status, SeriesStatus::Completed);
        assert_eq!(updated.title, "Demir Şövalye");

        assert!(matches!(
            svc.update_series(999, SeriesPatch::default()).await,
            Err(SeriesError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_series() {
        let svc = service().await;

        assert!(matches!(svc.delete_series(1).await, Err(SeriesError::NotFound)));
    }
}
