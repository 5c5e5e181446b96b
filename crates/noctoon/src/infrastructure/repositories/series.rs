use async_trait::async_trait;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool, sqlite::SqliteRow};

use crate::{
    domain::{
        entities::series::{Series, SeriesFilter, SeriesPatch, SeriesSort},
        repositories::series::{SeriesRepository, SeriesRepositoryError},
    },
    infrastructure::database::Pool,
};

const SERIES_COLUMNS: &str =
    "id, title, description, genre, cover, status, author, views, rating, created_at";

#[derive(Clone)]
pub struct SeriesRepositoryImpl {
    pool: Pool,
}

impl SeriesRepositoryImpl {
    pub fn new<P: Into<Pool>>(pool: P) -> Self {
        Self { pool: pool.into() }
    }
}

fn series_from_row(row: SqliteRow) -> Series {
    Series {
        id: row.get(0),
        title: row.get(1),
        description: row.get(2),
        genre: row.get(3),
        cover: row.get(4),
        status: row.get::<String, _>(5).parse().unwrap_or_default(),
        author: row.get(6),
        views: row.get(7),
        rating: row.get(8),
        created_at: row.get(9),
    }
}

#[async_trait]
impl SeriesRepository for SeriesRepositoryImpl {
    async fn get_series(&self, filter: &SeriesFilter) -> Result<Vec<Series>, SeriesRepositoryError> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {SERIES_COLUMNS} FROM series WHERE 1 = 1"
        ));

        if let Some(genre) = &filter.genre {
            qb.push(" AND genre = ").push_bind(genre);
        }
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }

        qb.push(match filter.sort {
            SeriesSort::Default => " ORDER BY id",
            SeriesSort::Popular => " ORDER BY views DESC, id",
            SeriesSort::Rating => " ORDER BY rating DESC, id",
            SeriesSort::Title => " ORDER BY title COLLATE NOCASE, id",
        });

        let series: Vec<Series> = qb
            .build()
            .fetch_all(&self.pool as &SqlitePool)
            .await?
            .into_par_iter()
            .map(series_from_row)
            .collect();

        // SQLite only folds ASCII case, titles are mostly Turkish.
        let series = match filter.query.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => {
                let query = query.to_lowercase();
                series
                    .into_iter()
                    .filter(|s| {
                        s.title.to_lowercase().contains(&query)
                            || s
                                .author
                                .as_deref()
                                .is_some_and(|a| a.to_lowercase().contains(&query))
                    })
                    .collect()
            }
            _ => series,
        };

        Ok(series)
    }

    async fn get_series_by_id(&self, id: i64) -> Result<Series, SeriesRepositoryError> {
        sqlx::query(&format!("SELECT {SERIES_COLUMNS} FROM series WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool as &SqlitePool)
            .await?
            .map(series_from_row)
            .ok_or(SeriesRepositoryError::NotFound)
    }

    async fn insert_series(&self, series: &Series) -> Result<Series, SeriesRepositoryError> {
        let row = sqlx::query(&format!(
            r#"INSERT INTO series(
                title,
                description,
                genre,
                cover,
                status,
                author,
                views,
                rating
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {SERIES_COLUMNS}"#
        ))
        .bind(&series.title)
        .bind(&series.description)
        .bind(&series.genre)
        .bind(&series.cover)
        .bind(series.status.as_str())
        .bind(&series.author)
        .bind(series.views)
        .bind(series.rating)
        .fetch_one(&self.pool as &SqlitePool)
        .await?;

        Ok(series_from_row(row))
    }

    async fn update_series(
        &self,
        id: i64,
        patch: &SeriesPatch,
    ) -> Result<Series, SeriesRepositoryError> {
        sqlx::query(&format!(
            r#"UPDATE series SET
                title = COALESCE(?, title),
                description = COALESCE(?, description),
                genre = COALESCE(?, genre),
                cover = COALESCE(?, cover),
                status = COALESCE(?, status),
                author = COALESCE(?, author),
                rating = COALESCE(?, rating)
            WHERE id = ?
            RETURNING {SERIES_COLUMNS}"#
        ))
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(&patch.genre)
        .bind(&patch.cover)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(&patch.author)
        .bind(patch.rating)
        .bind(id)
        .fetch_optional(&self.pool as &SqlitePool)
        .await?
        .map(series_from_row)
        .ok_or(SeriesRepositoryError::NotFound)
    }

    async fn delete_series(&self, id: i64) -> Result<(), SeriesRepositoryError> {
        let affected = sqlx::query("DELETE FROM series WHERE id = ?")
            .bind(id)
            .execute(&self.pool as &SqlitePool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(SeriesRepositoryError::NotFound);
        }

        Ok(())
    }

    async fn increment_views(&self, id: i64) -> Result<Series, SeriesRepositoryError> {
        sqlx::query(&format!(
            "UPDATE series SET views = views + 1 WHERE id = ? RETURNING {SERIES_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool as &SqlitePool)
        .await?
        .map(series_from_row)
        .ok_or(SeriesRepositoryError::NotFound)
    }

    async fn get_series_count(&self) -> Result<i64, SeriesRepositoryError> {
        let row = sqlx::query("SELECT COUNT(1) FROM series")
            .fetch_one(&self.pool as &SqlitePool)
            .await?;

        Ok(row.get(0))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{domain::entities::series::SeriesStatus, infrastructure::database};

    async fn repo_with_series() -> SeriesRepositoryImpl {
        let repo = SeriesRepositoryImpl::new(database::establish_memory_connection().await.unwrap());

        for (title, genre, status, author, views, rating) in [
            ("Gümüş Ay Efsanesi", "Fantastik", SeriesStatus::Completed, "Luna Silver", 300, 95),
            ("Demir Şövalye", "Tarihi", SeriesStatus::Ongoing, "Arthur Knight", 100, 90),
            ("Aşkın Melodisi", "Romantik", SeriesStatus::Ongoing, "Melody Rose", 200, 97),
        ] {
            repo.insert_series(&Series {
                title: title.to_string(),
                genre: genre.to_string(),
                cover: "https://example.com/cover.jpg".to_string(),
                status,
                author: Some(author.to_string()),
                views,
                rating,
                ..Default::default()
            })
            .await
            .unwrap();
        }

        repo
    }

    fn titles(series: &[Series]) -> Vec<&str> {
        series.iter().map(|s| s.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_get_series_sorting() {
        let repo = repo_with_series().await;

        let by_default = repo.get_series(&SeriesFilter::default()).await.unwrap();
        assert_eq!(
            titles(&by_default),
            vec!["Gümüş Ay Efsanesi", "Demir Şövalye", "Aşkın Melodisi"]
        );

        let popular = repo
            .get_series(&SeriesFilter {
                sort: SeriesSort::Popular,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(
            titles(&popular),
            vec!["Gümüş Ay Efsanesi", "Aşkın Melodisi", "Demir Şövalye"]
        );

        let rating = repo
            .get_series(&SeriesFilter {
                sort: SeriesSort::Rating,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(rating[0].title, "Aşkın Melodisi");
    }

    #[tokio::test]
    async fn test_get_series_filters() {
        let repo = repo_with_series().await;

        let ongoing = repo
            .get_series(&SeriesFilter {
                status: Some(SeriesStatus::Ongoing),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(ongoing.len(), 2);

        let fantasy = repo
            .get_series(&SeriesFilter {
                genre: Some("Fantastik".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(titles(&fantasy), vec!["Gümüş Ay Efsanesi"]);

        let by_title = repo
            .get_series(&SeriesFilter {
                query: Some("GÜMÜŞ".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(titles(&by_title), vec!["Gümüş Ay Efsanesi"]);

        let by_author = repo
            .get_series(&SeriesFilter {
                query: Some("knight".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(titles(&by_author), vec!["Demir Şövalye"]);
    }

    #[tokio::test]
    async fn test_increment_views() {
        let repo = repo_with_series().await;

        let series = repo.increment_views(2).await.unwrap();
        assert_eq!(series.views, 101);
        assert_eq!(repo.get_series_by_id(2).await.unwrap().views, 101);

        assert!(matches!(
            repo.increment_views(99).await,
            Err(SeriesRepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_series_keeps_unset_fields() {
        let repo = repo_with_series().await;

        let updated = repo
            .update_series(
                1,
                &SeriesPatch {
                    title: Some("Yeni Başlık".to_string()),
                    rating: Some(60),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Yeni Başlık");
        assert_eq!(updated.rating, 60);
        assert_eq!(updated.genre, "Fantastik");
        assert_eq!(updated.status, SeriesStatus::Completed);
        assert_eq!(updated.author.as_deref(), Some("Luna Silver"));

        assert!(matches!(
            repo.update_series(99, &SeriesPatch::default()).await,
            Err(SeriesRepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_series() {
        let repo = repo_with_series().await;

        repo.delete_series(1).await.unwrap();
        assert_eq!(repo.get_series_count().await.unwrap(), 2);
        assert!(matches!(
            repo.delete_series(1).await,
            Err(SeriesRepositoryError::NotFound)
        ));
    }
}
