use async_trait::async_trait;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::{
    domain::{
        entities::progress::ReadingProgress,
        repositories::progress::{ProgressRepository, ProgressRepositoryError},
    },
    infrastructure::database::Pool,
};

#[derive(Clone)]
pub struct ProgressRepositoryImpl {
    pool: Pool,
}

impl ProgressRepositoryImpl {
    pub fn new<P: Into<Pool>>(pool: P) -> Self {
        Self { pool: pool.into() }
    }
}

fn progress_from_row(row: SqliteRow) -> ReadingProgress {
    ReadingProgress {
        id: row.get(0),
        user_id: row.get(1),
        series_id: row.get(2),
        chapter_id: row.get(3),
        progress: row.get(4),
        updated_at: row.get(5),
    }
}

#[async_trait]
impl ProgressRepository for ProgressRepositoryImpl {
    async fn get_progress(
        &self,
        user_id: i64,
        series_id: i64,
    ) -> Result<Option<ReadingProgress>, ProgressRepositoryError> {
        let progress = sqlx::query(
            r#"SELECT id, user_id, series_id, chapter_id, progress, updated_at
            FROM reading_progress
            WHERE user_id = ? AND series_id = ?"#,
        )
        .bind(user_id)
        .bind(series_id)
        .fetch_optional(&self.pool as &SqlitePool)
        .await?
        .map(progress_from_row);

        Ok(progress)
    }

    async fn get_progress_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Vec<ReadingProgress>, ProgressRepositoryError> {
        let progress = sqlx::query(
            r#"SELECT id, user_id, series_id, chapter_id, progress, updated_at
            FROM reading_progress
            WHERE user_id = ?
            ORDER BY updated_at DESC, id DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool as &SqlitePool)
        .await?
        .into_par_iter()
        .map(progress_from_row)
        .collect();

        Ok(progress)
    }

    async fn upsert_progress(
        &self,
        progress: &ReadingProgress,
    ) -> Result<ReadingProgress, ProgressRepositoryError> {
        let row = sqlx::query(
            r#"INSERT INTO reading_progress(
                user_id,
                series_id,
                chapter_id,
                progress
            ) VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id, series_id) DO UPDATE SET
                chapter_id = excluded.chapter_id,
                progress = excluded.progress,
                updated_at = CURRENT_TIMESTAMP
            RETURNING id, user_id, series_id, chapter_id, progress, updated_at"#,
        )
        .bind(progress.user_id)
        .bind(progress.series_id)
        .bind(progress.chapter_id)
        .bind(progress.progress)
        .fetch_one(&self.pool as &SqlitePool)
        .await?;

        Ok(progress_from_row(row))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        domain::{
            entities::{chapter::Chapter, series::Series, user::User},
            repositories::{
                chapter::ChapterRepository, series::SeriesRepository, user::UserRepository,
            },
        },
        infrastructure::{
            database,
            repositories::{
                chapter::ChapterRepositoryImpl, series::SeriesRepositoryImpl,
                user::UserRepositoryImpl,
            },
        },
    };

    #[tokio::test]
    async fn test_upsert_keeps_one_row_per_series() {
        let pool = database::establish_memory_connection().await.unwrap();
        let user = UserRepositoryImpl::new(pool.clone())
            .insert_user(&User {
                username: "reader".to_string(),
                password: "hash".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let series = SeriesRepositoryImpl::new(pool.clone())
            .insert_series(&Series {
                title: "Demir Şövalye".to_string(),
                genre: "Tarihi".to_string(),
                cover: "https://example.com/cover.jpg".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let chapter_repo = ChapterRepositoryImpl::new(pool.clone());
        let mut chapter_ids = vec![];
        for number in 1..=2 {
            let chapter = chapter_repo
                .insert_chapter(&Chapter {
                    series_id: series.id,
                    number,
                    title: format!("Bölüm {number}"),
                    ..Default::default()
                })
                .await
                .unwrap();
            chapter_ids.push(chapter.id);
        }

        let repo = ProgressRepositoryImpl::new(pool);
        assert!(repo.get_progress(user.id, series.id).await.unwrap().is_none());

        let first = repo
            .upsert_progress(&ReadingProgress {
                user_id: user.id,
                series_id: series.id,
                chapter_id: chapter_ids[0],
                progress: 40,
                ..Default::default()
            })
            .await
            .unwrap();
        let second = repo
            .upsert_progress(&ReadingProgress {
                user_id: user.id,
                series_id: series.id,
                chapter_id: chapter_ids[1],
                progress: 10,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        let stored = repo.get_progress(user.id, series.id).await.unwrap().unwrap();
        assert_eq!(stored.chapter_id, chapter_ids[1]);
        assert_eq!(stored.progress, 10);
        assert_eq!(repo.get_progress_by_user_id(user.id).await.unwrap().len(), 1);

        chapter_repo.delete_chapter(chapter_ids[1]).await.unwrap();
        assert!(repo.get_progress(user.id, series.id).await.unwrap().is_none());
    }
}
