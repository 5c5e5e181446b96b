use async_trait::async_trait;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::{
    domain::{
        entities::chapter::Chapter,
        repositories::chapter::{ChapterRepository, ChapterRepositoryError},
    },
    infrastructure::database::Pool,
};

#[derive(Clone)]
pub struct ChapterRepositoryImpl {
    pool: Pool,
}

impl ChapterRepositoryImpl {
    pub fn new<P: Into<Pool>>(pool: P) -> Self {
        Self { pool: pool.into() }
    }
}

/// Pages are kept as a JSON array of urls.
fn chapter_from_row(row: SqliteRow) -> Chapter {
    Chapter {
        id: row.get(0),
        series_id: row.get(1),
        number: row.get(2),
        title: row.get(3),
        pages: serde_json::from_str(row.get::<&str, _>(4)).unwrap_or_default(),
        publish_at: row.get(5),
    }
}

#[async_trait]
impl ChapterRepository for ChapterRepositoryImpl {
    async fn get_chapters_by_series_id(
        &self,
        series_id: i64,
    ) -> Result<Vec<Chapter>, ChapterRepositoryError> {
        let chapters = sqlx::query(
            r#"SELECT id, series_id, number, title, pages, publish_at
            FROM chapter
            WHERE series_id = ?
            ORDER BY number, id"#,
        )
        .bind(series_id)
        .fetch_all(&self.pool as &SqlitePool)
        .await?
        .into_par_iter()
        .map(chapter_from_row)
        .collect();

        Ok(chapters)
    }

    async fn get_chapter_by_id(&self, id: i64) -> Result<Chapter, ChapterRepositoryError> {
        sqlx::query(
            r#"SELECT id, series_id, number, title, pages, publish_at
            FROM chapter
            WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool as &SqlitePool)
        .await?
        .map(chapter_from_row)
        .ok_or(ChapterRepositoryError::NotFound)
    }

    async fn insert_chapter(&self, chapter: &Chapter) -> Result<Chapter, ChapterRepositoryError> {
        let pages = serde_json::to_string(&chapter.pages).map_err(anyhow::Error::from)?;

        let row = sqlx::query(
            r#"INSERT INTO chapter(
                series_id,
                number,
                title,
                pages,
                publish_at
            ) VALUES (?, ?, ?, ?, ?)
            RETURNING id, series_id, number, title, pages, publish_at"#,
        )
        .bind(chapter.series_id)
        .bind(chapter.number)
        .bind(&chapter.title)
        .bind(&pages)
        .bind(chapter.publish_at)
        .fetch_one(&self.pool as &SqlitePool)
        .await?;

        Ok(chapter_from_row(row))
    }

    async fn delete_chapter(&self, id: i64) -> Result<(), ChapterRepositoryError> {
        let affected = sqlx::query("DELETE FROM chapter WHERE id = ?")
            .bind(id)
            .execute(&self.pool as &SqlitePool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(ChapterRepositoryError::NotFound);
        }

        Ok(())
    }
}
