use async_trait::async_trait;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use sqlx::{Row, SqlitePool};

use crate::{
    domain::{
        entities::engagement::Engagement,
        repositories::engagement::{EngagementRepository, EngagementRepositoryError},
    },
    infrastructure::database::Pool,
};

#[derive(Clone)]
pub struct EngagementRepositoryImpl {
    pool: Pool,
}

impl EngagementRepositoryImpl {
    pub fn new<P: Into<Pool>>(pool: P) -> Self {
        Self { pool: pool.into() }
    }
}

#[async_trait]
impl EngagementRepository for EngagementRepositoryImpl {
    async fn toggle(
        &self,
        kind: Engagement,
        user_id: i64,
        series_id: i64,
    ) -> Result<bool, EngagementRepositoryError> {
        let table = kind.table();
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query(&format!(
            "DELETE FROM {table} WHERE user_id = ? AND series_id = ?"
        ))
        .bind(user_id)
        .bind(series_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if removed == 0 {
            sqlx::query(&format!(
                "INSERT INTO {table} (user_id, series_id) VALUES (?, ?)"
            ))
            .bind(user_id)
            .bind(series_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(removed == 0)
    }

    async fn exists(
        &self,
        kind: Engagement,
        user_id: i64,
        series_id: i64,
    ) -> Result<bool, EngagementRepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE user_id = ? AND series_id = ?)",
            kind.table()
        ))
        .bind(user_id)
        .bind(series_id)
        .fetch_one(&self.pool as &SqlitePool)
        .await?;

        Ok(row.get(0))
    }

    async fn get_series_ids_by_user_id(
        &self,
        kind: Engagement,
        user_id: i64,
    ) -> Result<Vec<i64>, EngagementRepositoryError> {
        let ids = sqlx::query(&format!(
            "SELECT series_id FROM {} WHERE user_id = ? ORDER BY id",
            kind.table()
        ))
        .bind(user_id)
        .fetch_all(&self.pool as &SqlitePool)
        .await?
        .into_par_iter()
        .map(|row| row.get(0))
        .collect();

        Ok(ids)
    }

    async fn count_by_series_id(
        &self,
        kind: Engagement,
        series_id: i64,
    ) -> Result<i64, EngagementRepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT COUNT(1) FROM {} WHERE series_id = ?",
            kind.table()
        ))
        .bind(series_id)
        .fetch_one(&self.pool as &SqlitePool)
        .await?;

        Ok(row.get(0))
    }
}
