use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::{
    domain::{
        entities::stats::Stats,
        repositories::stats::{StatsRepository, StatsRepositoryError},
    },
    infrastructure::database::Pool,
};

#[derive(Clone)]
pub struct StatsRepositoryImpl {
    pool: Pool,
}

impl StatsRepositoryImpl {
    pub fn new<P: Into<Pool>>(pool: P) -> Self {
        Self { pool: pool.into() }
    }
}

#[async_trait]
impl StatsRepository for StatsRepositoryImpl {
    async fn get_stats(&self) -> Result<Stats, StatsRepositoryError> {
        let row = sqlx::query(
            r#"SELECT
                (SELECT COUNT(1) FROM series),
                (SELECT COUNT(1) FROM user),
                (SELECT COUNT(1) FROM comment),
                (SELECT COUNT(1) FROM series_like),
                (SELECT COUNT(1) FROM series_favorite)"#,
        )
        .fetch_one(&self.pool as &SqlitePool)
        .await?;

        Ok(Stats {
            total_series: row.get(0),
            total_users: row.get(1),
            total_comments: row.get(2),
            total_likes: row.get(3),
            total_favorites: row.get(4),
        })
    }
}
