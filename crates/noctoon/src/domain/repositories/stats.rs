use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::stats::Stats;

#[derive(Debug, Error)]
pub enum StatsRepositoryError {
    #[error("database return error: {0}")]
    DbError(#[from] sqlx::Error),
}

#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn get_stats(&self) -> Result<Stats, StatsRepositoryError>;
}
