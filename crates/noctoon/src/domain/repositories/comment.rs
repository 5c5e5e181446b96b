use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::comment::Comment;

#[derive(Debug, Error)]
pub enum CommentRepositoryError {
    #[error("query return nothing")]
    NotFound,
    #[error("database return error: {0}")]
    DbError(#[from] sqlx::Error),
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Newest first.
    async fn get_comments_by_series_id(
        &self,
        series_id: i64,
    ) -> Result<Vec<Comment>, CommentRepositoryError>;

    /// Newest first across every series.
    async fn get_recent_comments(&self, limit: i64) -> Result<Vec<Comment>, CommentRepositoryError>;

    async fn insert_comment(&self, comment: &Comment) -> Result<Comment, CommentRepositoryError>;

    async fn delete_comment(&self, id: i64) -> Result<(), CommentRepositoryError>;
}
