use thiserror::Error;

use crate::{
    domain::{
        entities::{comment::Comment, user::User},
        repositories::{
            comment::{CommentRepository, CommentRepositoryError},
            series::{SeriesRepository, SeriesRepositoryError},
        },
    },
    infrastructure::utils::sanitize_comment,
};

/// How many comments the moderation feed shows.
pub const RECENT_COMMENTS_LIMIT: i64 = 20;

#[derive(Debug, Error)]
pub enum CommentError {
    #[error("comment not found")]
    NotFound,
    #[error("series not found")]
    SeriesNotFound,
    #[error("empty comment")]
    EmptyComment,
    #[error("comment repository error: {0}")]
    CommentRepositoryError(CommentRepositoryError),
    #[error("series repository error: {0}")]
    SeriesRepositoryError(SeriesRepositoryError),
}

impl From<CommentRepositoryError> for CommentError {
    fn from(e: CommentRepositoryError) -> Self {
        match e {
            CommentRepositoryError::NotFound => CommentError::NotFound,
            e => CommentError::CommentRepositoryError(e),
        }
    }
}

impl From<SeriesRepositoryError> for CommentError {
    fn from(e: SeriesRepositoryError) -> Self {
        match e {
            SeriesRepositoryError::NotFound => CommentError::SeriesNotFound,
            e => CommentError::SeriesRepositoryError(e),
        }
    }
}

#[derive(Clone)]
pub struct CommentService<C, S>
where
    C: CommentRepository,
    S: SeriesRepository,
{
    comment_repo: C,
    series_repo: S,
}

impl<C, S> CommentService<C, S>
where
    C: CommentRepository,
    S: SeriesRepository,
{
    pub fn new(comment_repo: C, series_repo: S) -> Self {
        Self {
            comment_repo,
            series_repo,
        }
    }

    pub async fn fetch_comments_by_series_id(
        &self,
        series_id: i64,
    ) -> Result<Vec<Comment>, CommentError> {
        Ok(self.comment_repo.get_comments_by_series_id(series_id).await?)
    }

    pub async fn fetch_recent_comments(&self) -> Result<Vec<Comment>, CommentError> {
        Ok(self
            .comment_repo
            .get_recent_comments(RECENT_COMMENTS_LIMIT)
            .await?)
    }

    /// The author is always the authenticated user, never client input.
    pub async fn add_comment(
        &self,
        author: &User,
        series_id: i64,
        text: &str,
    ) -> Result<Comment, CommentError> {
        let text = sanitize_comment(text);
        if text.is_empty() {
            return Err(CommentError::EmptyComment);
        }

        self.series_repo.get_series_by_id(series_id).await?;

        let comment = self
            .comment_repo
            .insert_comment(&Comment {
                series_id,
                user_id: author.id,
                username: author.username.clone(),
                text,
                ..Default::default()
            })
            .await?;

        Ok(comment)
    }

    pub async fn delete_comment(&self, id: i64) -> Result<(), CommentError> {
        self.comment_repo.delete_comment(id).await?;
        info!("deleted comment {id}");

        Ok(())
    }
}
