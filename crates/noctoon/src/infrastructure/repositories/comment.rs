use async_trait::async_trait;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::{
    domain::{
        entities::comment::Comment,
        repositories::comment::{CommentRepository, CommentRepositoryError},
    },
    infrastructure::database::Pool,
};

#[derive(Clone)]
pub struct CommentRepositoryImpl {
    pool: Pool,
}

impl CommentRepositoryImpl {
    pub fn new<P: Into<Pool>>(pool: P) -> Self {
        Self { pool: pool.into() }
    }
}

fn comment_from_row(row: SqliteRow) -> Comment {
    Comment {
        id: row.get(0),
        series_id: row.get(1),
        user_id: row.get(2),
        username: row.get(3),
        text: row.get(4),
        created_at: row.get(5),
    }
}

#[async_trait]
impl CommentRepository for CommentRepositoryImpl {
    async fn get_comments_by_series_id(
        &self,
        series_id: i64,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let comments = sqlx::query(
            r#"SELECT id, series_id, user_id, username, text, created_at
            FROM comment
            WHERE series_id = ?
            ORDER BY created_at DESC, id DESC"#,
        )
        .bind(series_id)
        .fetch_all(&self.pool as &SqlitePool)
        .await?
        .into_par_iter()
        .map(comment_from_row)
        .collect();

        Ok(comments)
    }

    async fn get_recent_comments(&self, limit: i64) -> Result<Vec<Comment>, CommentRepositoryError> {
        let comments = sqlx::query(
            r#"SELECT id, series_id, user_id, username, text, created_at
            FROM comment
            ORDER BY created_at DESC, id DESC
            LIMIT ?"#,
        )
        .bind(limit)
        .fetch_all(&self.pool as &SqlitePool)
        .await?
        .into_par_iter()
        .map(comment_from_row)
        .collect();

        Ok(comments)
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<Comment, CommentRepositoryError> {
        let row = sqlx::query(
            r#"INSERT INTO comment(
                series_id,
                user_id,
                username,
                text
            ) VALUES (?, ?, ?, ?)
            RETURNING id, series_id, user_id, username, text, created_at"#,
        )
        .bind(comment.series_id)
        .bind(comment.user_id)
        .bind(&comment.username)
        .bind(&comment.text)
        .fetch_one(&self.pool as &SqlitePool)
        .await?;

        Ok(comment_from_row(row))
    }

    async fn delete_comment(&self, id: i64) -> Result<(), CommentRepositoryError> {
        let affected = sqlx::query("DELETE FROM comment WHERE id = ?")
            .bind(id)
            .execute(&self.pool as &SqlitePool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(CommentRepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        domain::{
            entities::{series::Series, user::User},
            repositories::{series::SeriesRepository, user::UserRepository},
        },
        infrastructure::{
            database,
            repositories::{series::SeriesRepositoryImpl, user::UserRepositoryImpl},
        },
    };

    async fn setup() -> (CommentRepositoryImpl, i64, User) {
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
                title: "Yıldız Tozu".to_string(),
                genre: "Bilim Kurgu".to_string(),
                cover: "https://example.com/cover.jpg".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        (CommentRepositoryImpl::new(pool), series.id, user)
    }

    fn comment(series_id: i64, user: &User, text: &str) -> Comment {
        Comment {
            series_id,
            user_id: user.id,
            username: user.username.clone(),
            text: text.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_comments_newest_first() {
        let (repo, series_id, user) = setup().await;

        for text in ["first", "second", "third"] {
            repo.insert_comment(&comment(series_id, &user, text)).await.unwrap();
        }

        let comments = repo.get_comments_by_series_id(series_id).await.unwrap();
        assert_eq!(
            comments.iter().map(|c| c.text.as_str()).collect::<Vec<_>>(),
            vec!["third", "second", "first"]
        );
        assert_eq!(comments[0].username, "reader");

        let recent = repo.get_recent_comments(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].text, "third");
    }

    #[tokio::test]
    async fn test_delete_comment() {
        let (repo, series_id, user) = setup().await;
        let inserted = repo
            .insert_comment(&comment(series_id, &user, "hello"))
            .await
            .unwrap();

        repo.delete_comment(inserted.id).await.unwrap();

        assert!(repo.get_comments_by_series_id(series_id).await.unwrap().is_empty());
        assert!(matches!(
            repo.delete_comment(inserted.id).await,
            Err(CommentRepositoryError::NotFound)
        ));
    }
}
