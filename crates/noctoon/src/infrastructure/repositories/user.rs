use async_trait::async_trait;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::{
    domain::{
        entities::user::User,
        repositories::user::{UserRepository, UserRepositoryError},
    },
    infrastructure::database::Pool,
};

#[derive(Clone)]
pub struct UserRepositoryImpl {
    pool: Pool,
}

impl UserRepositoryImpl {
    pub fn new<P: Into<Pool>>(pool: P) -> Self {
        Self { pool: pool.into() }
    }
}

fn user_from_row(row: SqliteRow) -> User {
    User {
        id: row.get(0),
        username: row.get(1),
        password: row.get(2),
        role: row.get::<String, _>(3).parse().unwrap_or_default(),
        avatar: row.get(4),
        created_at: row.get(5),
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn insert_user(&self, user: &User) -> Result<User, UserRepositoryError> {
        let row = sqlx::query(
            r#"INSERT INTO user(
                username,
                password,
                role,
                avatar
            ) VALUES (?, ?, ?, ?)
            RETURNING id, username, password, role, avatar, created_at"#,
        )
        .bind(&user.username)
        .bind(&user.password)
        .bind(user.role.as_str())
        .bind(&user.avatar)
        .fetch_one(&self.pool as &SqlitePool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                UserRepositoryError::Conflict
            }
            e => UserRepositoryError::DbError(e),
        })?;

        Ok(user_from_row(row))
    }

    async fn get_users(&self) -> Result<Vec<User>, UserRepositoryError> {
        let users = sqlx::query(
            r#"SELECT id, username, password, role, avatar, created_at
            FROM user
            ORDER BY id"#,
        )
        .fetch_all(&self.pool as &SqlitePool)
        .await?
        .into_par_iter()
        .map(user_from_row)
        .collect();

        Ok(users)
    }

    async fn get_users_count(&self) -> Result<i64, UserRepositoryError> {
        let row = sqlx::query(r#"SELECT COUNT(1) FROM user"#)
            .fetch_one(&self.pool as &SqlitePool)
            .await?;

        Ok(row.get(0))
    }

    async fn get_user_by_id(&self, id: i64) -> Result<User, UserRepositoryError> {
        sqlx::query(
            r#"SELECT id, username, password, role, avatar, created_at
            FROM user
            WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool as &SqlitePool)
        .await?
        .map(user_from_row)
        .ok_or(UserRepositoryError::NotFound)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User, UserRepositoryError> {
        sqlx::query(
            r#"SELECT id, username, password, role, avatar, created_at
            FROM user
            WHERE username = ? COLLATE NOCASE"#,
        )
        .bind(username)
        .fetch_optional(&self.pool as &SqlitePool)
        .await?
        .map(user_from_row)
        .ok_or(UserRepositoryError::NotFound)
    }
}
