use rand::Rng;
use thiserror::Error;

use crate::{
    domain::{
        entities::user::{Role, User},
        repositories::user::{UserRepository, UserRepositoryError},
    },
    infrastructure::utils,
};

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    UserNotFound,
    #[error("incorrect password")]
    WrongPassword,
    #[error("invalid username")]
    InvalidUsername,
    #[error("insufficient password length")]
    InsufficientPasswordLength,
    #[error("username already exists")]
    UsernameTaken,
    #[error("repository error: {0}")]
    RepositoryError(#[from] UserRepositoryError),
    #[error("other: {0}")]
    Other(String),
}

#[derive(Clone)]
pub struct UserService<R>
where
    R: UserRepository,
{
    repo: R,
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<User, UserError> {
        let username = username.trim();
        if !utils::is_valid_username(username) {
            return Err(UserError::InvalidUsername);
        }

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(UserError::InsufficientPasswordLength);
        }

        let mut salt: [u8; 32] = [0; 32];
        rand::rng().fill(&mut salt);

        let hash = {
            let config = argon2::Config::default();
            argon2::hash_encoded(password.as_bytes(), &salt, &config)
                .map_err(|e| UserError::Other(format!("{e}")))?
        };

        let user = User {
            username: username.to_string(),
            password: hash,
            role,
            ..Default::default()
        };

        match self.repo.insert_user(&user).await {
            Ok(user) => Ok(user),
            Err(UserRepositoryError::Conflict) => Err(UserError::UsernameTaken),
            Err(e) => Err(e.into()),
        }
    }

    /// Self sign-up always produces a regular user.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, UserError> {
        let user = self.create_user(username, password, Role::User).await?;
        info!("registered user {}", user.username);

        Ok(user)
    }

    /// Unknown usernames report [`UserError::WrongPassword`] as well, so
    /// callers cannot probe which accounts exist.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, UserError> {
        let user = match self.repo.get_user_by_username(username.trim()).await {
            Ok(user) => user,
            Err(UserRepositoryError::NotFound) => return Err(UserError::WrongPassword),
            Err(e) => return Err(e.into()),
        };

        if !argon2::verify_encoded(&user.password, password.as_bytes())
            .map_err(|e| UserError::Other(format!("{e}")))?
        {
            return Err(UserError::WrongPassword);
        }

        Ok(user)
    }

    pub async fn fetch_all_users(&self) -> Result<Vec<User>, UserError> {
        Ok(self.repo.get_users().await?)
    }

    pub async fn fetch_user_by_id(&self, user_id: i64) -> Result<User, UserError> {
        match self.repo.get_user_by_id(user_id).await {
            Ok(user) => Ok(user),
            Err(UserRepositoryError::NotFound) => Err(UserError::UserNotFound),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn fetch_users_count(&self) -> Result<i64, UserError> {
        Ok(self.repo.get_users_count().await?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::infrastructure::{database, repositories::user::UserRepositoryImpl};

    async fn service() -> UserService<UserRepositoryImpl> {
        let pool = database::establish_memory_connection().await.unwrap();
        UserService::new(UserRepositoryImpl::new(pool))
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let svc = service().await;

        let user = svc.register("  reader  ", "password123").await.unwrap();
        assert_eq!(user.username, "reader");
        assert_eq!(user.role, Role::User);
        assert_ne!(user.password, "password123");

        let logged_in = svc.login("READER", "password123").await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_login_failures_look_the_same() {
        let svc = service().await;
        svc.register("reader", "password123").await.unwrap();

        assert!(matches!(
            svc.login("reader", "wrong-password").await,
            Err(UserError::WrongPassword)
        ));
        assert!(matches!(
            svc.login("nobody", "password123").await,
            Err(UserError::WrongPassword)
        ));
    }

    #[tokio::test]
    async fn test_register_validation() {
        let svc = service().await;

        assert!(matches!(
            svc.register("ab", "password123").await,
            Err(UserError::InvalidUsername)
        ));
        assert!(matches!(
            svc.register("<script>", "password123").await,
            Err(UserError::InvalidUsername)
        ));
        assert!(matches!(
            svc.register("reader", "short").await,
            Err(UserError::InsufficientPasswordLength)
        ));

        svc.register("reader", "password123").await.unwrap();
        assert!(matches!(
            svc.register("Reader", "password123").await,
            Err(UserError::UsernameTaken)
        ));
    }

    #[tokio::test]
    async fn test_fetch_missing_user() {
        let svc = service().await;

        assert!(matches!(
            svc.fetch_user_by_id(1).await,
            Err(UserError::UserNotFound)
        ));
    }
}
