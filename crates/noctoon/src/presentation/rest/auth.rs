use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use super::{error::ApiError, extractor::CurrentUser};
use crate::{
    domain::entities::user::User,
    infrastructure::{
        auth::{self, Claims},
        config::Config,
    },
    presentation::UserSvc,
};

#[derive(Debug, Deserialize)]
pub struct Credentials {
    username: Option<String>,
    password: Option<String>,
}

impl Credentials {
    fn required(self) -> Result<(String, String), ApiError> {
        match (self.username, self.password) {
            (Some(username), Some(password))
                if !username.trim().is_empty() && !password.is_empty() =>
            {
                Ok((username, password))
            }
            _ => Err(ApiError::BadRequest(
                "Username and password required".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthReply {
    pub token: String,
    pub user: User,
}

fn issue_token(config: &Config, user: User) -> Result<AuthReply, ApiError> {
    let token = auth::encode_jwt(&config.secret, &Claims::for_user(&user))
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(AuthReply { token, user })
}

pub async fn login(
    Extension(config): Extension<Config>,
    Extension(user_svc): Extension<UserSvc>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<AuthReply>, ApiError> {
    let Json(credentials) = payload?;
    let (username, password) = credentials.required()?;

    let user = user_svc.login(&username, &password).await?;

    Ok(Json(issue_token(&config, user)?))
}

pub async fn register(
    Extension(config): Extension<Config>,
    Extension(user_svc): Extension<UserSvc>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthReply>), ApiError> {
    let Json(credentials) = payload?;
    let (username, password) = credentials.required()?;

    let user = user_svc.register(&username, &password).await?;

    Ok((StatusCode::CREATED, Json(issue_token(&config, user)?)))
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{infrastructure::auth, presentation::test_util::test_app};

    #[tokio::test]
    async fn test_register_and_use_token() {
        let app = test_app().await;

        let (status, body) = app
            .send(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({ "username": "okur", "password": "password123" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["username"], "okur");
        assert_eq!(body["user"]["role"], "user");
        assert!(body["user"].get("password").is_none());
        assert!(body["user"]["createdAt"].is_string());

        let token = body["token"].as_str().unwrap().to_string();
        let claims = auth::decode_jwt(&app.config.secret, &token).unwrap();
        assert!(!claims.is_admin);

        let (status, body) = app.send("GET", "/api/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "okur");
    }

    #[tokio::test]
    async fn test_register_rejections() {
        let app = test_app().await;

        let (status, body) = app
            .send(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({ "username": "Admin", "password": "password123" })),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({ "error": "Username already exists" }));

        let (status, body) = app
            .send(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({ "username": "<b>x</b>", "password": "password123" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid input" }));

        let (status, _) = app
            .send(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({ "username": "okur", "password": "short" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login() {
        let app = test_app().await;

        let (status, body) = app
            .send(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({ "username": "ADMIN", "password": "admin123" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["role"], "admin");
        assert!(body["token"].is_string());

        let (status, body) = app
            .send(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({ "username": "admin", "password": "wrong-password" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Invalid credentials" }));

        let (status, body) = app
            .send(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({ "username": "admin" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Username and password required" }));
    }

    #[tokio::test]
    async fn test_me_requires_valid_token() {
        let app = test_app().await;

        let (status, body) = app.send("GET", "/api/auth/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Authentication required" }));

        let (status, _) = app
            .send("GET", "/api/auth/me", Some("not-a-token"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
