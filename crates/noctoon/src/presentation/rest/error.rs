use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::domain::services::{
    admin::AdminError, chapter::ChapterError, comment::CommentError,
    engagement::EngagementError, progress::ProgressError, series::SeriesError, user::UserError,
};

/// Every failure a REST handler can answer with. The message of the
/// client-facing variants is sent as `{ "error": message }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Too many requests, please try again later.")]
    TooManyRequests,
    #[error("Too many authentication attempts, please try again later.")]
    TooManyAuthAttempts,
    /// Server side misconfiguration the operator should see, message is public.
    #[error("{0}")]
    Unavailable(String),
    /// Details only go to the log.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn invalid_input() -> Self {
        ApiError::BadRequest("Invalid input".to_string())
    }

    pub fn authentication_required() -> Self {
        ApiError::Unauthorized("Authentication required".to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::TooManyRequests | Self::TooManyAuthAttempts => StatusCode::TOO_MANY_REQUESTS,
            Self::Unavailable(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Internal(details) => {
                error!("internal error: {details}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (self.status_code(), Json(json!({ "error": message }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("rejected body: {rejection}");
        ApiError::invalid_input()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        debug!("rejected query: {rejection}");
        ApiError::invalid_input()
    }
}

impl From<UserError> for ApiError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::UserNotFound => ApiError::NotFound("User not found".to_string()),
            UserError::WrongPassword => ApiError::Unauthorized("Invalid credentials".to_string()),
            UserError::InvalidUsername => ApiError::invalid_input(),
            UserError::InsufficientPasswordLength => {
                ApiError::BadRequest("Password must be at least 8 characters".to_string())
            }
            UserError::UsernameTaken => ApiError::Conflict("Username already exists".to_string()),
            e => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<SeriesError> for ApiError {
    fn from(e: SeriesError) -> Self {
        match e {
            SeriesError::NotFound => ApiError::NotFound("Series not found".to_string()),
            SeriesError::InvalidInput(message) => ApiError::BadRequest(message),
            e => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<ChapterError> for ApiError {
    fn from(e: ChapterError) -> Self {
        match e {
            ChapterError::NotFound => ApiError::NotFound("Chapter not found".to_string()),
            ChapterError::SeriesNotFound => ApiError::NotFound("Series not found".to_string()),
            ChapterError::InvalidInput(message) => ApiError::BadRequest(message),
            e => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<CommentError> for ApiError {
    fn from(e: CommentError) -> Self {
        match e {
            CommentError::NotFound => ApiError::NotFound("Comment not found".to_string()),
            CommentError::SeriesNotFound => ApiError::NotFound("Series not found".to_string()),
            CommentError::EmptyComment => ApiError::invalid_input(),
            e => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<EngagementError> for ApiError {
    fn from(e: EngagementError) -> Self {
        match e {
            EngagementError::SeriesNotFound => ApiError::NotFound("Series not found".to_string()),
            e => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<ProgressError> for ApiError {
    fn from(e: ProgressError) -> Self {
        match e {
            ProgressError::SeriesNotFound => ApiError::NotFound("Series not found".to_string()),
            ProgressError::ChapterMismatch => {
                ApiError::BadRequest("Chapter does not belong to this series".to_string())
            }
            e => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<AdminError> for ApiError {
    fn from(e: AdminError) -> Self {
        match e {
            AdminError::UploadNotConfigured => {
                ApiError::Unavailable("Upload signing is not configured".to_string())
            }
            e => ApiError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::invalid_input().status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::authentication_required().status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(UserError::UsernameTaken).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(SeriesError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(AdminError::UploadNotConfigured).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::TooManyRequests.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[tokio::test]
    async fn test_internal_details_are_not_sent() {
        let response = ApiError::Internal("no such table: series".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }

    #[test]
    fn test_login_failures_share_message() {
        assert_eq!(
            ApiError::from(UserError::WrongPassword).to_string(),
            "Invalid credentials"
        );
    }
}
