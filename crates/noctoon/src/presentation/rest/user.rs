use axum::{Json, extract::Extension};

use super::{
    error::ApiError,
    extractor::{CurrentUser, MaybeUser},
};
use crate::{
    domain::entities::{engagement::Engagement, progress::ReadingProgress},
    presentation::{EngagementSvc, ProgressSvc},
};

async fn series_ids(
    user: MaybeUser,
    engagement_svc: EngagementSvc,
    kind: Engagement,
) -> Result<Json<Vec<i64>>, ApiError> {
    let ids = match user.0 {
        Some(user) => engagement_svc.fetch_series_ids(kind, user.id).await?,
        None => vec![],
    };

    Ok(Json(ids))
}

/// Anonymous callers get an empty list.
pub async fn likes(
    user: MaybeUser,
    Extension(engagement_svc): Extension<EngagementSvc>,
) -> Result<Json<Vec<i64>>, ApiError> {
    series_ids(user, engagement_svc, Engagement::Like).await
}

pub async fn favorites(
    user: MaybeUser,
    Extension(engagement_svc): Extension<EngagementSvc>,
) -> Result<Json<Vec<i64>>, ApiError> {
    series_ids(user, engagement_svc, Engagement::Favorite).await
}

pub async fn progress(
    CurrentUser(user): CurrentUser,
    Extension(progress_svc): Extension<ProgressSvc>,
) -> Result<Json<Vec<ReadingProgress>>, ApiError> {
    Ok(Json(progress_svc.fetch_progress_by_user_id(user.id).await?))
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::presentation::test_util::test_app;

    #[tokio::test]
    async fn test_anonymous_lists_are_empty() {
        let app = test_app().await;

        let (status, body) = app.send("GET", "/api/user/likes", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (_, body) = app
            .send("GET", "/api/user/favorites", Some("garbage"), None)
            .await;
        assert_eq!(body, json!([]));

        let (status, _) = app.send("GET", "/api/user/progress", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
