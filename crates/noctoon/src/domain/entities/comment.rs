use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub series_id: i64,
    pub user_id: i64,
    pub username: String,
    pub text: String,
    pub created_at: NaiveDateTime,
}
