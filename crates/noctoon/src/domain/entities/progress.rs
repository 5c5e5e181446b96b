use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingProgress {
    pub id: i64,
    pub user_id: i64,
    pub series_id: i64,
    pub chapter_id: i64,
    pub progress: i64,
    pub updated_at: NaiveDateTime,
}
