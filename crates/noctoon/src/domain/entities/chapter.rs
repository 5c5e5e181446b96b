use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: i64,
    pub series_id: i64,
    pub number: i64,
    pub title: String,
    pub pages: Vec<String>,
    pub publish_at: Option<NaiveDateTime>,
}
