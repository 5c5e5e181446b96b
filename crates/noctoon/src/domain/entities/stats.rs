use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_series: i64,
    pub total_users: i64,
    pub total_comments: i64,
    pub total_likes: i64,
    pub total_favorites: i64,
}
