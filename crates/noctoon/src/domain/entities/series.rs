use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const GENRES: [&str; 12] = [
    "Aksiyon",
    "Romantik",
    "Fantastik",
    "Dram",
    "Komedi",
    "Korku",
    "Bilim Kurgu",
    "Gerilim",
    "Tarihi",
    "Macera",
    "Gizem",
    "Spor",
];

pub const DEFAULT_RATING: i64 = 85;

pub fn is_known_genre(genre: &str) -> bool {
    GENRES.contains(&genre)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesStatus {
    #[default]
    Ongoing,
    Completed,
    New,
}

impl SeriesStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesStatus::Ongoing => "ongoing",
            SeriesStatus::Completed => "completed",
            SeriesStatus::New => "new",
        }
    }
}

impl fmt::Display for SeriesStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeriesStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ongoing" => Ok(SeriesStatus::Ongoing),
            "completed" => Ok(SeriesStatus::Completed),
            "new" => Ok(SeriesStatus::New),
            other => Err(anyhow::anyhow!("unknown series status {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub genre: String,
    pub cover: String,
    pub status: SeriesStatus,
    pub author: Option<String>,
    pub views: i64,
    pub rating: i64,
    pub created_at: NaiveDateTime,
}

impl Default for Series {
    fn default() -> Self {
        Self {
            id: 0,
            title: "".to_string(),
            description: None,
            genre: "".to_string(),
            cover: "".to_string(),
            status: SeriesStatus::default(),
            author: None,
            views: 0,
            rating: DEFAULT_RATING,
            created_at: NaiveDateTime::default(),
        }
    }
}

/// Partial update of a series, `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct SeriesPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub cover: Option<String>,
    pub status: Option<SeriesStatus>,
    pub author: Option<String>,
    pub rating: Option<i64>,
}

impl SeriesPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.genre.is_none()
            && self.cover.is_none()
            && self.status.is_none()
            && self.author.is_none()
            && self.rating.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesSort {
    #[default]
    Default,
    Popular,
    Rating,
    Title,
}

#[derive(Debug, Clone, Default)]
pub struct SeriesFilter {
    pub genre: Option<String>,
    pub status: Option<SeriesStatus>,
    pub query: Option<String>,
    pub sort: SeriesSort,
}
