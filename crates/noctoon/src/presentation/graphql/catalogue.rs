use async_graphql::{Context, Enum, Object, Result, SimpleObject};
use chrono::NaiveDateTime;
use rayon::prelude::*;

use crate::{
    domain::entities::{
        self,
        engagement::Engagement,
        series::{SeriesFilter, SeriesSort},
    },
    infrastructure::auth::Claims,
    presentation::{ChapterSvc, CommentSvc, EngagementSvc, SeriesSvc},
};

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStatus {
    Ongoing,
    Completed,
    New,
}

impl From<entities::series::SeriesStatus> for SeriesStatus {
    fn from(val: entities::series::SeriesStatus) -> Self {
        match val {
            entities::series::SeriesStatus::Ongoing => Self::Ongoing,
            entities::series::SeriesStatus::Completed => Self::Completed,
            entities::series::SeriesStatus::New => Self::New,
        }
    }
}

impl From<SeriesStatus> for entities::series::SeriesStatus {
    fn from(val: SeriesStatus) -> Self {
        match val {
            SeriesStatus::Ongoing => Self::Ongoing,
            SeriesStatus::Completed => Self::Completed,
            SeriesStatus::New => Self::New,
        }
    }
}

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sort {
    /// Insertion order.
    #[default]
    Default,
    Popular,
    Rating,
    Title,
}

impl From<Sort> for SeriesSort {
    fn from(val: Sort) -> Self {
        match val {
            Sort::Default => SeriesSort::Default,
            Sort::Popular => SeriesSort::Popular,
            Sort::Rating => SeriesSort::Rating,
            Sort::Title => SeriesSort::Title,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Series(entities::series::Series);

impl From<entities::series::Series> for Series {
    fn from(val: entities::series::Series) -> Self {
        Self(val)
    }
}

#[Object]
impl Series {
    async fn id(&self) -> i64 {
        self.0.id
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    async fn genre(&self) -> &str {
        &self.0.genre
    }

    async fn cover(&self) -> &str {
        &self.0.cover
    }

    async fn status(&self) -> SeriesStatus {
        self.0.status.into()
    }

    async fn author(&self) -> Option<&str> {
        self.0.author.as_deref()
    }

    async fn views(&self) -> i64 {
        self.0.views
    }

    async fn rating(&self) -> i64 {
        self.0.rating
    }

    async fn created_at(&self) -> NaiveDateTime {
        self.0.created_at
    }

    async fn chapters(&self, ctx: &Context<'_>) -> Result<Vec<Chapter>> {
        let chapters = ctx
            .data::<ChapterSvc>()?
            .fetch_chapters_by_series_id(self.0.id)
            .await?
            .into_par_iter()
            .map(Chapter::from)
            .collect();

        Ok(chapters)
    }

    async fn comments(&self, ctx: &Context<'_>) -> Result<Vec<Comment>> {
        let comments = ctx
            .data::<CommentSvc>()?
            .fetch_comments_by_series_id(self.0.id)
            .await?
            .into_par_iter()
            .map(Comment::from)
            .collect();

        Ok(comments)
    }

    async fn likes(&self, ctx: &Context<'_>) -> Result<i64> {
        Ok(ctx
            .data::<EngagementSvc>()?
            .count(Engagement::Like, self.0.id)
            .await?)
    }

    async fn favorites(&self, ctx: &Context<'_>) -> Result<i64> {
        Ok(ctx
            .data::<EngagementSvc>()?
            .count(Engagement::Favorite, self.0.id)
            .await?)
    }

    /// False for anonymous callers.
    async fn is_liked(&self, ctx: &Context<'_>) -> Result<bool> {
        self.is_engaged(ctx, Engagement::Like).await
    }

    async fn is_favorited(&self, ctx: &Context<'_>) -> Result<bool> {
        self.is_engaged(ctx, Engagement::Favorite).await
    }
}

impl Series {
    async fn is_engaged(&self, ctx: &Context<'_>, kind: Engagement) -> Result<bool> {
        let Ok(claims) = ctx.data::<Claims>() else {
            return Ok(false);
        };

        Ok(ctx
            .data::<EngagementSvc>()?
            .is_engaged(kind, claims.sub, self.0.id)
            .await?)
    }
}

#[derive(SimpleObject, Debug, Clone)]
pub struct Chapter {
    pub id: i64,
    pub series_id: i64,
    pub number: i64,
    pub title: String,
    pub pages: Vec<String>,
    pub publish_at: Option<NaiveDateTime>,
}

impl From<entities::chapter::Chapter> for Chapter {
    fn from(val: entities::chapter::Chapter) -> Self {
        Self {
            id: val.id,
            series_id: val.series_id,
            number: val.number,
            title: val.title,
            pages: val.pages,
            publish_at: val.publish_at,
        }
    }
}

#[derive(SimpleObject, Debug, Clone)]
pub struct Comment {
    pub id: i64,
    pub series_id: i64,
    pub user_id: i64,
    pub username: String,
    pub text: String,
    pub created_at: NaiveDateTime,
}

impl From<entities::comment::Comment> for Comment {
    fn from(val: entities::comment::Comment) -> Self {
        Self {
            id: val.id,
            series_id: val.series_id,
            user_id: val.user_id,
            username: val.username,
            text: val.text,
            created_at: val.created_at,
        }
    }
}

#[derive(Default)]
pub struct CatalogueRoot;

#[Object]
impl CatalogueRoot {
    async fn series(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "genre")] genre: Option<String>,
        #[graphql(desc = "status")] status: Option<SeriesStatus>,
        #[graphql(desc = "title or author contains")] query: Option<String>,
        #[graphql(desc = "sort order", default)] sort: Sort,
    ) -> Result<Vec<Series>> {
        let filter = SeriesFilter {
            genre: genre.filter(|g| !g.trim().is_empty()),
            status: status.map(Into::into),
            query: query.filter(|q| !q.trim().is_empty()),
            sort: sort.into(),
        };

        let series = ctx
            .data::<SeriesSvc>()?
            .fetch_series(&filter)
            .await?
            .into_par_iter()
            .map(Series::from)
            .collect();

        Ok(series)
    }

    /// Counts as a view, like opening the series page.
    async fn series_by_id(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "series id")] id: i64,
    ) -> Result<Series> {
        Ok(ctx.data::<SeriesSvc>()?.view_series(id).await?.into())
    }

    async fn chapters(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "series id")] series_id: i64,
    ) -> Result<Vec<Chapter>> {
        let chapters = ctx
            .data::<ChapterSvc>()?
            .fetch_chapters_by_series_id(series_id)
            .await?
            .into_par_iter()
            .map(Chapter::from)
            .collect();

        Ok(chapters)
    }

    async fn chapter(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "chapter id")] id: i64,
    ) -> Result<Chapter> {
        Ok(ctx.data::<ChapterSvc>()?.fetch_chapter_by_id(id).await?.into())
    }

    async fn comments(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "series id")] series_id: i64,
    ) -> Result<Vec<Comment>> {
        let comments = ctx
            .data::<CommentSvc>()?
            .fetch_comments_by_series_id(series_id)
            .await?
            .into_par_iter()
            .map(Comment::from)
            .collect();

        Ok(comments)
    }

    async fn genres(&self, ctx: &Context<'_>) -> Result<Vec<String>> {
        Ok(ctx.data::<SeriesSvc>()?.genres())
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use crate::presentation::{graphql::schema::SchemaBuilder, test_util::test_app};

    #[tokio::test]
    async fn test_catalogue_queries() {
        let app = test_app().await;
        let schema = SchemaBuilder::new().services(app.services.clone()).build();

        let res = schema
            .execute("{ series(status: COMPLETED, sort: RATING) { title status } }")
            .await;
        assert!(res.errors.is_empty(), "{:?}", res.errors);
        assert_eq!(
            res.data.into_json().unwrap(),
            json!({
                "series": [
                    { "title": "Aşkın Melodisi", "status": "COMPLETED" },
                    { "title": "Gümüş Ay Efsanesi", "status": "COMPLETED" },
                    { "title": "Kader Oyunu", "status": "COMPLETED" },
                ]
            })
        );

        let res = schema
            .execute("{ seriesById(id: 1) { views likes isLiked chapters { number } } }")
            .await;
        assert!(res.errors.is_empty(), "{:?}", res.errors);
        assert_eq!(
            res.data.into_json().unwrap(),
            json!({
                "seriesById": {
                    "views": 15421,
                    "likes": 0,
                    "isLiked": false,
                    "chapters": [
                        { "number": 1 },
                        { "number": 2 },
                        { "number": 3 },
                        { "number": 4 },
                        { "number": 5 },
                    ],
                }
            })
        );

        let res = schema.execute("{ chapter(id: 9999) { id } }").await;
        assert_eq!(res.errors.len(), 1);
    }
}
