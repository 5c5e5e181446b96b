use std::any::Any;

use async_graphql::{EmptySubscription, MergedObject, Schema, extensions::Logger};

use super::{
    admin::{AdminMutationRoot, AdminRoot},
    catalogue::CatalogueRoot,
    user::{UserMutationRoot, UserRoot},
};
use crate::presentation::Services;

pub type NoctoonSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(CatalogueRoot, UserRoot, AdminRoot);

#[derive(MergedObject, Default)]
pub struct MutationRoot(UserMutationRoot, AdminMutationRoot);

pub struct SchemaBuilder(async_graphql::SchemaBuilder<QueryRoot, MutationRoot, EmptySubscription>);

impl Default for SchemaBuilder {
    fn default() -> Self {
        let builder = Schema::build(
            QueryRoot::default(),
            MutationRoot::default(),
            EmptySubscription,
        )
        .extension(Logger);

        Self(builder)
    }
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data<D>(self, data: D) -> Self
    where
        D: Any + Send + Sync,
    {
        Self(self.0.data(data))
    }

    /// Registers every service as schema data, resolvers look them up by type.
    pub fn services(self, services: Services) -> Self {
        self.data(services.user_svc)
            .data(services.series_svc)
            .data(services.chapter_svc)
            .data(services.comment_svc)
            .data(services.engagement_svc)
            .data(services.progress_svc)
            .data(services.admin_svc)
    }

    pub fn build(self) -> NoctoonSchema {
        self.0.finish()
    }
}
