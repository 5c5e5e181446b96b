pub mod graphql;
pub mod rest;
pub mod token;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::anyhow;
use axum::{
    Router, ServiceExt,
    extract::{Extension, Request},
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::{
    Layer,
    util::{MapRequest, MapRequestLayer},
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
};

use self::{
    graphql::{graphql_handler, graphql_playground, schema},
    rest::{
        health::health_check,
        logger::log_request,
        path::rewrite_request,
        rate_limit::{RateLimiters, rate_limit},
    },
};
use crate::{
    domain::services::{
        admin::AdminService, chapter::ChapterService, comment::CommentService,
        engagement::EngagementService, progress::ProgressService, series::SeriesService,
        user::UserService,
    },
    infrastructure::{
        config::Config,
        database::Pool,
        repositories::{
            chapter::ChapterRepositoryImpl, comment::CommentRepositoryImpl,
            engagement::EngagementRepositoryImpl, progress::ProgressRepositoryImpl,
            series::SeriesRepositoryImpl, stats::StatsRepositoryImpl, user::UserRepositoryImpl,
        },
    },
};

pub type UserSvc = UserService<UserRepositoryImpl>;
pub type SeriesSvc = SeriesService<SeriesRepositoryImpl>;
pub type ChapterSvc = ChapterService<ChapterRepositoryImpl, SeriesRepositoryImpl>;
pub type CommentSvc = CommentService<CommentRepositoryImpl, SeriesRepositoryImpl>;
pub type EngagementSvc = EngagementService<EngagementRepositoryImpl, SeriesRepositoryImpl>;
pub type ProgressSvc =
    ProgressService<ProgressRepositoryImpl, ChapterRepositoryImpl, SeriesRepositoryImpl>;
pub type AdminSvc = AdminService<StatsRepositoryImpl>;

/// Every service the REST and GraphQL surfaces dispatch to.
#[derive(Clone)]
pub struct Services {
    pub user_svc: UserSvc,
    pub series_svc: SeriesSvc,
    pub chapter_svc: ChapterSvc,
    pub comment_svc: CommentSvc,
    pub engagement_svc: EngagementSvc,
    pub progress_svc: ProgressSvc,
    pub admin_svc: AdminSvc,
}

impl Services {
    pub fn new(pool: Pool, config: &Config) -> Self {
        let series_repo = SeriesRepositoryImpl::new(pool.clone());
        let chapter_repo = ChapterRepositoryImpl::new(pool.clone());

        Self {
            user_svc: UserService::new(UserRepositoryImpl::new(pool.clone())),
            series_svc: SeriesService::new(series_repo.clone()),
            chapter_svc: ChapterService::new(chapter_repo.clone(), series_repo.clone()),
            comment_svc: CommentService::new(
                CommentRepositoryImpl::new(pool.clone()),
                series_repo.clone(),
            ),
            engagement_svc: EngagementService::new(
                EngagementRepositoryImpl::new(pool.clone()),
                series_repo.clone(),
            ),
            progress_svc: ProgressService::new(
                ProgressRepositoryImpl::new(pool.clone()),
                chapter_repo,
                series_repo,
            ),
            admin_svc: AdminService::new(StatsRepositoryImpl::new(pool), config.upload.clone()),
        }
    }
}

pub struct ServerBuilder {
    config: Option<Config>,
    services: Option<Services>,
    enable_playground: bool,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            services: None,
            enable_playground: false,
        }
    }

    pub fn with_config(self, config: Config) -> Self {
        Self {
            config: Some(config),
            ..self
        }
    }

    pub fn with_services(self, services: Services) -> Self {
        Self {
            services: Some(services),
            ..self
        }
    }

    pub fn enable_playground(self) -> Self {
        Self {
            enable_playground: true,
            ..self
        }
    }

    pub fn build(self) -> Result<Server, anyhow::Error> {
        let config = self.config.ok_or_else(|| anyhow!("no config"))?;
        let services = self.services.ok_or_else(|| anyhow!("no services"))?;

        let schema = schema::SchemaBuilder::new()
            .data(config.clone())
            .services(services.clone())
            .build();

        Ok(Server::new(self.enable_playground, config, services, schema))
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("ignoring invalid origin {origin:?}");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60))
}

#[derive(Clone)]
pub struct Server {
    router: Router,
}

impl Server {
    pub fn new(
        enable_playground: bool,
        config: Config,
        services: Services,
        schema: schema::NoctoonSchema,
    ) -> Self {
        let mut router = Router::new()
            .route("/health", get(health_check))
            .merge(rest::router());

        if enable_playground {
            router = router
                .route("/graphql", get(graphql_playground).post(graphql_handler))
                .route("/graphql/", post(graphql_handler));
        } else {
            router = router
                .route("/graphql", post(graphql_handler))
                .route("/graphql/", post(graphql_handler));
        }

        let limiters = Arc::new(RateLimiters::new(&config.rate_limit));

        router = router
            .layer(middleware::from_fn_with_state(limiters, rate_limit))
            .layer(middleware::from_fn(log_request))
            .layer(Extension(schema))
            .layer(Extension(services.user_svc))
            .layer(Extension(services.series_svc))
            .layer(Extension(services.chapter_svc))
            .layer(Extension(services.comment_svc))
            .layer(Extension(services.engagement_svc))
            .layer(Extension(services.progress_svc))
            .layer(Extension(services.admin_svc))
            .layer(CompressionLayer::new())
            .layer(cors_layer(&config.allowed_origins))
            .layer(Extension(config));

        Self { router }
    }

    pub async fn serve<A: Into<SocketAddr>>(self, addr: A) -> Result<(), anyhow::Error> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("listening on {addr}");

        axum::serve(
            listener,
            ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(
                self.into_service(),
            ),
        )
        .await?;

        Ok(())
    }

    /// Path recovery has to run before routing, so it wraps the router
    /// instead of being one of its layers.
    pub fn into_service(self) -> MapRequest<Router, fn(Request) -> Request> {
        MapRequestLayer::new(rewrite_request as fn(Request) -> Request).layer(self.router)
    }
}
