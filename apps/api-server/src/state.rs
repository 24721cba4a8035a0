//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{
    CategoryRepository, FileStorage, Mailer, PostRepository, RateLimiter, SearchRepository,
    SessionProvider, UploadRepository, UserRepository,
};
use quill_core::services::{
    BlogService, CategoryService, NotificationService, PostService, SearchService, UploadService,
    UserService,
};
use quill_infra::{
    InMemoryFileStorage, InMemoryStore, JwtSessionProvider, LogMailer, UploadThingStorage,
};

#[cfg(feature = "postgres")]
use quill_infra::DatabaseConnections;
#[cfg(feature = "postgres")]
use quill_infra::database::{
    PostgresCategoryRepository, PostgresPostRepository, PostgresSearchRepository,
    PostgresUploadRepository, PostgresUserRepository,
};
#[cfg(feature = "smtp")]
use quill_infra::SmtpMailer;
#[cfg(feature = "rate-limit")]
use quill_infra::{InMemoryRateLimiter, RateLimitConfig};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: Arc<BlogService>,
    pub posts: Arc<PostService>,
    pub categories: Arc<CategoryService>,
    pub search: Arc<SearchService>,
    pub uploads: Arc<UploadService>,
    pub users: Arc<UserService>,
    pub notifications: Arc<NotificationService>,
    pub sessions: Arc<dyn SessionProvider>,
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
    pub hook_secret: Option<String>,
}

/// The repository ports backing every service.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub uploads: Arc<dyn UploadRepository>,
    pub search: Arc<dyn SearchRepository>,
}

impl Repositories {
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            users: store.clone(),
            posts: store.clone(),
            categories: store.clone(),
            uploads: store.clone(),
            search: store,
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(db: &DatabaseConnections) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(db.main.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.main.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(db.main.clone())),
            uploads: Arc::new(PostgresUploadRepository::new(db.main.clone())),
            search: Arc::new(PostgresSearchRepository::new(db.main.clone())),
        }
    }
}

/// External collaborators the services talk to.
pub struct Collaborators {
    pub storage: Arc<dyn FileStorage>,
    pub mailer: Arc<dyn Mailer>,
    pub sessions: Arc<dyn SessionProvider>,
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let repositories = Self::repositories(config).await?;

        let storage: Arc<dyn FileStorage> = match &config.uploadthing {
            Some(ut) => Arc::new(UploadThingStorage::new(ut.clone())),
            None => {
                tracing::warn!("UPLOADTHING_TOKEN not set. File deletions are only recorded in memory.");
                Arc::new(InMemoryFileStorage::new())
            }
        };

        let collaborators = Collaborators {
            storage,
            mailer: Self::mailer(config),
            sessions: Arc::new(JwtSessionProvider::new(config.jwt.clone())),
            rate_limiter: Self::rate_limiter(config),
        };

        tracing::info!("Application state initialized");
        Ok(Self::from_parts(
            repositories,
            collaborators,
            config.hook_secret.clone(),
        ))
    }

    /// Wire services from already-built ports.
    pub fn from_parts(
        repos: Repositories,
        collaborators: Collaborators,
        hook_secret: Option<String>,
    ) -> Self {
        Self {
            blog: Arc::new(BlogService::new(
                repos.posts.clone(),
                repos.users.clone(),
                repos.categories.clone(),
            )),
            posts: Arc::new(PostService::new(
                repos.posts.clone(),
                repos.users.clone(),
                repos.categories.clone(),
            )),
            categories: Arc::new(CategoryService::new(repos.categories.clone())),
            search: Arc::new(SearchService::new(repos.search)),
            uploads: Arc::new(UploadService::new(repos.uploads, collaborators.storage)),
            users: Arc::new(UserService::new(repos.users, repos.posts)),
            notifications: Arc::new(NotificationService::new(collaborators.mailer)),
            sessions: collaborators.sessions,
            rate_limiter: collaborators.rate_limiter,
            hook_secret,
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> anyhow::Result<Repositories> {
        use migration::MigratorTrait;

        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Ok(Repositories::in_memory(Arc::new(InMemoryStore::new())));
        };

        let connections = DatabaseConnections::init(db_config).await?;
        if config.run_migrations {
            migration::Migrator::up(&connections.main, None).await?;
            tracing::info!("Database migrations applied");
        }

        Ok(Repositories::postgres(&connections))
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(config: &AppConfig) -> anyhow::Result<Repositories> {
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature.");
        }
        tracing::info!("Running without postgres feature - using in-memory store");
        Ok(Repositories::in_memory(Arc::new(InMemoryStore::new())))
    }

    #[cfg(feature = "smtp")]
    fn mailer(config: &AppConfig) -> Arc<dyn Mailer> {
        match &config.smtp {
            Some(smtp) => match SmtpMailer::new(smtp) {
                Ok(mailer) => return Arc::new(mailer),
                Err(e) => tracing::error!(error = %e, "Invalid SMTP configuration, logging emails instead"),
            },
            None => tracing::warn!("SMTP not configured, emails will only be logged"),
        }
        Arc::new(LogMailer)
    }

    #[cfg(not(feature = "smtp"))]
    fn mailer(_config: &AppConfig) -> Arc<dyn Mailer> {
        Arc::new(LogMailer)
    }

    #[cfg(feature = "rate-limit")]
    fn rate_limiter(config: &AppConfig) -> Option<Arc<dyn RateLimiter>> {
        Some(Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
            max_requests: config.rate_limit_max_requests,
            window: config.rate_limit_window,
        })))
    }

    #[cfg(not(feature = "rate-limit"))]
    fn rate_limiter(_config: &AppConfig) -> Option<Arc<dyn RateLimiter>> {
        None
    }
}
