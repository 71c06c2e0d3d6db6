//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::domain::User;
use quill_core::ports::{
    CategoryRepository, CommentRepository, ImageUploader, PasswordService, PostRepository,
    UserRepository,
};
use quill_core::services::{CommentWorkflow, DashboardService, PostService};
use quill_infra::{HttpImageService, InMemoryContentStore};

use crate::config::{AdminBootstrap, AppConfig};

/// Repository handles over one Content Store.
pub struct ContentStores {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl ContentStores {
    /// Process-local store seeded with the default categories.
    pub fn in_memory() -> Self {
        let store = InMemoryContentStore::seeded();
        Self {
            users: Arc::new(store.users()),
            categories: Arc::new(store.categories()),
            posts: Arc::new(store.posts()),
            comments: Arc::new(store.comments()),
        }
    }

    #[cfg(feature = "postgres")]
    pub async fn postgres(config: &quill_infra::DatabaseConfig) -> anyhow::Result<Self> {
        use quill_infra::database::{
            PostgresCategoryRepository, PostgresCommentRepository, PostgresPostRepository,
            PostgresUserRepository,
        };

        use migration::MigratorTrait;

        let db = quill_infra::connect(config).await?;
        migration::Migrator::up(&db, None).await?;
        tracing::info!("Content Store schema is up to date");
        Ok(Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db)),
        })
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub comments: CommentWorkflow,
    pub dashboard: DashboardService,
    pub categories: Arc<dyn CategoryRepository>,
    pub users: Arc<dyn UserRepository>,
    pub images: Arc<dyn ImageUploader>,
}

impl AppState {
    pub fn from_parts(stores: ContentStores, images: Arc<dyn ImageUploader>) -> Self {
        Self {
            posts: PostService::new(stores.posts.clone()),
            comments: CommentWorkflow::new(stores.comments.clone(), stores.posts.clone()),
            dashboard: DashboardService::new(stores.posts, stores.comments),
            categories: stores.categories,
            users: stores.users,
            images,
        }
    }

    /// Build the application state with appropriate implementations.
    ///
    /// A configured database that cannot be reached is a startup error; the
    /// in-memory store is only used when no database is configured.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        #[cfg(feature = "postgres")]
        let stores = match &config.database {
            Some(db) => ContentStores::postgres(db).await?,
            None => {
                tracing::warn!("DATABASE_URL not set. Content is kept in memory only.");
                ContentStores::in_memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let stores = {
            let _ = config;
            tracing::info!("Running without postgres feature - using in-memory Content Store");
            ContentStores::in_memory()
        };

        let images: Arc<dyn ImageUploader> = Arc::new(HttpImageService::from_env()?);

        tracing::info!("Application state initialized");
        Ok(Self::from_parts(stores, images))
    }
}

/// Create the configured admin account unless it already exists.
pub async fn bootstrap_admin(
    state: &AppState,
    password_service: &dyn PasswordService,
    admin: &AdminBootstrap,
) -> anyhow::Result<()> {
    match state.users.find_by_email(&admin.email).await? {
        Some(user) if user.is_admin => {
            tracing::debug!(user_id = %user.id, "Admin account present");
        }
        Some(user) => {
            tracing::warn!(user_id = %user.id, "ADMIN_EMAIL belongs to a non-admin account, leaving it unchanged");
        }
        None => {
            let hash = password_service.hash(&admin.password)?;
            let user = state
                .users
                .insert(User::new(admin.email.clone(), hash, true))
                .await?;
            tracing::info!(user_id = %user.id, "Admin account created");
        }
    }
    Ok(())
}
