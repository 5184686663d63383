//! Application state - shared across all handlers.

use std::sync::Arc;

use scribe_core::ports::{PostRepository, TokenService, UserRepository};
use scribe_core::service::{AuthService, PostService};
use scribe_infra::{
    Argon2PasswordService, FsImageStore, InMemoryPostRepository, InMemoryUserRepository,
    JwtTokenService, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::{AppConfig, PaginationConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub posts: Arc<PostService>,
    pub tokens: Arc<dyn TokenService>,
    pub pagination: PaginationConfig,
    /// Which post/user store backs this process, for the health endpoint.
    pub storage: &'static str,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (user_repo, post_repo, storage): (
            Arc<dyn UserRepository>,
            Arc<dyn PostRepository>,
            &'static str,
        ) = match config.database.as_ref() {
            Some(db_config) => match scribe_infra::database::connect(db_config).await {
                Ok(db) => {
                    let db = Arc::new(db);
                    (
                        Arc::new(PostgresUserRepository::new(Arc::clone(&db))),
                        Arc::new(PostgresPostRepository::new(db)),
                        "postgres",
                    )
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    in_memory_repos()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                in_memory_repos()
            }
        };

        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());
        let passwords = Arc::new(Argon2PasswordService::new());
        let images = Arc::new(FsImageStore::new(config.upload_dir.clone()));

        let auth = Arc::new(AuthService::new(
            user_repo.clone(),
            passwords,
            tokens.clone(),
        ));
        let posts = Arc::new(PostService::new(post_repo, user_repo, images));

        tracing::info!(storage, "Application state initialized");

        Self {
            auth,
            posts,
            tokens,
            pagination: config.pagination,
            storage,
        }
    }
}

fn in_memory_repos() -> (Arc<dyn UserRepository>, Arc<dyn PostRepository>, &'static str) {
    (
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryPostRepository::new()),
        "in-memory",
    )
}
