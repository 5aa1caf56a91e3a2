//! Application state - shared across all handlers.

use std::sync::Arc;

use inkwell_core::ports::{AuthorDirectory, PostRepository, TokenService, VisitRepository};
use inkwell_core::services::{FeedService, PostService, VisitTracker};
use inkwell_infra::{
    InMemoryAuthorDirectory, InMemoryPostRepository, InMemoryVisitRepository, JwtTokenService,
};

use crate::config::AppConfig;

#[cfg(feature = "mongo")]
use inkwell_infra::{
    DocumentStore, MongoAuthorDirectory, MongoPostRepository, MongoVisitRepository,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub feed: FeedService,
    pub tokens: Arc<dyn TokenService>,
}

type Adapters = (
    Arc<dyn PostRepository>,
    Arc<dyn AuthorDirectory>,
    Arc<dyn VisitRepository>,
);

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let adapters = Self::adapters(config).await;
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());

        tracing::info!("Application state initialized");
        Self::from_parts(adapters, tokens, config.page_limit)
    }

    /// Wire services over explicit adapters.
    pub fn from_parts(adapters: Adapters, tokens: Arc<dyn TokenService>, page_limit: u64) -> Self {
        let (post_repo, authors, visits) = adapters;
        let posts = Arc::new(PostService::new(post_repo, authors));
        let tracker = Arc::new(VisitTracker::new(visits));
        let feed = FeedService::new(posts.clone(), tracker, page_limit);

        Self {
            posts,
            feed,
            tokens,
        }
    }

    /// In-memory adapters, used when no document store is configured.
    pub fn in_memory_adapters() -> Adapters {
        (
            Arc::new(InMemoryPostRepository::new()),
            Arc::new(InMemoryAuthorDirectory::new()),
            Arc::new(InMemoryVisitRepository::new()),
        )
    }

    #[cfg(feature = "mongo")]
    async fn adapters(config: &AppConfig) -> Adapters {
        let Some(store_config) = &config.store else {
            tracing::warn!("MONGODB_URL not set. Running without document store (in-memory mode).");
            return Self::in_memory_adapters();
        };

        // One handle for the whole process; repositories share it.
        let store = Arc::new(DocumentStore::new(store_config.clone()));
        if let Err(e) = store.connect().await {
            tracing::error!(
                "Failed to connect to document store: {}. Will retry on first use.",
                e
            );
        }

        (
            Arc::new(MongoPostRepository::new(store.clone())),
            Arc::new(MongoAuthorDirectory::new(store.clone())),
            Arc::new(MongoVisitRepository::new(store)),
        )
    }

    #[cfg(not(feature = "mongo"))]
    async fn adapters(_config: &AppConfig) -> Adapters {
        tracing::info!("Running without mongo feature - using in-memory repositories");
        Self::in_memory_adapters()
    }
}
