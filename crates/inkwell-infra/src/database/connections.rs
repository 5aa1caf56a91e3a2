use std::time::Duration;

#[cfg(feature = "mongo")]
use inkwell_core::error::RepoError;
#[cfg(feature = "mongo")]
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::doc,
    error::{Error as MongoError, ErrorKind},
    options::{ClientOptions, IndexOptions},
};
#[cfg(feature = "mongo")]
use tokio::sync::OnceCell;

#[cfg(feature = "mongo")]
use super::documents::{AuthorPostsDocument, AuthorProfileDocument, VisitDocument};

/// Collection holding one document per author with that author's posts nested inside.
pub const AUTHOR_POSTS_COLLECTION: &str = "author_posts";
/// Collection holding one visit record per `(identifier, day)`.
pub const VISITS_COLLECTION: &str = "visits";
/// Author profiles, written by the identity system and only read here.
pub const AUTHOR_PROFILES_COLLECTION: &str = "users";

/// Configuration for the document store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Connection string (e.g., mongodb://localhost:27017)
    pub url: String,
    /// Database name
    pub database: String,
    /// Connect and server selection timeout
    pub connect_timeout: Duration,
    /// Application name reported to the server
    pub app_name: String,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    /// Returns `None` when `MONGODB_URL` is not set.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("MONGODB_URL").ok()?;

        Some(Self {
            url,
            database: std::env::var("MONGODB_DATABASE").unwrap_or_else(|_| "blog".to_string()),
            connect_timeout: Duration::from_secs(
                std::env::var("MONGODB_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
            app_name: std::env::var("MONGODB_APP_NAME").unwrap_or_else(|_| "inkwell".to_string()),
        })
    }
}

/// Process-wide document store handle.
///
/// The connection is opened lazily on first use and reused for the lifetime of
/// the handle. Concurrent first callers wait on the same initialization; a failed
/// attempt leaves the handle empty so the next call retries.
///
/// # Example
/// ```ignore
/// let store = Arc::new(DocumentStore::new(config));
/// store.connect().await?; // optional eager connect at startup
/// let posts = MongoPostRepository::new(store.clone());
/// ```
#[cfg(feature = "mongo")]
pub struct DocumentStore {
    config: StoreConfig,
    db: OnceCell<Database>,
}

#[cfg(feature = "mongo")]
impl DocumentStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Establish the connection now instead of on first use. Idempotent.
    pub async fn connect(&self) -> Result<(), RepoError> {
        self.database().await.map(|_| ())
    }

    /// The shared database handle, connecting on first call.
    pub async fn database(&self) -> Result<&Database, RepoError> {
        self.db.get_or_try_init(|| self.open()).await
    }

    pub async fn author_posts(&self) -> Result<Collection<AuthorPostsDocument>, RepoError> {
        Ok(self.database().await?.collection(AUTHOR_POSTS_COLLECTION))
    }

    pub async fn visits(&self) -> Result<Collection<VisitDocument>, RepoError> {
        Ok(self.database().await?.collection(VISITS_COLLECTION))
    }

    pub async fn author_profiles(&self) -> Result<Collection<AuthorProfileDocument>, RepoError> {
        Ok(self.database().await?.collection(AUTHOR_PROFILES_COLLECTION))
    }

    async fn open(&self) -> Result<Database, RepoError> {
        tracing::info!("Initializing document store connection...");

        let mut options = ClientOptions::parse(&self.config.url)
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;
        options.app_name = Some(self.config.app_name.clone());
        options.connect_timeout = Some(self.config.connect_timeout);
        options.server_selection_timeout = Some(self.config.connect_timeout);

        let client =
            Client::with_options(options).map_err(|e| RepoError::Connection(e.to_string()))?;
        let db = client.database(&self.config.database);

        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        Self::ensure_indexes(&db).await?;

        tracing::info!(database = %self.config.database, "Document store connected");
        Ok(db)
    }

    async fn ensure_indexes(db: &Database) -> Result<(), RepoError> {
        let unique = || IndexOptions::builder().unique(true).build();

        db.collection::<AuthorPostsDocument>(AUTHOR_POSTS_COLLECTION)
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "author_id": 1 })
                    .options(unique())
                    .build(),
            )
            .await
            .map_err(map_store_error)?;

        db.collection::<AuthorPostsDocument>(AUTHOR_POSTS_COLLECTION)
            .create_index(IndexModel::builder().keys(doc! { "posts.post_id": 1 }).build())
            .await
            .map_err(map_store_error)?;

        db.collection::<VisitDocument>(VISITS_COLLECTION)
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "identifier": 1, "day": 1 })
                    .options(unique())
                    .build(),
            )
            .await
            .map_err(map_store_error)?;

        tracing::debug!("Document store indexes ensured");
        Ok(())
    }
}

/// Classify a driver error as a connection or query failure.
#[cfg(feature = "mongo")]
pub fn map_store_error(err: MongoError) -> RepoError {
    match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) | ErrorKind::DnsResolve { .. } => {
            RepoError::Connection(err.to_string())
        }
        _ => RepoError::Query(err.to_string()),
    }
}
