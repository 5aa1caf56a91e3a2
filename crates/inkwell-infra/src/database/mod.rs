//! Document store connection management.

mod connections;

#[cfg(feature = "mongo")]
pub mod documents;

pub use connections::StoreConfig;

#[cfg(feature = "mongo")]
pub use connections::{
    AUTHOR_POSTS_COLLECTION, AUTHOR_PROFILES_COLLECTION, DocumentStore, VISITS_COLLECTION,
    map_store_error,
};
