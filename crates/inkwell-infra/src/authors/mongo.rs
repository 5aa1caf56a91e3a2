use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::doc;
use uuid::Uuid;

use inkwell_core::domain::AuthorProfile;
use inkwell_core::error::RepoError;
use inkwell_core::ports::AuthorDirectory;

use crate::database::{DocumentStore, map_store_error};

/// Reads author profiles from the identity system's `users` collection.
pub struct MongoAuthorDirectory {
    store: Arc<DocumentStore>,
}

impl MongoAuthorDirectory {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthorDirectory for MongoAuthorDirectory {
    async fn find_profile(&self, author_id: Uuid) -> Result<Option<AuthorProfile>, RepoError> {
        tracing::debug!(author_id = %author_id, "Finding author profile");

        self.store
            .author_profiles()
            .await?
            .find_one(doc! { "_id": author_id.to_string() })
            .await
            .map_err(map_store_error)?
            .map(AuthorProfile::try_from)
            .transpose()
    }
}
