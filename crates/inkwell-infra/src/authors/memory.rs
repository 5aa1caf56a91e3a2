use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use inkwell_core::domain::AuthorProfile;
use inkwell_core::error::RepoError;
use inkwell_core::ports::AuthorDirectory;

/// In-memory author profiles.
pub struct InMemoryAuthorDirectory {
    profiles: RwLock<HashMap<Uuid, AuthorProfile>>,
}

impl InMemoryAuthorDirectory {
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
        }
    }

    /// Register or replace a profile.
    pub async fn upsert(&self, profile: AuthorProfile) {
        self.profiles
            .write()
            .await
            .insert(profile.author_id, profile);
    }
}

impl Default for InMemoryAuthorDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthorDirectory for InMemoryAuthorDirectory {
    async fn find_profile(&self, author_id: Uuid) -> Result<Option<AuthorProfile>, RepoError> {
        Ok(self.profiles.read().await.get(&author_id).cloned())
    }
}
