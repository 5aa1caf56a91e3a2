use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AuthorProfile, NewPost, Page, Post, TagCount, VisitHit, VisitRecord};
use crate::error::RepoError;

/// Post repository over per-author documents.
///
/// Every read returns posts flattened out of their parent documents, newest first.
/// An author document with no posts behaves exactly like a missing one.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Append a new post to the author's document, creating the document on first use.
    /// The append must be atomic so concurrent creates for one author are all kept.
    async fn create_post(&self, author_id: Uuid, fields: NewPost) -> Result<Uuid, RepoError>;

    /// One page of the global feed. Returns an empty vec once `skip` passes the end.
    async fn list_feed(&self, page: Page) -> Result<Vec<Post>, RepoError>;

    /// All posts owned by `author_id`.
    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// All posts carrying `tag` (exact, case-sensitive match).
    async fn list_by_tag(&self, tag: &str) -> Result<Vec<Post>, RepoError>;

    /// Find a single post by its globally unique id.
    async fn find_by_id(&self, post_id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Remove a post from `author_id`'s document in one atomic step.
    ///
    /// Returns `RepoError::Forbidden` when the post exists under another author
    /// and `RepoError::NotFound` when it does not exist at all.
    async fn delete_post(&self, post_id: Uuid, author_id: Uuid) -> Result<(), RepoError>;

    /// Number of posts per tag across every author. Duplicate tags within one
    /// post count once.
    async fn tag_counts(&self) -> Result<Vec<TagCount>, RepoError>;
}

/// Read-only lookup of author profiles owned by the identity system.
#[async_trait]
pub trait AuthorDirectory: Send + Sync {
    async fn find_profile(&self, author_id: Uuid) -> Result<Option<AuthorProfile>, RepoError>;
}

/// Daily visit counters.
#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Insert-or-increment the record for `(hit.identifier, hit.day)` in a single
    /// atomic operation.
    async fn record_hit(&self, hit: &VisitHit) -> Result<(), RepoError>;

    async fn find_visit(&self, identifier: &str, day: &str)
    -> Result<Option<VisitRecord>, RepoError>;
}
