use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{AuthenticatedUser, AuthorProfile, NewPost, Page, Post, PostDetail, TagCount};
use crate::error::DomainError;
use crate::ports::{AuthorDirectory, PostRepository};

/// Post operations scoped to the caller's identity.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    authors: Arc<dyn AuthorDirectory>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, authors: Arc<dyn AuthorDirectory>) -> Self {
        Self { posts, authors }
    }

    pub async fn create_post(
        &self,
        author: &AuthenticatedUser,
        fields: NewPost,
    ) -> Result<Uuid, DomainError> {
        let post_id = self.posts.create_post(author.author_id, fields).await?;
        tracing::info!(post_id = %post_id, author_id = %author.author_id, "Post created");
        Ok(post_id)
    }

    pub async fn list_feed(&self, page: Page) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list_feed(page).await?)
    }

    pub async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list_by_author(author_id).await?)
    }

    pub async fn list_by_tag(&self, tag: &str) -> Result<Vec<Post>, DomainError> {
        if tag.is_empty() {
            return Err(DomainError::Validation("tag must not be empty".into()));
        }
        Ok(self.posts.list_by_tag(tag).await?)
    }

    /// Resolve a post and its author's public profile.
    ///
    /// If the identity system has no profile for the owner, the display name
    /// written on the post is used and no contact is shown.
    pub async fn get_post(&self, post_id: Uuid) -> Result<PostDetail, DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "post",
                id: post_id,
            })?;

        let author = match self.authors.find_profile(post.author_id).await? {
            Some(profile) => profile,
            None => {
                tracing::debug!(author_id = %post.author_id, "No profile for post author");
                AuthorProfile::new(post.author_id, post.author_display_name.clone(), None)
            }
        };

        Ok(PostDetail { post, author })
    }

    pub async fn delete_post(
        &self,
        post_id: Uuid,
        author: &AuthenticatedUser,
    ) -> Result<(), DomainError> {
        match self.posts.delete_post(post_id, author.author_id).await {
            Ok(()) => {
                tracing::info!(post_id = %post_id, author_id = %author.author_id, "Post deleted");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    post_id = %post_id,
                    author_id = %author.author_id,
                    error = %e,
                    "Post delete rejected"
                );
                Err(DomainError::from_post_repo(e, post_id))
            }
        }
    }

    pub async fn tag_counts(&self) -> Result<Vec<TagCount>, DomainError> {
        Ok(self.posts.tag_counts().await?)
    }
}
