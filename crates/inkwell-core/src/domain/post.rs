use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::author::{AuthenticatedUser, AuthorProfile};
use crate::error::DomainError;

/// Post entity - a single blog post, flattened out of its author's document.
///
/// `author_id` is not stored on the nested post; repositories project it in
/// from the owning document when flattening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub author_display_name: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post owned by `author_id`, stamped with the current time.
    pub fn new(author_id: Uuid, fields: NewPost) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title: fields.title,
            author_display_name: fields.author_display_name,
            content: fields.content,
            tags: fields.tags,
            created_at: Utc::now(),
        }
    }

    /// Exact, case-sensitive tag membership.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Validated fields for a post that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub author_display_name: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl NewPost {
    /// Validate and trim the user-supplied fields.
    pub fn new(
        title: impl Into<String>,
        author_display_name: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
    ) -> Result<Self, DomainError> {
        let title = required("title", title.into())?;
        let author_display_name = required("author", author_display_name.into())?;
        let content = required("content", content.into())?;

        let tags: Vec<String> = tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if tags.is_empty() {
            return Err(DomainError::Validation("at least one tag is required".into()));
        }

        Ok(Self {
            title,
            author_display_name,
            content,
            tags,
        })
    }

    /// Split a comma-separated tag field into individual tags.
    pub fn parse_tags(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    }
}

fn required(field: &str, value: String) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Number of posts carrying a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: u64,
}

/// A post together with its author's public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetail {
    pub post: Post,
    pub author: AuthorProfile,
}

/// Offset pagination window over the flattened feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u64,
    pub limit: u64,
}

impl Page {
    /// Page size used when the caller does not ask for one.
    pub const DEFAULT_LIMIT: u64 = 10;

    /// Validate raw query values; `limit` is clamped to `max_limit`.
    pub fn new(skip: i64, limit: i64, max_limit: u64) -> Result<Self, DomainError> {
        let skip = u64::try_from(skip)
            .map_err(|_| DomainError::Validation("skip must not be negative".into()))?;
        let limit = u64::try_from(limit)
            .ok()
            .filter(|l| *l > 0)
            .ok_or_else(|| DomainError::Validation("limit must be positive".into()))?;

        Ok(Self {
            skip,
            limit: limit.min(max_limit.max(1)),
        })
    }

    /// The first page of the feed.
    pub fn first(limit: u64) -> Self {
        Self { skip: 0, limit }
    }

    /// The page that follows this one, given how many posts it returned.
    pub fn advance(self, returned: usize) -> Self {
        Self {
            skip: self.skip + returned as u64,
            limit: self.limit,
        }
    }
}

/// A page of posts together with the global tag index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feed {
    pub posts: Vec<Post>,
    pub tag_counts: Vec<TagCount>,
}

/// Top-level landing page: the first feed page plus whoever is looking at it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomePage {
    pub viewer: Option<AuthenticatedUser>,
    pub feed: Feed,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> NewPost {
        NewPost::new("Title", "Ada", "Body", vec!["rust".into()]).unwrap()
    }

    #[test]
    fn test_new_post_trims_fields() {
        let post = NewPost::new("  Hello ", " Ada", "Body\n", vec![" a ".into(), "".into()]).unwrap();
        assert_eq!(post.title, "Hello");
        assert_eq!(post.author_display_name, "Ada");
        assert_eq!(post.content, "Body");
        assert_eq!(post.tags, vec!["a".to_string()]);
    }

    #[test]
    fn test_new_post_rejects_blank_fields() {
        assert!(matches!(
            NewPost::new("   ", "Ada", "Body", vec!["a".into()]),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            NewPost::new("Title", "Ada", "Body", vec!["  ".into()]),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(
            NewPost::parse_tags("rust, async ,,web"),
            vec!["rust".to_string(), "async".to_string(), "web".to_string()]
        );
        assert!(NewPost::parse_tags(" , ").is_empty());
    }

    #[test]
    fn test_has_tag_is_case_sensitive() {
        let post = Post::new(Uuid::new_v4(), fields());
        assert!(post.has_tag("rust"));
        assert!(!post.has_tag("Rust"));
    }

    #[test]
    fn test_page_validation() {
        assert!(matches!(Page::new(-1, 10, 10), Err(DomainError::Validation(_))));
        assert!(matches!(Page::new(0, 0, 10), Err(DomainError::Validation(_))));
        assert_eq!(Page::new(5, 50, 10).unwrap(), Page { skip: 5, limit: 10 });
        assert_eq!(Page::new(0, 3, 10).unwrap(), Page { skip: 0, limit: 3 });
    }

    #[test]
    fn test_page_advance() {
        let page = Page::first(10).advance(10).advance(4);
        assert_eq!(page, Page { skip: 14, limit: 10 });
    }
}
