//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Query string for incremental feed loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "FeedQuery::default_limit")]
    pub limit: i64,
}

impl FeedQuery {
    fn default_limit() -> i64 {
        10
    }
}

/// Tags as submitted by clients: either a list or one comma-separated string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Joined(String),
}

/// Request to create a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub author: String,
    pub content: String,
    pub tags: TagsInput,
}

/// Response after a post is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostResponse {
    pub id: String,
}

/// A post as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub author: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: String,
}

/// Public author information shown on a post page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masked_contact: Option<String>,
}

/// A single post with its author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub author: AuthorResponse,
}

/// One entry of the tag index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagCountResponse {
    pub tag: String,
    pub count: u64,
}

/// A page of posts. An empty `posts` list means there is nothing more to load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
}

/// The landing page payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomePageResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer: Option<AuthorResponse>,
    pub posts: Vec<PostResponse>,
    pub tags: Vec<TagCountResponse>,
}
