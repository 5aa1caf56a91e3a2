//! Stored document shapes and their conversions to domain types.

use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use inkwell_core::domain::{AuthorProfile, ClientPlatform, Post, TagCount, VisitHit, VisitRecord};
use inkwell_core::error::RepoError;

/// One document per author, holding every post that author wrote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorPostsDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub author_id: String,
    #[serde(default)]
    pub posts: Vec<PostDocument>,
}

/// A post as nested inside its author's document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDocument {
    pub post_id: String,
    pub title: String,
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: bson::DateTime,
}

impl From<&Post> for PostDocument {
    fn from(post: &Post) -> Self {
        Self {
            post_id: post.id.to_string(),
            title: post.title.clone(),
            author: post.author_display_name.clone(),
            content: post.content.clone(),
            tags: post.tags.clone(),
            created_at: to_bson_datetime(post.created_at),
        }
    }
}

/// A post flattened out of its author's document, with the owner projected in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatPostDocument {
    pub post_id: String,
    pub author_id: String,
    pub title: String,
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: bson::DateTime,
}

impl TryFrom<FlatPostDocument> for Post {
    type Error = RepoError;

    fn try_from(doc: FlatPostDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&doc.post_id)?,
            author_id: parse_id(&doc.author_id)?,
            title: doc.title,
            author_display_name: doc.author,
            content: doc.content,
            tags: doc.tags,
            created_at: from_bson_datetime(doc.created_at)?,
        })
    }
}

/// Output row of the tag-count aggregation.
#[derive(Debug, Clone, Deserialize)]
pub struct TagCountDocument {
    pub tag: String,
    pub count: i64,
}

impl From<TagCountDocument> for TagCount {
    fn from(doc: TagCountDocument) -> Self {
        Self {
            tag: doc.tag,
            count: u64::try_from(doc.count).unwrap_or(0),
        }
    }
}

/// Daily visit counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitDocument {
    pub identifier: String,
    pub day: String,
    pub total_view_count: i64,
    pub platform: String,
    pub first_visit_time: bson::DateTime,
    pub last_visit_time: bson::DateTime,
}

impl TryFrom<VisitDocument> for VisitRecord {
    type Error = RepoError;

    fn try_from(doc: VisitDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            identifier: doc.identifier,
            day: doc.day,
            total_view_count: u64::try_from(doc.total_view_count).unwrap_or(0),
            platform: ClientPlatform::parse(&doc.platform),
            first_visit_time: from_bson_datetime(doc.first_visit_time)?,
            last_visit_time: from_bson_datetime(doc.last_visit_time)?,
        })
    }
}

impl VisitDocument {
    /// Timestamp of a hit in stored form.
    pub fn hit_time(hit: &VisitHit) -> bson::DateTime {
        to_bson_datetime(hit.at)
    }
}

/// Author profile as stored by the identity system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorProfileDocument {
    #[serde(rename = "_id")]
    pub author_id: String,
    pub display_name: String,
    #[serde(default)]
    pub contact: Option<String>,
}

impl TryFrom<AuthorProfileDocument> for AuthorProfile {
    type Error = RepoError;

    fn try_from(doc: AuthorProfileDocument) -> Result<Self, Self::Error> {
        Ok(AuthorProfile::new(
            parse_id(&doc.author_id)?,
            doc.display_name,
            doc.contact.as_deref(),
        ))
    }
}

pub fn to_bson_datetime(at: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(at.timestamp_millis())
}

fn from_bson_datetime(at: bson::DateTime) -> Result<DateTime<Utc>, RepoError> {
    DateTime::<Utc>::from_timestamp_millis(at.timestamp_millis())
        .ok_or_else(|| RepoError::Query(format!("timestamp out of range: {at}")))
}

fn parse_id(raw: &str) -> Result<Uuid, RepoError> {
    Uuid::parse_str(raw).map_err(|e| RepoError::Query(format!("corrupt id {raw:?}: {e}")))
}
