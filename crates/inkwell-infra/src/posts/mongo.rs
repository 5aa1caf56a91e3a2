//! MongoDB post repository.
//!
//! Posts live in the `posts` array of one document per author. Reads flatten
//! that array with an aggregation pipeline; writes use single-document atomic
//! update operators (`$push`, `$pull`).

use std::sync::Arc;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, Document, doc};
use uuid::Uuid;

use inkwell_core::domain::{NewPost, Page, Post, TagCount};
use inkwell_core::error::RepoError;
use inkwell_core::ports::PostRepository;

use crate::database::documents::{FlatPostDocument, PostDocument, TagCountDocument};
use crate::database::{DocumentStore, map_store_error};

/// MongoDB-backed post repository.
pub struct MongoPostRepository {
    store: Arc<DocumentStore>,
}

impl MongoPostRepository {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Pipeline stages turning author documents into a newest-first stream of posts.
    /// `matching` filters both the parent documents and the unwound posts.
    fn flatten(matching: Option<Document>) -> Vec<Document> {
        let mut pipeline = Vec::new();
        if let Some(filter) = &matching {
            pipeline.push(doc! { "$match": filter.clone() });
        }
        pipeline.push(doc! { "$unwind": "$posts" });
        if let Some(filter) = matching {
            pipeline.push(doc! { "$match": filter });
        }
        pipeline.push(doc! {
            "$replaceRoot": {
                "newRoot": { "$mergeObjects": ["$posts", { "author_id": "$author_id" }] }
            }
        });
        pipeline.push(doc! { "$sort": { "created_at": -1, "post_id": -1 } });
        pipeline
    }

    async fn run_flat(&self, pipeline: Vec<Document>) -> Result<Vec<Post>, RepoError> {
        let docs: Vec<Document> = self
            .store
            .author_posts()
            .await?
            .aggregate(pipeline)
            .await
            .map_err(map_store_error)?
            .try_collect()
            .await
            .map_err(map_store_error)?;

        docs.into_iter()
            .map(|doc| {
                let flat: FlatPostDocument =
                    bson::from_document(doc).map_err(|e| RepoError::Query(e.to_string()))?;
                Post::try_from(flat)
            })
            .collect()
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    async fn create_post(&self, author_id: Uuid, fields: NewPost) -> Result<Uuid, RepoError> {
        let post = Post::new(author_id, fields);
        let nested =
            bson::to_bson(&PostDocument::from(&post)).map_err(|e| RepoError::Query(e.to_string()))?;

        self.store
            .author_posts()
            .await?
            .update_one(
                doc! { "author_id": author_id.to_string() },
                doc! { "$push": { "posts": nested } },
            )
            .upsert(true)
            .await
            .map_err(map_store_error)?;

        tracing::debug!(post_id = %post.id, author_id = %author_id, "Appended post to author document");
        Ok(post.id)
    }

    async fn list_feed(&self, page: Page) -> Result<Vec<Post>, RepoError> {
        let mut pipeline = Self::flatten(None);
        pipeline.push(doc! { "$skip": to_i64(page.skip) });
        pipeline.push(doc! { "$limit": to_i64(page.limit.max(1)) });
        self.run_flat(pipeline).await
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        // The owner filter only applies to the parent documents.
        let mut pipeline = vec![doc! { "$match": { "author_id": author_id.to_string() } }];
        pipeline.extend(Self::flatten(None));
        self.run_flat(pipeline).await
    }

    async fn list_by_tag(&self, tag: &str) -> Result<Vec<Post>, RepoError> {
        self.run_flat(Self::flatten(Some(doc! { "posts.tags": tag })))
            .await
    }

    async fn find_by_id(&self, post_id: Uuid) -> Result<Option<Post>, RepoError> {
        let mut pipeline = Self::flatten(Some(doc! { "posts.post_id": post_id.to_string() }));
        pipeline.push(doc! { "$limit": 1 });
        Ok(self.run_flat(pipeline).await?.into_iter().next())
    }

    async fn delete_post(&self, post_id: Uuid, author_id: Uuid) -> Result<(), RepoError> {
        let post_key = post_id.to_string();
        let authors = self.store.author_posts().await?;

        let result = authors
            .update_one(
                doc! { "author_id": author_id.to_string(), "posts.post_id": post_key.as_str() },
                doc! { "$pull": { "posts": { "post_id": post_key.as_str() } } },
            )
            .await
            .map_err(map_store_error)?;

        if result.matched_count > 0 {
            return Ok(());
        }

        // Nothing was removed; only classify why.
        let elsewhere = authors
            .count_documents(doc! { "posts.post_id": post_key.as_str() })
            .await
            .map_err(map_store_error)?;

        if elsewhere > 0 {
            Err(RepoError::Forbidden)
        } else {
            Err(RepoError::NotFound)
        }
    }

    async fn tag_counts(&self) -> Result<Vec<TagCount>, RepoError> {
        let pipeline = vec![
            doc! { "$unwind": "$posts" },
            doc! {
                "$project": {
                    "_id": 0,
                    "tags": { "$setUnion": [{ "$ifNull": ["$posts.tags", []] }, []] }
                }
            },
            doc! { "$unwind": "$tags" },
            doc! { "$group": { "_id": "$tags", "count": { "$sum": 1 } } },
            doc! { "$project": { "_id": 0, "tag": "$_id", "count": 1 } },
            doc! { "$sort": { "count": -1, "tag": 1 } },
        ];

        let docs: Vec<Document> = self
            .store
            .author_posts()
            .await?
            .aggregate(pipeline)
            .await
            .map_err(map_store_error)?
            .try_collect()
            .await
            .map_err(map_store_error)?;

        docs.into_iter()
            .map(|doc| {
                bson::from_document::<TagCountDocument>(doc)
                    .map(TagCount::from)
                    .map_err(|e| RepoError::Query(e.to_string()))
            })
            .collect()
    }
}
