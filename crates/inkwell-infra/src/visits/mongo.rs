//! MongoDB visit counters.

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::doc;

use inkwell_core::domain::{VisitHit, VisitRecord};
use inkwell_core::error::RepoError;
use inkwell_core::ports::VisitRepository;

use crate::database::documents::VisitDocument;
use crate::database::{DocumentStore, map_store_error};

/// MongoDB-backed visit repository.
///
/// Each hit is a single `update_one` with `upsert: true`; the increment, the
/// insert-only fields and `last_visit_time` are applied together by the server.
/// The unique `(identifier, day)` index lets the server retry an upsert that
/// loses an insert race instead of creating a second record.
pub struct MongoVisitRepository {
    store: Arc<DocumentStore>,
}

impl MongoVisitRepository {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl VisitRepository for MongoVisitRepository {
    async fn record_hit(&self, hit: &VisitHit) -> Result<(), RepoError> {
        let at = VisitDocument::hit_time(hit);

        self.store
            .visits()
            .await?
            .update_one(
                doc! { "identifier": hit.identifier.as_str(), "day": hit.day.as_str() },
                doc! {
                    "$inc": { "total_view_count": 1_i64 },
                    "$setOnInsert": {
                        "first_visit_time": at,
                        "platform": hit.platform.as_str(),
                    },
                    "$set": { "last_visit_time": at },
                },
            )
            .upsert(true)
            .await
            .map_err(map_store_error)?;

        Ok(())
    }

    async fn find_visit(
        &self,
        identifier: &str,
        day: &str,
    ) -> Result<Option<VisitRecord>, RepoError> {
        self.store
            .visits()
            .await?
            .find_one(doc! { "identifier": identifier, "day": day })
            .await
            .map_err(map_store_error)?
            .map(VisitRecord::try_from)
            .transpose()
    }
}
