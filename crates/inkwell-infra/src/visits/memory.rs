//! In-memory visit counters.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use inkwell_core::domain::{VisitHit, VisitRecord};
use inkwell_core::error::RepoError;
use inkwell_core::ports::VisitRepository;

/// Visit records keyed by `(identifier, day)`.
///
/// The whole upsert runs under one write lock, so concurrent hits for the same
/// key collapse into a single record.
pub struct InMemoryVisitRepository {
    records: RwLock<HashMap<(String, String), VisitRecord>>,
}

impl InMemoryVisitRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Total number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryVisitRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VisitRepository for InMemoryVisitRepository {
    async fn record_hit(&self, hit: &VisitHit) -> Result<(), RepoError> {
        let mut records = self.records.write().await;
        records
            .entry((hit.identifier.clone(), hit.day.clone()))
            .and_modify(|record| record.touch(hit.at))
            .or_insert_with(|| VisitRecord::first(hit));
        Ok(())
    }

    async fn find_visit(
        &self,
        identifier: &str,
        day: &str,
    ) -> Result<Option<VisitRecord>, RepoError> {
        let records = self.records.read().await;
        Ok(records
            .get(&(identifier.to_string(), day.to_string()))
            .cloned())
    }
}
