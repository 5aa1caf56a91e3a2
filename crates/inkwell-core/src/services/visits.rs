//! Visit deduplication engine.
//!
//! A visitor is identified by a SHA-256 digest of their best available identity
//! signal, and counted at most once per record per UTC day.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::domain::{ClientPlatform, VisitHit, VisitOutcome, VisitorContext};
use crate::error::DomainError;
use crate::ports::VisitRepository;

/// Agent substrings that mark automated traffic. Matched case-insensitively.
pub const AUTOMATED_AGENT_MARKERS: &[&str] = &[
    "bot",
    "crawler",
    "spider",
    "crawling",
    "vercel",
    "facebookexternalhit",
    "preview",
];

/// Whether the agent string belongs to a crawler, bot or link previewer.
pub fn is_automated_agent(agent: &str) -> bool {
    let agent = agent.to_ascii_lowercase();
    AUTOMATED_AGENT_MARKERS
        .iter()
        .any(|marker| agent.contains(marker))
}

/// Raw identity seed. Authenticated contacts and anonymous origin/agent pairs
/// carry different prefixes so they can never collide.
pub fn identity_seed(visitor: &VisitorContext) -> String {
    match visitor
        .identity
        .as_ref()
        .and_then(|user| user.contact.as_deref())
    {
        Some(contact) => format!("user:{contact}"),
        None => format!("anon:{}|{}", visitor.network_origin, visitor.agent),
    }
}

/// Lowercase hex SHA-256 of the seed.
pub fn visitor_identifier(seed: &str) -> String {
    hex::encode(Sha256::digest(seed.as_bytes()))
}

/// UTC calendar day, `YYYY-MM-DD`.
pub fn visit_day(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Records qualifying visits against the daily counters.
pub struct VisitTracker {
    visits: Arc<dyn VisitRepository>,
}

impl VisitTracker {
    pub fn new(visits: Arc<dyn VisitRepository>) -> Self {
        Self { visits }
    }

    /// Record a visit happening now.
    pub async fn record_visit(&self, visitor: &VisitorContext) -> Result<VisitOutcome, DomainError> {
        self.record_visit_at(visitor, Utc::now()).await
    }

    /// Record a visit at an explicit instant.
    pub async fn record_visit_at(
        &self,
        visitor: &VisitorContext,
        at: DateTime<Utc>,
    ) -> Result<VisitOutcome, DomainError> {
        if is_automated_agent(&visitor.agent) {
            tracing::debug!("Skipping visit from automated agent");
            return Ok(VisitOutcome::SkippedAutomated);
        }

        let hit = VisitHit {
            identifier: visitor_identifier(&identity_seed(visitor)),
            day: visit_day(at),
            platform: ClientPlatform::from_agent(&visitor.agent),
            at,
        };

        self.visits.record_hit(&hit).await?;
        tracing::debug!(visitor = %hit.identifier, day = %hit.day, "Visit recorded");

        Ok(VisitOutcome::Recorded {
            identifier: hit.identifier,
            day: hit.day,
        })
    }
}
