use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::author::AuthenticatedUser;

/// Everything the visit engine knows about the request that triggered it.
#[derive(Debug, Clone)]
pub struct VisitorContext {
    pub identity: Option<AuthenticatedUser>,
    pub network_origin: String,
    pub agent: String,
}

impl VisitorContext {
    pub fn new(
        identity: Option<AuthenticatedUser>,
        network_origin: impl Into<String>,
        agent: impl Into<String>,
    ) -> Self {
        Self {
            identity,
            network_origin: network_origin.into(),
            agent: agent.into(),
        }
    }
}

/// Coarse client platform, derived from the agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientPlatform {
    Windows,
    Mac,
    Linux,
    Android,
    #[serde(rename = "iOS")]
    Ios,
    Other,
}

impl ClientPlatform {
    /// First match wins, in the order the variants are declared.
    pub fn from_agent(agent: &str) -> Self {
        if agent.contains("Windows") {
            Self::Windows
        } else if agent.contains("Mac") {
            Self::Mac
        } else if agent.contains("Linux") {
            Self::Linux
        } else if agent.contains("Android") {
            Self::Android
        } else if agent.contains("iPhone") {
            Self::Ios
        } else {
            Self::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::Mac => "Mac",
            Self::Linux => "Linux",
            Self::Android => "Android",
            Self::Ios => "iOS",
            Self::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "Windows" => Self::Windows,
            "Mac" => Self::Mac,
            "Linux" => Self::Linux,
            "Android" => Self::Android,
            "iOS" => Self::Ios,
            _ => Self::Other,
        }
    }
}

/// A single qualifying hit, ready to be upserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitHit {
    pub identifier: String,
    pub day: String,
    pub platform: ClientPlatform,
    pub at: DateTime<Utc>,
}

/// Daily visit counter for one visitor identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub identifier: String,
    pub day: String,
    pub total_view_count: u64,
    pub platform: ClientPlatform,
    pub first_visit_time: DateTime<Utc>,
    pub last_visit_time: DateTime<Utc>,
}

impl VisitRecord {
    /// The record created by the first hit of the day.
    pub fn first(hit: &VisitHit) -> Self {
        Self {
            identifier: hit.identifier.clone(),
            day: hit.day.clone(),
            total_view_count: 1,
            platform: hit.platform,
            first_visit_time: hit.at,
            last_visit_time: hit.at,
        }
    }

    /// Apply a repeat hit: bump the counter and move `last_visit_time`.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.total_view_count += 1;
        self.last_visit_time = at;
    }
}

/// What the visit engine did with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitOutcome {
    Recorded { identifier: String, day: String },
    SkippedAutomated,
}
