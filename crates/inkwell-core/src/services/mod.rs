//! Application services - orchestrate ports into the operations the host exposes.

mod feed;
mod posts;
mod visits;

pub use feed::FeedService;
pub use posts::PostService;
pub use visits::{
    AUTOMATED_AGENT_MARKERS, VisitTracker, identity_seed, is_automated_agent, visit_day,
    visitor_identifier,
};
