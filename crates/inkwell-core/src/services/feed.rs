//! Feed composition - a page of posts plus the tag index, and the home page
//! that also counts the visit.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::posts::PostService;
use super::visits::VisitTracker;
use crate::domain::{Feed, HomePage, Page, VisitorContext};
use crate::error::DomainError;

/// Stateless composition over the post service and the visit tracker.
#[derive(Clone)]
pub struct FeedService {
    posts: Arc<PostService>,
    visits: Arc<VisitTracker>,
    page_limit: u64,
}

impl FeedService {
    pub fn new(posts: Arc<PostService>, visits: Arc<VisitTracker>, page_limit: u64) -> Self {
        Self {
            posts,
            visits,
            page_limit: page_limit.max(1),
        }
    }

    /// Upper bound applied to caller-supplied page sizes.
    pub fn page_limit(&self) -> u64 {
        self.page_limit
    }

    pub async fn compose_feed(&self, page: Page) -> Result<Feed, DomainError> {
        let page = Page {
            skip: page.skip,
            limit: page.limit.min(self.page_limit),
        };
        let posts = self.posts.list_feed(page).await?;
        let tag_counts = self.posts.tag_counts().await?;
        Ok(Feed { posts, tag_counts })
    }

    /// Landing page. Counts the visit exactly once, off the response path.
    pub async fn compose_home_page(&self, visitor: VisitorContext) -> Result<HomePage, DomainError> {
        let viewer = visitor.identity.clone();
        self.dispatch_visit(visitor);

        let feed = self.compose_feed(Page::first(self.page_limit)).await?;
        Ok(HomePage { viewer, feed })
    }

    /// Record a visit on a detached task. Failures are logged and dropped.
    pub fn dispatch_visit(&self, visitor: VisitorContext) -> JoinHandle<()> {
        let visits = Arc::clone(&self.visits);
        tokio::spawn(async move {
            if let Err(e) = visits.record_visit(&visitor).await {
                tracing::warn!(error = %e, "Failed to record visit");
            }
        })
    }
}
