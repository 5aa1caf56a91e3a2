//! Service-level behavior over the in-memory adapters.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use uuid::Uuid;

use inkwell_core::DomainError;
use inkwell_core::domain::{
    AuthenticatedUser, AuthorProfile, NewPost, Page, VisitHit, VisitOutcome, VisitRecord,
    VisitorContext,
};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{PostRepository, VisitRepository};
use inkwell_core::services::{FeedService, PostService, VisitTracker, visit_day};

use crate::{InMemoryAuthorDirectory, InMemoryPostRepository, InMemoryVisitRepository};

const FIREFOX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0";

struct Harness {
    posts: Arc<InMemoryPostRepository>,
    authors: Arc<InMemoryAuthorDirectory>,
    visits: Arc<InMemoryVisitRepository>,
    post_service: Arc<PostService>,
    tracker: Arc<VisitTracker>,
    feed: FeedService,
}

fn harness() -> Harness {
    let posts = Arc::new(InMemoryPostRepository::new());
    let authors = Arc::new(InMemoryAuthorDirectory::new());
    let visits = Arc::new(InMemoryVisitRepository::new());
    let post_service = Arc::new(PostService::new(posts.clone(), authors.clone()));
    let tracker = Arc::new(VisitTracker::new(visits.clone()));
    let feed = FeedService::new(post_service.clone(), tracker.clone(), 10);

    Harness {
        posts,
        authors,
        visits,
        post_service,
        tracker,
        feed,
    }
}

fn user(name: &str, contact: Option<&str>) -> AuthenticatedUser {
    AuthenticatedUser::new(Uuid::new_v4(), name, contact.map(String::from))
}

fn fields(title: &str, tags: &[&str]) -> NewPost {
    NewPost::new(
        title,
        "Ada",
        "Body",
        tags.iter().map(|t| t.to_string()).collect(),
    )
    .unwrap()
}

/// A visit store that is always down.
struct UnavailableVisits;

#[async_trait]
impl VisitRepository for UnavailableVisits {
    async fn record_hit(&self, _hit: &VisitHit) -> Result<(), RepoError> {
        Err(RepoError::Connection("connection refused".into()))
    }

    async fn find_visit(
        &self,
        _identifier: &str,
        _day: &str,
    ) -> Result<Option<VisitRecord>, RepoError> {
        Err(RepoError::Connection("connection refused".into()))
    }
}

async fn wait_for_records(visits: &InMemoryVisitRepository, expected: usize) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while visits.len().await < expected {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("visit was never recorded");
}

#[tokio::test]
async fn test_compose_feed_combines_page_and_tags() {
    let h = harness();
    let ada = user("Ada", None);
    for i in 0..12 {
        h.post_service
            .create_post(&ada, fields(&format!("post {i}"), &["rust"]))
            .await
            .unwrap();
    }

    let feed = h.feed.compose_feed(Page { skip: 0, limit: 50 }).await.unwrap();

    assert_eq!(feed.posts.len(), 10);
    assert_eq!(feed.tag_counts.len(), 1);
    assert_eq!(feed.tag_counts[0].tag, "rust");
    assert_eq!(feed.tag_counts[0].count, 12);
}

#[tokio::test]
async fn test_tag_counts_are_never_stale() {
    let h = harness();
    let ada = user("Ada", None);
    let post_id = h
        .post_service
        .create_post(&ada, fields("one", &["a"]))
        .await
        .unwrap();
    assert_eq!(h.post_service.tag_counts().await.unwrap().len(), 1);

    h.post_service.delete_post(post_id, &ada).await.unwrap();

    assert!(h.post_service.tag_counts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_home_page_records_one_visit() {
    let h = harness();
    let visitor = VisitorContext::new(None, "203.0.113.7", FIREFOX);

    let home = h.feed.compose_home_page(visitor).await.unwrap();
    assert!(home.viewer.is_none());
    assert!(home.feed.posts.is_empty());

    wait_for_records(&h.visits, 1).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(h.visits.len().await, 1);
}

#[tokio::test]
async fn test_feed_pagination_does_not_record_visits() {
    let h = harness();
    h.feed.compose_feed(Page::first(10)).await.unwrap();
    h.feed.compose_feed(Page { skip: 10, limit: 10 }).await.unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(h.visits.is_empty().await);
}

#[tokio::test]
async fn test_home_page_survives_visit_store_outage() {
    let h = harness();
    let tracker = Arc::new(VisitTracker::new(Arc::new(UnavailableVisits)));
    let feed = FeedService::new(h.post_service.clone(), tracker, 10);
    let ada = user("Ada", None);
    h.post_service
        .create_post(&ada, fields("hello", &["a"]))
        .await
        .unwrap();

    let visitor = VisitorContext::new(Some(ada.clone()), "203.0.113.7", FIREFOX);
    let handle = feed.dispatch_visit(visitor.clone());
    handle.await.unwrap();

    let home = feed.compose_home_page(visitor).await.unwrap();
    assert_eq!(home.feed.posts.len(), 1);
    assert_eq!(home.viewer, Some(ada));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_visits_collapse_into_one_record() {
    let h = harness();
    let k = 32;
    let visitor = VisitorContext::new(None, "198.51.100.4", FIREFOX);

    let handles: Vec<_> = (0..k)
        .map(|_| {
            let tracker = h.tracker.clone();
            let visitor = visitor.clone();
            tokio::spawn(async move { tracker.record_visit(&visitor).await.unwrap() })
        })
        .collect();

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap());
    }

    let (identifier, day) = match &outcomes[0] {
        VisitOutcome::Recorded { identifier, day } => (identifier.clone(), day.clone()),
        other => panic!("unexpected outcome {other:?}"),
    };
    assert_eq!(h.visits.len().await, 1);
    let record = h.visits.find_visit(&identifier, &day).await.unwrap().unwrap();
    assert_eq!(record.total_view_count, k);
}

#[tokio::test]
async fn test_bot_visits_are_not_recorded() {
    let h = harness();
    let visitor = VisitorContext::new(
        None,
        "66.249.66.1",
        "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
    );

    let outcome = h.tracker.record_visit(&visitor).await.unwrap();

    assert_eq!(outcome, VisitOutcome::SkippedAutomated);
    assert!(h.visits.is_empty().await);
}

#[tokio::test]
async fn test_visits_on_different_days_are_separate() {
    let h = harness();
    let visitor = VisitorContext::new(None, "198.51.100.4", FIREFOX);
    let monday = Utc.with_ymd_and_hms(2024, 5, 6, 23, 30, 0).unwrap();
    let tuesday = Utc.with_ymd_and_hms(2024, 5, 7, 0, 30, 0).unwrap();

    h.tracker.record_visit_at(&visitor, monday).await.unwrap();
    let outcome = h.tracker.record_visit_at(&visitor, tuesday).await.unwrap();

    let VisitOutcome::Recorded { identifier, .. } = outcome else {
        panic!("visit was skipped");
    };
    assert_eq!(h.visits.len().await, 2);
    for at in [monday, tuesday] {
        let record = h
            .visits
            .find_visit(&identifier, &visit_day(at))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.total_view_count, 1);
        assert_eq!(record.first_visit_time, at);
    }
}

#[tokio::test]
async fn test_authenticated_visitor_is_stable_across_networks() {
    let h = harness();
    let ada = user("Ada", Some("9876543210"));
    let at_home = VisitorContext::new(Some(ada.clone()), "198.51.100.4", FIREFOX);
    let on_phone = VisitorContext::new(Some(ada), "192.0.2.55", "Mozilla/5.0 (iPhone)");

    h.tracker.record_visit(&at_home).await.unwrap();
    h.tracker.record_visit(&on_phone).await.unwrap();

    assert_eq!(h.visits.len().await, 1);
}

#[tokio::test]
async fn test_anonymous_visitors_differ_by_origin() {
    let h = harness();
    h.tracker
        .record_visit(&VisitorContext::new(None, "198.51.100.4", FIREFOX))
        .await
        .unwrap();
    h.tracker
        .record_visit(&VisitorContext::new(None, "198.51.100.5", FIREFOX))
        .await
        .unwrap();

    assert_eq!(h.visits.len().await, 2);
}

#[tokio::test]
async fn test_get_post_includes_author_profile() {
    let h = harness();
    let ada = user("Ada Lovelace", Some("9876543210"));
    h.authors
        .upsert(AuthorProfile::new(
            ada.author_id,
            "Ada Lovelace",
            ada.contact.as_deref(),
        ))
        .await;
    let post_id = h
        .post_service
        .create_post(&ada, fields("Notes", &["math"]))
        .await
        .unwrap();

    let detail = h.post_service.get_post(post_id).await.unwrap();

    assert_eq!(detail.post.id, post_id);
    assert_eq!(detail.post.author_id, ada.author_id);
    assert_eq!(detail.author.display_name, "Ada Lovelace");
    assert_eq!(detail.author.masked_contact.as_deref(), Some("********10"));
}

#[tokio::test]
async fn test_get_post_without_profile_uses_post_byline() {
    let h = harness();
    let ada = user("Ada", None);
    let post_id = h
        .post_service
        .create_post(&ada, fields("Notes", &["math"]))
        .await
        .unwrap();

    let detail = h.post_service.get_post(post_id).await.unwrap();

    assert_eq!(detail.author.display_name, "Ada");
    assert!(detail.author.masked_contact.is_none());
}

#[tokio::test]
async fn test_get_missing_post_is_not_found() {
    let h = harness();
    let missing = Uuid::new_v4();

    let err = h.post_service.get_post(missing).await.unwrap_err();

    assert!(matches!(err, DomainError::NotFound { id, .. } if id == missing));
}

#[tokio::test]
async fn test_delete_distinguishes_unauthorized_from_not_found() {
    let h = harness();
    let (ada, bob) = (user("Ada", None), user("Bob", None));
    let post_id = h
        .post_service
        .create_post(&ada, fields("mine", &["a"]))
        .await
        .unwrap();

    let err = h.post_service.delete_post(post_id, &bob).await.unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized));
    assert_eq!(h.posts.list_by_author(ada.author_id).await.unwrap().len(), 1);

    let err = h
        .post_service
        .delete_post(Uuid::new_v4(), &bob)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    h.post_service.delete_post(post_id, &ada).await.unwrap();
    assert!(h.post_service.list_by_author(ada.author_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_by_tag_rejects_empty_tag() {
    let h = harness();
    assert!(matches!(
        h.post_service.list_by_tag("").await,
        Err(DomainError::Validation(_))
    ));
}
