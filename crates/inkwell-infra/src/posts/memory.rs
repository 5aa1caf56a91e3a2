//! In-memory post repository - used as fallback when no document store is configured.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use inkwell_core::domain::{NewPost, Page, Post, TagCount};
use inkwell_core::error::RepoError;
use inkwell_core::ports::PostRepository;

/// Author documents keyed by author id, each holding that author's posts.
///
/// Every mutation happens under the write lock, which gives the same
/// single-document atomicity the real store provides.
/// Note: Data is lost on process restart.
pub struct InMemoryPostRepository {
    documents: RwLock<HashMap<Uuid, Vec<Post>>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// Whether a document exists for the author, even an empty one.
    pub async fn has_document(&self, author_id: Uuid) -> bool {
        self.documents.read().await.contains_key(&author_id)
    }

    /// Store an already-built post as-is.
    pub async fn insert(&self, post: Post) {
        let mut documents = self.documents.write().await;
        documents.entry(post.author_id).or_default().push(post);
    }

    fn newest_first(a: &Post, b: &Post) -> Ordering {
        b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
    }

    fn sorted<'a>(posts: impl Iterator<Item = &'a Post>) -> Vec<Post> {
        let mut posts: Vec<Post> = posts.cloned().collect();
        posts.sort_by(Self::newest_first);
        posts
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create_post(&self, author_id: Uuid, fields: NewPost) -> Result<Uuid, RepoError> {
        let post = Post::new(author_id, fields);
        let post_id = post.id;
        self.insert(post).await;
        Ok(post_id)
    }

    async fn list_feed(&self, page: Page) -> Result<Vec<Post>, RepoError> {
        let documents = self.documents.read().await;
        let posts = Self::sorted(documents.values().flatten());

        Ok(posts
            .into_iter()
            .skip(usize::try_from(page.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit).unwrap_or(usize::MAX))
            .collect())
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let documents = self.documents.read().await;
        Ok(documents
            .get(&author_id)
            .map(|posts| Self::sorted(posts.iter()))
            .unwrap_or_default())
    }

    async fn list_by_tag(&self, tag: &str) -> Result<Vec<Post>, RepoError> {
        let documents = self.documents.read().await;
        Ok(Self::sorted(
            documents.values().flatten().filter(|post| post.has_tag(tag)),
        ))
    }

    async fn find_by_id(&self, post_id: Uuid) -> Result<Option<Post>, RepoError> {
        let documents = self.documents.read().await;
        Ok(documents
            .values()
            .flatten()
            .find(|post| post.id == post_id)
            .cloned())
    }

    async fn delete_post(&self, post_id: Uuid, author_id: Uuid) -> Result<(), RepoError> {
        let mut documents = self.documents.write().await;

        if let Some(posts) = documents.get_mut(&author_id) {
            if let Some(index) = posts.iter().position(|post| post.id == post_id) {
                // The parent document stays, even when this was its last post.
                posts.remove(index);
                return Ok(());
            }
        }

        let owned_elsewhere = documents
            .values()
            .flatten()
            .any(|post| post.id == post_id);
        if owned_elsewhere {
            Err(RepoError::Forbidden)
        } else {
            Err(RepoError::NotFound)
        }
    }

    async fn tag_counts(&self) -> Result<Vec<TagCount>, RepoError> {
        let documents = self.documents.read().await;

        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for post in documents.values().flatten() {
            let distinct: BTreeSet<&str> = post.tags.iter().map(String::as_str).collect();
            for tag in distinct {
                *counts.entry(tag).or_default() += 1;
            }
        }

        let mut counts: Vec<TagCount> = counts
            .into_iter()
            .map(|(tag, count)| TagCount {
                tag: tag.to_string(),
                count,
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use super::*;

    fn fields(title: &str, tags: &[&str]) -> NewPost {
        NewPost::new(
            title,
            "Ada",
            "Body",
            tags.iter().map(|t| t.to_string()).collect(),
        )
        .unwrap()
    }

    /// Insert `count` posts spread over `authors`, one minute apart.
    async fn seed(repo: &InMemoryPostRepository, authors: &[Uuid], count: usize) -> Vec<Post> {
        let base = Utc::now();
        let mut posts = Vec::new();
        for i in 0..count {
            let mut post = Post::new(authors[i % authors.len()], fields(&format!("post {i}"), &["t"]));
            post.created_at = base - Duration::minutes(i as i64);
            repo.insert(post.clone()).await;
            posts.push(post);
        }
        posts
    }

    #[tokio::test]
    async fn test_pagination_walks_every_post_once() {
        let repo = InMemoryPostRepository::new();
        let authors: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let seeded = seed(&repo, &authors, 23).await;

        let mut page = Page::first(10);
        let mut seen = Vec::new();
        loop {
            let batch = repo.list_feed(page).await.unwrap();
            if batch.is_empty() {
                break;
            }
            page = page.advance(batch.len());
            seen.extend(batch);
        }

        assert_eq!(seen.len(), seeded.len());
        let ids: HashSet<Uuid> = seen.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), seeded.len());
        assert!(seen.windows(2).all(|w| w[0].created_at > w[1].created_at));
    }

    #[tokio::test]
    async fn test_skip_past_end_is_empty() {
        let repo = InMemoryPostRepository::new();
        seed(&repo, &[Uuid::new_v4()], 3).await;

        let page = repo.list_feed(Page { skip: 50, limit: 10 }).await.unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_list_by_author_only_returns_own_posts() {
        let repo = InMemoryPostRepository::new();
        let (ada, bob) = (Uuid::new_v4(), Uuid::new_v4());
        seed(&repo, &[ada, bob], 6).await;

        let posts = repo.list_by_author(ada).await.unwrap();
        assert_eq!(posts.len(), 3);
        assert!(posts.iter().all(|p| p.author_id == ada));
        assert!(posts.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn test_list_by_author_without_posts() {
        let repo = InMemoryPostRepository::new();
        assert!(repo.list_by_author(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_by_tag_is_exact() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();
        repo.create_post(author, fields("one", &["rust"])).await.unwrap();
        repo.create_post(author, fields("two", &["Rust"])).await.unwrap();
        repo.create_post(author, fields("three", &["rust", "web"])).await.unwrap();

        let posts = repo.list_by_tag("rust").await.unwrap();
        let titles: HashSet<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, HashSet::from(["one", "three"]));
    }

    #[tokio::test]
    async fn test_tag_counts() {
        let repo = InMemoryPostRepository::new();
        let (ada, bob) = (Uuid::new_v4(), Uuid::new_v4());
        repo.create_post(ada, fields("one", &["a", "b"])).await.unwrap();
        repo.create_post(bob, fields("two", &["a"])).await.unwrap();
        repo.create_post(bob, fields("three", &["c"])).await.unwrap();

        let counts: HashMap<String, u64> = repo
            .tag_counts()
            .await
            .unwrap()
            .into_iter()
            .map(|tc| (tc.tag, tc.count))
            .collect();

        assert_eq!(
            counts,
            HashMap::from([
                ("a".to_string(), 2),
                ("b".to_string(), 1),
                ("c".to_string(), 1),
            ])
        );
    }

    #[tokio::test]
    async fn test_tag_counts_dedupe_within_post() {
        let repo = InMemoryPostRepository::new();
        repo.create_post(Uuid::new_v4(), fields("one", &["a", "a", "A"]))
            .await
            .unwrap();

        let counts = repo.tag_counts().await.unwrap();
        assert_eq!(counts.len(), 2);
        assert!(counts.iter().all(|tc| tc.count == 1));
    }

    #[tokio::test]
    async fn test_owner_delete_removes_only_that_post() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();
        let keep = repo.create_post(author, fields("keep", &["a"])).await.unwrap();
        let gone = repo.create_post(author, fields("gone", &["a"])).await.unwrap();

        repo.delete_post(gone, author).await.unwrap();

        assert!(repo.find_by_id(gone).await.unwrap().is_none());
        assert!(repo.find_by_id(keep).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_foreign_delete_is_forbidden_and_changes_nothing() {
        let repo = InMemoryPostRepository::new();
        let (owner, intruder) = (Uuid::new_v4(), Uuid::new_v4());
        let post_id = repo.create_post(owner, fields("mine", &["a"])).await.unwrap();
        let before = repo.list_feed(Page::first(10)).await.unwrap();

        let err = repo.delete_post(post_id, intruder).await.unwrap_err();

        assert!(matches!(err, RepoError::Forbidden));
        assert_eq!(repo.list_feed(Page::first(10)).await.unwrap(), before);
        assert!(!repo.has_document(intruder).await);
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let repo = InMemoryPostRepository::new();
        let err = repo
            .delete_post(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    async fn test_deleting_last_post_keeps_empty_document() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();
        let post_id = repo.create_post(author, fields("only", &["a"])).await.unwrap();

        repo.delete_post(post_id, author).await.unwrap();

        assert!(repo.has_document(author).await);
        assert!(repo.list_by_author(author).await.unwrap().is_empty());
        assert!(repo.list_feed(Page::first(10)).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_for_one_author_are_all_kept() {
        let repo = Arc::new(InMemoryPostRepository::new());
        let author = Uuid::new_v4();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    repo.create_post(author, fields(&format!("post {i}"), &["a"]))
                        .await
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(repo.list_by_author(author).await.unwrap().len(), 16);
    }
}
