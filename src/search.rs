//! Search coordinator: cache-versus-remote policy
//!
//! Decides, for each `(query, limit)` pair, whether to answer from the local
//! cache or fetch from the remote source, and reconciles the two without
//! duplicating cached messages.

use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::errors::{AppError, AppResult};
use crate::models::Message;
use crate::source::{RemoteSource, fetch_bounded};

/// Upper bound on a single fetch, to keep remote traversal cheap
pub const MAX_FETCH_LIMIT: usize = 500;

/// Search coordinator over a cache store and a remote source
///
/// Owns the cache exclusively; nothing else mutates it. The unread sentinel
/// query is never served from the cache because unread status is inherently
/// time-varying.
pub struct SearchCoordinator<S: RemoteSource> {
    cache: CacheStore,
    source: S,
    unread_query: String,
}

impl<S: RemoteSource> SearchCoordinator<S> {
    /// Create a coordinator with an empty cache
    pub fn new(source: S, unread_query: impl Into<String>) -> Self {
        Self {
            cache: CacheStore::new(),
            source,
            unread_query: unread_query.into(),
        }
    }

    /// Search for messages matching `query`, fetching at most `limit`
    ///
    /// Policy, evaluated in order:
    /// 1. the unread sentinel always bypasses the cache
    /// 2. a resolved query is served exclusively from the local cache
    /// 3. anything else is fetched remotely, ingested, and the fetched batch
    ///    is returned as-is (not the accumulated local matching set)
    ///
    /// An empty result is a valid outcome, not an error. Remote failures
    /// mid-fetch degrade to whatever was gathered before the failure.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `limit` is zero or above
    /// [`MAX_FETCH_LIMIT`].
    pub async fn search(&mut self, query: &str, limit: usize) -> AppResult<Vec<Message>> {
        if limit == 0 || limit > MAX_FETCH_LIMIT {
            return Err(AppError::invalid(format!(
                "limit must be in range 1..{MAX_FETCH_LIMIT}"
            )));
        }

        if query != self.unread_query && self.cache.is_resolved(query) {
            let found = self.cache.search_local(query);
            debug!(query, hits = found.len(), "serving resolved query from cache");
            return Ok(found);
        }

        let fetched = fetch_bounded(&self.source, query, limit).await;
        let admitted = self.cache.ingest(query, fetched.iter().cloned());
        info!(
            query,
            fetched = fetched.len(),
            admitted,
            cached = self.cache.len(),
            "remote search complete"
        );
        Ok(fetched)
    }

    /// Read access to the underlying cache
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{MAX_FETCH_LIMIT, SearchCoordinator};
    use crate::models::Message;
    use crate::source::{FixtureSource, MessageStream, RemoteSource};

    const UNREAD: &str = "is:unread";

    fn message(id: &str, subject: &str) -> Message {
        Message {
            id: id.to_owned(),
            subject: subject.to_owned(),
            sender: format!("{id}@example.com"),
            recipient: String::new(),
            timestamp: String::new(),
            plain_body: String::new(),
            html_body: String::new(),
            attachments: Vec::new(),
        }
    }

    /// Fixture-backed source that counts fetch calls
    struct CountingSource {
        inner: FixtureSource,
        fetches: Arc<AtomicUsize>,
    }

    impl CountingSource {
        fn new(messages: Vec<Message>) -> (Self, Arc<AtomicUsize>) {
            let fetches = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    inner: FixtureSource::new(messages),
                    fetches: Arc::clone(&fetches),
                },
                fetches,
            )
        }
    }

    impl RemoteSource for CountingSource {
        fn fetch(&self, query: &str) -> MessageStream {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch(query)
        }
    }

    #[tokio::test]
    async fn first_search_fetches_and_resolves_then_serves_locally() {
        let mailbox = vec![
            message("a", "project:x status"),
            message("b", "project:x budget"),
            message("c", "project:x kickoff"),
        ];
        let (source, fetches) = CountingSource::new(mailbox);
        let mut coordinator = SearchCoordinator::new(source, UNREAD);

        let first = coordinator.search("project:x", 50).await.expect("search");
        let ids: Vec<&str> = first.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert!(coordinator.cache().is_resolved("project:x"));
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        let second = coordinator.search("project:x", 10).await.expect("search");
        assert_eq!(second, first);
        assert_eq!(fetches.load(Ordering::SeqCst), 1, "no second remote call");
    }

    #[tokio::test]
    async fn unread_sentinel_always_fetches_remotely() {
        let (source, fetches) = CountingSource::new(vec![message("a", "hello")]);
        let mut coordinator = SearchCoordinator::new(source, UNREAD);

        coordinator.search(UNREAD, 10).await.expect("search");
        coordinator.search(UNREAD, 10).await.expect("search");
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn limit_bounds_remote_traversal() {
        let mailbox = (0..30).map(|i| message(&format!("id-{i}"), "bulk")).collect();
        let (source, _) = CountingSource::new(mailbox);
        let mut coordinator = SearchCoordinator::new(source, UNREAD);

        let found = coordinator.search("bulk", 10).await.expect("search");
        assert_eq!(found.len(), 10);
        assert_eq!(coordinator.cache().len(), 10);
    }

    #[tokio::test]
    async fn remote_path_returns_fetched_batch_not_local_rerun() {
        // "alpha beta" is cached via the first query; the second query's
        // remote batch overlaps it, and the caller must see exactly that
        // batch even though the cache already holds a matching message.
        let mailbox = vec![message("a", "alpha beta"), message("b", "beta gamma")];
        let (source, _) = CountingSource::new(mailbox);
        let mut coordinator = SearchCoordinator::new(source, UNREAD);

        coordinator.search("alpha", 10).await.expect("search");
        let beta = coordinator.search("beta", 10).await.expect("search");
        let ids: Vec<&str> = beta.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(coordinator.cache().len(), 2, "overlap is stored once");
    }

    #[tokio::test]
    async fn empty_result_is_valid_not_an_error() {
        let (source, _) = CountingSource::new(vec![message("a", "hello")]);
        let mut coordinator = SearchCoordinator::new(source, UNREAD);

        let found = coordinator.search("nomatch", 10).await.expect("search");
        assert!(found.is_empty());
        assert!(!coordinator.cache().is_resolved("nomatch"));
    }

    #[tokio::test]
    async fn rejects_zero_and_oversized_limits() {
        let (source, fetches) = CountingSource::new(vec![message("a", "hello")]);
        let mut coordinator = SearchCoordinator::new(source, UNREAD);

        coordinator.search("hello", 0).await.expect_err("zero limit");
        coordinator
            .search("hello", MAX_FETCH_LIMIT + 1)
            .await
            .expect_err("oversized limit");
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
    }
}
