//! In-memory deduplicating message cache
//!
//! Owns every message seen during the session plus the set of queries
//! already fully resolved against the remote source. Insertion order is
//! preserved so repeated listings stay stable. The cache lives for the
//! process lifetime and has no eviction; a single interactive session does
//! not accumulate enough mail to matter.

use std::collections::HashSet;

use tracing::debug;

use crate::models::Message;

/// Deduplicating message cache with resolved-query tracking
///
/// Invariant: `known_ids` always equals the set of `id` fields across
/// `messages`. `resolved_queries` only grows.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Distinct messages in first-seen order
    messages: Vec<Message>,
    /// Ids present in `messages`, for O(1) duplicate checks
    known_ids: HashSet<String>,
    /// Queries answered authoritatively from the cache on repeat lookups
    resolved_queries: HashSet<String>,
}

impl CacheStore {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a fetched batch, skipping duplicates and malformed entries
    ///
    /// Messages without an id never enter the cache; they are logged and
    /// skipped rather than surfaced as errors. The query is marked resolved
    /// only when at least one *new* message was admitted: a fetch yielding
    /// only duplicates leaves the query unresolved and it will hit the
    /// remote source again next time.
    ///
    /// Returns the number of newly admitted messages.
    pub fn ingest(&mut self, query: &str, batch: impl IntoIterator<Item = Message>) -> usize {
        let mut count_new = 0;
        for message in batch {
            if message.id.is_empty() {
                debug!(query, "skipping message without id");
                continue;
            }
            if self.known_ids.contains(&message.id) {
                continue;
            }
            self.known_ids.insert(message.id.clone());
            self.messages.push(message);
            count_new += 1;
        }

        if count_new > 0 {
            self.resolved_queries.insert(query.to_owned());
        }
        count_new
    }

    /// Case-insensitive substring search over cached messages
    ///
    /// A message matches when `query` appears in any of sender, subject,
    /// recipient, plain body, or HTML body. Results keep insertion order.
    pub fn search_local(&self, query: &str) -> Vec<Message> {
        let needle = query.to_lowercase();
        self.messages
            .iter()
            .filter(|m| m.contains_text(&needle))
            .cloned()
            .collect()
    }

    /// Whether `query` has been fully fetched from the remote source before
    pub fn is_resolved(&self, query: &str) -> bool {
        self.resolved_queries.contains(query)
    }

    /// Number of distinct cached messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the cache holds no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
