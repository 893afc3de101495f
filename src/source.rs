//! Remote source capability and bounded fetch
//!
//! Models the remote provider as a single-method trait yielding a lazy,
//! finite stream of messages. The stream may fail mid-sequence; a partial
//! yield before failure is valid partial data and is never rolled back.

use futures::StreamExt;
use futures::stream::{self, BoxStream};
use tracing::warn;

use crate::errors::AppResult;
use crate::models::Message;

/// Lazy sequence of messages produced by a remote fetch
///
/// Items are `Result` so the provider can report a transport error
/// mid-stream without discarding messages already yielded.
pub type MessageStream = BoxStream<'static, AppResult<Message>>;

/// Remote message provider capability
///
/// Each `fetch` call restarts from the beginning of the result set for
/// `query`. Implementations own their transport; this core never sees
/// connection details.
pub trait RemoteSource {
    /// Fetch all messages matching `query` as a lazy stream
    fn fetch(&self, query: &str) -> MessageStream;
}

/// Consume at most `limit` messages from a remote fetch
///
/// Materializes the stream into a concrete ordered list, stopping as soon as
/// `limit` items have been taken regardless of how many more the source
/// could yield. A mid-stream error ends consumption with a warning; messages
/// gathered before the failure are kept.
pub async fn fetch_bounded<S: RemoteSource + ?Sized>(
    source: &S,
    query: &str,
    limit: usize,
) -> Vec<Message> {
    let mut stream = source.fetch(query).take(limit);
    let mut fetched = Vec::new();

    while let Some(item) = stream.next().await {
        match item {
            Ok(message) => fetched.push(message),
            Err(e) => {
                warn!(query, kept = fetched.len(), error = %e, "remote fetch failed mid-stream; keeping partial results");
                break;
            }
        }
    }

    fetched
}

/// In-memory remote source backed by a mailbox fixture
///
/// Used by the demo binary and tests. Serves the subset of fixture messages
/// matching `query` by substring; provider operator queries (`is:unread` and
/// friends) cannot be evaluated against a static fixture, so any `is:` query
/// yields the whole mailbox.
pub struct FixtureSource {
    messages: Vec<Message>,
}

impl FixtureSource {
    /// Create a fixture source over a fixed message list
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

impl RemoteSource for FixtureSource {
    fn fetch(&self, query: &str) -> MessageStream {
        let needle = query.to_lowercase();
        let matched: Vec<AppResult<Message>> = self
            .messages
            .iter()
            .filter(|m| needle.starts_with("is:") || m.contains_text(&needle))
            .cloned()
            .map(Ok)
            .collect();

        stream::iter(matched).boxed()
    }
}
