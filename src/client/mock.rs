//! Scriptable feed client for tests
//!
//! Each operation pops its next scripted result; once a script runs dry the
//! operation succeeds (and fetches return an empty feed). Every call is
//! recorded so tests can assert on order.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{ClientError, FeedClient};
use crate::domain::Item;

/// A call observed by the mock client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Authenticate { username: String },
    SolveChallenge { code: String },
    FetchFeed,
    Like { id: String },
    Comment { id: String, text: String },
}

#[derive(Default)]
struct Script {
    auth: VecDeque<Result<(), ClientError>>,
    challenge: VecDeque<Result<(), ClientError>>,
    feed: VecDeque<Result<Vec<Item>, ClientError>>,
    like: VecDeque<Result<(), ClientError>>,
    comment: VecDeque<Result<(), ClientError>>,
    calls: Vec<MockCall>,
}

/// Scriptable FeedClient
#[derive(Default)]
pub struct MockFeedClient {
    script: Mutex<Script>,
}

impl MockFeedClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue the result of the next `authenticate` call
    pub fn push_auth(&self, result: Result<(), ClientError>) -> &Self {
        self.script().auth.push_back(result);
        self
    }

    /// Queue the result of the next `solve_challenge` call
    pub fn push_challenge(&self, result: Result<(), ClientError>) -> &Self {
        self.script().challenge.push_back(result);
        self
    }

    /// Queue the result of the next `fetch_feed_items` call
    pub fn push_feed(&self, result: Result<Vec<Item>, ClientError>) -> &Self {
        self.script().feed.push_back(result);
        self
    }

    /// Queue the result of the next `like_item` call
    pub fn push_like(&self, result: Result<(), ClientError>) -> &Self {
        self.script().like.push_back(result);
        self
    }

    /// Queue the result of the next `comment_item` call
    pub fn push_comment(&self, result: Result<(), ClientError>) -> &Self {
        self.script().comment.push_back(result);
        self
    }

    /// All calls made so far, in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.script().calls.clone()
    }

    /// IDs passed to `like_item`, in order
    pub fn liked_ids(&self) -> Vec<String> {
        self.script()
            .calls
            .iter()
            .filter_map(|call| match call {
                MockCall::Like { id } => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    /// IDs passed to `comment_item`, in order
    pub fn commented_ids(&self) -> Vec<String> {
        self.script()
            .calls
            .iter()
            .filter_map(|call| match call {
                MockCall::Comment { id, .. } => Some(id.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl FeedClient for MockFeedClient {
    async fn authenticate(&self, username: &str, _password: &str) -> Result<(), ClientError> {
        let mut script = self.script();
        script.calls.push(MockCall::Authenticate {
            username: username.to_string(),
        });
        script.auth.pop_front().unwrap_or(Ok(()))
    }

    async fn solve_challenge(&self, code: &str) -> Result<(), ClientError> {
        let mut script = self.script();
        script.calls.push(MockCall::SolveChallenge { code: code.to_string() });
        script.challenge.pop_front().unwrap_or(Ok(()))
    }

    async fn fetch_feed_items(&self) -> Result<Vec<Item>, ClientError> {
        let mut script = self.script();
        script.calls.push(MockCall::FetchFeed);
        script.feed.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn like_item(&self, id: &str) -> Result<(), ClientError> {
        let mut script = self.script();
        script.calls.push(MockCall::Like { id: id.to_string() });
        script.like.pop_front().unwrap_or(Ok(()))
    }

    async fn comment_item(&self, id: &str, text: &str) -> Result<(), ClientError> {
        let mut script = self.script();
        script.calls.push(MockCall::Comment {
            id: id.to_string(),
            text: text.to_string(),
        });
        script.comment.pop_front().unwrap_or(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_defaults_to_success() {
        let mock = MockFeedClient::new();
        assert!(mock.authenticate("me", "pw").await.is_ok());
        assert!(mock.like_item("1").await.is_ok());
        assert!(mock.fetch_feed_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mock_pops_scripted_results_in_order() {
        let mock = MockFeedClient::new();
        mock.push_like(Err(ClientError::Api("gone".into())))
            .push_like(Ok(()));

        assert!(mock.like_item("a").await.is_err());
        assert!(mock.like_item("b").await.is_ok());
        assert_eq!(mock.liked_ids(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_mock_records_comment_text() {
        let mock = MockFeedClient::new();
        mock.comment_item("x", "nice").await.unwrap();
        assert_eq!(
            mock.calls(),
            vec![MockCall::Comment {
                id: "x".into(),
                text: "nice".into()
            }]
        );
    }
}
