//! Feed client layer - the remote account API seen from the scheduler
//!
//! This module provides:
//! - FeedClient trait for the remote service (auth, feed, like, comment)
//! - ClientError with rate-limit classification
//! - MockFeedClient, a scriptable client for tests
//! - SimulatedFeedClient, a self-contained client for dry runs

pub mod mock;
pub mod simulated;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Item;
use crate::error::EngageError;

pub use mock::MockFeedClient;
pub use simulated::SimulatedFeedClient;

/// Message fragments the remote service uses when it throttles an account.
pub const RATE_LIMIT_SIGNATURES: &[&str] = &[
    "feedback_required",
    "action blocked",
    "please wait a few minutes",
    "spam",
    "429",
    "too many requests",
];

/// Remote account API. Every call is independent; the client owns its own
/// session cookies and network timeouts.
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Log in with username and password
    async fn authenticate(&self, username: &str, password: &str) -> Result<(), ClientError>;

    /// Submit the security code for a pending challenge
    async fn solve_challenge(&self, code: &str) -> Result<(), ClientError>;

    /// Fetch the items currently on the account's feed
    async fn fetch_feed_items(&self) -> Result<Vec<Item>, ClientError>;

    /// Like one item
    async fn like_item(&self, id: &str) -> Result<(), ClientError>;

    /// Comment on one item
    async fn comment_item(&self, id: &str, text: &str) -> Result<(), ClientError>;
}

/// Errors returned by a feed client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Challenge required")]
    ChallengeRequired,

    #[error("Incorrect security code")]
    IncorrectCode,

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("API error: {0}")]
    Api(String),
}

impl ClientError {
    /// Returns true if the remote service is throttling us.
    ///
    /// Some clients surface throttling as a generic API error, so the message
    /// is matched against the known signatures as well.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            ClientError::RateLimited(_) => true,
            ClientError::Api(message) => {
                let lower = message.to_lowercase();
                RATE_LIMIT_SIGNATURES.iter().any(|sig| lower.contains(sig))
            }
            _ => false,
        }
    }
}

impl From<ClientError> for EngageError {
    /// Rate-limit errors are classified with `is_rate_limit` before conversion.
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::ChallengeRequired => EngageError::ChallengeRequired,
            ClientError::IncorrectCode | ClientError::Auth(_) => {
                EngageError::FatalAuth(err.to_string())
            }
            other => EngageError::TransientAction(other.to_string()),
        }
    }
}
