//! Session lifecycle - login, challenge handling and readiness
//!
//! ```text
//! Unauthenticated -> Authenticating -> Active
//!                         |    ^
//!                         v    |
//!                   ChallengeRequired
//! ```
//!
//! A challenge is answered with a human-supplied code and authentication
//! restarts from the top. Any other login failure is fatal. There is no way
//! back from Active; an expired session shows up as ordinary action failures.

pub mod challenge;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::client::{ClientError, FeedClient};
use crate::error::{EngageError, Result};

pub use challenge::{SecurityCodeProvider, StdinCodePrompt};

/// Default number of challenge rounds before giving up.
pub const DEFAULT_MAX_CHALLENGE_ATTEMPTS: u32 = 5;

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticating,
    ChallengeRequired,
    Active,
}

/// Signals emitted to whoever is watching the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Login was challenged; a security code is being requested
    ChallengeRequired,
    /// Logged in; producer and consumer are about to start
    Ready,
}

/// One authenticated account.
pub struct Session {
    client: Arc<dyn FeedClient>,
    codes: Arc<dyn SecurityCodeProvider>,
    events: Option<mpsc::Sender<SessionEvent>>,
    max_challenge_attempts: u32,
    state: SessionState,
}

impl Session {
    pub fn new(client: Arc<dyn FeedClient>, codes: Arc<dyn SecurityCodeProvider>) -> Self {
        Self {
            client,
            codes,
            events: None,
            max_challenge_attempts: DEFAULT_MAX_CHALLENGE_ATTEMPTS,
            state: SessionState::Unauthenticated,
        }
    }

    /// Send lifecycle events to this channel.
    pub fn with_events(mut self, events: mpsc::Sender<SessionEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Cap the number of challenge rounds.
    pub fn with_max_challenge_attempts(mut self, attempts: u32) -> Self {
        self.max_challenge_attempts = attempts;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Log in, answering challenges until the session is active.
    pub async fn authenticate(&mut self, username: &str, password: &str) -> Result<()> {
        let mut challenges = 0;

        loop {
            self.state = SessionState::Authenticating;
            tracing::info!(username = %username, "Authenticating");

            match self.client.authenticate(username, password).await {
                Ok(()) => {
                    self.state = SessionState::Active;
                    tracing::info!(username = %username, "Session active");
                    self.emit(SessionEvent::Ready);
                    return Ok(());
                }
                Err(ClientError::ChallengeRequired) => {
                    challenges += 1;
                    if challenges > self.max_challenge_attempts {
                        self.state = SessionState::Unauthenticated;
                        return Err(EngageError::FatalAuth(format!(
                            "gave up after {} login challenges",
                            self.max_challenge_attempts
                        )));
                    }

                    self.state = SessionState::ChallengeRequired;
                    tracing::warn!(
                        attempt = challenges,
                        "Login challenged, requesting security code"
                    );
                    self.emit(SessionEvent::ChallengeRequired);

                    let code = self.codes.request_security_code().await?;
                    match self.client.solve_challenge(&code).await {
                        Ok(()) => tracing::info!("Security code accepted"),
                        Err(ClientError::IncorrectCode) => {
                            tracing::warn!("Incorrect security code")
                        }
                        Err(err) => tracing::warn!(error = %err, "Challenge submission failed"),
                    }
                }
                Err(err) => {
                    self.state = SessionState::Unauthenticated;
                    tracing::error!(error = %err, "Authentication failed");
                    return Err(EngageError::FatalAuth(err.to_string()));
                }
            }
        }
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(events) = &self.events
            && let Err(err) = events.try_send(event)
        {
            tracing::debug!(error = %err, "Session event dropped");
        }
    }
}
