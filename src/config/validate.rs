//! Startup validation. Runs before any network activity; every failure is a
//! ConfigValidation error.

use super::Config;
use crate::error::{EngageError, Result};

/// Longest comment the remote service accepts.
pub const MAX_COMMENT_LENGTH: usize = 2200;

fn invalid(message: impl Into<String>) -> EngageError {
    EngageError::ConfigValidation(message.into())
}

impl Config {
    /// Check every invariant the scheduler relies on
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(invalid("username must not be empty"));
        }
        if self.password.is_empty() {
            return Err(invalid("password must not be empty"));
        }

        if self.comments.is_empty() {
            return Err(invalid("comments must contain at least one entry"));
        }
        for (i, comment) in self.comments.iter().enumerate() {
            if comment.trim().is_empty() {
                return Err(invalid(format!("comment #{} is blank", i + 1)));
            }
            let length = comment.chars().count();
            if length > MAX_COMMENT_LENGTH {
                return Err(invalid(format!(
                    "comment #{} is {} characters (max: {})",
                    i + 1,
                    length,
                    MAX_COMMENT_LENGTH
                )));
            }
        }

        for user in self.allow_users.iter().chain(&self.deny_users) {
            if user.trim().trim_start_matches('@').is_empty() {
                return Err(invalid("allow/deny lists must not contain blank usernames"));
            }
        }

        let pacing = &self.pacing;
        if pacing.min_like_timeout_secs > pacing.max_like_timeout_secs {
            return Err(invalid(format!(
                "min_like_timeout_secs ({}) exceeds max_like_timeout_secs ({})",
                pacing.min_like_timeout_secs, pacing.max_like_timeout_secs
            )));
        }
        if pacing.min_comment_timeout_secs > pacing.max_comment_timeout_secs {
            return Err(invalid(format!(
                "min_comment_timeout_secs ({}) exceeds max_comment_timeout_secs ({})",
                pacing.min_comment_timeout_secs, pacing.max_comment_timeout_secs
            )));
        }

        if self.feed.refresh_interval_secs == 0 {
            return Err(invalid("feed.refresh_interval_secs must be positive"));
        }
        if self.rate_limit.base_cooldown_secs == 0 {
            return Err(invalid("rate_limit.base_cooldown_secs must be positive"));
        }
        if !self.rate_limit.growth_factor.is_finite() || self.rate_limit.growth_factor < 1.0 {
            return Err(invalid(format!(
                "rate_limit.growth_factor must be at least 1.0, got {}",
                self.rate_limit.growth_factor
            )));
        }
        if self.consumer.poll_interval_ms == 0 {
            return Err(invalid("consumer.poll_interval_ms must be positive"));
        }
        if self.session.max_challenge_attempts == 0 {
            return Err(invalid("session.max_challenge_attempts must be at least 1"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            username: "someone".to_string(),
            password: "hunter2".to_string(),
            comments: vec!["Great shot!".to_string()],
            ..Config::default()
        }
    }

    fn rejected(config: Config) -> String {
        match config.validate() {
            Err(EngageError::ConfigValidation(message)) => message,
            other => panic!("expected ConfigValidation, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_default_config_is_invalid() {
        assert!(rejected(Config::default()).contains("username"));
    }

    #[test]
    fn test_empty_password_rejected() {
        let config = Config {
            password: String::new(),
            ..valid()
        };
        assert!(rejected(config).contains("password"));
    }

    #[test]
    fn test_empty_comments_rejected() {
        let config = Config {
            comments: Vec::new(),
            ..valid()
        };
        assert!(rejected(config).contains("comments"));
    }

    #[test]
    fn test_blank_comment_rejected() {
        let config = Config {
            comments: vec!["ok".to_string(), "   ".to_string()],
            ..valid()
        };
        assert!(rejected(config).contains("#2"));
    }

    #[test]
    fn test_overlong_comment_rejected() {
        let config = Config {
            comments: vec!["x".repeat(MAX_COMMENT_LENGTH + 1)],
            ..valid()
        };
        assert!(rejected(config).contains("max: 2200"));
    }

    #[test]
    fn test_blank_username_in_lists_rejected() {
        let config = Config {
            deny_users: vec!["@".to_string()],
            ..valid()
        };
        assert!(rejected(config).contains("blank usernames"));
    }

    #[test]
    fn test_inverted_like_bounds_rejected() {
        let mut config = valid();
        config.pacing.min_like_timeout_secs = 40;
        assert!(rejected(config).contains("min_like_timeout_secs"));
    }

    #[test]
    fn test_inverted_comment_bounds_rejected() {
        let mut config = valid();
        config.pacing.max_comment_timeout_secs = 1;
        assert!(rejected(config).contains("min_comment_timeout_secs"));
    }

    #[test]
    fn test_equal_bounds_allowed() {
        let mut config = valid();
        config.pacing.min_like_timeout_secs = 20;
        config.pacing.max_like_timeout_secs = 20;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_refresh_interval_rejected() {
        let mut config = valid();
        config.feed.refresh_interval_secs = 0;
        assert!(rejected(config).contains("refresh_interval_secs"));
    }

    #[test]
    fn test_shrinking_growth_factor_rejected() {
        let mut config = valid();
        config.rate_limit.growth_factor = 0.5;
        assert!(rejected(config).contains("growth_factor"));
    }

    #[test]
    fn test_zero_challenge_attempts_rejected() {
        let mut config = valid();
        config.session.max_challenge_attempts = 0;
        assert!(rejected(config).contains("max_challenge_attempts"));
    }
}
