//! Security code hook for login challenges.

use async_trait::async_trait;
use colored::*;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::{EngageError, Result};

/// Supplies the code for a login challenge. Expected to block until a human
/// has typed it.
#[async_trait]
pub trait SecurityCodeProvider: Send + Sync {
    async fn request_security_code(&self) -> Result<String>;
}

/// Reads the security code from standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinCodePrompt;

#[async_trait]
impl SecurityCodeProvider for StdinCodePrompt {
    async fn request_security_code(&self) -> Result<String> {
        println!(
            "{}",
            "Security code required. Check your email or SMS and enter the code:".yellow()
        );

        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        if reader.read_line(&mut line).await? == 0 {
            return Err(EngageError::FatalAuth(
                "standard input closed before a security code was entered".to_string(),
            ));
        }

        Ok(line.trim().to_string())
    }
}
