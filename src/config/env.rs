//! Environment overrides for credentials.

use super::Config;

pub const ENV_USERNAME: &str = "ENGAGER_USERNAME";
pub const ENV_PASSWORD: &str = "ENGAGER_PASSWORD";

impl Config {
    /// Overwrite credentials from the environment when set and non-empty
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    pub(crate) fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(username) = lookup(ENV_USERNAME).filter(|v| !v.is_empty()) {
            log::debug!("Username taken from {}", ENV_USERNAME);
            self.username = username;
        }
        if let Some(password) = lookup(ENV_PASSWORD).filter(|v| !v.is_empty()) {
            log::debug!("Password taken from {}", ENV_PASSWORD);
            self.password = password;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_overrides_replace_credentials() {
        let env: HashMap<&str, &str> =
            [(ENV_USERNAME, "env_user"), (ENV_PASSWORD, "env_pass")].into();
        let mut config = Config {
            username: "file_user".to_string(),
            ..Config::default()
        };

        config.apply_overrides_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.username, "env_user");
        assert_eq!(config.password, "env_pass");
    }

    #[test]
    fn test_empty_or_missing_env_keeps_file_values() {
        let env: HashMap<&str, &str> = [(ENV_USERNAME, "")].into();
        let mut config = Config {
            username: "file_user".to_string(),
            password: "file_pass".to_string(),
            ..Config::default()
        };

        config.apply_overrides_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.username, "file_user");
        assert_eq!(config.password, "file_pass");
    }
}
