use serde::Deserialize;
use thiserror::Error;

use crate::utils::is_valid_token;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("token does not look like a Telegram Bot API token (expected <digits>:<secret>)")]
    InvalidToken,

    #[error("update_limit must be within 1..=100, got {0}")]
    UpdateLimitOutOfRange(u32),

    #[error("max_retries must be at least 1")]
    ZeroRetries,

    #[error("max_concurrent_requests must be at least 1")]
    ZeroRequestSlots,

    #[error("max_concurrent_handlers must be at least 1")]
    ZeroHandlerSlots,

    #[error("default_timeout must not exceed max_timeout ({default} > {max})")]
    TimeoutOrder { default: u64, max: u64 },
}

/// Per-bot configuration. Construct with [`BotConfig::new`] and adjust the
/// fields you care about; everything except the token has a sensible
/// default. Deserializable so host applications can embed it in their own
/// config files.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// The token received from @BotFather.
    pub token: String,

    /// Only change this when running your own Bot API server.
    pub base_api_url: String,

    /// Base URL for file downloads; only change this when running your own
    /// Bot API server.
    pub base_file_url: String,

    /// Long-poll timeout in seconds. Short polling (0) is for tests only.
    pub polling_timeout: u64,

    /// Updates per polling cycle, 1..=100. `None` lets Telegram default
    /// to 100.
    pub update_limit: Option<u32>,

    /// Attempt budget for transient request errors (flood waits, timeouts,
    /// server errors).
    pub max_retries: usize,

    /// Per-request timeout in seconds when the call does not override it.
    pub default_timeout: u64,

    /// Upper bound for per-request timeouts, including retry escalation.
    pub max_timeout: u64,

    /// Cap on concurrent outbound API requests.
    pub max_concurrent_requests: usize,

    /// Cap on concurrently executing update handlers.
    pub max_concurrent_handlers: usize,

    /// Exec-replace the process when a handler requests a restart. Disable
    /// for embedded hosts that want to observe the restart exit code.
    pub exec_on_restart: bool,

    /// Log a DEBUG line for every successful request.
    pub log_successful_requests: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_api_url: "https://api.telegram.org".to_string(),
            base_file_url: "https://api.telegram.org/file".to_string(),
            polling_timeout: 20,
            update_limit: None,
            max_retries: 5,
            default_timeout: 30,
            max_timeout: 60,
            max_concurrent_requests: 50,
            max_concurrent_handlers: 8,
            exec_on_restart: true,
            log_successful_requests: false,
        }
    }
}

impl BotConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_token(&self.token) {
            return Err(ConfigError::InvalidToken);
        }
        if let Some(limit) = self.update_limit {
            if !(1..=100).contains(&limit) {
                return Err(ConfigError::UpdateLimitOutOfRange(limit));
            }
        }
        if self.max_retries == 0 {
            return Err(ConfigError::ZeroRetries);
        }
        if self.max_concurrent_requests == 0 {
            return Err(ConfigError::ZeroRequestSlots);
        }
        if self.max_concurrent_handlers == 0 {
            return Err(ConfigError::ZeroHandlerSlots);
        }
        if self.default_timeout > self.max_timeout {
            return Err(ConfigError::TimeoutOrder {
                default: self.default_timeout,
                max: self.max_timeout,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> BotConfig {
        BotConfig::new("123456:AAfoo_bar-Baz")
    }

    #[test]
    fn default_knobs_match_the_documented_values() {
        let config = valid();
        assert_eq!(config.polling_timeout, 20);
        assert_eq!(config.update_limit, None);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.default_timeout, 30);
        assert_eq!(config.max_timeout, 60);
        assert_eq!(config.max_concurrent_requests, 50);
        assert_eq!(config.max_concurrent_handlers, 8);
        assert!(config.exec_on_restart);
        config.validate().unwrap();
    }

    #[test]
    fn rejects_malformed_tokens() {
        let config = BotConfig::new("not-a-token");
        assert!(matches!(config.validate(), Err(ConfigError::InvalidToken)));
    }

    #[test]
    fn rejects_out_of_range_update_limit() {
        let mut config = valid();
        config.update_limit = Some(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UpdateLimitOutOfRange(0))
        ));
        config.update_limit = Some(101);
        assert!(config.validate().is_err());
        config.update_limit = Some(100);
        config.validate().unwrap();
    }

    #[test]
    fn rejects_inverted_timeouts() {
        let mut config = valid();
        config.default_timeout = 90;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TimeoutOrder { default: 90, max: 60 })
        ));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: BotConfig =
            serde_json::from_str(r#"{"token": "123456:AAfoo_bar-Baz", "polling_timeout": 5}"#)
                .unwrap();
        assert_eq!(config.polling_timeout, 5);
        assert_eq!(config.max_retries, 5);
        config.validate().unwrap();
    }
}
