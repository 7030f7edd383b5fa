use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use super::redact_token;

/// Default `retry_after` for 429 responses that carry none, in seconds.
const DEFAULT_FLOOD_WAIT: u64 = 5;
/// Fixed `retry_after` for retryable 5xx responses, in seconds.
const SERVER_ERROR_WAIT: u64 = 20;

/// Everything that can go wrong while talking to the Bot API or while
/// preparing/dispatching a request.
///
/// The HTTP-status variants mirror Telegram's error contract; use
/// [`TelegramError::retryable`] and [`TelegramError::critical`] instead of
/// matching on individual variants where possible.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// 400 - Bad request, usually caused by invalid parameters.
    #[error("'{method}' -> HTTP 400: {description}")]
    BadRequest { method: String, description: String },

    /// 401 - Invalid bot token. Critical.
    #[error("'{method}' -> HTTP 401: {description}")]
    Unauthorized { method: String, description: String },

    /// 403 - The bot lacks permission for the requested action.
    #[error("'{method}' -> HTTP 403: {description}")]
    Forbidden { method: String, description: String },

    /// 404 - Resource not found (e.g. an invalid API endpoint).
    #[error("'{method}' -> HTTP 404: {description}")]
    NotFound { method: String, description: String },

    /// 409 - Conflict, typically another getUpdates consumer or a set
    /// webhook. Critical.
    #[error("'{method}' -> HTTP 409: {description}")]
    Conflict { method: String, description: String },

    /// 413 - Payload (message or file) too large.
    #[error("'{method}' -> HTTP 413: {description}")]
    PayloadTooLarge { method: String, description: String },

    /// 429 - Rate limited; retry after the indicated number of seconds.
    #[error("'{method}' -> HTTP 429: {description} (retry after {retry_after}s)")]
    TooManyRequests {
        method: String,
        description: String,
        retry_after: u64,
    },

    /// 500 - Telegram server-side issue, retryable.
    #[error("'{method}' -> HTTP 500: {description}")]
    InternalServerError { method: String, description: String },

    /// 502 - Telegram is down or having temporary issues, retryable.
    #[error("'{method}' -> HTTP 502: {description}")]
    BadGateway { method: String, description: String },

    /// 504 - Telegram's servers are taking too long to respond, retryable.
    #[error("'{method}' -> HTTP 504: {description}")]
    GatewayTimeout { method: String, description: String },

    /// Any other HTTP error status.
    #[error("'{method}' -> HTTP {status}: {description}")]
    Api {
        method: String,
        status: u16,
        description: String,
    },

    /// Transport-level failure (timeout, connection reset, DNS, TLS).
    /// Retried with exponential backoff. The source error is deliberately
    /// kept out of the display string since reqwest errors may embed the
    /// request URL, token included.
    #[error("network error during '{method}'")]
    Network {
        method: String,
        #[source]
        source: reqwest::Error,
    },

    /// File staging failed while preparing a request.
    #[error("file processing failed: {0}")]
    FileProcessing(String),

    /// Parameter serialization failed, mostly due to a wrong data type.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// The result converter rejected the response payload.
    #[error("result conversion failed: {0}")]
    ResultConversion(String),

    /// A request exhausted its retry budget.
    #[error("'{method}' -> max retries exceeded after {attempts} attempt(s)")]
    MaxRetriesExceeded { method: String, attempts: usize },

    /// Requests are only possible while polling or idling; this error
    /// always propagates regardless of the catch-errors policy.
    #[error("HTTP client is not initialized; start the bot with start_polling or start_idle first")]
    ClientNotStarted,

    /// An event handler crashed while processing an update.
    #[error("error in '{event}' event handler: {message}")]
    EventHandler { event: String, message: String },

    /// A filter crashed while being evaluated against an update.
    #[error("error in '{event}' filter evaluation: {message}")]
    FilterEvaluation { event: String, message: String },
}

impl TelegramError {
    /// Classify an HTTP error response. `body` is the raw response text;
    /// the Telegram `description` and `parameters.retry_after` fields are
    /// extracted when the body parses as JSON.
    pub fn from_response(method: &str, status: u16, body: &str, url: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let description = parsed
            .as_ref()
            .and_then(|v| v.get("description"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                let text = body.trim();
                if text.is_empty() {
                    "No description available.".to_string()
                } else {
                    redact_token(text)
                }
            });
        let method = method.to_string();

        match status {
            400 => Self::BadRequest { method, description },
            401 => Self::Unauthorized { method, description },
            403 => Self::Forbidden { method, description },
            404 => Self::NotFound {
                method,
                description: format!("{description} URL: '{}'", redact_token(url)),
            },
            409 => Self::Conflict { method, description },
            413 => Self::PayloadTooLarge { method, description },
            429 => {
                let retry_after = parsed
                    .as_ref()
                    .and_then(|v| v.get("parameters"))
                    .and_then(|p| p.get("retry_after"))
                    .and_then(Value::as_u64)
                    .unwrap_or(DEFAULT_FLOOD_WAIT);
                Self::TooManyRequests {
                    method,
                    description,
                    retry_after,
                }
            }
            500 => Self::InternalServerError { method, description },
            502 => Self::BadGateway { method, description },
            504 => Self::GatewayTimeout { method, description },
            _ => Self::Api {
                method,
                status,
                description,
            },
        }
    }

    /// Whether the request pipeline may retry after this error.
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            Self::TooManyRequests { .. }
                | Self::InternalServerError { .. }
                | Self::BadGateway { .. }
                | Self::GatewayTimeout { .. }
                | Self::Network { .. }
        )
    }

    /// Critical errors abort the polling driver when they occur on the
    /// update-fetch call.
    pub fn critical(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::Conflict { .. })
    }

    /// How long to wait before the next attempt, for status-classified
    /// retryable errors. Transport errors use exponential backoff instead.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::TooManyRequests { retry_after, .. } => Some(Duration::from_secs(*retry_after)),
            Self::InternalServerError { .. } | Self::BadGateway { .. } | Self::GatewayTimeout { .. } => {
                Some(Duration::from_secs(SERVER_ERROR_WAIT))
            }
            _ => None,
        }
    }

    /// True for errors derived from a Telegram API response status.
    pub fn is_api_error(&self) -> bool {
        matches!(
            self,
            Self::BadRequest { .. }
                | Self::Unauthorized { .. }
                | Self::Forbidden { .. }
                | Self::NotFound { .. }
                | Self::Conflict { .. }
                | Self::PayloadTooLarge { .. }
                | Self::TooManyRequests { .. }
                | Self::InternalServerError { .. }
                | Self::BadGateway { .. }
                | Self::GatewayTimeout { .. }
                | Self::Api { .. }
        )
    }
}

/// Exit code `start_polling` resolves to when the driver stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// The bot was shut down by the user (Ctrl-C or `Bot::stop`).
    TerminatedByUser = 0,
    /// A handler requested a restart; the process re-executes itself.
    Restart = 1,
    /// An unexpected error stopped the driver.
    UnexpectedError = 2,
    /// A critical Telegram API error (401 or 409) on the update fetch.
    CriticalTelegramError = 3,
    /// A non-critical Telegram API error on the update fetch. Should not
    /// happen in theory (the getUpdates request would have to be invalid).
    UnexpectedTelegramError = 4,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
