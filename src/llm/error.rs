//! LLM error classification and retry policy.

use std::time::Duration;

/// Broad classification of an LLM call failure, used to decide retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmErrorKind {
    /// 429 from the provider; retry after a delay.
    RateLimited,
    /// 5xx from the provider; transient, retry.
    ServerError,
    /// 4xx other than 429; our request is wrong, do not retry.
    ClientError,
    /// Connection, DNS or timeout failure; retry.
    NetworkError,
    /// The provider answered but the body was not parseable.
    ParseError,
}

impl std::fmt::Display for LlmErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate limited"),
            Self::ServerError => write!(f, "server error"),
            Self::ClientError => write!(f, "client error"),
            Self::NetworkError => write!(f, "network error"),
            Self::ParseError => write!(f, "parse error"),
        }
    }
}

/// Classify an HTTP status code from the provider.
pub fn classify_http_status(status: u16) -> LlmErrorKind {
    match status {
        429 => LlmErrorKind::RateLimited,
        500..=599 => LlmErrorKind::ServerError,
        400..=499 => LlmErrorKind::ClientError,
        _ => LlmErrorKind::ServerError,
    }
}

/// An LLM call failure with enough context to decide on a retry.
#[derive(Debug)]
pub struct LlmError {
    pub kind: LlmErrorKind,
    pub message: String,
    pub status: Option<u16>,
    /// Provider-suggested delay from a Retry-After header, if any.
    pub retry_after: Option<Duration>,
}

impl LlmError {
    pub fn rate_limited(message: String, retry_after: Option<Duration>) -> Self {
        Self {
            kind: LlmErrorKind::RateLimited,
            message,
            status: Some(429),
            retry_after,
        }
    }

    pub fn server_error(status: u16, message: String) -> Self {
        Self {
            kind: LlmErrorKind::ServerError,
            message,
            status: Some(status),
            retry_after: None,
        }
    }

    pub fn client_error(status: u16, message: String) -> Self {
        Self {
            kind: LlmErrorKind::ClientError,
            message,
            status: Some(status),
            retry_after: None,
        }
    }

    pub fn network_error(message: String) -> Self {
        Self {
            kind: LlmErrorKind::NetworkError,
            message,
            status: None,
            retry_after: None,
        }
    }

    pub fn parse_error(message: String) -> Self {
        Self {
            kind: LlmErrorKind::ParseError,
            message,
            status: None,
            retry_after: None,
        }
    }

    /// Delay before the given retry attempt (0-based).
    ///
    /// Honors Retry-After when the provider sent one, otherwise exponential
    /// backoff starting at one second, capped at 30 seconds.
    pub fn suggested_delay(&self, attempt: u32) -> Duration {
        if let Some(retry_after) = self.retry_after {
            return retry_after;
        }
        let exp = Duration::from_secs(1u64 << attempt.min(5));
        exp.min(Duration::from_secs(30))
    }
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({}): {}", self.kind, status, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for LlmError {}

/// Retry policy for transient LLM failures.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries (not counting the initial attempt).
    pub max_retries: u32,
    /// Hard cap on total time spent retrying one request.
    pub max_retry_duration: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            max_retry_duration: Duration::from_secs(90),
        }
    }
}

impl RetryConfig {
    /// Whether an error is worth retrying at all.
    pub fn should_retry(&self, error: &LlmError) -> bool {
        matches!(
            error.kind,
            LlmErrorKind::RateLimited | LlmErrorKind::ServerError | LlmErrorKind::NetworkError
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_statuses() {
        assert_eq!(classify_http_status(429), LlmErrorKind::RateLimited);
        assert_eq!(classify_http_status(500), LlmErrorKind::ServerError);
        assert_eq!(classify_http_status(503), LlmErrorKind::ServerError);
        assert_eq!(classify_http_status(400), LlmErrorKind::ClientError);
        assert_eq!(classify_http_status(401), LlmErrorKind::ClientError);
    }

    #[test]
    fn retry_policy_skips_client_errors() {
        let config = RetryConfig::default();
        assert!(config.should_retry(&LlmError::network_error("timeout".into())));
        assert!(config.should_retry(&LlmError::server_error(502, "bad gateway".into())));
        assert!(config.should_retry(&LlmError::rate_limited("slow down".into(), None)));
        assert!(!config.should_retry(&LlmError::client_error(400, "bad request".into())));
        assert!(!config.should_retry(&LlmError::parse_error("not json".into())));
    }

    #[test]
    fn backoff_grows_and_honors_retry_after() {
        let err = LlmError::server_error(500, "boom".into());
        assert_eq!(err.suggested_delay(0), Duration::from_secs(1));
        assert_eq!(err.suggested_delay(1), Duration::from_secs(2));
        assert_eq!(err.suggested_delay(2), Duration::from_secs(4));
        assert_eq!(err.suggested_delay(10), Duration::from_secs(30));

        let limited = LlmError::rate_limited("429".into(), Some(Duration::from_secs(7)));
        assert_eq!(limited.suggested_delay(0), Duration::from_secs(7));
    }
}
