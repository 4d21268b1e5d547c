use thiserror::Error;

/// Application-wide error types.
///
/// Every gateway failure travels as an `AppError`. The loaders never surface
/// these to the reader: they degrade to fallback content or "not found" and
/// keep only the [`ErrorCode`] for diagnostics.
///
/// # Error Conversion
///
/// - `serde_json::Error` → `AppError::SerializationError`
///
/// Transport errors are mapped by the client crate, which knows whether a
/// failure was a timeout, a refused connection or an HTTP status.
///
/// # Examples
///
/// ```no_run
/// use sponsr_core::error::AppError;
///
/// fn example() -> Result<(), AppError> {
///     Err(AppError::Generic("Something went wrong".to_string()))
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP client request failed.
    ///
    /// Covers non-retryable HTTP statuses and malformed response bodies.
    #[error("API Client error: {0}")]
    ClientError(String),

    /// JSON serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The content project id cannot form a valid API host.
    #[error("Invalid content project: {0}")]
    InvalidProjectUrl(String),

    /// No content backend is configured; every query fails with this.
    #[error("Content backend is not configured")]
    NotConfigured,

    /// The content API answered with a 5xx status.
    #[error("Server error: HTTP {0}")]
    ServerError(u16),

    /// Network or connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded. Please wait and try again.")]
    RateLimitExceeded,

    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic application error for cases not covered by specific variants.
    #[error("Error: {0}")]
    Generic(String),
}

/// Stable, copyable classification of an [`AppError`].
///
/// Kept alongside degraded loader states so a caller can tell a missing
/// article from an unreachable backend without changing what is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Client,
    Serialization,
    InvalidUrl,
    NotConfigured,
    Server,
    Network,
    Timeout,
    RateLimited,
    Config,
    Other,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Client => "client",
            ErrorCode::Serialization => "serialization",
            ErrorCode::InvalidUrl => "invalid_url",
            ErrorCode::NotConfigured => "not_configured",
            ErrorCode::Server => "server",
            ErrorCode::Network => "network",
            ErrorCode::Timeout => "timeout",
            ErrorCode::RateLimited => "rate_limited",
            ErrorCode::Config => "config",
            ErrorCode::Other => "other",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AppError {
    /// Returns the stable classification of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::ClientError(_) => ErrorCode::Client,
            AppError::SerializationError(_) => ErrorCode::Serialization,
            AppError::InvalidUrl(_) | AppError::InvalidProjectUrl(_) => ErrorCode::InvalidUrl,
            AppError::NotConfigured => ErrorCode::NotConfigured,
            AppError::ServerError(_) => ErrorCode::Server,
            AppError::NetworkError(_) => ErrorCode::Network,
            AppError::Timeout(_) => ErrorCode::Timeout,
            AppError::RateLimitExceeded => ErrorCode::RateLimited,
            AppError::ConfigError(_) => ErrorCode::Config,
            AppError::Generic(_) => ErrorCode::Other,
        }
    }

    /// Returns a user-friendly error message suitable for CLI output.
    pub fn user_message(&self) -> String {
        match self {
            AppError::ClientError(msg) => {
                if msg.contains("timeout") || msg.contains("timed out") {
                    "Request timed out. The content API may be slow or unreachable.\n   Try again later.".to_string()
                } else if msg.contains("connect") {
                    format!(
                        "Cannot connect to the content API: {}\n   Check your internet connection.",
                        msg
                    )
                } else {
                    format!("API error: {}", msg)
                }
            }
            AppError::NotConfigured => {
                "No content project configured; showing built-in articles.\n   Set SANITY_PROJECT_ID to load live content.".to_string()
            }
            AppError::InvalidProjectUrl(project) => {
                format!(
                    "Invalid content project id: {}\n   Project ids contain only letters and digits.",
                    project
                )
            }
            AppError::NetworkError(msg) => {
                format!("Network error: {}\n   Check your internet connection.", msg)
            }
            AppError::Timeout(secs) => {
                format!(
                    "Request timed out after {} seconds.\n   The server may be overloaded. Try again later.",
                    secs
                )
            }
            AppError::RateLimitExceeded => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            AppError::ServerError(status) => {
                format!(
                    "The content API failed with HTTP {}.\n   It may be temporarily unavailable.",
                    status
                )
            }
            AppError::ConfigError(msg) => {
                format!(
                    "Cannot read configuration: {}\n   Fix the file or pass --config to use another.",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }

    /// Returns true if this error is retryable.
    ///
    /// `ClientError` covers 4xx statuses and undecodable bodies, which a
    /// retry would not change.
    ///
    /// # Examples
    ///
    /// ```
    /// use sponsr_core::error::AppError;
    ///
    /// let err = AppError::NetworkError("connection reset".to_string());
    /// assert!(err.is_retryable());
    ///
    /// let err = AppError::NotConfigured;
    /// assert!(!err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::NetworkError(_)
                | AppError::Timeout(_)
                | AppError::RateLimitExceeded
                | AppError::ServerError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_error() {
        let err = AppError::Generic("Something went wrong".to_string());
        assert_eq!(err.to_string(), "Error: Something went wrong");
    }

    #[test]
    fn test_server_error() {
        let err = AppError::ServerError(503);
        assert_eq!(err.to_string(), "Server error: HTTP 503");
        assert_eq!(err.code(), ErrorCode::Server);
        assert!(err.user_message().contains("HTTP 503"));
    }

    #[test]
    fn test_config_error_user_message() {
        let msg = AppError::ConfigError("config.toml: expected `]`".to_string()).user_message();
        assert!(msg.contains("config.toml"));
        assert!(msg.contains("--config"));
    }

    #[test]
    fn test_not_configured_user_message() {
        let msg = AppError::NotConfigured.user_message();
        assert!(msg.contains("SANITY_PROJECT_ID"));
    }

    #[test]
    fn test_error_from_serde() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("{ invalid json }");
        let app_err: AppError = result.unwrap_err().into();
        assert!(matches!(app_err, AppError::SerializationError(_)));
        assert_eq!(app_err.code(), ErrorCode::Serialization);
    }

    #[test]
    fn test_is_retryable() {
        assert!(AppError::NetworkError("timeout".to_string()).is_retryable());
        assert!(AppError::Timeout(30).is_retryable());
        assert!(AppError::RateLimitExceeded.is_retryable());
        assert!(AppError::ServerError(502).is_retryable());
        assert!(!AppError::ClientError("HTTP 404".to_string()).is_retryable());
        assert!(!AppError::InvalidProjectUrl("bad".to_string()).is_retryable());
        assert!(!AppError::NotConfigured.is_retryable());
    }

    #[test]
    fn test_codes() {
        assert_eq!(AppError::Timeout(30).code(), ErrorCode::Timeout);
        assert_eq!(AppError::InvalidUrl("x".into()).code(), ErrorCode::InvalidUrl);
        assert_eq!(AppError::InvalidProjectUrl("x".into()).code(), ErrorCode::InvalidUrl);
        assert_eq!(ErrorCode::RateLimited.to_string(), "rate_limited");
    }

    #[test]
    fn test_timeout_error() {
        let err = AppError::Timeout(30);
        assert_eq!(err.to_string(), "Request timed out after 30 seconds");
    }
}
