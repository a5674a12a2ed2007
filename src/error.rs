//! Error types for the coin dashboard SDK

use thiserror::Error;

/// Errors that can occur when fetching from the market-data API
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network request failed (connect, body read, TLS)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Timeout waiting for response
    #[error("Request timeout")]
    Timeout,

    /// HTTP 400: the request itself is malformed
    #[error("Bad request (HTTP 400): {body}")]
    BadRequest { body: String },

    /// HTTP 404: the requested resource does not exist
    #[error("Not found (HTTP 404): {body}")]
    NotFound { body: String },

    /// HTTP 429: rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Any other non-success status
    #[error("API request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Maps a non-success status code and body to the matching variant
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            400 => Self::BadRequest { body },
            404 => Self::NotFound { body },
            429 => Self::RateLimited,
            _ => Self::Http { status, body },
        }
    }

    /// HTTP status code carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { .. } => Some(400),
            Self::NotFound { .. } => Some(404),
            Self::RateLimited => Some(429),
            Self::Http { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::Timeout | Self::InvalidResponse(_) => None,
        }
    }

    /// True for failures that retrying cannot fix: 400, 404 and rate limiting
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::BadRequest { .. } | Self::NotFound { .. } | Self::RateLimited
        )
    }

    /// True when the resource is absent, so callers can render "not found"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors raised by key-value storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// Stored value could not be encoded or decoded as JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backing file could not be read or written
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A thread panicked while holding the storage lock
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Errors produced by the chart data adapter
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChartError {
    /// The API answered but returned no price points
    #[error("No price data available")]
    NoData,
}

/// Crate-level error returned by the cache, chart loader and dashboard
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Chart(#[from] ChartError),
}

impl Error {
    /// Returns the underlying provider error, if this is one
    pub fn as_provider(&self) -> Option<&ProviderError> {
        match self {
            Self::Provider(e) => Some(e),
            _ => None,
        }
    }

    /// True when the API reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        self.as_provider().is_some_and(ProviderError::is_not_found)
    }

    /// True when the API throttled the request chain
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Provider(ProviderError::RateLimited))
    }

    /// True for the empty-series presentation state
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::Chart(ChartError::NoData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classification() {
        assert!(matches!(
            ProviderError::from_status(400, "bad"),
            ProviderError::BadRequest { .. }
        ));
        assert!(matches!(
            ProviderError::from_status(404, ""),
            ProviderError::NotFound { .. }
        ));
        assert!(matches!(
            ProviderError::from_status(429, ""),
            ProviderError::RateLimited
        ));
        assert!(matches!(
            ProviderError::from_status(503, "down"),
            ProviderError::Http { status: 503, .. }
        ));
    }

    #[test]
    fn test_terminal_errors() {
        assert!(ProviderError::from_status(400, "").is_terminal());
        assert!(ProviderError::from_status(404, "").is_terminal());
        assert!(ProviderError::RateLimited.is_terminal());
        assert!(!ProviderError::from_status(500, "").is_terminal());
        assert!(!ProviderError::Timeout.is_terminal());
        assert!(!ProviderError::InvalidResponse("x".into()).is_terminal());
    }

    #[test]
    fn test_status_is_carried() {
        assert_eq!(ProviderError::from_status(502, "").status(), Some(502));
        assert_eq!(ProviderError::RateLimited.status(), Some(429));
        assert_eq!(ProviderError::Timeout.status(), None);
    }

    #[test]
    fn test_crate_error_predicates() {
        let err: Error = ProviderError::from_status(404, "").into();
        assert!(err.is_not_found());
        assert!(!err.is_rate_limited());

        let err: Error = ChartError::NoData.into();
        assert!(err.is_no_data());
        assert!(err.as_provider().is_none());
    }
}
