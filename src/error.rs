use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Failures raised while building requests or talking to the news provider.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("`category` and `sources` cannot be combined in a headlines request")]
    ConflictingFilter,

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("rate limit exceeded{}", retry_hint(.retry_after))]
    RateLimited { retry_after: Option<u64> },

    #[error("network error: {0}")]
    Transient(String),

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("provider error (HTTP {status}): {message}")]
    Provider { status: u16, message: String },
}

impl ApiError {
    /// Only transient network failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Transient(_))
    }
}

fn retry_hint(retry_after: &Option<u64>) -> String {
    match retry_after {
        Some(secs) => format!(", retry in {}s", secs),
        None => String::new(),
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PagingError {
    #[error("index {index} is out of range (max {max})")]
    OutOfRange { index: usize, max: usize },
}

#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("article is already in favorites: {0}")]
    AlreadyFavorited(String),

    #[error("article is not in favorites: {0}")]
    NotFavorited(String),

    // Surfaced instead of silently resetting the file: a parse failure
    // here would otherwise throw away every saved article.
    #[error("favorites file {} is corrupt: {source}", .path.display())]
    CorruptStore {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Paging(#[from] PagingError),

    #[error(transparent)]
    Favorites(#[from] FavoritesError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transient_is_retryable() {
        assert!(ApiError::Transient("timed out".into()).is_retryable());
        assert!(!ApiError::Auth("bad key".into()).is_retryable());
        assert!(!ApiError::RateLimited { retry_after: None }.is_retryable());
        assert!(!ApiError::MalformedResponse("oops".into()).is_retryable());
        assert!(!ApiError::Provider {
            status: 500,
            message: "server".into()
        }
        .is_retryable());
        assert!(!ApiError::ConflictingFilter.is_retryable());
    }

    #[test]
    fn test_rate_limited_display_includes_hint() {
        let with_hint = ApiError::RateLimited {
            retry_after: Some(30),
        };
        assert_eq!(with_hint.to_string(), "rate limit exceeded, retry in 30s");

        let without = ApiError::RateLimited { retry_after: None };
        assert_eq!(without.to_string(), "rate limit exceeded");
    }

    #[test]
    fn test_out_of_range_display() {
        let err = PagingError::OutOfRange { index: 5, max: 2 };
        assert_eq!(err.to_string(), "index 5 is out of range (max 2)");
    }
}
