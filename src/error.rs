//! Error types for cache lifecycle and persistence

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, StashError>;

/// Errors produced by cache file lifecycle and persistence.
#[derive(Debug, thiserror::Error)]
pub enum StashError {
    /// Strict open of a path that does not exist.
    #[error("cache file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl StashError {
    /// True for the missing-file error raised by strict open.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StashError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found() {
        let err = StashError::NotFound {
            path: PathBuf::from("/tmp/missing.yml"),
        };
        assert!(err.is_not_found());

        let err = StashError::from(std::io::Error::other("disk on fire"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_message_includes_path() {
        let err = StashError::NotFound {
            path: PathBuf::from("/tmp/missing.yml"),
        };
        assert!(err.to_string().contains("/tmp/missing.yml"));
    }
}
