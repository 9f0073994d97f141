//! Internal render errors.
//!
//! None of these reach callers of [`crate::ProgMeter`]: display problems are
//! logged and swallowed so a broken terminal never aborts the work being
//! displayed.

use thiserror::Error;

/// Failures inside the meter
#[derive(Error, Debug)]
pub enum ProgressError {
    /// Writing to the output sink failed
    #[error("terminal write failed: {0}")]
    Io(#[from] std::io::Error),

    /// The summary ticker thread could not be started
    #[error("failed to spawn summary ticker: {0}")]
    TickerSpawn(std::io::Error),

    /// No registered item has this key
    #[error("no item registered under key {0:?}")]
    UnknownKey(String),
}

impl ProgressError {
    /// Build an [`ProgressError::UnknownKey`] for `key`.
    pub fn unknown_key(key: &str) -> Self {
        Self::UnknownKey(key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ProgressError::unknown_key("QmX");
        assert_eq!(err.to_string(), "no item registered under key \"QmX\"");

        let err: ProgressError = std::io::Error::other("broken pipe").into();
        assert!(err.to_string().contains("broken pipe"));
    }
}
