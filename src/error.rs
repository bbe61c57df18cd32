//! Error types for frame processing and configuration.

use thiserror::Error;

use crate::types::{ColorFormat, StreamKind};

/// Reasons a frame could not be turned into pixels.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// A sample array or cached buffer disagrees with the declared frame size.
    #[error("{stream} frame size mismatch: got {actual}, expected {expected}")]
    DimensionMismatch {
        stream: StreamKind,
        expected: usize,
        actual: usize,
    },

    #[error("color conversion failed: {0}")]
    ColorConversion(String),

    /// The crate was built without support for this color layout.
    #[error("unsupported color format: {0}")]
    UnsupportedFormat(ColorFormat),
}

/// Errors raised while reading configuration values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown segmentation resolution `{0}`, expected `hd` or `ld`")]
    InvalidResolution(String),

    #[error("invalid infrared discarded bits `{0}`")]
    InvalidDiscardedBits(String),
}

/// Result of a compositor update.
///
/// Skipping is not a failure: the previous pixels stay in place and the next
/// well-formed frame refreshes them.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Refreshed,
    Skipped(FrameError),
}

impl UpdateOutcome {
    pub fn is_refreshed(&self) -> bool {
        matches!(self, UpdateOutcome::Refreshed)
    }

    pub fn skip_reason(&self) -> Option<&FrameError> {
        match self {
            UpdateOutcome::Refreshed => None,
            UpdateOutcome::Skipped(err) => Some(err),
        }
    }
}

/// Fails with [`FrameError::DimensionMismatch`] unless `actual == expected`.
pub(crate) fn check_len(
    stream: StreamKind,
    expected: usize,
    actual: usize,
) -> Result<(), FrameError> {
    if actual == expected {
        Ok(())
    } else {
        Err(FrameError::DimensionMismatch {
            stream,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_error_names_the_stream() {
        let err = check_len(StreamKind::BodyIndex, 4, 3).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("body index"));
        assert!(msg.contains("got 3"));
        assert!(msg.contains("expected 4"));
    }

    #[test]
    fn matching_lengths_pass() {
        assert!(check_len(StreamKind::Depth, 12, 12).is_ok());
    }

    #[test]
    fn outcome_exposes_skip_reason() {
        let skipped = UpdateOutcome::Skipped(FrameError::UnsupportedFormat(ColorFormat::Nv12));
        assert!(!skipped.is_refreshed());
        assert!(matches!(
            skipped.skip_reason(),
            Some(FrameError::UnsupportedFormat(ColorFormat::Nv12))
        ));
        assert!(UpdateOutcome::Refreshed.is_refreshed());
        assert_eq!(UpdateOutcome::Refreshed.skip_reason(), None);
    }
}
