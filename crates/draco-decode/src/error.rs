//! Error types.

use std::fmt;

use crate::types::DataType;

/// Status codes reported by the decoder.
///
/// The numeric values are stable and match the codes other Draco decoders
/// report for the same failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    DracoError,
    IoError,
    InvalidParameter,
    UnsupportedVersion,
    UnknownVersion,
    UnsupportedFeature,
}

impl Status {
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::DracoError => -1,
            Self::IoError => -2,
            Self::InvalidParameter => -3,
            Self::UnsupportedVersion => -4,
            Self::UnknownVersion => -5,
            Self::UnsupportedFeature => -6,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A blob could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("draco: [{status}] {message}")]
pub struct DecodeError {
    pub status: Status,
    pub message: String,
}

impl DecodeError {
    pub(crate) fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub(crate) fn io(message: impl Into<String>) -> Self {
        Self::new(Status::IoError, message)
    }

    pub(crate) fn draco(message: impl Into<String>) -> Self {
        Self::new(Status::DracoError, message)
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        Self::new(Status::UnsupportedFeature, message)
    }

    /// Numeric status code, always negative.
    #[must_use]
    pub fn code(&self) -> i32 {
        self.status.code()
    }
}

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// The API was called in a way that can never succeed.
///
/// Kept apart from [`DecodeError`] so a caller bug is never mistaken for
/// corrupt input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("geometry store is already populated")]
    AlreadyDecoded,
    #[error("unsupported element type: {0}")]
    UnsupportedElementType(DataType),
}

/// Either failure of an in-place decode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Usage(#[from] UsageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code_and_message() {
        let err = DecodeError::io("Failed to parse Draco header.");
        assert_eq!(err.to_string(), "draco: [-2] Failed to parse Draco header.");
        assert_eq!(err.code(), -2);
    }

    #[test]
    fn codes_are_negative_and_distinct() {
        let all = [
            Status::DracoError,
            Status::IoError,
            Status::InvalidParameter,
            Status::UnsupportedVersion,
            Status::UnknownVersion,
            Status::UnsupportedFeature,
        ];
        for (i, a) in all.iter().enumerate() {
            assert!(a.code() < 0);
            for b in &all[i + 1..] {
                assert_ne!(a.code(), b.code());
            }
        }
    }
}
