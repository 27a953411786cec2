//! Error types
use std::error;
use std::fmt;

pub type Result<T> = std::result::Result<T, EpcError>;

/// The two ways a fallible EPC operation can fail.
///
/// Successes are plain `Ok(value)`; there is no dedicated "ok" variant here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpcError {
    /// The input was structurally or lexically wrong: a malformed URI, a
    /// non-digit character where a digit was required, a digit count that
    /// doesn't match the family's invariants, an unrecognised binary header,
    /// a binary string of the wrong length, an out-of-range filter value, or
    /// an unrecognised hex character.
    InvalidArgument(String),
    /// The element-string fields were well-formed on their own, but are not
    /// representable under the scheme currently selected for binary coding
    /// (e.g. a non-numeric serial under a 96-bit numeric scheme, or a serial
    /// too long for the alphanumeric scheme's character budget).
    InvalidSerial(String),
}

impl fmt::Display for EpcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EpcError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            EpcError::InvalidSerial(msg) => write!(f, "invalid serial: {}", msg),
        }
    }
}

impl error::Error for EpcError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        // Both variants are leaf errors; there's no further cause to chain.
        None
    }
}
