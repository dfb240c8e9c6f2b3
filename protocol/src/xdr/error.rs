//! Error types for the XDR codec.
//!
//! Every construction, encode, and decode path in this crate returns an
//! [`XdrError`]. Failures are immediate and final: there are no partial
//! results, no retries, and no silent coercion (an over-long name is an
//! error, never a truncation).

use thiserror::Error;

/// Errors raised while building, encoding, or decoding ledger structures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XdrError {
    /// A value violates a construction-time invariant (missing field,
    /// length or range bound exceeded).
    #[error("invalid {field}: {reason}")]
    Validation {
        /// The field or type that failed validation.
        field: &'static str,
        /// Human-readable explanation of the violated bound.
        reason: String,
    },

    /// An amount has more than seven fractional digits, or a numeric value
    /// does not fit its integer representation.
    #[error("precision error: {0}")]
    Precision(String),

    /// A union discriminant that this model does not recognize.
    #[error("unknown {kind} discriminant: {value}")]
    UnknownVariant {
        /// The union being decoded.
        kind: &'static str,
        /// The discriminant that was read.
        value: i32,
    },

    /// Structurally invalid data for a known variant (wrong byte count,
    /// wrong child count, non-zero padding, etc.).
    #[error("malformed {kind}: {reason}")]
    Malformed {
        /// The structure being decoded.
        kind: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// Encode or decode attempted on a permanently retired variant.
    #[error("{0} is no longer supported")]
    Unsupported(&'static str),

    /// The input ended before the value was complete.
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        /// Bytes required by the next read.
        needed: usize,
        /// Bytes left in the input.
        remaining: usize,
    },

    /// A complete value was decoded but input bytes remain.
    #[error("{0} trailing bytes after decoded value")]
    TrailingBytes(usize),

    /// Recursive structures nested deeper than the reader allows.
    #[error("nesting depth limit of {0} exceeded")]
    DepthLimitExceeded(u32),

    /// The base64 transport wrapper could not be decoded.
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl XdrError {
    /// Shorthand for [`XdrError::Validation`].
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Shorthand for [`XdrError::Malformed`].
    pub fn malformed(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            kind,
            reason: reason.into(),
        }
    }

    /// Shorthand for [`XdrError::UnknownVariant`].
    pub fn unknown(kind: &'static str, value: i32) -> Self {
        Self::UnknownVariant { kind, value }
    }
}

/// Result type for XDR operations.
pub type XdrResult<T> = Result<T, XdrError>;
