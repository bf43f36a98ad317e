//! PER codec errors

use thiserror::Error;

/// PER encoding errors
///
/// Every variant is recoverable: the caller either retries with different
/// input or abandons the message being built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PerError {
    #[error("Value {value} not in range {min}..={max}")]
    OutOfRange { value: i64, min: i64, max: i64 },
    #[error("Invalid constraint: min {min} > max {max}")]
    InvalidConstraint { min: i64, max: i64 },
    #[error("Length {length} not in range {min}..={max}")]
    LengthOutOfRange { length: usize, min: usize, max: usize },
    #[error("Length mismatch: fixed size {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("Buffer too short: need {needed} bits, have {available}")]
    BufferTooShort { needed: usize, available: usize },
    /// Constrained whole number with a range above 65536 (indefinite length case)
    #[error("Range {range} too large for constrained whole number encoding")]
    RangeTooLarge { range: u128 },
    /// Length that would need fragmented encoding
    #[error("Length {length} requires fragmentation")]
    LengthTooLarge { length: usize },
    #[error("Sequence preamble with {count} optional components does not fit one octet")]
    TooManyOptionals { count: usize },
}

pub type PerResult<T> = Result<T, PerError>;
