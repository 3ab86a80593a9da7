//! Error types for klad-crypto

use thiserror::Error;

/// Error types for cipher, MAC, key-ladder and OTP operations.
///
/// Every fallible operation in this crate reports one of these kinds; none of
/// them is ever folded into another. Call-sequence violations are reported as
/// [`CryptoError::HwAccelFailed`], matching the split the hardware provider
/// API makes between caller-argument errors and engine/state errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// A backend resource (hardware context, shared buffer) could not be
    /// created. Only key-ladder and OTP backends produce this kind.
    #[error("Failed to allocate backend resource: {0}")]
    AllocFailed(&'static str),

    /// The derived key length of a secure-key envelope is not supported by
    /// the selected algorithm family.
    #[error("Invalid key length: {0} bits")]
    InvalidKeyLength(usize),

    /// An argument violated its contract: out-of-range nonce field or
    /// mismatched buffer lengths.
    #[error("Bad input data: {0}")]
    BadInput(&'static str),

    /// The underlying engine reported a failure, or the call sequence
    /// violated the session state machine.
    #[error("Hardware engine failure or invalid call sequence: {0}")]
    HwAccelFailed(&'static str),
}

/// Result type for all klad-crypto operations
pub type CryptoResult<T> = Result<T, CryptoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CryptoError::InvalidKeyLength(192);
        assert!(err.to_string().contains("192 bits"));

        let err = CryptoError::BadInput("bearer out of range");
        assert!(err.to_string().contains("bearer"));
    }

    #[test]
    fn test_error_kinds_are_distinct() {
        assert_ne!(
            CryptoError::BadInput("x"),
            CryptoError::HwAccelFailed("x")
        );
    }
}
