use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConvertError>;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Operation cancelled by user")]
    Cancelled,

    // Buffer and resource errors
    #[error("Buffer capacity exceeded: {requested} bytes requested, maximum is {maximum}")]
    CapacityExceeded { requested: usize, maximum: usize },

    #[error("Buffer allocation failed")]
    AllocationFailed,

    #[error("Requested offset goes beyond the end of the buffer")]
    OffsetTooLarge,

    #[error("Message is shorter than its encoded length")]
    IncompleteMessage,

    #[error("Encoded length {0} exceeds the buffer maximum")]
    LengthOverMaximum(usize),

    // Format errors
    #[error("Invalid key file format")]
    InvalidFormat,

    #[error("Invalid private key section")]
    InvalidPrivateFormat,

    #[error("Invalid padding in private key section")]
    InvalidPadding,

    #[error("Public key does not match the private key")]
    PublicKeyMismatch,

    #[error("Unsupported cipher '{0}' (only unencrypted keys are supported)")]
    UnsupportedCipher(String),

    #[error("Unsupported key derivation function '{0}'")]
    UnsupportedKdf(String),

    #[error("Key file contains {0} keys, exactly one is supported")]
    UnsupportedMultipleKeys(u32),

    #[error("Unsupported key type '{0}'")]
    UnsupportedKeyType(String),

    #[error("Base64 decoding failed: {0}")]
    Base64(#[from] base64::DecodeError),

    // File errors
    #[error("Cannot open '{0}' for reading")]
    CannotOpenReading(String),

    #[error("Cannot open '{0}' for writing")]
    CannotOpenWriting(String),

    #[error("Incomplete write to '{0}', file removed")]
    IncompleteWrite(String),

    #[error("Refusing to overwrite existing file '{0}' (use --force)")]
    AlreadyExists(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Output errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    /// Process exit code for this error, grouped by kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            ConvertError::Json(_) => 1,
            ConvertError::InvalidArgument(_) | ConvertError::Cancelled => 2,

            ConvertError::CapacityExceeded { .. } => 10,
            ConvertError::AllocationFailed => 11,
            ConvertError::OffsetTooLarge => 12,
            ConvertError::IncompleteMessage => 13,
            ConvertError::LengthOverMaximum(_) => 14,

            ConvertError::InvalidFormat => 20,
            ConvertError::InvalidPrivateFormat => 21,
            ConvertError::InvalidPadding => 22,
            ConvertError::PublicKeyMismatch => 23,
            ConvertError::UnsupportedCipher(_) => 24,
            ConvertError::UnsupportedKdf(_) => 25,
            ConvertError::UnsupportedMultipleKeys(_) => 26,
            ConvertError::UnsupportedKeyType(_) => 27,
            ConvertError::Base64(_) => 28,

            ConvertError::CannotOpenReading(_) => 30,
            ConvertError::CannotOpenWriting(_) => 31,
            ConvertError::IncompleteWrite(_) => 32,
            ConvertError::AlreadyExists(_) => 33,
            ConvertError::Io(_) => 34,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_nonzero() {
        let errors = [
            ConvertError::Cancelled,
            ConvertError::InvalidFormat,
            ConvertError::UnsupportedMultipleKeys(2),
            ConvertError::IncompleteWrite("x".into()),
        ];
        for e in errors {
            assert_ne!(e.exit_code(), 0);
        }
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: ConvertError = io.into();
        assert_eq!(err.exit_code(), 34);
    }

    #[test]
    fn test_json_error_is_generic() {
        let json = serde_json::from_str::<u8>("not json").unwrap_err();
        let err: ConvertError = json.into();
        assert_eq!(err.exit_code(), 1);
    }
}
