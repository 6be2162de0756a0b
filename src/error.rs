//! Error types for edge-iam

use thiserror::Error;

use crate::connection::ConnectionError;

/// The closed set of IAM conditions a device can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum IamError {
    /// The device rejected the input (bad username, display name, ...)
    #[error("invalid input")]
    InvalidInput,

    /// The device answered with a payload that could not be decoded
    #[error("invalid response from device")]
    InvalidResponse,

    /// The requested username is already in use on the device
    #[error("username exists")]
    UsernameExists,

    #[error("user does not exist")]
    UserDoesNotExist,

    #[error("role does not exist")]
    RoleDoesNotExist,

    /// Password authentication failed
    #[error("authentication error")]
    AuthenticationError,

    /// The IAM policy for the unpaired role does not allow this pairing mode
    #[error("blocked by device configuration")]
    BlockedByDeviceConfiguration,

    /// The pairing mode is configured but disabled at runtime
    #[error("pairing mode disabled")]
    PairingModeDisabled,

    #[error("initial user already paired")]
    InitialUserAlreadyPaired,

    /// Retry after the device's back-off period (10 seconds on stock devices)
    #[error("too many wrong password attempts")]
    TooManyWrongPasswordAttempts,

    /// The device does not run the IAM module
    #[error("IAM not supported by device")]
    IamNotSupported,

    /// The current user is not allowed to perform the operation
    #[error("forbidden")]
    Forbidden,

    /// The device reported a status no IAM condition covers
    #[error("operation failed")]
    Failed,
}

/// Main error type for IAM operations
#[derive(Debug, Error)]
pub enum Error {
    /// IAM condition reported by the device
    #[error("IAM error: {0}")]
    Iam(#[from] IamError),

    /// Failure in the underlying connection
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// CBOR encoding error
    #[error("CBOR encode error: {0}")]
    CborEncode(String),

    /// CBOR decoding error
    #[error("CBOR decode error: {0}")]
    CborDecode(String),

    /// The device answered with a status the endpoint does not document
    #[error("unexpected status {status} from {path}")]
    UnexpectedStatus { path: String, status: u16 },
}

impl Error {
    /// Project this error onto the closed set of IAM conditions
    ///
    /// Connection failures have no IAM counterpart and yield `None`.
    pub fn iam_error(&self) -> Option<IamError> {
        match self {
            Error::Iam(e) => Some(*e),
            Error::CborDecode(_) => Some(IamError::InvalidResponse),
            Error::CborEncode(_) => Some(IamError::InvalidInput),
            Error::UnexpectedStatus { .. } => Some(IamError::Failed),
            Error::Connection(_) => None,
        }
    }
}

/// Result type alias for IAM operations
pub type Result<T> = std::result::Result<T, Error>;
