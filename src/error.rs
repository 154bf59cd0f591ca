//! Error types
//!
//! Only config creation can fail. Everything else in the crate is either
//! infallible or a contract enforced through ownership.

/// Error type for load reporting operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required argument was missing or unusable
    InvalidArgument(&'static str),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidArgument(what) => write!(f, "Invalid argument: {}", what),
        }
    }
}

impl std::error::Error for Error {}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
