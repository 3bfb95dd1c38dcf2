//! Error types.

/// Alias for [`core::result::Result`] with this crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// PEM armor missing, mismatched, or the body is not decodable Base64.
    InvalidPem,

    /// The DER contents are not a well-formed RSA SubjectPublicKeyInfo.
    InvalidKey,

    /// The hash selector does not name a supported algorithm.
    UnsupportedHash,

    /// Message too long for the key and hash combination.
    MessageTooLong,

    /// The entropy source could not produce the requested bytes.
    EntropyFailure,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Error::InvalidPem => write!(f, "invalid PEM encoding"),
            Error::InvalidKey => write!(f, "invalid RSA public key"),
            Error::UnsupportedHash => write!(f, "unsupported hash algorithm"),
            Error::MessageTooLong => write!(f, "message too long"),
            Error::EntropyFailure => write!(f, "entropy source failure"),
        }
    }
}

impl std::error::Error for Error {}
