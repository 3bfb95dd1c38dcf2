//! FIPS 180-4 message digests.
//!
//! OAEP needs the label hash and the MGF1 stream, so the crate carries its
//! own SHA-1 and SHA-2 engines instead of leaning on a platform API. Each
//! engine is a streaming state: `start` (re)initializes, `update` absorbs,
//! and `digest` finalizes a working copy, leaving the running state intact.

mod sha1;
mod sha2;

pub use self::{
    sha1::Sha1,
    sha2::{Sha256, Sha384, Sha512},
};

use crate::buffer::ByteBuffer;
use crate::errors::{Error, Result};

/// Streaming digest state.
///
/// `digest` finalizes on a working copy: the engine itself is not disturbed,
/// so a later `update` continues the same message, and `start` always resets
/// to a fresh state.
pub trait Digest {
    /// Which algorithm this engine computes.
    fn algorithm(&self) -> HashAlgorithm;

    /// Digest length in octets.
    fn output_size(&self) -> usize;

    /// Message block length in octets.
    fn block_size(&self) -> usize;

    /// Resets to the initial chaining value, discarding absorbed data.
    fn start(&mut self);

    /// Absorbs message bytes.
    fn update(&mut self, data: &[u8]);

    /// Returns the digest of everything absorbed since the last `start`.
    fn digest(&mut self) -> ByteBuffer;
}

/// Hash selector for [`encrypt`](crate::RsaPublicKey::encrypt): the label
/// hash and the MGF1 hash are always the same algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA-1, 20-byte digest.
    Sha1,
    /// SHA-256, 32-byte digest.
    Sha256,
    /// SHA-384, 48-byte digest.
    Sha384,
    /// SHA-512, 64-byte digest.
    Sha512,
}

impl HashAlgorithm {
    /// Canonical algorithm name.
    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    /// Digest length in octets.
    pub fn output_size(self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    /// Looks a selector up by name ("sha256", "SHA-256", ...).
    ///
    /// This is the dynamic edge of the hash contract: anything that is not
    /// one of the four supported algorithms is rejected here, before any key
    /// material is touched.
    pub fn from_name(name: &str) -> Result<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "sha1" => Ok(HashAlgorithm::Sha1),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha384" => Ok(HashAlgorithm::Sha384),
            "sha512" => Ok(HashAlgorithm::Sha512),
            _ => Err(Error::UnsupportedHash),
        }
    }

    /// Creates a fresh engine for this algorithm.
    pub fn new_digest(self) -> Box<dyn Digest> {
        match self {
            HashAlgorithm::Sha1 => Box::new(Sha1::new()),
            HashAlgorithm::Sha256 => Box::new(Sha256::new()),
            HashAlgorithm::Sha384 => Box::new(Sha384::new()),
            HashAlgorithm::Sha512 => Box::new(Sha512::new()),
        }
    }
}
