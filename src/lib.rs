//! RSAES-OAEP encryption ([RFC 8017] §7.1) with no platform crypto
//! dependencies.
//!
//! A public key is imported from a PEM-encoded SubjectPublicKeyInfo and
//! encrypts octet strings under OAEP with an empty label, using one of
//! SHA-1, SHA-256, SHA-384 or SHA-512 for both the label hash and MGF1. The
//! digest engines, the DER/PEM decoding, the big-integer exponentiation and
//! the seed generator are all part of the crate.
//!
//! ```no_run
//! use rsa_oaep_encryption::{HashAlgorithm, RsaPublicKey};
//!
//! # fn main() -> rsa_oaep_encryption::Result<()> {
//! let pem = std::fs::read_to_string("public_key.pem").expect("key file");
//! let key = RsaPublicKey::from_pem(&pem)?;
//!
//! let ciphertext = key.encrypt(b"attack at dawn", HashAlgorithm::Sha256)?;
//! assert_eq!(ciphertext.len(), key.size());
//! # Ok(())
//! # }
//! ```
//!
//! Ciphertexts are exactly [`RsaPublicKey::size`] octets and decrypt with
//! any conformant RSAES-OAEP implementation holding the private key, the
//! same hash, and the empty label.
//!
//! The arithmetic here is not constant-time; keep it away from adversaries
//! who can measure the machine.
//!
//! [RFC 8017]: https://datatracker.ietf.org/doc/html/rfc8017

pub use rand_core;

mod algorithms;
pub mod asn1;
pub mod bigint;
pub mod buffer;
pub mod errors;
pub mod hash;
pub mod oaep;
pub mod pem;
pub mod random;
pub mod traits;

mod key;

pub use crate::{
    errors::{Error, Result},
    hash::HashAlgorithm,
    key::RsaPublicKey,
    oaep::EncryptingKey,
    random::Fortuna,
};
