//! Public trait seams.

use rand_core::{CryptoRng, RngCore};

use crate::bigint::BigUint;
use crate::errors::Result;

/// Components of an RSA public key.
pub trait PublicKeyParts {
    /// Modulus: product of two primes.
    fn n(&self) -> &BigUint;

    /// Public exponent, typically 65537.
    fn e(&self) -> &BigUint;

    /// Modulus length in octets, ⌈bitlen(n)/8⌉.
    fn size(&self) -> usize {
        (self.n().bit_length() + 7) / 8
    }
}

/// Encrypt a message using a caller-provided random source.
pub trait RandomizedEncryptor {
    /// Encrypt `msg`, drawing randomness from `rng`.
    fn encrypt_with_rng<R: RngCore + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        msg: &[u8],
    ) -> Result<Vec<u8>>;
}
