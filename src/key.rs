//! RSA public keys: import from PEM/DER and OAEP encryption.

use rand_core::{CryptoRng, RngCore};

use crate::algorithms::oaep::oaep_encode;
use crate::algorithms::pad::left_pad;
use crate::algorithms::rsa::rsa_encrypt;
use crate::asn1;
use crate::bigint::BigUint;
use crate::errors::{Error, Result};
use crate::hash::HashAlgorithm;
use crate::pem;
use crate::random;
use crate::traits::PublicKeyParts;

/// The armor label a public-key PEM must carry.
const PEM_LABEL: &str = "PUBLIC KEY";

/// Represents the public part of an RSA key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    /// Modulus: product of prime numbers `p` and `q`.
    n: BigUint,
    /// Public exponent: power to which a plaintext message is raised in
    /// order to encrypt it.
    ///
    /// Typically 0x10001 (65537)
    e: BigUint,
    /// Cached modulus length in octets.
    k: usize,
}

impl PublicKeyParts for RsaPublicKey {
    fn n(&self) -> &BigUint {
        &self.n
    }

    fn e(&self) -> &BigUint {
        &self.e
    }

    fn size(&self) -> usize {
        self.k
    }
}

impl RsaPublicKey {
    /// Create a new public key from its components.
    pub fn new(n: BigUint, e: BigUint) -> Result<Self> {
        check_public(&n, &e)?;
        let k = (n.bit_length() + 7) / 8;
        Ok(Self { n, e, k })
    }

    /// Imports a key from a PEM-armored SubjectPublicKeyInfo.
    ///
    /// The armor label must be `PUBLIC KEY` and the algorithm must be plain
    /// rsaEncryption (OID 1.2.840.113549.1.1.1) with NULL parameters.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let block = pem::decode(pem)?;
        if block.label != PEM_LABEL {
            return Err(Error::InvalidPem);
        }
        Self::from_spki_der(&block.contents)
    }

    /// Imports a key from DER SubjectPublicKeyInfo bytes.
    pub fn from_spki_der(der: &[u8]) -> Result<Self> {
        let (n, e) = asn1::rsa_public_key_from_spki(der)?;
        Self::new(BigUint::from_bytes_be(&n), BigUint::from_bytes_be(&e))
    }

    /// Modulus length k in octets; every ciphertext is exactly this long.
    pub fn size(&self) -> usize {
        self.k
    }

    /// RSAES-OAEP encryption of `msg` with an empty label, using the
    /// process-wide random source for the seed.
    ///
    /// `hash` serves as both the label hash and the MGF1 hash. The plaintext
    /// may be at most `size() − 2·hash.output_size() − 2` bytes.
    pub fn encrypt(&self, msg: &[u8], hash: HashAlgorithm) -> Result<Vec<u8>> {
        random::with_global(|rng| self.encrypt_with_rng(rng, msg, hash))
    }

    /// RSAES-OAEP encryption drawing the seed from a caller-supplied source.
    pub fn encrypt_with_rng<R: RngCore + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        msg: &[u8],
        hash: HashAlgorithm,
    ) -> Result<Vec<u8>> {
        let mut digest = hash.new_digest();
        let em = oaep_encode(rng, msg, digest.as_mut(), self.k)?;
        let m = BigUint::from_bytes_be(&em);
        let c = rsa_encrypt(self, &m)?;
        Ok(left_pad(&c.to_bytes_be(), self.k))
    }
}

/// Check that the public key is well formed: the RSA primitive needs an odd
/// modulus, and an odd exponent of at least 3.
fn check_public(n: &BigUint, e: &BigUint) -> Result<()> {
    if !n.is_odd() {
        return Err(Error::InvalidKey);
    }
    if !e.is_odd() || e < &BigUint::from_u32(3) || e >= n {
        return Err(Error::InvalidKey);
    }
    Ok(())
}
