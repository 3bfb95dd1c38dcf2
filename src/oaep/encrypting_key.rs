use rand_core::{CryptoRng, RngCore};

use crate::hash::HashAlgorithm;
use crate::traits::RandomizedEncryptor;
use crate::{Result, RsaPublicKey};

/// An RSA public key bound to one OAEP hash selection.
///
/// Useful when the same key encrypts many messages: the hash choice is fixed
/// once instead of being passed at every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptingKey {
    inner: RsaPublicKey,
    hash: HashAlgorithm,
}

impl EncryptingKey {
    /// Binds `key` to `hash` for both the label and MGF1.
    pub fn new(key: RsaPublicKey, hash: HashAlgorithm) -> Self {
        Self { inner: key, hash }
    }

    /// The wrapped public key.
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.inner
    }
}

impl RandomizedEncryptor for EncryptingKey {
    fn encrypt_with_rng<R: RngCore + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        msg: &[u8],
    ) -> Result<Vec<u8>> {
        self.inner.encrypt_with_rng(rng, msg, self.hash)
    }
}
