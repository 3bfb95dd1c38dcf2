//! The RSA encryption primitive (RSAEP, RFC 8017 §5.1.1).

use crate::bigint::BigUint;
use crate::errors::{Error, Result};
use crate::key::RsaPublicKey;
use crate::traits::PublicKeyParts;

/// `c = m^e mod n`. No padding is applied here; `m` must already be an
/// OAEP-encoded message representative below the modulus.
pub(crate) fn rsa_encrypt(key: &RsaPublicKey, m: &BigUint) -> Result<BigUint> {
    // "message representative out of range"
    if m >= key.n() {
        return Err(Error::MessageTooLong);
    }
    Ok(m.mod_pow(key.e(), key.n()))
}
