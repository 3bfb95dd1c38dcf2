//! EME-OAEP encoding, [RFC 8017 §7.1.1] step 2.
//!
//! [RFC 8017 §7.1.1]: https://datatracker.ietf.org/doc/html/rfc8017#section-7.1.1

use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use super::mgf::mgf1_xor;
use crate::errors::{Error, Result};
use crate::hash::Digest;

/// Builds the k-octet encoded message
/// `EM = 0x00 || maskedSeed || maskedDB` for `msg` with the empty label.
///
/// The caller's digest engine is restarted before the label hash, so a
/// pre-used engine cannot contaminate the encoding.
pub(crate) fn oaep_encode<R: RngCore + CryptoRng + ?Sized>(
    rng: &mut R,
    msg: &[u8],
    digest: &mut dyn Digest,
    k: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    let h_len = digest.output_size();
    if msg.len() + 2 * h_len + 2 > k {
        return Err(Error::MessageTooLong);
    }

    let mut em = Zeroizing::new(vec![0u8; k]);
    let (_, payload) = em.split_at_mut(1);
    let (seed, db) = payload.split_at_mut(h_len);
    rng.try_fill_bytes(seed).map_err(|_| Error::EntropyFailure)?;

    // DB = lHash || PS || 0x01 || M
    digest.start();
    let l_hash = digest.digest();
    let db_len = k - h_len - 1;
    db[..h_len].copy_from_slice(l_hash.as_bytes());
    db[db_len - msg.len() - 1] = 0x01;
    db[db_len - msg.len()..].copy_from_slice(msg);

    mgf1_xor(db, digest, seed);
    mgf1_xor(seed, digest, db);

    Ok(em)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{HashAlgorithm, Sha1, Sha256, Sha512};
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    const K: usize = 128; // a 1024-bit modulus

    fn unmask(em: &[u8], algorithm: HashAlgorithm) -> (Vec<u8>, Vec<u8>) {
        let h_len = algorithm.output_size();
        let mut digest = algorithm.new_digest();
        let mut seed = em[1..1 + h_len].to_vec();
        let mut db = em[1 + h_len..].to_vec();
        mgf1_xor(&mut seed, digest.as_mut(), &db);
        mgf1_xor(&mut db, digest.as_mut(), &seed);
        (seed, db)
    }

    #[test]
    fn encoded_message_has_oaep_shape() {
        let mut rng = ChaCha8Rng::from_seed([1; 32]);
        let msg = b"shape probe";
        let em = oaep_encode(&mut rng, msg, &mut Sha256::new(), K).unwrap();
        assert_eq!(em.len(), K);
        assert_eq!(em[0], 0x00);

        let (_, db) = unmask(&em, HashAlgorithm::Sha256);
        let mut expected_l_hash = Sha256::new();
        assert_eq!(&db[..32], expected_l_hash.digest().as_bytes());

        // lHash || PS || 0x01 || M
        let ps_len = K - msg.len() - 2 * 32 - 2;
        assert!(db[32..32 + ps_len].iter().all(|&b| b == 0));
        assert_eq!(db[32 + ps_len], 0x01);
        assert_eq!(&db[32 + ps_len + 1..], msg);
    }

    #[test]
    fn empty_message_encodes() {
        let mut rng = ChaCha8Rng::from_seed([2; 32]);
        let em = oaep_encode(&mut rng, b"", &mut Sha1::new(), K).unwrap();
        let (_, db) = unmask(&em, HashAlgorithm::Sha1);
        assert_eq!(*db.last().unwrap(), 0x01);
    }

    #[test]
    fn length_bound_is_exact() {
        let mut rng = ChaCha8Rng::from_seed([3; 32]);
        let max = K - 2 * 32 - 2;
        assert!(oaep_encode(&mut rng, &vec![0xaa; max], &mut Sha256::new(), K).is_ok());
        assert!(matches!(
            oaep_encode(&mut rng, &vec![0xaa; max + 1], &mut Sha256::new(), K),
            Err(Error::MessageTooLong)
        ));
    }

    #[test]
    fn oversized_hash_rejects_any_message() {
        // k = 128 cannot fit 2 * 64 + 2 bytes of SHA-512 overhead
        let mut rng = ChaCha8Rng::from_seed([4; 32]);
        assert!(matches!(
            oaep_encode(&mut rng, b"", &mut Sha512::new(), K),
            Err(Error::MessageTooLong)
        ));
    }

    #[test]
    fn fresh_seed_every_call() {
        let mut rng = ChaCha8Rng::from_seed([5; 32]);
        let a = oaep_encode(&mut rng, b"same", &mut Sha256::new(), K).unwrap();
        let b = oaep_encode(&mut rng, b"same", &mut Sha256::new(), K).unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn dirty_digest_engine_is_restarted() {
        let mut rng = ChaCha8Rng::from_seed([6; 32]);
        let mut dirty = Sha256::new();
        dirty.update(b"leftovers");
        let em = oaep_encode(&mut rng, b"msg", &mut dirty, K).unwrap();

        let (_, db) = unmask(&em, HashAlgorithm::Sha256);
        let mut clean = Sha256::new();
        assert_eq!(&db[..32], clean.digest().as_bytes());
    }
}
