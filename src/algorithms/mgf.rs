//! Mask Generation Function 1, [RFC 8017 Appendix B.2.1].
//!
//! [RFC 8017 Appendix B.2.1]: https://datatracker.ietf.org/doc/html/rfc8017#appendix-B.2.1

use crate::hash::Digest;

/// XORs `out` with the MGF1 stream of `seed`: the concatenation of
/// `H(seed || counter)` for counter = 0, 1, ... truncated to `out.len()`.
pub(crate) fn mgf1_xor(out: &mut [u8], digest: &mut dyn Digest, seed: &[u8]) {
    let mut counter: u32 = 0;
    let mut offset = 0;
    while offset < out.len() {
        digest.start();
        digest.update(seed);
        digest.update(&counter.to_be_bytes());
        let block = digest.digest();
        for &b in block.as_bytes() {
            if offset == out.len() {
                break;
            }
            out[offset] ^= b;
            offset += 1;
        }
        counter += 1;
    }
}
