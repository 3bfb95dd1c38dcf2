//! SHA-256, SHA-384 and SHA-512, FIPS 180-4 §6.2–6.5.
//!
//! SHA-384 and SHA-512 share the 64-bit-word compression function and differ
//! only in their initial chaining value and how much of the final state is
//! emitted.

use super::{Digest, HashAlgorithm};
use crate::buffer::ByteBuffer;

const K256: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

const K512: [u64; 80] = [
    0x428a2f98d728ae22, 0x7137449123ef65cd, 0xb5c0fbcfec4d3b2f, 0xe9b5dba58189dbbc,
    0x3956c25bf348b538, 0x59f111f1b605d019, 0x923f82a4af194f9b, 0xab1c5ed5da6d8118,
    0xd807aa98a3030242, 0x12835b0145706fbe, 0x243185be4ee4b28c, 0x550c7dc3d5ffb4e2,
    0x72be5d74f27b896f, 0x80deb1fe3b1696b1, 0x9bdc06a725c71235, 0xc19bf174cf692694,
    0xe49b69c19ef14ad2, 0xefbe4786384f25e3, 0x0fc19dc68b8cd5b5, 0x240ca1cc77ac9c65,
    0x2de92c6f592b0275, 0x4a7484aa6ea6e483, 0x5cb0a9dcbd41fbd4, 0x76f988da831153b5,
    0x983e5152ee66dfab, 0xa831c66d2db43210, 0xb00327c898fb213f, 0xbf597fc7beef0ee4,
    0xc6e00bf33da88fc2, 0xd5a79147930aa725, 0x06ca6351e003826f, 0x142929670a0e6e70,
    0x27b70a8546d22ffc, 0x2e1b21385c26c926, 0x4d2c6dfc5ac42aed, 0x53380d139d95b3df,
    0x650a73548baf63de, 0x766a0abb3c77b2a8, 0x81c2c92e47edaee6, 0x92722c851482353b,
    0xa2bfe8a14cf10364, 0xa81a664bbc423001, 0xc24b8b70d0f89791, 0xc76c51a30654be30,
    0xd192e819d6ef5218, 0xd69906245565a910, 0xf40e35855771202a, 0x106aa07032bbd1b8,
    0x19a4c116b8d2d0c8, 0x1e376c085141ab53, 0x2748774cdf8eeb99, 0x34b0bcb5e19b48a8,
    0x391c0cb3c5c95a63, 0x4ed8aa4ae3418acb, 0x5b9cca4f7763e373, 0x682e6ff3d6b2b8a3,
    0x748f82ee5defb2fc, 0x78a5636f43172f60, 0x84c87814a1f0ab72, 0x8cc702081a6439ec,
    0x90befffa23631e28, 0xa4506cebde82bde9, 0xbef9a3f7b2c67915, 0xc67178f2e372532b,
    0xca273eceea26619c, 0xd186b8c721c0c207, 0xeada7dd6cde0eb1e, 0xf57d4f7fee6ed178,
    0x06f067aa72176fba, 0x0a637dc5a2c898a6, 0x113f9804bef90dae, 0x1b710b35131c471b,
    0x28db77f523047d84, 0x32caab7b40c72493, 0x3c9ebe0a15c9bebc, 0x431d67c49c100d4c,
    0x4cc5d4becb3e42b6, 0x597f299cfc657e2a, 0x5fcb6fab3ad6faec, 0x6c44198c4a475817,
];

const IV256: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

const IV384: [u64; 8] = [
    0xcbbb9d5dc1059ed8, 0x629a292a367cd507, 0x9159015a3070dd17, 0x152fecd8f70e5939,
    0x67332667ffc00b31, 0x8eb44a8768581511, 0xdb0c2e0d64f98fa7, 0x47b5481dbefa4fa4,
];

const IV512: [u64; 8] = [
    0x6a09e667f3bcc908, 0xbb67ae8584caa73b, 0x3c6ef372fe94f82b, 0xa54ff53a5f1d36f1,
    0x510e527fade682d1, 0x9b05688c2b3e6c1f, 0x1f83d9abfb41bd6b, 0x5be0cd19137e2179,
];

/// Streaming SHA-256 engine.
#[derive(Debug, Clone)]
pub struct Sha256 {
    state: [u32; 8],
    length: u64,
    block: [u8; 64],
    fill: usize,
}

impl Sha256 {
    pub fn new() -> Self {
        Self {
            state: IV256,
            length: 0,
            block: [0; 64],
            fill: 0,
        }
    }

    fn compress(state: &mut [u32; 8], block: &[u8; 64]) {
        let mut w = [0u32; 64];
        for (word, chunk) in w.iter_mut().zip(block.chunks_exact(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        for i in 16..64 {
            w[i] = small_sigma1_256(w[i - 2])
                .wrapping_add(w[i - 7])
                .wrapping_add(small_sigma0_256(w[i - 15]))
                .wrapping_add(w[i - 16]);
        }

        let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;
        for i in 0..64 {
            let t1 = h
                .wrapping_add(big_sigma1_256(e))
                .wrapping_add(ch32(e, f, g))
                .wrapping_add(K256[i])
                .wrapping_add(w[i]);
            let t2 = big_sigma0_256(a).wrapping_add(maj32(a, b, c));
            h = g;
            g = f;
            f = e;
            e = d.wrapping_add(t1);
            d = c;
            c = b;
            b = a;
            a = t1.wrapping_add(t2);
        }

        for (s, v) in state.iter_mut().zip([a, b, c, d, e, f, g, h]) {
            *s = s.wrapping_add(v);
        }
    }

    fn finalize(mut self) -> [u8; 32] {
        let bit_length = self.length * 8;
        let mut pad = [0u8; 72];
        pad[0] = 0x80;
        let pad_len = 64 - (self.fill + 8) % 64;
        pad[pad_len..pad_len + 8].copy_from_slice(&bit_length.to_be_bytes());
        self.update(&pad[..pad_len + 8]);
        debug_assert_eq!(self.fill, 0);

        let mut out = [0u8; 32];
        for (chunk, word) in out.chunks_exact_mut(4).zip(self.state) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        out
    }
}

impl Default for Sha256 {
    fn default() -> Self {
        Self::new()
    }
}

impl Digest for Sha256 {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Sha256
    }

    fn output_size(&self) -> usize {
        32
    }

    fn block_size(&self) -> usize {
        64
    }

    fn start(&mut self) {
        *self = Self::new();
    }

    fn update(&mut self, mut data: &[u8]) {
        self.length = self.length.wrapping_add(data.len() as u64);
        if self.fill > 0 {
            let take = data.len().min(64 - self.fill);
            self.block[self.fill..self.fill + take].copy_from_slice(&data[..take]);
            self.fill += take;
            data = &data[take..];
            if self.fill == 64 {
                let block = self.block;
                Self::compress(&mut self.state, &block);
                self.fill = 0;
            }
        }
        let mut chunks = data.chunks_exact(64);
        for chunk in &mut chunks {
            let mut block = [0u8; 64];
            block.copy_from_slice(chunk);
            Self::compress(&mut self.state, &block);
        }
        let rest = chunks.remainder();
        self.block[..rest.len()].copy_from_slice(rest);
        self.fill = rest.len();
    }

    fn digest(&mut self) -> ByteBuffer {
        ByteBuffer::from_slice(&self.clone().finalize())
    }
}

/// Shared 64-bit-word engine behind SHA-384 and SHA-512.
///
/// 128-byte blocks, 80 rounds, and a 128-bit message length counter.
#[derive(Debug, Clone)]
struct Sha512Core {
    state: [u64; 8],
    length: u128,
    block: [u8; 128],
    fill: usize,
}

impl Sha512Core {
    fn new(iv: [u64; 8]) -> Self {
        Self {
            state: iv,
            length: 0,
            block: [0; 128],
            fill: 0,
        }
    }

    fn compress(state: &mut [u64; 8], block: &[u8; 128]) {
        let mut w = [0u64; 80];
        for (word, chunk) in w.iter_mut().zip(block.chunks_exact(8)) {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            *word = u64::from_be_bytes(bytes);
        }
        for i in 16..80 {
            w[i] = small_sigma1_512(w[i - 2])
                .wrapping_add(w[i - 7])
                .wrapping_add(small_sigma0_512(w[i - 15]))
                .wrapping_add(w[i - 16]);
        }

        let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;
        for i in 0..80 {
            let t1 = h
                .wrapping_add(big_sigma1_512(e))
                .wrapping_add(ch64(e, f, g))
                .wrapping_add(K512[i])
                .wrapping_add(w[i]);
            let t2 = big_sigma0_512(a).wrapping_add(maj64(a, b, c));
            h = g;
            g = f;
            f = e;
            e = d.wrapping_add(t1);
            d = c;
            c = b;
            b = a;
            a = t1.wrapping_add(t2);
        }

        for (s, v) in state.iter_mut().zip([a, b, c, d, e, f, g, h]) {
            *s = s.wrapping_add(v);
        }
    }

    fn update(&mut self, mut data: &[u8]) {
        self.length = self.length.wrapping_add(data.len() as u128);
        if self.fill > 0 {
            let take = data.len().min(128 - self.fill);
            self.block[self.fill..self.fill + take].copy_from_slice(&data[..take]);
            self.fill += take;
            data = &data[take..];
            if self.fill == 128 {
                let block = self.block;
                Self::compress(&mut self.state, &block);
                self.fill = 0;
            }
        }
        let mut chunks = data.chunks_exact(128);
        for chunk in &mut chunks {
            let mut block = [0u8; 128];
            block.copy_from_slice(chunk);
            Self::compress(&mut self.state, &block);
        }
        let rest = chunks.remainder();
        self.block[..rest.len()].copy_from_slice(rest);
        self.fill = rest.len();
    }

    fn finalize(mut self, out_len: usize) -> ByteBuffer {
        let bit_length = self.length * 8;
        let mut pad = [0u8; 144];
        pad[0] = 0x80;
        // pad to 112 mod 128, then the 128-bit bit length
        let pad_len = 128 - (self.fill + 16) % 128;
        pad[pad_len..pad_len + 16].copy_from_slice(&bit_length.to_be_bytes());
        self.update(&pad[..pad_len + 16]);
        debug_assert_eq!(self.fill, 0);

        let mut full = [0u8; 64];
        for (chunk, word) in full.chunks_exact_mut(8).zip(self.state) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        ByteBuffer::from_slice(&full[..out_len])
    }
}

/// Streaming SHA-384 engine: the SHA-512 core with its own initial value,
/// truncated to 48 bytes.
#[derive(Debug, Clone)]
pub struct Sha384(Sha512Core);

impl Sha384 {
    pub fn new() -> Self {
        Self(Sha512Core::new(IV384))
    }
}

impl Default for Sha384 {
    fn default() -> Self {
        Self::new()
    }
}

impl Digest for Sha384 {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Sha384
    }

    fn output_size(&self) -> usize {
        48
    }

    fn block_size(&self) -> usize {
        128
    }

    fn start(&mut self) {
        self.0 = Sha512Core::new(IV384);
    }

    fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    fn digest(&mut self) -> ByteBuffer {
        self.0.clone().finalize(48)
    }
}

/// Streaming SHA-512 engine.
#[derive(Debug, Clone)]
pub struct Sha512(Sha512Core);

impl Sha512 {
    pub fn new() -> Self {
        Self(Sha512Core::new(IV512))
    }
}

impl Default for Sha512 {
    fn default() -> Self {
        Self::new()
    }
}

impl Digest for Sha512 {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Sha512
    }

    fn output_size(&self) -> usize {
        64
    }

    fn block_size(&self) -> usize {
        128
    }

    fn start(&mut self) {
        self.0 = Sha512Core::new(IV512);
    }

    fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    fn digest(&mut self) -> ByteBuffer {
        self.0.clone().finalize(64)
    }
}

fn ch32(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (!x & z)
}

fn maj32(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (x & z) ^ (y & z)
}

fn big_sigma0_256(x: u32) -> u32 {
    x.rotate_right(2) ^ x.rotate_right(13) ^ x.rotate_right(22)
}

fn big_sigma1_256(x: u32) -> u32 {
    x.rotate_right(6) ^ x.rotate_right(11) ^ x.rotate_right(25)
}

fn small_sigma0_256(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

fn small_sigma1_256(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

fn ch64(x: u64, y: u64, z: u64) -> u64 {
    (x & y) ^ (!x & z)
}

fn maj64(x: u64, y: u64, z: u64) -> u64 {
    (x & y) ^ (x & z) ^ (y & z)
}

fn big_sigma0_512(x: u64) -> u64 {
    x.rotate_right(28) ^ x.rotate_right(34) ^ x.rotate_right(39)
}

fn big_sigma1_512(x: u64) -> u64 {
    x.rotate_right(14) ^ x.rotate_right(18) ^ x.rotate_right(41)
}

fn small_sigma0_512(x: u64) -> u64 {
    x.rotate_right(1) ^ x.rotate_right(8) ^ (x >> 7)
}

fn small_sigma1_512(x: u64) -> u64 {
    x.rotate_right(19) ^ x.rotate_right(61) ^ (x >> 6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Sha1;
    use hex_literal::hex;

    fn digest_of<D: Digest>(mut engine: D, msg: &[u8]) -> Vec<u8> {
        engine.update(msg);
        engine.digest().into_vec()
    }

    const TWO_BLOCK_448: &[u8] = b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq";
    const TWO_BLOCK_896: &[u8] = b"abcdefghbcdefghicdefghijdefghijkefghijklfghijklmghijklmn\
                                   hijklmnoijklmnopjklmnopqklmnopqrlmnopqrsmnopqrstnopqrstu";

    #[test]
    fn sha256_vectors() {
        assert_eq!(
            digest_of(Sha256::new(), b""),
            hex!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
        );
        assert_eq!(
            digest_of(Sha256::new(), b"abc"),
            hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
        assert_eq!(
            digest_of(Sha256::new(), TWO_BLOCK_448),
            hex!("248d6a61d20638b8e5c026930c3e6039a33ce45964ff2167f6ecedd419db06c1")
        );
    }

    #[test]
    fn sha384_vectors() {
        assert_eq!(
            digest_of(Sha384::new(), b""),
            hex!(
                "38b060a751ac96384cd9327eb1b1e36a21fdb71114be07434c0cc7bf63f6e1da
                 274edebfe76f65fbd51ad2f14898b95b"
            )
        );
        assert_eq!(
            digest_of(Sha384::new(), b"abc"),
            hex!(
                "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed
                 8086072ba1e7cc2358baeca134c825a7"
            )
        );
        assert_eq!(
            digest_of(Sha384::new(), TWO_BLOCK_896),
            hex!(
                "09330c33f71147e83d192fc782cd1b4753111b173b3b05d22fa08086e3b0f712
                 fcc7c71a557e2db966c3e9fa91746039"
            )
        );
    }

    #[test]
    fn sha512_vectors() {
        assert_eq!(
            digest_of(Sha512::new(), b""),
            hex!(
                "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce
                 47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
            )
        );
        assert_eq!(
            digest_of(Sha512::new(), b"abc"),
            hex!(
                "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a
                 2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
            )
        );
        assert_eq!(
            digest_of(Sha512::new(), TWO_BLOCK_896),
            hex!(
                "8e959b75dae313da8cf4f72814fc143f8f7779c6eb9f7fa17299aeadb6889018
                 501d289e4900f7e4331b99dec4b5433ac7d329eeb6dd26545e96e55b874be909"
            )
        );
    }

    #[test]
    fn split_updates_match_one_shot() {
        let msg: Vec<u8> = (0u8..=255).cycle().take(500).collect();
        for engines in 0..4 {
            let (mut split, mut whole): (Box<dyn Digest>, Box<dyn Digest>) = match engines {
                0 => (Box::new(Sha256::new()), Box::new(Sha256::new())),
                1 => (Box::new(Sha384::new()), Box::new(Sha384::new())),
                2 => (Box::new(Sha512::new()), Box::new(Sha512::new())),
                _ => (Box::new(Sha1::new()), Box::new(Sha1::new())),
            };
            whole.update(&msg);
            for chunk in msg.chunks(61) {
                split.update(chunk);
            }
            assert_eq!(split.digest().into_vec(), whole.digest().into_vec());
        }
    }

    #[test]
    fn digest_does_not_disturb_the_stream() {
        let mut engine = Sha512::new();
        engine.update(b"abc");
        assert_eq!(engine.digest().into_vec(), engine.digest().into_vec());
        engine.update(b"def");
        let mut fresh = Sha512::new();
        fresh.update(b"abcdef");
        assert_eq!(engine.digest().into_vec(), fresh.digest().into_vec());
    }
}
