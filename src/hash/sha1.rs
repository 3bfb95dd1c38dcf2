//! SHA-1, FIPS 180-4 §6.1.
//!
//! Kept because OAEP with SHA-1 is still what several deployed decryptors
//! expect; do not use it for anything that needs collision resistance.

use super::{Digest, HashAlgorithm};
use crate::buffer::ByteBuffer;

const BLOCK_BYTES: usize = 64;
const DIGEST_BYTES: usize = 20;

const IV: [u32; 5] = [0x6745_2301, 0xefcd_ab89, 0x98ba_dcfe, 0x1032_5476, 0xc3d2_e1f0];

/// Streaming SHA-1 engine.
#[derive(Debug, Clone)]
pub struct Sha1 {
    state: [u32; 5],
    // bytes absorbed so far; the length field is this times eight
    length: u64,
    block: [u8; BLOCK_BYTES],
    fill: usize,
}

impl Sha1 {
    pub fn new() -> Self {
        Self {
            state: IV,
            length: 0,
            block: [0; BLOCK_BYTES],
            fill: 0,
        }
    }

    fn compress(state: &mut [u32; 5], block: &[u8; BLOCK_BYTES]) {
        let mut w = [0u32; 16];
        for (word, chunk) in w.iter_mut().zip(block.chunks_exact(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        let [mut a, mut b, mut c, mut d, mut e] = *state;
        for t in 0..80 {
            let temp = a
                .rotate_left(5)
                .wrapping_add(ft(t, b, c, d))
                .wrapping_add(e)
                .wrapping_add(kt(t))
                .wrapping_add(w[0]);
            e = d;
            d = c;
            c = b.rotate_left(30);
            b = a;
            a = temp;

            let next = (w[13] ^ w[8] ^ w[2] ^ w[0]).rotate_left(1);
            w.rotate_left(1);
            w[15] = next;
        }

        state[0] = state[0].wrapping_add(a);
        state[1] = state[1].wrapping_add(b);
        state[2] = state[2].wrapping_add(c);
        state[3] = state[3].wrapping_add(d);
        state[4] = state[4].wrapping_add(e);
    }

    fn finalize(mut self) -> [u8; DIGEST_BYTES] {
        let bit_length = self.length * 8;
        let mut pad = [0u8; BLOCK_BYTES + 8];
        pad[0] = 0x80;
        // pad to 56 mod 64, then the 64-bit bit length
        let pad_len = BLOCK_BYTES - (self.fill + 8) % BLOCK_BYTES;
        pad[pad_len..pad_len + 8].copy_from_slice(&bit_length.to_be_bytes());
        self.update(&pad[..pad_len + 8]);
        debug_assert_eq!(self.fill, 0);

        let mut out = [0u8; DIGEST_BYTES];
        for (chunk, word) in out.chunks_exact_mut(4).zip(self.state) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        out
    }
}

impl Default for Sha1 {
    fn default() -> Self {
        Self::new()
    }
}

impl Digest for Sha1 {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Sha1
    }

    fn output_size(&self) -> usize {
        DIGEST_BYTES
    }

    fn block_size(&self) -> usize {
        BLOCK_BYTES
    }

    fn start(&mut self) {
        *self = Self::new();
    }

    fn update(&mut self, mut data: &[u8]) {
        self.length = self.length.wrapping_add(data.len() as u64);
        if self.fill > 0 {
            let take = data.len().min(BLOCK_BYTES - self.fill);
            self.block[self.fill..self.fill + take].copy_from_slice(&data[..take]);
            self.fill += take;
            data = &data[take..];
            if self.fill == BLOCK_BYTES {
                let block = self.block;
                Self::compress(&mut self.state, &block);
                self.fill = 0;
            }
        }
        let mut chunks = data.chunks_exact(BLOCK_BYTES);
        for chunk in &mut chunks {
            let mut block = [0u8; BLOCK_BYTES];
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

fn ft(t: usize, x: u32, y: u32, z: u32) -> u32 {
    match t {
        0..=19 => (x & y) ^ (!x & z),
        40..=59 => (x & y) ^ (x & z) ^ (y & z),
        _ => x ^ y ^ z,
    }
}

fn kt(t: usize) -> u32 {
    match t {
        0..=19 => 0x5a82_7999,
        20..=39 => 0x6ed9_eba1,
        40..=59 => 0x8f1b_bcdc,
        _ => 0xca62_c1d6,
    }
}
