//! A simplified Fortuna generator.
//!
//! Thirty-two SHA-256 entropy pools feed an AES-128 counter-mode keystream.
//! Every batch of output forces a reseed: the key is discarded, pools whose
//! index k divides the reseed count by 2^k are folded into a new key, and the
//! counter is rederived from it. Pool entropy comes from the operating
//! system, which replaces the original design's linear-congruential source.

use rand_core::{CryptoRng, OsRng, RngCore};
use zeroize::Zeroize;

use super::aes::Aes128;
use crate::errors::{Error, Result};
use crate::hash::{Digest, Sha256};

const POOLS: usize = 32;
const BLOCK: usize = 16;

/// Fortuna CSPRNG.
///
/// Implements [`RngCore`] and [`CryptoRng`], so it plugs into the same seam
/// as any other generator. Not `Sync`: wrap it in a lock or give each thread
/// its own instance.
pub struct Fortuna {
    pools: [Sha256; POOLS],
    key: [u8; BLOCK],
    seed: [u8; BLOCK],
    reseed_count: u64,
    generated: u64,
    next_pool: usize,
}

impl Fortuna {
    pub fn new() -> Self {
        Self {
            pools: core::array::from_fn(|_| Sha256::new()),
            key: [0; BLOCK],
            seed: [0; BLOCK],
            reseed_count: 0,
            generated: 0,
            next_pool: 0,
        }
    }

    /// Spreads entropy bytes over the pools, one byte per pool, round-robin.
    pub fn collect(&mut self, entropy: &[u8]) {
        for &byte in entropy {
            self.pools[self.next_pool].update(&[byte]);
            self.next_pool = (self.next_pool + 1) % POOLS;
        }
    }

    /// Total bytes handed out so far.
    pub fn generated(&self) -> u64 {
        self.generated
    }

    /// Produces `count` pseudorandom bytes.
    ///
    /// Fails with [`Error::EntropyFailure`] when the operating system cannot
    /// supply seed material.
    pub fn generate(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut entropy = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut entropy)
            .map_err(|_| Error::EntropyFailure)?;
        self.collect(&entropy);
        entropy.zeroize();

        // the previous key never survives a batch
        self.key.zeroize();
        self.reseed();

        let cipher = Aes128::new(&self.key);
        let mut out = Vec::with_capacity(count + BLOCK);
        while out.len() < count {
            out.extend_from_slice(&cipher.encrypt_block(self.seed));
            increment_counter(&mut self.seed);
        }
        out.truncate(count);

        // next key and counter come from the keystream itself
        self.key = cipher.encrypt_block(self.seed);
        increment_counter(&mut self.seed);
        self.seed = cipher.encrypt_block(self.seed);

        self.generated += count as u64;
        Ok(out)
    }

    /// Folds due pools into a fresh key and rederives the counter.
    ///
    /// Pool k participates when `reseed_count mod 2^k == 0`, so higher pools
    /// contribute exponentially less often and accumulate longer.
    fn reseed(&mut self) {
        self.reseed_count += 1;
        let mut material = Sha256::new();
        material.update(&self.key);
        for (index, pool) in self.pools.iter_mut().enumerate() {
            if self.reseed_count % (1u64 << index) == 0 {
                material.update(pool.digest().as_bytes());
                pool.start();
            }
        }
        self.key
            .copy_from_slice(&material.digest().as_bytes()[..BLOCK]);

        let mut rekey = Sha256::new();
        rekey.update(&self.key);
        self.seed
            .copy_from_slice(&rekey.digest().as_bytes()[..BLOCK]);
    }
}

impl Default for Fortuna {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Fortuna {
    fn drop(&mut self) {
        self.key.zeroize();
        self.seed.zeroize();
    }
}

impl RngCore for Fortuna {
    fn next_u32(&mut self) -> u32 {
        let mut bytes = [0u8; 4];
        self.fill_bytes(&mut bytes);
        u32::from_be_bytes(bytes)
    }

    fn next_u64(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        self.fill_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if let Err(err) = self.try_fill_bytes(dest) {
            panic!("fortuna: {err}");
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), rand_core::Error> {
        let bytes = self.generate(dest.len()).map_err(rand_core::Error::new)?;
        dest.copy_from_slice(&bytes);
        Ok(())
    }
}

impl CryptoRng for Fortuna {}

/// Steps the counter-mode block: the low 32 bits of the counter, big-endian.
fn increment_counter(seed: &mut [u8; BLOCK]) {
    let low = u32::from_be_bytes([seed[12], seed[13], seed[14], seed[15]]).wrapping_add(1);
    seed[12..].copy_from_slice(&low.to_be_bytes());
}
