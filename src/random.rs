//! Randomness for the OAEP seed.
//!
//! A Fortuna-style generator built from the crate's own SHA-256 and AES-128.
//! Callers that want reproducibility thread their own
//! [`RngCore`](rand_core::RngCore) into
//! [`encrypt_with_rng`](crate::RsaPublicKey::encrypt_with_rng); everything
//! else shares one process-wide generator behind a mutex.

mod aes;
mod fortuna;

pub use fortuna::Fortuna;

use std::sync::{Mutex, OnceLock};

static GLOBAL: OnceLock<Mutex<Fortuna>> = OnceLock::new();

/// Runs `f` with exclusive access to the process-wide generator.
pub(crate) fn with_global<T>(f: impl FnOnce(&mut Fortuna) -> T) -> T {
    let mutex = GLOBAL.get_or_init(|| Mutex::new(Fortuna::new()));
    let mut guard = mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut guard)
}
