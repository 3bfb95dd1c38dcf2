//! Montgomery reduction for odd moduli.
//!
//! The context caches the modulus, its limb count t, and
//! `n0 = −m⁻¹ mod 2^28`. With R = 2^(28·t), values x̃ = x·R mod m multiply
//! via a plain product followed by [`reduce`](MontgomeryContext::reduce),
//! which never needs a division.

use super::{BigUint, DIGIT_BITS, DIGIT_MASK};

pub(crate) struct MontgomeryContext {
    modulus: BigUint,
    /// t(m): limb count of the modulus.
    limbs: usize,
    /// −m⁻¹ mod 2^28.
    n0: u32,
}

impl MontgomeryContext {
    /// `modulus` must be odd and non-zero.
    pub(crate) fn new(modulus: &BigUint) -> Self {
        debug_assert!(modulus.is_odd());
        Self {
            modulus: modulus.clone(),
            limbs: modulus.limbs().len(),
            n0: inv_digit(modulus.limbs()[0]),
        }
    }

    /// x → x·R mod m. `x` must already be below the modulus.
    pub(crate) fn to_montgomery(&self, x: &BigUint) -> BigUint {
        debug_assert!(x < &self.modulus);
        x.shl_bits(self.limbs * DIGIT_BITS).rem(&self.modulus)
    }

    /// x̃ → x: one reduction strips the R factor.
    pub(crate) fn from_montgomery(&self, x: &BigUint) -> BigUint {
        self.reduce(x.limbs().to_vec())
    }

    /// ãb̃ → (ab)~.
    pub(crate) fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        self.reduce(a.mul(b).limbs().to_vec())
    }

    pub(crate) fn square(&self, a: &BigUint) -> BigUint {
        self.reduce(a.square().limbs().to_vec())
    }

    /// Reduces a raw double-width magnitude: x → x·R⁻¹ mod m.
    ///
    /// Per limb position i, `u0 = x[i]·n0 mod 2^28` makes `x + u0·m·2^(28·i)`
    /// divisible by one more limb; after t positions the low half is zero and
    /// shifting it away leaves a value below 2m.
    fn reduce(&self, mut raw: Vec<u32>) -> BigUint {
        let t = self.limbs;
        let m = self.modulus.limbs();
        raw.resize(2 * t + 2, 0);

        for i in 0..t {
            let u0 = (u64::from(raw[i]) * u64::from(self.n0)) & u64::from(DIGIT_MASK);
            let mut carry = 0u64;
            for (k, &mk) in m.iter().enumerate() {
                let acc = u64::from(raw[i + k]) + u0 * u64::from(mk) + carry;
                raw[i + k] = (acc as u32) & DIGIT_MASK;
                carry = acc >> DIGIT_BITS;
            }
            let mut k = i + t;
            while carry > 0 {
                let acc = u64::from(raw[k]) + carry;
                raw[k] = (acc as u32) & DIGIT_MASK;
                carry = acc >> DIGIT_BITS;
                k += 1;
            }
            debug_assert_eq!(raw[i], 0);
        }

        let mut result = BigUint::from_limbs(raw.split_off(t));
        if result >= self.modulus {
            result = result.sub(&self.modulus);
        }
        result
    }
}

/// −d⁻¹ mod 2^28 for odd `d`, by Newton doubling from the inverse mod 8
/// (an odd number is its own inverse there).
fn inv_digit(d: u32) -> u32 {
    let x = u64::from(d);
    let mut y = x;
    // each step doubles the number of correct low bits
    for _ in 0..4 {
        y = y.wrapping_mul(2u64.wrapping_sub(x.wrapping_mul(y)));
    }
    let y = y & u64::from(DIGIT_MASK);
    debug_assert_eq!((x * y) & u64::from(DIGIT_MASK), 1);
    (((1u64 << DIGIT_BITS) - y) & u64::from(DIGIT_MASK)) as u32
}
