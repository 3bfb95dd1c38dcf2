//! Arbitrary-precision unsigned integers for the RSA pipeline.
//!
//! Magnitudes are little-endian vectors of 28-bit limbs held in `u32`s, so
//! every schoolbook product fits a `u64`. The pipeline only ever needs
//! non-negative values, which keeps subtraction an internal concern of
//! division and Montgomery reduction.

mod montgomery;

pub(crate) use montgomery::MontgomeryContext;

use core::cmp::Ordering;

/// Bits per limb.
pub(crate) const DIGIT_BITS: usize = 28;
/// Low 28 bits set.
pub(crate) const DIGIT_MASK: u32 = (1 << DIGIT_BITS) - 1;

/// Unsigned arbitrary-precision integer.
///
/// Invariant: no leading zero limbs; zero is the empty limb vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BigUint {
    limbs: Vec<u32>,
}

impl BigUint {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn one() -> Self {
        Self::from_u32(1)
    }

    pub fn from_u32(value: u32) -> Self {
        let mut n = Self {
            limbs: vec![value & DIGIT_MASK, value >> DIGIT_BITS],
        };
        n.trim();
        n
    }

    pub(crate) fn from_limbs(limbs: Vec<u32>) -> Self {
        let mut n = Self { limbs };
        n.trim();
        n
    }

    /// Drops redundant leading zero limbs.
    fn trim(&mut self) {
        while self.limbs.last() == Some(&0) {
            self.limbs.pop();
        }
    }

    pub fn is_zero(&self) -> bool {
        self.limbs.is_empty()
    }

    pub fn is_odd(&self) -> bool {
        self.limbs.first().map_or(false, |d| d & 1 == 1)
    }

    /// Number of significant bits; zero for zero.
    pub fn bit_length(&self) -> usize {
        match self.limbs.last() {
            None => 0,
            Some(&top) => {
                (self.limbs.len() - 1) * DIGIT_BITS + (32 - top.leading_zeros() as usize)
            }
        }
    }

    /// Bit `index`, counting from the least significant.
    fn bit(&self, index: usize) -> bool {
        self.limbs
            .get(index / DIGIT_BITS)
            .map_or(false, |d| d >> (index % DIGIT_BITS) & 1 == 1)
    }

    /// Interprets `bytes` as an unsigned big-endian integer (OS2IP).
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        let mut limbs = vec![0u32; (bytes.len() * 8 + DIGIT_BITS - 1) / DIGIT_BITS + 1];
        for (i, &byte) in bytes.iter().rev().enumerate() {
            let bit = i * 8;
            let limb = bit / DIGIT_BITS;
            let offset = bit % DIGIT_BITS;
            limbs[limb] |= (u32::from(byte) << offset) & DIGIT_MASK;
            if offset + 8 > DIGIT_BITS {
                limbs[limb + 1] |= u32::from(byte) >> (DIGIT_BITS - offset);
            }
        }
        Self::from_limbs(limbs)
    }

    /// Minimal-length big-endian octets (I2OSP direction); empty for zero.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        let count = (self.bit_length() + 7) / 8;
        let mut out = vec![0u8; count];
        for (i, slot) in out.iter_mut().rev().enumerate() {
            let bit = i * 8;
            let limb = bit / DIGIT_BITS;
            let offset = bit % DIGIT_BITS;
            let mut byte = self.limbs[limb] >> offset;
            if offset + 8 > DIGIT_BITS {
                if let Some(&next) = self.limbs.get(limb + 1) {
                    byte |= next << (DIGIT_BITS - offset);
                }
            }
            *slot = byte as u8;
        }
        out
    }

    /// Parses most-significant-first hex; `None` on a non-hex character.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let mut value = Self::zero();
        for c in hex.chars() {
            let nybble = c.to_digit(16)?;
            value = value.shl_bits(4).add(&Self::from_u32(nybble));
        }
        Some(value)
    }

    /// Most-significant-first hex with leading zeros suppressed; `"0"` for
    /// zero.
    pub fn to_hex(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        let bytes = self.to_bytes_be();
        let mut hex = String::with_capacity(bytes.len() * 2);
        for b in &bytes {
            hex.push_str(&format!("{b:02x}"));
        }
        hex.trim_start_matches('0').to_string()
    }

    pub fn add(&self, rhs: &Self) -> Self {
        let len = self.limbs.len().max(rhs.limbs.len());
        let mut limbs = Vec::with_capacity(len + 1);
        let mut carry = 0u32;
        for i in 0..len {
            let sum =
                self.limbs.get(i).copied().unwrap_or(0) + rhs.limbs.get(i).copied().unwrap_or(0) + carry;
            limbs.push(sum & DIGIT_MASK);
            carry = sum >> DIGIT_BITS;
        }
        limbs.push(carry);
        Self::from_limbs(limbs)
    }

    /// `self − rhs`; callers guarantee `self >= rhs`.
    pub(crate) fn sub(&self, rhs: &Self) -> Self {
        debug_assert!(self >= rhs);
        let mut limbs = Vec::with_capacity(self.limbs.len());
        let mut borrow = 0i64;
        for i in 0..self.limbs.len() {
            let t = i64::from(self.limbs[i]) - i64::from(rhs.limbs.get(i).copied().unwrap_or(0))
                + borrow;
            if t < 0 {
                limbs.push((t + (1i64 << DIGIT_BITS)) as u32);
                borrow = -1;
            } else {
                limbs.push(t as u32);
                borrow = 0;
            }
        }
        Self::from_limbs(limbs)
    }

    pub fn mul(&self, rhs: &Self) -> Self {
        if self.is_zero() || rhs.is_zero() {
            return Self::zero();
        }
        let mut limbs = vec![0u32; self.limbs.len() + rhs.limbs.len()];
        for (i, &a) in self.limbs.iter().enumerate() {
            let mut carry = 0u64;
            for (j, &b) in rhs.limbs.iter().enumerate() {
                let acc = u64::from(limbs[i + j]) + u64::from(a) * u64::from(b) + carry;
                limbs[i + j] = (acc as u32) & DIGIT_MASK;
                carry = acc >> DIGIT_BITS;
            }
            limbs[i + rhs.limbs.len()] = carry as u32;
        }
        Self::from_limbs(limbs)
    }

    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Left shift by `bits` (limb and sub-limb amounts both handled).
    pub(crate) fn shl_bits(&self, bits: usize) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        let limb_shift = bits / DIGIT_BITS;
        let bit_shift = bits % DIGIT_BITS;
        let mut limbs = vec![0u32; self.limbs.len() + limb_shift + 1];
        for (i, &d) in self.limbs.iter().enumerate() {
            let v = u64::from(d) << bit_shift;
            limbs[i + limb_shift] |= (v as u32) & DIGIT_MASK;
            limbs[i + limb_shift + 1] |= (v >> DIGIT_BITS) as u32;
        }
        Self::from_limbs(limbs)
    }

    /// Right shift by `bits`.
    pub(crate) fn shr_bits(&self, bits: usize) -> Self {
        let limb_shift = bits / DIGIT_BITS;
        if limb_shift >= self.limbs.len() {
            return Self::zero();
        }
        let bit_shift = bits % DIGIT_BITS;
        let src = &self.limbs[limb_shift..];
        let mut limbs = Vec::with_capacity(src.len());
        for i in 0..src.len() {
            let mut d = src[i] >> bit_shift;
            if bit_shift > 0 {
                if let Some(&next) = src.get(i + 1) {
                    d |= (next << (DIGIT_BITS - bit_shift)) & DIGIT_MASK;
                }
            }
            limbs.push(d);
        }
        Self::from_limbs(limbs)
    }

    /// Knuth Algorithm D; returns `(quotient, remainder)`.
    ///
    /// `divisor` must be non-zero.
    pub fn div_rem(&self, divisor: &Self) -> (Self, Self) {
        assert!(!divisor.is_zero(), "division by zero");
        if self < divisor {
            return (Self::zero(), self.clone());
        }
        if divisor.limbs.len() == 1 {
            return self.div_rem_digit(divisor.limbs[0]);
        }

        // normalize so the divisor's top limb has its high bit set
        let top = divisor.limbs[divisor.limbs.len() - 1];
        let shift = DIGIT_BITS - (32 - top.leading_zeros() as usize);
        let v = divisor.shl_bits(shift).limbs;
        let mut u = self.shl_bits(shift).limbs;
        let n = v.len();
        let m = u.len() - n;
        u.push(0);

        let base = 1u64 << DIGIT_BITS;
        let v_top = u64::from(v[n - 1]);
        let v_next = u64::from(v[n - 2]);
        let mut q = vec![0u32; m + 1];

        for j in (0..=m).rev() {
            let top2 = u64::from(u[j + n]) << DIGIT_BITS | u64::from(u[j + n - 1]);
            let mut qhat = top2 / v_top;
            let mut rhat = top2 - qhat * v_top;
            // bring the estimate within one of the true digit
            while qhat >= base || qhat * v_next > (rhat << DIGIT_BITS | u64::from(u[j + n - 2])) {
                qhat -= 1;
                rhat += v_top;
                if rhat >= base {
                    break;
                }
            }

            // u[j..j+n+1] -= qhat * v
            let mut borrow = 0i64;
            let mut carry = 0u64;
            for i in 0..n {
                let p = qhat * u64::from(v[i]) + carry;
                carry = p >> DIGIT_BITS;
                let t = i64::from(u[i + j]) - (p as i64 & i64::from(DIGIT_MASK)) + borrow;
                if t < 0 {
                    u[i + j] = (t + (1i64 << DIGIT_BITS)) as u32;
                    borrow = -1;
                } else {
                    u[i + j] = t as u32;
                    borrow = 0;
                }
            }
            let t = i64::from(u[j + n]) - carry as i64 + borrow;

            if t < 0 {
                // the estimate was one too large; add the divisor back
                qhat -= 1;
                let mut add_carry = 0u64;
                for i in 0..n {
                    let s = u64::from(u[i + j]) + u64::from(v[i]) + add_carry;
                    u[i + j] = (s as u32) & DIGIT_MASK;
                    add_carry = s >> DIGIT_BITS;
                }
                u[j + n] = ((t + add_carry as i64) & i64::from(DIGIT_MASK)) as u32;
            } else {
                u[j + n] = t as u32;
            }
            q[j] = qhat as u32;
        }

        u.truncate(n);
        let remainder = Self::from_limbs(u).shr_bits(shift);
        (Self::from_limbs(q), remainder)
    }

    fn div_rem_digit(&self, divisor: u32) -> (Self, Self) {
        let d = u64::from(divisor);
        let mut q = vec![0u32; self.limbs.len()];
        let mut rem = 0u64;
        for i in (0..self.limbs.len()).rev() {
            let acc = rem << DIGIT_BITS | u64::from(self.limbs[i]);
            q[i] = (acc / d) as u32;
            rem = acc % d;
        }
        (Self::from_limbs(q), Self::from_u32(rem as u32))
    }

    /// `self mod modulus`.
    pub fn rem(&self, modulus: &Self) -> Self {
        self.div_rem(modulus).1
    }

    /// `self^exponent mod modulus`.
    ///
    /// Odd moduli (the only kind RSA produces) go through Montgomery
    /// arithmetic; even moduli fall back to reduce-after-every-step
    /// square-and-multiply.
    pub fn mod_pow(&self, exponent: &Self, modulus: &Self) -> Self {
        assert!(!modulus.is_zero(), "zero modulus");
        if modulus.bit_length() == 1 {
            return Self::zero();
        }
        if exponent.is_zero() {
            return Self::one();
        }
        let base = self.rem(modulus);
        if base.is_zero() {
            return Self::zero();
        }

        if modulus.is_odd() {
            let ctx = MontgomeryContext::new(modulus);
            let base_m = ctx.to_montgomery(&base);
            let mut acc = base_m.clone();
            for i in (0..exponent.bit_length() - 1).rev() {
                acc = ctx.square(&acc);
                if exponent.bit(i) {
                    acc = ctx.mul(&acc, &base_m);
                }
            }
            ctx.from_montgomery(&acc)
        } else {
            let mut acc = base.clone();
            for i in (0..exponent.bit_length() - 1).rev() {
                acc = acc.square().rem(modulus);
                if exponent.bit(i) {
                    acc = acc.mul(&base).rem(modulus);
                }
            }
            acc
        }
    }

    pub(crate) fn limbs(&self) -> &[u32] {
        &self.limbs
    }
}

impl PartialOrd for BigUint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigUint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.limbs
            .len()
            .cmp(&other.limbs.len())
            .then_with(|| self.limbs.iter().rev().cmp(other.limbs.iter().rev()))
    }
}

impl core::fmt::Display for BigUint {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint as RefUint;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn reference(n: &BigUint) -> RefUint {
        RefUint::from_bytes_be(&n.to_bytes_be())
    }

    fn random_bytes(rng: &mut ChaCha8Rng, len: usize) -> Vec<u8> {
        (0..len).map(|_| rng.gen()).collect()
    }

    #[test]
    fn byte_round_trip() {
        for bytes in [
            &b""[..],
            &[0x00][..],
            &[0x01][..],
            &[0x00, 0x00, 0x7f][..],
            &[0xff; 33][..],
        ] {
            let n = BigUint::from_bytes_be(bytes);
            let stripped: Vec<u8> = bytes
                .iter()
                .copied()
                .skip_while(|&b| b == 0)
                .collect();
            assert_eq!(n.to_bytes_be(), stripped);
        }
    }

    #[test]
    fn hex_round_trip() {
        let n = BigUint::from_hex("0123456789abcdef0123456789abcdef00").unwrap();
        assert_eq!(n.to_hex(), "123456789abcdef0123456789abcdef00");
        assert_eq!(BigUint::zero().to_hex(), "0");
        assert!(BigUint::from_hex("xyz").is_none());
    }

    #[test]
    fn bit_length_boundaries() {
        assert_eq!(BigUint::zero().bit_length(), 0);
        assert_eq!(BigUint::one().bit_length(), 1);
        assert_eq!(BigUint::from_u32(0x0fff_ffff).bit_length(), 28);
        assert_eq!(BigUint::from_u32(0x1000_0000).bit_length(), 29);
        assert_eq!(BigUint::from_bytes_be(&[0x01, 0x00, 0x00]).bit_length(), 17);
    }

    #[test]
    fn arithmetic_matches_reference() {
        let mut rng = ChaCha8Rng::from_seed([7; 32]);
        for _ in 0..50 {
            let a = BigUint::from_bytes_be(&random_bytes(&mut rng, 40));
            let b = BigUint::from_bytes_be(&random_bytes(&mut rng, 25));
            let (ra, rb) = (reference(&a), reference(&b));

            assert_eq!(reference(&a.add(&b)), &ra + &rb);
            assert_eq!(reference(&a.sub(&b)), &ra - &rb);
            assert_eq!(reference(&a.mul(&b)), &ra * &rb);
            assert_eq!(reference(&a.square()), &ra * &ra);

            let (q, r) = a.div_rem(&b);
            assert_eq!(reference(&q), &ra / &rb);
            assert_eq!(reference(&r), &ra % &rb);
        }
    }

    #[test]
    fn shifts_match_reference() {
        let mut rng = ChaCha8Rng::from_seed([8; 32]);
        let a = BigUint::from_bytes_be(&random_bytes(&mut rng, 30));
        let ra = reference(&a);
        for bits in [0usize, 1, 27, 28, 29, 56, 200] {
            assert_eq!(reference(&a.shl_bits(bits)), &ra << bits);
            assert_eq!(reference(&a.shr_bits(bits)), &ra >> bits);
        }
    }

    #[test]
    fn division_stress_small_quotients() {
        // divisors close to the dividend exercise the qhat correction path
        let mut rng = ChaCha8Rng::from_seed([9; 32]);
        for _ in 0..50 {
            let b = BigUint::from_bytes_be(&random_bytes(&mut rng, 32));
            if b.is_zero() {
                continue;
            }
            let delta = BigUint::from_u32(rng.gen_range(0..1000));
            let a = b.add(&delta);
            let (q, r) = a.div_rem(&b);
            assert_eq!(reference(&q), reference(&a) / reference(&b));
            assert_eq!(reference(&r), reference(&a) % reference(&b));
        }
    }

    #[test]
    fn mod_pow_matches_reference() {
        let mut rng = ChaCha8Rng::from_seed([10; 32]);
        for bits in [256usize, 1024, 2048] {
            let len = bits / 8;
            let mut m_bytes = random_bytes(&mut rng, len);
            m_bytes[0] |= 0x80;
            m_bytes[len - 1] |= 1; // odd modulus
            let m = BigUint::from_bytes_be(&m_bytes);
            let a = BigUint::from_bytes_be(&random_bytes(&mut rng, len));
            let e = BigUint::from_bytes_be(&random_bytes(&mut rng, 3));

            let got = a.mod_pow(&e, &m);
            let want = reference(&a).modpow(&reference(&e), &reference(&m));
            assert_eq!(reference(&got), want);
        }
    }

    #[test]
    fn mod_pow_even_modulus_and_edges() {
        let m = BigUint::from_u32(1 << 20);
        let a = BigUint::from_u32(12345);
        let e = BigUint::from_u32(77);
        let want = reference(&a).modpow(&reference(&e), &reference(&m));
        assert_eq!(reference(&a.mod_pow(&e, &m)), want);

        assert_eq!(a.mod_pow(&BigUint::zero(), &m), BigUint::one());
        assert_eq!(a.mod_pow(&e, &BigUint::one()), BigUint::zero());
        assert_eq!(
            BigUint::zero().mod_pow(&e, &BigUint::from_u32(97)),
            BigUint::zero()
        );
    }

    #[test]
    fn mod_pow_fermat() {
        // 2^(p-1) ≡ 1 mod p for prime p
        let p = BigUint::from_hex("ffffffffffffffffffffffffffffff61").unwrap();
        let e = p.sub(&BigUint::one());
        assert_eq!(BigUint::from_u32(2).mod_pow(&e, &p), BigUint::one());
    }

    #[test]
    fn ordering() {
        let a = BigUint::from_u32(5);
        let b = BigUint::from_hex("100000000").unwrap();
        assert!(a < b);
        assert!(b > a);
        assert_eq!(a.cmp(&a), Ordering::Equal);
        assert!(BigUint::zero() < a);
    }
}
