//! Shared fixtures: RSA test keypairs from the reference big-integer
//! library, DER/PEM assembly, and a reference OAEP decryptor.

#![allow(dead_code)]

use num_bigint::{BigUint as RefUint, ModInverse, RandPrime};
use rsa_oaep_encryption::hash::{Digest, HashAlgorithm};

/// A keypair the crate under test cannot produce itself.
pub struct TestKey {
    pub n: RefUint,
    pub e: RefUint,
    pub d: RefUint,
}

impl TestKey {
    /// Modulus length in octets.
    pub fn size(&self) -> usize {
        (self.n.bits() + 7) / 8
    }

    pub fn spki_der(&self) -> Vec<u8> {
        spki_der(&self.n.to_bytes_be(), &self.e.to_bytes_be())
    }

    pub fn spki_pem(&self) -> String {
        pem_wrap("PUBLIC KEY", &self.spki_der())
    }
}

/// Generates an RSA keypair with exactly `bits` of modulus.
pub fn generate_key(bits: usize, rng: &mut impl rand::Rng) -> TestKey {
    let e = RefUint::from(65537u32);
    loop {
        let p: RefUint = rng.gen_prime(bits / 2);
        let q: RefUint = rng.gen_prime(bits / 2);
        if p == q {
            continue;
        }
        let n = &p * &q;
        if n.bits() != bits {
            continue;
        }
        let phi = (&p - 1u32) * (&q - 1u32);
        if let Some(d) = (&e).mod_inverse(&phi) {
            if let Some(d) = d.to_biguint() {
                return TestKey { n, e, d };
            }
        }
    }
}

fn der_node(tag: u8, contents: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    let len = contents.len();
    if len < 0x80 {
        out.push(len as u8);
    } else if len <= 0xff {
        out.extend_from_slice(&[0x81, len as u8]);
    } else {
        out.extend_from_slice(&[0x82, (len >> 8) as u8, len as u8]);
    }
    out.extend_from_slice(contents);
    out
}

fn der_integer(magnitude: &[u8]) -> Vec<u8> {
    let mut body = magnitude.to_vec();
    if body.is_empty() || body[0] & 0x80 != 0 {
        body.insert(0, 0);
    }
    der_node(0x02, &body)
}

/// DER SubjectPublicKeyInfo for raw big-endian (n, e) octets.
pub fn spki_der(n: &[u8], e: &[u8]) -> Vec<u8> {
    spki_der_with_oid(n, e, &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01])
}

/// Same, with a caller-chosen algorithm OID.
pub fn spki_der_with_oid(n: &[u8], e: &[u8], oid: &[u8]) -> Vec<u8> {
    let rsa_key = der_node(0x30, &[der_integer(n), der_integer(e)].concat());

    let mut bit_string_payload = vec![0x00];
    bit_string_payload.extend_from_slice(&rsa_key);
    let bit_string = der_node(0x03, &bit_string_payload);

    let algorithm = der_node(0x30, &[der_node(0x06, oid), der_node(0x05, &[])].concat());
    der_node(0x30, &[algorithm, bit_string].concat())
}

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

pub fn base64_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity((data.len() + 2) / 3 * 4);
    for chunk in data.chunks(3) {
        let b = [chunk[0], *chunk.get(1).unwrap_or(&0), *chunk.get(2).unwrap_or(&0)];
        let v = u32::from(b[0]) << 16 | u32::from(b[1]) << 8 | u32::from(b[2]);
        let sextets = [v >> 18 & 63, v >> 12 & 63, v >> 6 & 63, v & 63];
        for (i, &s) in sextets.iter().enumerate() {
            if i <= chunk.len() {
                out.push(BASE64_ALPHABET[s as usize] as char);
            } else {
                out.push('=');
            }
        }
    }
    out
}

/// Armors `der` the way openssl prints keys: 64-column Base64 body.
pub fn pem_wrap(label: &str, der: &[u8]) -> String {
    let body = base64_encode(der);
    let mut out = format!("-----BEGIN {label}-----\n");
    for line in body.as_bytes().chunks(64) {
        out.push_str(std::str::from_utf8(line).unwrap());
        out.push('\n');
    }
    out.push_str(&format!("-----END {label}-----\n"));
    out
}

fn left_pad(input: &[u8], width: usize) -> Vec<u8> {
    let mut out = vec![0u8; width];
    out[width - input.len()..].copy_from_slice(input);
    out
}

fn mgf1_xor(out: &mut [u8], hash: HashAlgorithm, seed: &[u8]) {
    let mut digest = hash.new_digest();
    let mut counter: u32 = 0;
    let mut offset = 0;
    while offset < out.len() {
        digest.start();
        digest.update(seed);
        digest.update(&counter.to_be_bytes());
        for &b in digest.digest().as_bytes() {
            if offset == out.len() {
                break;
            }
            out[offset] ^= b;
            offset += 1;
        }
        counter += 1;
    }
}

/// Reference RSAES-OAEP decryption (empty label). `None` on any padding
/// failure.
pub fn oaep_decrypt(key: &TestKey, ciphertext: &[u8], hash: HashAlgorithm) -> Option<Vec<u8>> {
    let k = key.size();
    if ciphertext.len() != k {
        return None;
    }
    let m = RefUint::from_bytes_be(ciphertext).modpow(&key.d, &key.n);
    let em = left_pad(&m.to_bytes_be(), k);

    let h_len = hash.output_size();
    if em[0] != 0 || k < 2 * h_len + 2 {
        return None;
    }
    let (masked_seed, masked_db) = em[1..].split_at(h_len);

    let mut seed = masked_seed.to_vec();
    mgf1_xor(&mut seed, hash, masked_db);
    let mut db = masked_db.to_vec();
    mgf1_xor(&mut db, hash, &seed);

    let mut engine = hash.new_digest();
    let l_hash = engine.digest();
    if db[..h_len] != *l_hash.as_bytes() {
        return None;
    }
    let rest = &db[h_len..];
    let one = rest.iter().position(|&b| b != 0)?;
    if rest[one] != 0x01 {
        return None;
    }
    Some(rest[one + 1..].to_vec())
}
