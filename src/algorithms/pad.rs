//! Fixed-width big-endian rendering of integers (I2OSP, RFC 8017 §4.1).

/// Left-pads `input` with zero octets to exactly `padded_len` bytes.
///
/// Callers pass reduced residues, so `input` never exceeds the target width.
pub(crate) fn left_pad(input: &[u8], padded_len: usize) -> Vec<u8> {
    debug_assert!(input.len() <= padded_len);
    let mut out = vec![0u8; padded_len];
    let start = padded_len - input.len().min(padded_len);
    out[start..].copy_from_slice(&input[input.len() - (padded_len - start)..]);
    out
}
