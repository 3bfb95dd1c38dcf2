//! PEM envelope and Base64 body decoding.
//!
//! The reader accepts a single armored block, tolerates surrounding
//! whitespace and RFC 1421 header lines, and requires the BEGIN and END
//! labels to match literally.

use crate::errors::{Error, Result};

/// One decoded PEM block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PemBlock {
    /// The armor label, e.g. `PUBLIC KEY`.
    pub label: String,
    /// The Base64-decoded body.
    pub contents: Vec<u8>,
}

const BEGIN: &str = "-----BEGIN ";
const END: &str = "-----END ";
const DASHES: &str = "-----";

/// Decodes the first armored block in `pem`.
pub fn decode(pem: &str) -> Result<PemBlock> {
    let text = pem.trim();

    let begin = text.find(BEGIN).ok_or(Error::InvalidPem)?;
    // nothing but whitespace may precede the armor
    if !text[..begin].trim().is_empty() {
        return Err(Error::InvalidPem);
    }
    let after_begin = &text[begin + BEGIN.len()..];
    let label_end = after_begin.find(DASHES).ok_or(Error::InvalidPem)?;
    let label = &after_begin[..label_end];
    if !is_valid_label(label) {
        return Err(Error::InvalidPem);
    }

    let body_start = label_end + DASHES.len();
    let end_marker = format!("{END}{label}{DASHES}");
    let body_end = after_begin.find(&end_marker).ok_or(Error::InvalidPem)?;
    if body_end < body_start {
        return Err(Error::InvalidPem);
    }
    let mut body = &after_begin[body_start..body_end];

    // RFC 1421 headers run until the first blank line
    if let Some(colon) = body.find(':') {
        if colon < body.find("\n\n").unwrap_or(usize::MAX)
            || colon < body.find("\r\n\r\n").unwrap_or(usize::MAX)
        {
            let blank = body
                .find("\r\n\r\n")
                .map(|i| i + 4)
                .or_else(|| body.find("\n\n").map(|i| i + 2))
                .ok_or(Error::InvalidPem)?;
            body = &body[blank..];
        }
    }

    let contents = base64_decode(body)?;
    if contents.is_empty() {
        return Err(Error::InvalidPem);
    }
    Ok(PemBlock {
        label: label.to_string(),
        contents,
    })
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'-' || b == b' ')
}

/// Decodes standard-alphabet Base64, ignoring any byte outside
/// `[A-Za-z0-9+/=]`.
pub(crate) fn base64_decode(body: &str) -> Result<Vec<u8>> {
    let mut sextets = Vec::with_capacity(body.len());
    let mut padding = 0usize;
    for b in body.bytes() {
        let value = match b {
            b'A'..=b'Z' => b - b'A',
            b'a'..=b'z' => b - b'a' + 26,
            b'0'..=b'9' => b - b'0' + 52,
            b'+' => 62,
            b'/' => 63,
            b'=' => {
                padding += 1;
                continue;
            }
            _ => continue,
        };
        // data after the padding marker is malformed
        if padding > 0 {
            return Err(Error::InvalidPem);
        }
        sextets.push(value);
    }

    if padding > 2 || (sextets.len() + padding) % 4 != 0 {
        return Err(Error::InvalidPem);
    }

    let mut out = Vec::with_capacity(sextets.len() * 3 / 4);
    for group in sextets.chunks(4) {
        match *group {
            [a, b, c, d] => {
                out.push(a << 2 | b >> 4);
                out.push(b << 4 | c >> 2);
                out.push(c << 6 | d);
            }
            [a, b, c] => {
                out.push(a << 2 | b >> 4);
                out.push(b << 4 | c >> 2);
            }
            [a, b] => {
                out.push(a << 2 | b >> 4);
            }
            _ => return Err(Error::InvalidPem),
        }
    }
    Ok(out)
}
