//! Minimal ASN.1 DER reader and the SubjectPublicKeyInfo extraction.
//!
//! Only what key import needs: definite-length tag-length-value parsing,
//! OBJECT IDENTIFIER decoding, a shape-only validator, and the speculative
//! re-parse of BIT STRING payloads (the inner RSAPublicKey structure lives
//! inside one).

use crate::buffer::ByteBuffer;
use crate::errors::{Error, Result};

/// ASN.1 tag class, from bits 7–8 of the identifier octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

impl Class {
    fn from_bits(bits: u8) -> Self {
        match bits {
            0 => Class::Universal,
            1 => Class::Application,
            2 => Class::ContextSpecific,
            _ => Class::Private,
        }
    }
}

/// Universal tag numbers used by the key path.
pub mod tag {
    pub const INTEGER: u32 = 0x02;
    pub const BIT_STRING: u32 = 0x03;
    pub const NULL: u32 = 0x05;
    pub const OBJECT_IDENTIFIER: u32 = 0x06;
    pub const SEQUENCE: u32 = 0x10;
}

/// A parsed ASN.1 node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asn1Object {
    pub class: Class,
    pub tag: u32,
    pub constructed: bool,
    pub value: Asn1Value,
    /// For BIT STRING nodes, the raw payload including the leading
    /// unused-bits octet, kept even when the node was re-parsed as
    /// constructed.
    pub bit_string_contents: Option<Vec<u8>>,
}

/// Node contents: primitive bytes or child nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asn1Value {
    Primitive(Vec<u8>),
    Constructed(Vec<Asn1Object>),
}

impl Asn1Object {
    /// Children of a constructed node; empty for primitives.
    pub fn children(&self) -> &[Asn1Object] {
        match &self.value {
            Asn1Value::Constructed(children) => children,
            Asn1Value::Primitive(_) => &[],
        }
    }

    /// Primitive contents; empty for constructed nodes.
    pub fn primitive(&self) -> &[u8] {
        match &self.value {
            Asn1Value::Primitive(bytes) => bytes,
            Asn1Value::Constructed(_) => &[],
        }
    }
}

/// Nesting deeper than this is rejected; SubjectPublicKeyInfo needs four
/// levels.
const MAX_DEPTH: usize = 32;

/// Parses one DER object from `der`. Trailing bytes are ignored.
pub fn from_der(der: &[u8]) -> Result<Asn1Object> {
    let mut buf = ByteBuffer::from_slice(der);
    parse_object(&mut buf, 0)
}

fn parse_object(buf: &mut ByteBuffer, depth: usize) -> Result<Asn1Object> {
    if depth > MAX_DEPTH || buf.remaining() < 2 {
        return Err(Error::InvalidKey);
    }
    let identifier = buf.get_byte();
    let class = Class::from_bits(identifier >> 6);
    let constructed = identifier & 0x20 != 0;
    let tag = u32::from(identifier & 0x1f);
    // high-tag-number form is never produced for SubjectPublicKeyInfo
    if tag == 0x1f {
        return Err(Error::InvalidKey);
    }

    let length = parse_length(buf)?;
    if length > buf.remaining() {
        return Err(Error::InvalidKey);
    }
    let contents = buf.get_bytes(length);

    let value = if constructed {
        Asn1Value::Constructed(parse_children(&contents, depth + 1)?)
    } else {
        Asn1Value::Primitive(contents.clone())
    };

    let mut object = Asn1Object {
        class,
        tag,
        constructed,
        value,
        bit_string_contents: None,
    };

    if !constructed && class == Class::Universal && tag == tag::BIT_STRING {
        object.bit_string_contents = Some(contents.clone());
        // When no bits are unused the payload may itself be DER; a
        // successful strict parse of exactly the rest turns the node into a
        // constructed one.
        if contents.len() > 1 && contents[0] == 0 {
            if let Ok(child) = parse_exact(&contents[1..], depth + 1) {
                object.constructed = true;
                object.value = Asn1Value::Constructed(vec![child]);
            }
        }
    }

    Ok(object)
}

fn parse_length(buf: &mut ByteBuffer) -> Result<usize> {
    if buf.is_empty() {
        return Err(Error::InvalidKey);
    }
    let first = buf.get_byte();
    if first & 0x80 == 0 {
        return Ok(usize::from(first));
    }
    let count = usize::from(first & 0x7f);
    // 0x80 would be the indefinite form, which DER forbids
    if count == 0 || count > 4 || count > buf.remaining() {
        return Err(Error::InvalidKey);
    }
    let mut length = 0usize;
    for _ in 0..count {
        length = length << 8 | usize::from(buf.get_byte());
    }
    Ok(length)
}

fn parse_children(contents: &[u8], depth: usize) -> Result<Vec<Asn1Object>> {
    let mut buf = ByteBuffer::from_slice(contents);
    let mut children = Vec::new();
    while !buf.is_empty() {
        children.push(parse_object(&mut buf, depth)?);
    }
    Ok(children)
}

/// Strict parse: exactly one object consuming the whole input.
fn parse_exact(der: &[u8], depth: usize) -> Result<Asn1Object> {
    let mut buf = ByteBuffer::from_slice(der);
    let object = parse_object(&mut buf, depth)?;
    if !buf.is_empty() {
        return Err(Error::InvalidKey);
    }
    Ok(object)
}

/// Renders OBJECT IDENTIFIER contents in dotted-decimal form.
pub fn decode_oid(contents: &[u8]) -> String {
    let mut out = String::new();
    let mut iter = contents.iter();
    if let Some(&first) = iter.next() {
        out.push_str(&format!("{}.{}", first / 40, first % 40));
    }
    let mut arc: u64 = 0;
    for &b in iter {
        arc = arc << 7 | u64::from(b & 0x7f);
        if b & 0x80 == 0 {
            out.push_str(&format!(".{arc}"));
            arc = 0;
        }
    }
    out
}

/// Shape template for [`validate`]: class, tag, constructed flag, and
/// (for constructed nodes) the expected children.
pub struct Template {
    pub class: Class,
    pub tag: u32,
    pub constructed: bool,
    pub children: &'static [Template],
}

/// Shape-only structural check; primitive values are not inspected.
pub fn validate(object: &Asn1Object, template: &Template) -> bool {
    if object.class != template.class
        || object.tag != template.tag
        || object.constructed != template.constructed
    {
        return false;
    }
    if template.children.is_empty() {
        return true;
    }
    let children = object.children();
    children.len() == template.children.len()
        && children
            .iter()
            .zip(template.children)
            .all(|(child, tpl)| validate(child, tpl))
}

const fn universal(tag: u32, constructed: bool, children: &'static [Template]) -> Template {
    Template {
        class: Class::Universal,
        tag,
        constructed,
        children,
    }
}

/// rsaEncryption, RFC 8017 Appendix A.1.
const OID_RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.1";

static ALGORITHM_CHILDREN: [Template; 2] = [
    universal(tag::OBJECT_IDENTIFIER, false, &[]),
    universal(tag::NULL, false, &[]),
];

static SPKI_CHILDREN: [Template; 2] = [
    universal(tag::SEQUENCE, true, &ALGORITHM_CHILDREN),
    universal(tag::BIT_STRING, true, &[]),
];

/// SubjectPublicKeyInfo ::= SEQUENCE {
///     algorithm        SEQUENCE { OBJECT IDENTIFIER, NULL },
///     subjectPublicKey BIT STRING }
/// with the BIT STRING re-parsed to its nested payload.
static SPKI_TEMPLATE: Template = universal(tag::SEQUENCE, true, &SPKI_CHILDREN);

static RSA_KEY_CHILDREN: [Template; 2] = [
    universal(tag::INTEGER, false, &[]),
    universal(tag::INTEGER, false, &[]),
];

/// RSAPublicKey ::= SEQUENCE { modulus INTEGER, publicExponent INTEGER }
static RSA_PUBLIC_KEY_TEMPLATE: Template = universal(tag::SEQUENCE, true, &RSA_KEY_CHILDREN);

/// Extracts the raw big-endian (modulus, publicExponent) octets from a DER
/// SubjectPublicKeyInfo carrying the plain rsaEncryption algorithm.
pub fn rsa_public_key_from_spki(der: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let spki = from_der(der)?;
    if !validate(&spki, &SPKI_TEMPLATE) {
        return Err(Error::InvalidKey);
    }

    let algorithm = &spki.children()[0];
    if decode_oid(algorithm.children()[0].primitive()) != OID_RSA_ENCRYPTION {
        return Err(Error::InvalidKey);
    }

    // the speculative decode has already unwrapped the BIT STRING
    let key = spki.children()[1].children().first().ok_or(Error::InvalidKey)?;
    if !validate(key, &RSA_PUBLIC_KEY_TEMPLATE) {
        return Err(Error::InvalidKey);
    }
    let modulus = key.children()[0].primitive().to_vec();
    let exponent = key.children()[1].primitive().to_vec();
    if modulus.is_empty() || exponent.is_empty() {
        return Err(Error::InvalidKey);
    }
    Ok((modulus, exponent))
}
