//! Encryption using [OAEP padding](https://datatracker.ietf.org/doc/html/rfc8017#section-7.1).
//!
//! The hash selected here is used both for the (empty) label and for MGF1.

mod encrypting_key;

pub use self::encrypting_key::EncryptingKey;
