// Copyright 2020-2026 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

//! DER containers of the election system.
//!
//! ```text
//! PublicKey  ::= SEQUENCE { algorithm ANY, key BIT STRING }   -- key: SEQUENCE { h INTEGER }
//! Ciphertext ::= SEQUENCE { algorithm ANY, SEQUENCE { u INTEGER, v INTEGER } }
//! Proof      ::= SEQUENCE { a INTEGER, b INTEGER, s INTEGER }
//! ```
//!
//! The decoded values keep the exact DER bytes they came from, because the
//! proof transcript embeds those bytes verbatim.

use num_bigint::BigUint;
use simple_asn1::{from_der, ASN1Block};

use crate::error::{Error, Result};

/// ElGamal public key h = g^x mod p.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub h: BigUint,
    der: Vec<u8>,
}

impl PublicKey {
    /// Decode a SubjectPublicKeyInfo-shaped key.
    ///
    /// The BIT STRING usually wraps `SEQUENCE { INTEGER }`; a bare INTEGER is
    /// accepted too.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let fields = sequence(parse_single(der, "public key")?, "public key", 2)?;
        let key_bytes = match &fields[1] {
            ASN1Block::BitString(_, bits, bytes) if bits % 8 == 0 => bytes,
            ASN1Block::BitString(..) => {
                return Err(Error::Decoding(
                    "public key BIT STRING has unused bits".to_string(),
                ))
            }
            other => return Err(unexpected("public key BIT STRING", other)),
        };
        let h = match parse_single(key_bytes, "public key value")? {
            ASN1Block::Integer(_, value) => natural(&value, "h")?,
            block @ ASN1Block::Sequence(..) => {
                let inner = sequence(block, "public key value", 1)?;
                integer(&inner[0], "h")?
            }
            other => return Err(unexpected("public key value", &other)),
        };
        Ok(PublicKey {
            h,
            der: der.to_vec(),
        })
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }
}

/// ElGamal ciphertext (u, v) = (g^r, m * h^r).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ciphertext {
    pub u: BigUint,
    pub v: BigUint,
    der: Vec<u8>,
}

impl Ciphertext {
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let fields = sequence(parse_single(der, "ciphertext")?, "ciphertext", 2)?;
        let pair = sequence(fields[1].clone(), "ciphertext pair", 2)?;
        Ok(Ciphertext {
            u: integer(&pair[0], "u")?,
            v: integer(&pair[1], "v")?,
            der: der.to_vec(),
        })
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }
}

/// Upper bound on an encoded key, ciphertext or proof. Real ones stay well
/// below 2 KiB even with the group parameters embedded.
pub const MAX_DER_LEN: usize = 8 * 1024;

/// Deepest nesting of constructed elements accepted before decoding.
pub const MAX_DER_DEPTH: usize = 16;

/// Walk the TLV headers of `der` without recursion and reject inputs nested
/// deeper than [`MAX_DER_DEPTH`]. The DER decoder recurses once per level.
fn check_nesting(der: &[u8], what: &str) -> Result<()> {
    let truncated = || Error::Decoding(format!("{what}: truncated element"));
    // end offsets of the enclosing constructed elements
    let mut open: Vec<usize> = Vec::new();
    let mut pos = 0;
    while pos < der.len() {
        while open.last() == Some(&pos) {
            open.pop();
        }
        let tag = der[pos];
        pos += 1;
        if tag & 0x1f == 0x1f {
            while *der.get(pos).ok_or_else(truncated)? & 0x80 != 0 {
                pos += 1;
            }
            pos += 1;
        }

        let first = *der.get(pos).ok_or_else(truncated)?;
        pos += 1;
        let len = if first < 0x80 {
            usize::from(first)
        } else {
            let count = usize::from(first & 0x7f);
            if count == 0 || count > std::mem::size_of::<usize>() {
                return Err(Error::Decoding(format!("{what}: unsupported length encoding")));
            }
            let bytes = der.get(pos..pos + count).ok_or_else(truncated)?;
            pos += count;
            bytes.iter().fold(0_usize, |acc, b| (acc << 8) | usize::from(*b))
        };

        let limit = open.last().copied().unwrap_or(der.len());
        let end = pos
            .checked_add(len)
            .filter(|end| *end <= limit)
            .ok_or_else(truncated)?;
        if tag & 0x20 != 0 {
            if open.len() >= MAX_DER_DEPTH {
                return Err(Error::Decoding(format!(
                    "{what}: nested deeper than {MAX_DER_DEPTH} levels"
                )));
            }
            open.push(end);
        } else {
            pos = end;
        }
    }
    Ok(())
}

/// Parse exactly one DER element spanning all of `der`.
pub(crate) fn parse_single(der: &[u8], what: &str) -> Result<ASN1Block> {
    if der.len() > MAX_DER_LEN {
        return Err(Error::Decoding(format!(
            "{what}: {} bytes exceeds the {MAX_DER_LEN} byte limit",
            der.len()
        )));
    }
    check_nesting(der, what)?;
    let mut blocks = from_der(der)
        .map_err(|err| Error::Decoding(format!("{what}: {err}")))?;
    match blocks.len() {
        1 => Ok(blocks.remove(0)),
        0 => Err(Error::Decoding(format!("{what}: empty input"))),
        _ => Err(Error::Decoding(format!("{what}: trailing data"))),
    }
}

/// Unwrap a SEQUENCE of exactly `len` elements.
pub(crate) fn sequence(block: ASN1Block, what: &str, len: usize) -> Result<Vec<ASN1Block>> {
    match block {
        ASN1Block::Sequence(_, items) if items.len() == len => Ok(items),
        ASN1Block::Sequence(_, items) => Err(Error::Decoding(format!(
            "{what}: expected {len} elements, found {}",
            items.len()
        ))),
        other => Err(unexpected(what, &other)),
    }
}

/// Read a non-negative INTEGER.
pub(crate) fn integer(block: &ASN1Block, what: &str) -> Result<BigUint> {
    match block {
        ASN1Block::Integer(_, value) => natural(value, what),
        other => Err(unexpected(what, other)),
    }
}

fn natural(value: &num_bigint::BigInt, what: &str) -> Result<BigUint> {
    value
        .to_biguint()
        .ok_or_else(|| Error::Decoding(format!("{what} is negative")))
}

fn unexpected(what: &str, block: &ASN1Block) -> Error {
    Error::Decoding(format!("{what}: unexpected {}", describe(block)))
}

fn describe(block: &ASN1Block) -> &'static str {
    match block {
        ASN1Block::Boolean(..) => "BOOLEAN",
        ASN1Block::Integer(..) => "INTEGER",
        ASN1Block::BitString(..) => "BIT STRING",
        ASN1Block::OctetString(..) => "OCTET STRING",
        ASN1Block::Null(..) => "NULL",
        ASN1Block::ObjectIdentifier(..) => "OBJECT IDENTIFIER",
        ASN1Block::Sequence(..) => "SEQUENCE",
        ASN1Block::Set(..) => "SET",
        ASN1Block::Explicit(..) => "explicitly tagged element",
        _ => "element",
    }
}
