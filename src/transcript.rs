// Copyright 2020-2026 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

//! Challenge seed of a decryption proof.
//!
//! The prover hashes the DER encoding of
//!
//! ```text
//! SEQUENCE {
//!     domain      GeneralString "DECRYPTION",
//!     public key  <DER of the public key, verbatim>,
//!     ciphertext  <DER of the ciphertext, verbatim>,
//!     plaintext   OCTET STRING,
//!     a           INTEGER,
//!     b           INTEGER
//! }
//! ```
//!
//! Any byte of difference yields a different challenge, so the verifier must
//! rebuild this exact framing.

use num_bigint::{BigInt, BigUint};
use simple_asn1::{to_der, ASN1Block, ASN1Class};

use crate::codec::{Ciphertext, PublicKey};
use crate::error::{Error, Result};

pub const DECRYPTION_DOMAIN: &[u8] = b"DECRYPTION";

const TAG_SEQUENCE: u8 = 0x10;
const TAG_GENERAL_STRING: u8 = 0x1B;

/// Build the seed that the Fiat-Shamir challenge of a decryption proof is
/// derived from.
pub fn decryption_transcript(
    key: &PublicKey,
    ciphertext: &Ciphertext,
    message: &[u8],
    a: &BigUint,
    b: &BigUint,
) -> Result<Vec<u8>> {
    let mut body = encode(&universal(TAG_GENERAL_STRING, false, DECRYPTION_DOMAIN.to_vec()))?;
    body.extend_from_slice(key.der());
    body.extend_from_slice(ciphertext.der());
    body.extend(encode(&ASN1Block::OctetString(0, message.to_vec()))?);
    body.extend(encode(&ASN1Block::Integer(0, BigInt::from(a.clone())))?);
    body.extend(encode(&ASN1Block::Integer(0, BigInt::from(b.clone())))?);

    // The key and ciphertext are already encoded, so the outer SEQUENCE is
    // emitted around the raw body instead of being rebuilt from blocks.
    encode(&universal(TAG_SEQUENCE, true, body))
}

fn universal(tag: u8, constructed: bool, content: Vec<u8>) -> ASN1Block {
    ASN1Block::Unknown(
        ASN1Class::Universal,
        constructed,
        0,
        BigUint::from(tag),
        content,
    )
}

fn encode(block: &ASN1Block) -> Result<Vec<u8>> {
    to_der(block).map_err(|err| Error::Framing(err.to_string()))
}
