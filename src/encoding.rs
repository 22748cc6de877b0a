// Copyright 2020-2026 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

//! Plaintext to group element encoding.
//!
//! A message is padded into a modulus-sized block,
//!
//! ```text
//! 0x00 0x01 | 0xFF .. 0xFF | 0x00 | message
//! ```
//!
//! read as a big-endian integer m0, and then mapped into the order-q subgroup:
//! by Euler's criterion m0 is a quadratic residue iff m0^q ≡ 1 (mod p). Since
//! p ≡ 3 (mod 4), -1 is a non-residue, so for a non-residue m0 the value
//! p - m0 is a residue. The prover applies the same rule, so both sides agree
//! on the element m that the ciphertext decrypts to.

use num_bigint::BigUint;
use tracing::trace;

use crate::error::{Error, Result};
use crate::group::ModpGroup;

/// Fixed bytes around the message: the `0x00 0x01` prefix and the `0x00` separator.
const PADDING_OVERHEAD: usize = 3;

/// Longest message that still fits the padded block of `group`.
pub fn message_capacity(group: &ModpGroup) -> usize {
    group.modulus_len() - PADDING_OVERHEAD
}

/// Encode `message` as an element of the order-q subgroup.
///
/// Fails with [`Error::Encoding`] when the message does not fit the block.
pub fn encode_message(group: &ModpGroup, message: &[u8]) -> Result<BigUint> {
    let capacity = message_capacity(group);
    if message.len() > capacity {
        return Err(Error::Encoding {
            length: message.len(),
            capacity,
        });
    }

    let mut block = Vec::with_capacity(group.modulus_len());
    block.extend_from_slice(&[0x00, 0x01]);
    block.resize(2 + capacity - message.len(), 0xFF);
    block.push(0x00);
    block.extend_from_slice(message);

    let m = BigUint::from_bytes_be(&block);
    if group.is_quadratic_residue(&m) {
        Ok(m)
    } else {
        trace!(len = message.len(), "padded message is a non-residue, negating");
        Ok(group.modulus() - m)
    }
}
