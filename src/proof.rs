// Copyright 2020-2026 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

//! Non-interactive proof of correct ElGamal decryption.
//!
//! This module implements the verifier side of the Chaum-Pedersen protocol
//! DLEQ(g, h, u, v/m): the prover knows x with h = g^x and shows that the same
//! x satisfies v/m = u^x, i.e. that (u, v) decrypts to m under h, without
//! revealing x.
//!
//! # Chaum and Pedersen Scheme (decryption variant)
//!
//! - The prover picks w ∈ R Zq and commits to a = u^w and b = g^w
//! - The challenge k is derived from the transcript (Fiat-Shamir)
//! - The prover responds with s = w + kx (mod q)
//! - The verifier checks that u^s = a * (v/m)^k and g^s = b * h^k (mod p)

use num_bigint::BigUint;
use tracing::debug;

use crate::challenge::derive_challenge;
use crate::codec::{self, Ciphertext, PublicKey};
use crate::encoding::encode_message;
use crate::error::Result;
use crate::group::ModpGroup;
use crate::transcript::decryption_transcript;

/// Outcome of checking one proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Valid,
    Invalid,
}

impl Verdict {
    pub fn is_valid(self) -> bool {
        self == Verdict::Valid
    }
}

impl From<bool> for Verdict {
    fn from(valid: bool) -> Self {
        if valid {
            Verdict::Valid
        } else {
            Verdict::Invalid
        }
    }
}

// ============================================================================
// Internal Verifier Structure
// ============================================================================

/// Internal verifier structure for decryption proof verification
struct Verifier {}

impl Verifier {
    /// Recompute the prover's challenge k from the transcript
    fn challenge(
        group: &ModpGroup,
        key: &PublicKey,
        ciphertext: &Ciphertext,
        message: &[u8],
        proof: &DecryptionProof,
    ) -> Result<BigUint> {
        let seed =
            decryption_transcript(key, ciphertext, message, &proof.a, &proof.b)?;
        Ok(derive_challenge(&seed, group.order()))
    }

    /// Check u^s = a * (v/m)^k and g^s = b * h^k (mod p)
    fn check(
        group: &ModpGroup,
        key: &PublicKey,
        ciphertext: &Ciphertext,
        m: &BigUint,
        proof: &DecryptionProof,
        k: &BigUint,
    ) -> bool {
        let m_inverse = match group.element_inverse(m) {
            Some(inverse) => inverse,
            None => return false,
        };

        // u^s
        let us = group.exp(&ciphertext.u, &proof.s);
        // a * (v/m)^k
        let v_over_m = group.mul(&ciphertext.v, &m_inverse);
        let r = group.mul(&proof.a, &group.exp(&v_over_m, k));

        // g^s
        let gs = group.exp(group.generator(), &proof.s);
        // b * h^k
        let t = group.mul(&proof.b, &group.exp(&key.h, k));

        us == r && gs == t
    }
}

// ============================================================================
// Decryption Proof Structure
// ============================================================================

/// Proof that a ciphertext decrypts to a claimed plaintext.
///
/// `a` and `b` are the prover's commitments, `s` the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptionProof {
    pub a: BigUint,
    pub b: BigUint,
    pub s: BigUint,
}

impl DecryptionProof {
    pub fn new(a: BigUint, b: BigUint, s: BigUint) -> Self {
        DecryptionProof { a, b, s }
    }

    /// Decode `SEQUENCE { a INTEGER, b INTEGER, s INTEGER }`.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let fields =
            codec::sequence(codec::parse_single(der, "proof")?, "proof", 3)?;
        Ok(DecryptionProof {
            a: codec::integer(&fields[0], "a")?,
            b: codec::integer(&fields[1], "b")?,
            s: codec::integer(&fields[2], "s")?,
        })
    }

    /// Verify that `ciphertext` decrypts to `message` under `key`.
    ///
    /// Errors only when the message cannot be encoded; a wrong proof is
    /// [`Verdict::Invalid`].
    pub fn verify(
        &self,
        group: &ModpGroup,
        key: &PublicKey,
        ciphertext: &Ciphertext,
        message: &[u8],
    ) -> Result<Verdict> {
        let m = encode_message(group, message)?;
        self.verify_encoded(group, key, ciphertext, message, &m)
    }

    /// Same as [`DecryptionProof::verify`] with the message already encoded
    /// as the group element `m`.
    pub fn verify_encoded(
        &self,
        group: &ModpGroup,
        key: &PublicKey,
        ciphertext: &Ciphertext,
        message: &[u8],
        m: &BigUint,
    ) -> Result<Verdict> {
        // (0, 0) would satisfy the first equation for every message
        let elements = [&key.h, &ciphertext.u, &ciphertext.v, &self.a, &self.b];
        if !elements.iter().all(|x| group.is_element(x)) {
            debug!("proof refers to a value outside [1, p)");
            return Ok(Verdict::Invalid);
        }

        let k = Verifier::challenge(group, key, ciphertext, message, self)?;
        Ok(Verifier::check(group, key, ciphertext, m, self, &k).into())
    }
}

// ============================================================================
// Tests
// ============================================================================
