// Copyright 2020-2026 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

//! Fiat-Shamir challenge derivation.
//!
//! The challenge k is sampled from a SHA-256 based stream keyed by the proof
//! transcript. Each attempt produces a 384-byte candidate made of 12 digests
//!
//! ```text
//! SHA256(be64(counter) || seed), counter = 1, 2, 3, ...
//! ```
//!
//! with the counter advancing once per digest and never reset between
//! attempts. The top bit of the candidate is cleared so that it has at most
//! 3071 bits, the size of q. A candidate y is accepted iff y < bound.
//!
//! This is rejection sampling. For the deployed q, which is slightly above
//! 2^3070, a candidate is accepted with probability about 1/2, so the expected
//! number of attempts is about 2 and the chance of needing more than 64 is
//! below 2^-64.

use num_bigint::BigUint;
use sha2::{Digest, Sha256};
use tracing::trace;

/// Number of SHA-256 digests concatenated into one candidate.
pub const DIGESTS_PER_CANDIDATE: usize = 12;

/// Candidate length in bytes (12 * 32 = 384).
pub const CANDIDATE_LEN: usize = DIGESTS_PER_CANDIDATE * 32;

/// Deterministic challenge stream for a single transcript.
pub struct ChallengeDeriver<'a> {
    seed: &'a [u8],
    counter: u64,
    attempts: usize,
}

impl<'a> ChallengeDeriver<'a> {
    pub fn new(seed: &'a [u8]) -> Self {
        ChallengeDeriver {
            seed,
            counter: 1,
            attempts: 0,
        }
    }

    /// Produce the next 3071-bit candidate of the stream.
    pub fn next_candidate(&mut self) -> BigUint {
        let mut block = Vec::with_capacity(CANDIDATE_LEN);
        for _ in 0..DIGESTS_PER_CANDIDATE {
            let mut hasher = Sha256::new();
            hasher.update(self.counter.to_be_bytes());
            hasher.update(self.seed);
            block.extend_from_slice(&hasher.finalize());
            self.counter += 1;
        }
        block[0] &= 0x7F;
        self.attempts += 1;
        BigUint::from_bytes_be(&block)
    }

    /// Sample the first candidate below `bound`.
    ///
    /// `bound` must exceed 2^3069 or so for the loop to terminate in
    /// reasonable time; the group order does.
    pub fn derive(&mut self, bound: &BigUint) -> BigUint {
        loop {
            let candidate = self.next_candidate();
            if candidate < *bound {
                trace!(attempts = self.attempts, "challenge accepted");
                return candidate;
            }
        }
    }

    /// Number of candidates drawn so far.
    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

/// Derive the challenge for `seed`, uniformly distributed in `[0, bound)`.
pub fn derive_challenge(seed: &[u8], bound: &BigUint) -> BigUint {
    ChallengeDeriver::new(seed).derive(bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::ModpGroup;
    use num_traits::One;

    const ABC_CHALLENGE: &[u8] = b"\
        698bc483cc6af9ccf82bc23e481a128c12818251d9d359a7b560dcabfd7909d6\
        290a3daa9b49526a2ed7352cd7f5e69c551a01e15de61fc04c43f780d7172b71\
        c3494ca1a2cf8eeb8a11ded316fb55b83c3bbbedb6313cd50415251e5d09e12f\
        b78d46ef5f49900b65ae93478cae328f97f20883ac7b4efea29eb62654610169\
        a615ca5963f8a6db99bbb3d1b02a505a534bf8a6e86749a2cbc86085b3ab41e6\
        03b4dce5c0343d04779b8519e711cd2fc6541b2b10d94b000f1decf0d2a43af3\
        6b4b627b3d8f81c56f4424005476cc2b983ac3c50e2a403f9c4baa2f1a382b11\
        4d606eb722f3cf8e3ce69c4b62a24e226a40e6ab1ad029c6d772589545cd2ac2\
        26e1b3490d9fed5056f59fba115e091c37e2caffaece76dbfa5851e309821221\
        94aa93629b650b55988088f73f74da3fe31cc9a1ab683ebd9805723934198dc3\
        7f90deed7777d348bae6817ea37107a548e86dcf35c73b7c6f53953512a81e7e\
        80568f59fb1dbb81c1e56b1564c98789121ca17f7bfa8530378301b87c8eb179";

    #[test]
    fn test_known_answer() {
        let group = ModpGroup::get();
        let expected = BigUint::parse_bytes(ABC_CHALLENGE, 16).unwrap();
        let mut deriver = ChallengeDeriver::new(b"abc");
        assert_eq!(deriver.derive(group.order()), expected);
        assert_eq!(deriver.attempts(), 1);
    }

    #[test]
    fn test_first_candidate_layout() {
        let mut deriver = ChallengeDeriver::new(b"abc");
        let candidate = deriver.next_candidate();

        let mut hasher = Sha256::new();
        hasher.update(1_u64.to_be_bytes());
        hasher.update(b"abc");
        let first_digest = hasher.finalize();

        let mut bytes = candidate.to_bytes_be();
        // leading zero bytes are dropped by to_bytes_be
        while bytes.len() < CANDIDATE_LEN {
            bytes.insert(0, 0);
        }
        assert_eq!(bytes[0], first_digest[0] & 0x7F);
        assert_eq!(&bytes[1..32], &first_digest[1..]);
    }

    #[test]
    fn test_rejected_candidates_advance_counter() {
        // With a tighter bound the first three candidates are rejected
        let bound = BigUint::one() << 3069_usize;
        let mut deriver = ChallengeDeriver::new(b"abc");
        let k = deriver.derive(&bound);
        assert!(k < bound);
        assert_eq!(deriver.attempts(), 4);
        assert!(k
            .to_str_radix(16)
            .starts_with("1de6f45de26bf83a536bcad80932113f36e2ac"));
    }

    #[test]
    fn test_candidate_fits_3071_bits() {
        let mut deriver = ChallengeDeriver::new(b"bits");
        for _ in 0..16 {
            assert!(deriver.next_candidate().bits() <= 3071);
        }
    }

    #[test]
    fn test_deterministic_and_bounded() {
        let group = ModpGroup::get();
        for seed in [&b""[..], b"abc", b"DECRYPTION", &[0u8; 1000]] {
            let k1 = derive_challenge(seed, group.order());
            let k2 = derive_challenge(seed, group.order());
            assert_eq!(k1, k2);
            assert!(k1 < *group.order());
        }
        assert_ne!(
            derive_challenge(b"abc", group.order()),
            derive_challenge(b"abd", group.order())
        );
    }
}
