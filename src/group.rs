// Copyright 2020-2026 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

//! MODP group of the deployed election system.
//!
//! Every ciphertext, public key and proof checked by this crate lives in the
//! order-q subgroup of Z_p^* for the RFC 3526 3072-bit safe prime p, with the
//! generator g = 2. The parameters are a process-wide constant: they are built
//! once on first use and shared by reference by every verification task.

use num_bigint::BigUint;
use num_traits::identities::{One, Zero};
use std::sync::OnceLock;

use crate::util::Util;

/// 3072-bit MODP Group from RFC 3526 (Group ID 15)
///
/// # Group Parameters
/// - `p`: Safe prime (3072-bit), the group modulus
/// - `q`: Sophie Germain prime = (p-1)/2, the subgroup order
/// - `g`: Generator = 2 of the order-q subgroup
///
/// The prime is: 2^3072 - 2^3008 - 1 + 2^64 * { [2^2942 pi] + 1690314 }
///
/// Its hexadecimal value is:
///
///    FFFFFFFF FFFFFFFF C90FDAA2 2168C234 C4C6628B 80DC1CD1
///    29024E08 8A67CC74 020BBEA6 3B139B22 514A0879 8E3404DD
///    EF9519B3 CD3A431B 302B0A6D F25F1437 4FE1356D 6D51C245
///    E485B576 625E7EC6 F44C42E9 A637ED6B 0BFF5CB6 F406B7ED
///    EE386BFB 5A899FA5 AE9F2411 7C4B1FE6 49286651 ECE45B3D
///    C2007CB8 A163BF05 98DA4836 1C55D39A 69163FA8 FD24CF5F
///    83655D23 DCA3AD96 1C62F356 208552BB 9ED52907 7096966D
///    670C354E 4ABC9804 F1746C08 CA18217C 32905E46 2E36CE3B
///    E39E772C 180E8603 9B2783A2 EC07A28F B5C55DF0 6F4C52C9
///    DE2BCBF6 95581718 3995497C EA956AE5 15D22618 98FA0510
///    15728E5A 8AAAC42D AD33170D 04507A33 A85521AB DF1CBA64
///    ECFB8504 58DBEF0A 8AEA7157 5D060C7D B3970F85 A6E1E4C7
///    ABF5AE8C DB0933D7 1E8C94E0 4A25619D CEE3D226 1AD2EE6B
///    F12FFA06 D98A0864 D8760273 3EC86A64 521F2B18 177B200C
///    BBE11757 7A615D6C 770988C0 BAD946E2 08E24FA0 74E5AB31
///    43DB5BFC E0FD108E 4B82D120 A93AD2CA FFFFFFFF FFFFFFFF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModpGroup {
    p: BigUint,
    q: BigUint,
    g: BigUint,
}

static RFC3526_3072: OnceLock<ModpGroup> = OnceLock::new();

impl ModpGroup {
    /// The shared group instance. Initialized on first call.
    pub fn get() -> &'static ModpGroup {
        RFC3526_3072.get_or_init(ModpGroup::rfc3526_3072)
    }

    fn rfc3526_3072() -> Self {
        let p = BigUint::parse_bytes(
            b"ffffffffffffffffc90fdaa22168c234c4c6628b80dc1cd129024e088a67cc74\
              020bbea63b139b22514a08798e3404ddef9519b3cd3a431b302b0a6df25f1437\
              4fe1356d6d51c245e485b576625e7ec6f44c42e9a637ed6b0bff5cb6f406b7ed\
              ee386bfb5a899fa5ae9f24117c4b1fe649286651ece45b3dc2007cb8a163bf05\
              98da48361c55d39a69163fa8fd24cf5f83655d23dca3ad961c62f356208552bb\
              9ed529077096966d670c354e4abc9804f1746c08ca18217c32905e462e36ce3b\
              e39e772c180e86039b2783a2ec07a28fb5c55df06f4c52c9de2bcbf695581718\
              3995497cea956ae515d2261898fa051015728e5a8aaac42dad33170d04507a33\
              a85521abdf1cba64ecfb850458dbef0a8aea71575d060c7db3970f85a6e1e4c7\
              abf5ae8cdb0933d71e8c94e04a25619dcee3d2261ad2ee6bf12ffa06d98a0864\
              d87602733ec86a64521f2b18177b200cbbe117577a615d6c770988c0bad946e2\
              08e24fa074e5ab3143db5bfce0fd108e4b82d120a93ad2caffffffffffffffff",
            16,
        )
        .expect("RFC 3526 prime is valid hex");
        // p = 2q + 1
        let q = (&p - BigUint::one()) >> 1_usize;

        ModpGroup {
            p,
            q,
            g: BigUint::from(2_u32),
        }
    }

    /// Get the safe prime modulus p
    pub fn modulus(&self) -> &BigUint {
        &self.p
    }

    /// Get the subgroup order q (Sophie Germain prime)
    pub fn order(&self) -> &BigUint {
        &self.q
    }

    /// Get the subgroup generator g
    pub fn generator(&self) -> &BigUint {
        &self.g
    }

    /// Byte length of the modulus (384 for the 3072-bit group)
    pub fn modulus_len(&self) -> usize {
        self.p.bits().div_ceil(8) as usize
    }

    pub fn exp(&self, base: &BigUint, exponent: &BigUint) -> BigUint {
        base.modpow(exponent, &self.p)
    }

    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.p
    }

    /// x^(-1) mod p, `None` for x ≡ 0
    pub fn element_inverse(&self, x: &BigUint) -> Option<BigUint> {
        Util::mod_inverse(x, &self.p)
    }

    /// Whether `x` is a canonical nonzero residue, i.e. 1 <= x < p.
    pub fn is_element(&self, x: &BigUint) -> bool {
        !x.is_zero() && x < &self.p
    }

    /// Euler's criterion: x lies in the order-q subgroup iff x^q ≡ 1 (mod p).
    pub fn is_quadratic_residue(&self, x: &BigUint) -> bool {
        self.exp(x, &self.q).is_one()
    }
}
