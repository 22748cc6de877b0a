// Copyright 2020-2026 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

use num_bigint::{BigInt, BigUint, ToBigInt};
use num_integer::Integer;
use num_traits::identities::{One, Zero};

pub struct Util {}

impl Util {
    /// Finds the greatest common divisor of two integers *a* and *b*, and two
    /// integers *x* and *y* such that *ax* + *by* is the greatest common
    /// divisor of *a* and *b* (Bézout coefficients).
    ///
    /// This function is an iterative implementation of the [extended Euclidean
    /// algorithm](https://en.wikipedia.org/wiki/Extended_Euclidean_algorithm),
    /// so that 3072-bit operands do not recurse thousands of frames deep.
    pub fn extend_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
        let (mut old_r, mut r) = (a.clone(), b.clone());
        let (mut old_x, mut x) = (BigInt::one(), BigInt::zero());
        let (mut old_y, mut y) = (BigInt::zero(), BigInt::one());

        while !r.is_zero() {
            let quotient = old_r.div_floor(&r);
            let next_r = &old_r - &quotient * &r;
            old_r = std::mem::replace(&mut r, next_r);
            let next_x = &old_x - &quotient * &x;
            old_x = std::mem::replace(&mut x, next_x);
            let next_y = &old_y - &quotient * &y;
            old_y = std::mem::replace(&mut y, next_y);
        }
        (old_r, old_x, old_y)
    }

    /// Calculates the [modular multiplicative
    /// inverse](https://en.wikipedia.org/wiki/Modular_multiplicative_inverse) *x*
    /// of an integer *a* such that *ax* ≡ 1 (mod *m*).
    ///
    /// Such an integer may not exist. If so, this function will return `None`.
    pub fn mod_inverse(a: &BigUint, modular: &BigUint) -> Option<BigUint> {
        let a = a.to_bigint()?;
        let m = modular.to_bigint()?;
        let (g, x, _) = Util::extend_gcd(&a, &m);
        if !g.is_one() {
            return None;
        }
        x.mod_floor(&m).to_biguint()
    }
}
