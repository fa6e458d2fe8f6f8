// RSA Big Integer Operations
// Euclid, extended Euclid and block sizing over num-bigint

use num_bigint::{BigInt, BigUint, ToBigInt};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

/// Greatest common divisor by the iterative Euclidean algorithm.
///
/// The result is always non-negative, and `gcd(a, 0) == |a|`.
pub fn gcd(a: &BigInt, b: &BigInt) -> BigInt {
    let mut a = a.clone();
    let mut b = b.clone();

    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }

    a.abs()
}

/// Extended Euclidean Algorithm
/// Returns (g, s, t) such that a*s + b*t = g
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut r, mut r1) = (a.clone(), b.clone());
    let (mut s, mut s1) = (BigInt::one(), BigInt::zero());
    let (mut t, mut t1) = (BigInt::zero(), BigInt::one());

    while !r1.is_zero() {
        let q = r.div_floor(&r1);

        let next_r = &r - &q * &r1;
        r = std::mem::replace(&mut r1, next_r);

        let next_s = &s - &q * &s1;
        s = std::mem::replace(&mut s1, next_s);

        let next_t = &t - &q * &t1;
        t = std::mem::replace(&mut t1, next_t);
    }

    (r, s, t)
}

/// Compute modular inverse: a^(-1) mod m
/// Returns None if gcd(a, m) != 1
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if m.is_zero() {
        return None;
    }

    let a = a.to_bigint()?;
    let m = m.to_bigint()?;
    let (g, s, _) = extended_gcd(&a, &m);

    if !g.is_one() {
        return None;
    }

    // mod_floor keeps the inverse in [0, m) even when s is negative
    s.mod_floor(&m).to_biguint()
}

/// Number of significant bits in `n` (0 for zero)
pub fn bit_length(n: &BigUint) -> u64 {
    n.bits()
}

/// Bytes per data block for modulus `n`: floor((bits(n) - 1) / 8).
///
/// Any block of this many bytes is strictly below `n`, since
/// 256^block_size <= 2^(bits(n) - 1) <= n. Moduli of 8 bits or fewer give 0.
pub fn block_size_for(n: &BigUint) -> usize {
    (bit_length(n).saturating_sub(1) / 8) as usize
}
