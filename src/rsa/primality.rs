// Miller-Rabin Primality Test
// Witnesses are drawn from the operating system CSPRNG

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::One;
use rand::rngs::OsRng;
use rand::{CryptoRng, Rng};

/// Rounds used for key generation; false positives stay below 4^-40
pub const DEFAULT_ROUNDS: u32 = 40;

/// Miller-Rabin primality test
/// Returns true if `candidate` passes every one of `rounds` rounds
pub fn is_probable_prime(candidate: &BigUint, rounds: u32) -> bool {
    is_probable_prime_with(candidate, rounds, &mut OsRng)
}

/// Miller-Rabin with a caller-supplied cryptographic RNG for the witnesses.
pub fn is_probable_prime_with<R>(candidate: &BigUint, rounds: u32, rng: &mut R) -> bool
where
    R: Rng + CryptoRng + ?Sized,
{
    let three = BigUint::from(3u8);

    if *candidate <= BigUint::one() || *candidate == BigUint::from(4u8) {
        return false;
    }
    if *candidate <= three {
        return true;
    }

    // candidate - 1 = d * 2^s with d odd
    let n_minus_one = candidate - 1u8;
    let mut d = n_minus_one.clone();
    while d.is_even() {
        d >>= 1;
    }

    for _ in 0..rounds {
        // candidate >= 5 here, so [3, candidate - 1) is never empty
        let a = rng.gen_biguint_range(&three, &n_minus_one);

        if !witness_round(candidate, &n_minus_one, &d, &a) {
            return false;
        }
    }

    true
}

/// One round against witness `a`. False means `a` proves the candidate composite.
fn witness_round(candidate: &BigUint, n_minus_one: &BigUint, d: &BigUint, a: &BigUint) -> bool {
    let mut x = a.modpow(d, candidate);

    if x.is_one() || x == *n_minus_one {
        return true;
    }

    let mut exponent = d.clone();
    while exponent != *n_minus_one {
        x = (&x * &x) % candidate;
        exponent <<= 1;

        if x.is_one() {
            return false;
        }
        if x == *n_minus_one {
            return true;
        }
    }

    false
}
