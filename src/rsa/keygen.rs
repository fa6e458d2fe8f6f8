// RSA Key Generation
// Draws an odd public exponent, searches two probable primes below it and inverts
// the exponent modulo the totient

use std::fmt;
use std::str::FromStr;

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::Zero;
use rand::rngs::OsRng;
use rand::{CryptoRng, Rng};
use tracing::{debug, info, warn};

use super::bigint::{bit_length, mod_inverse};
use super::primality::{is_probable_prime_with, DEFAULT_ROUNDS};
use crate::error::{Result, RsaError};

/// One half of a key pair: `(e, n)` for encryption or `(d, n)` for decryption.
///
/// Parses from and displays as `"<exponent> <modulus>"`, the form an operator
/// types to override a generated key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaKey {
    pub exponent: BigUint,
    pub modulus: BigUint,
}

impl RsaKey {
    pub fn new(exponent: BigUint, modulus: BigUint) -> Self {
        Self { exponent, modulus }
    }

    /// Bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        bit_length(&self.modulus)
    }
}

impl fmt::Display for RsaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.exponent, self.modulus)
    }
}

impl FromStr for RsaKey {
    type Err = RsaError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.len() != 2 {
            return Err(RsaError::InvalidKey(format!(
                "expected \"<exponent> <modulus>\", got {} value(s)",
                parts.len()
            )));
        }

        let parse = |part: &str, what: &str| {
            part.parse::<BigUint>()
                .map_err(|_| RsaError::InvalidKey(format!("{what} {part:?} is not a decimal integer")))
        };
        let exponent = parse(parts[0], "exponent")?;
        let modulus = parse(parts[1], "modulus")?;

        if modulus.is_zero() {
            return Err(RsaError::InvalidKey("modulus must be positive".to_string()));
        }

        Ok(Self { exponent, modulus })
    }
}

/// Generated key material `{n, e, d}` together with the primes behind `n`.
///
/// Immutable once built: every field is private and only readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    n: BigUint,
    e: BigUint,
    d: BigUint,
    p: BigUint,
    q: BigUint,
}

impl KeyMaterial {
    /// Build a key from chosen primes and public exponent.
    ///
    /// Used for operator-supplied parameters such as the textbook `p = 61,
    /// q = 53, e = 17`. The primes are not re-tested for primality.
    pub fn from_primes(p: BigUint, q: BigUint, e: BigUint) -> Result<Self> {
        let two = BigUint::from(2u8);
        if p < two || q < two {
            return Err(RsaError::InvalidPrimes("primes must be at least 2".to_string()));
        }
        if p == q {
            return Err(RsaError::InvalidPrimes("p and q must be distinct".to_string()));
        }
        if e.is_even() {
            return Err(RsaError::InvalidExponent(format!("{e} is even")));
        }

        candidate_from(e, p, q)
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn e(&self) -> &BigUint {
        &self.e
    }

    pub fn d(&self) -> &BigUint {
        &self.d
    }

    /// The primes `(p, q)` with `n = p * q`
    pub fn primes(&self) -> (&BigUint, &BigUint) {
        (&self.p, &self.q)
    }

    /// φ(n) = (p - 1)(q - 1)
    pub fn totient(&self) -> BigUint {
        totient(&self.p, &self.q)
    }

    /// `(e, n)` for encryption
    pub fn public_key(&self) -> RsaKey {
        RsaKey::new(self.e.clone(), self.n.clone())
    }

    /// `(d, n)` for decryption
    pub fn private_key(&self) -> RsaKey {
        RsaKey::new(self.d.clone(), self.n.clone())
    }
}

fn totient(p: &BigUint, q: &BigUint) -> BigUint {
    (p - 1u8) * (q - 1u8)
}

/// Configuration for key generation
#[derive(Clone, Debug)]
pub struct KeyGenConfig {
    /// Bits of the public exponent candidate; primes are drawn below it
    pub bit_length: u64,
    /// Miller-Rabin rounds per prime candidate
    pub rounds: u32,
    /// Full restarts (new exponent, new primes) before giving up
    pub max_attempts: u32,
    /// Random draws allowed for one prime pair search
    pub max_prime_draws: u64,
    /// Draws allowed to find an odd exponent
    pub max_exponent_draws: u32,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            bit_length: 128,
            rounds: DEFAULT_ROUNDS,
            max_attempts: 64,
            max_prime_draws: 100_000,
            max_exponent_draws: 1024,
        }
    }
}

impl KeyGenConfig {
    pub fn with_bit_length(mut self, bits: u64) -> Self {
        self.bit_length = bits;
        self
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_max_prime_draws(mut self, draws: u64) -> Self {
        self.max_prime_draws = draws;
        self
    }

    pub fn with_max_exponent_draws(mut self, draws: u32) -> Self {
        self.max_exponent_draws = draws;
        self
    }
}

/// Generate key material of `bit_length` bits with default settings
pub fn generate_key(bit_length: u64) -> Result<KeyMaterial> {
    generate(&KeyGenConfig::default().with_bit_length(bit_length))
}

/// Generate key material using the operating system CSPRNG
pub fn generate(config: &KeyGenConfig) -> Result<KeyMaterial> {
    generate_with(config, &mut OsRng)
}

/// Generate key material with a caller-supplied cryptographic RNG.
///
/// Each attempt draws a fresh exponent and a fresh prime pair. An attempt whose
/// exponent is not invertible modulo φ(n) is discarded as a whole.
pub fn generate_with<R>(config: &KeyGenConfig, rng: &mut R) -> Result<KeyMaterial>
where
    R: Rng + CryptoRng + ?Sized,
{
    let mut last_error = RsaError::InvalidExponent("no key generation attempt was made".to_string());

    for attempt in 1..=config.max_attempts {
        debug!(attempt, bits = config.bit_length, "starting key generation attempt");

        match generate_candidate(config, rng) {
            Ok(key) => {
                info!(
                    attempt,
                    modulus_bits = key.n.bits(),
                    e_bits = key.e.bits(),
                    d_bits = key.d.bits(),
                    "generated key material"
                );
                return Ok(key);
            }
            Err(e) => {
                warn!(attempt, error = %e, "discarding key candidate");
                last_error = e;
            }
        }
    }

    Err(last_error)
}

fn generate_candidate<R>(config: &KeyGenConfig, rng: &mut R) -> Result<KeyMaterial>
where
    R: Rng + CryptoRng + ?Sized,
{
    let e = draw_odd_exponent(config, rng)?;
    let (p, q) = find_primes(&e, config, rng)?;
    candidate_from(e, p, q)
}

/// Invert `e` modulo φ(n); a non-invertible `e` rejects the whole candidate.
fn candidate_from(e: BigUint, p: BigUint, q: BigUint) -> Result<KeyMaterial> {
    let phi = totient(&p, &q);
    let d = mod_inverse(&e, &phi)
        .ok_or_else(|| RsaError::InvalidExponent(format!("{e} is not coprime with φ(n) = {phi}")))?;

    Ok(KeyMaterial { n: &p * &q, e, d, p, q })
}

fn draw_odd_exponent<R>(config: &KeyGenConfig, rng: &mut R) -> Result<BigUint>
where
    R: Rng + CryptoRng + ?Sized,
{
    for _ in 0..config.max_exponent_draws {
        let e = rng.gen_biguint(config.bit_length);
        if e.is_odd() {
            return Ok(e);
        }
    }

    Err(RsaError::InvalidExponent(format!(
        "no odd {}-bit exponent after {} draws",
        config.bit_length, config.max_exponent_draws
    )))
}

/// Find distinct probable primes p, q in [0, e) with (p - 1)(q - 1) > e.
///
/// Both primes are redrawn on every pass; all draws count against one budget.
fn find_primes<R>(e: &BigUint, config: &KeyGenConfig, rng: &mut R) -> Result<(BigUint, BigUint)>
where
    R: Rng + CryptoRng + ?Sized,
{
    let mut draws = 0u64;

    loop {
        let p = draw_prime(e, None, config, rng, &mut draws)?;
        let q = draw_prime(e, Some(&p), config, rng, &mut draws)?;

        if totient(&p, &q) > *e {
            debug!(draws, "found prime pair");
            return Ok((p, q));
        }
    }
}

fn draw_prime<R>(
    bound: &BigUint,
    distinct_from: Option<&BigUint>,
    config: &KeyGenConfig,
    rng: &mut R,
    draws: &mut u64,
) -> Result<BigUint>
where
    R: Rng + CryptoRng + ?Sized,
{
    while *draws < config.max_prime_draws {
        *draws += 1;
        let candidate = rng.gen_biguint_below(bound);

        if distinct_from == Some(&candidate) {
            continue;
        }
        if is_probable_prime_with(&candidate, config.rounds, rng) {
            return Ok(candidate);
        }
    }

    Err(RsaError::PrimeSearchExhausted { draws: *draws })
}
