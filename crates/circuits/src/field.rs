//! Canonical BN254 scalar-field arithmetic.
//!
//! `Fr` values are always reduced into `[0, p)`. The helpers here are the
//! single entry point for anything that starts life as an unbounded or
//! signed integer (seed bit-strings, decoded API values, exponents) and
//! must be folded into the field.

use ark_bn254::Fr;
use ark_ff::{BigInteger, Field, PrimeField};
use num_bigint::{BigInt, BigUint, ParseBigIntError, Sign};
use num_traits::Num;
use thiserror::Error;

/// The BN254 scalar-field modulus in decimal.
pub const MODULUS_DECIMAL: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("negative exponent {0} is not supported")]
    NegativeExponent(BigInt),
}

/// The field modulus `p` as an arbitrary-precision integer.
pub fn modulus() -> BigUint {
    BigUint::from_bytes_le(&Fr::MODULUS.to_bytes_le())
}

/// Fold any integer into `[0, p)`: `((x mod p) + p) mod p`.
pub fn normalize(x: &BigInt) -> Fr {
    let magnitude = Fr::from_le_bytes_mod_order(&x.magnitude().to_bytes_le());
    match x.sign() {
        Sign::Minus => -magnitude,
        _ => magnitude,
    }
}

/// Fold an unsigned integer into `[0, p)`.
pub fn normalize_unsigned(x: &BigUint) -> Fr {
    normalize(&BigInt::from(x.clone()))
}

/// Parse a non-negative integer written in decimal or with a `0x`/`0X` hex
/// prefix.
pub fn parse_integer(value: &str) -> Result<BigUint, ParseBigIntError> {
    let trimmed = value.trim();
    match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => BigUint::from_str_radix(hex, 16),
        None => BigUint::from_str_radix(trimmed, 10),
    }
}

/// Square-and-multiply exponentiation by an arbitrary-precision exponent.
///
/// `exponent == 0` yields one (including `0^0`); a zero base with a positive
/// exponent yields zero.
pub fn pow(base: Fr, exponent: &BigInt) -> Result<Fr, FieldError> {
    if exponent.sign() == Sign::Minus {
        return Err(FieldError::NegativeExponent(exponent.clone()));
    }

    let limbs = exponent.magnitude().to_u64_digits();
    Ok(base.pow(limbs))
}

/// The canonical representative of `x` as an unsigned integer.
pub fn to_biguint(x: &Fr) -> BigUint {
    BigUint::from_bytes_le(&x.into_bigint().to_bytes_le())
}

/// Low `n` bits of `x`, least significant first.
pub fn low_bits_le(x: &Fr, n: usize) -> Vec<bool> {
    let mut bits = x.into_bigint().to_bits_le();
    bits.resize(n.max(bits.len()), false);
    bits.truncate(n);
    bits
}
