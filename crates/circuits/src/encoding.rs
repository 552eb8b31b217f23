//! Positional encoding, seed layout and bucket derivation.
//!
//! Seed layout (254 bits, least significant first):
//!
//! | bits      | content                       |
//! |-----------|-------------------------------|
//! | 0..64     | encoded position `x + y * w`  |
//! | 64..224   | owner identity `pk`           |
//! | 224..254  | low 30 bits of the salt       |

use ark_bn254::Fr;
use ark_ff::Field;
use ark_r1cs_std::{fields::fp::FpVar, prelude::*};
use ark_relations::r1cs::SynthesisError;
use num_bigint::BigUint;

use crate::error::CommitError;
use crate::field::{low_bits_le, normalize_unsigned, to_biguint};
use crate::range_check::enforce_bit_width;

pub const POSITION_BITS: usize = 64;
pub const IDENTITY_BITS: usize = 160;
/// Only 30 of the salt's 32 bits fit into the 254-bit seed.
pub const SEED_SALT_BITS: usize = 30;

/// Bits of a round hash used as the bucket index.
pub const BUCKET_BITS: usize = 8;
/// Number of Bloom buckets.
pub const BUCKETS: usize = 1 << BUCKET_BITS;

/// A cell on the square game map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GridPosition {
    pub x: u32,
    pub y: u32,
}

impl GridPosition {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Row-major linear index `x + y * map_width`.
pub fn encode_position(position: GridPosition, map_width: u32) -> Result<u64, CommitError> {
    if map_width == 0 {
        return Err(CommitError::InvalidMapWidth);
    }
    if position.x >= map_width || position.y >= map_width {
        return Err(CommitError::CoordinateOutOfRange {
            x: position.x,
            y: position.y,
            map_width,
        });
    }

    Ok(u64::from(position.x) + u64::from(position.y) * u64::from(map_width))
}

/// Reject identities wider than the 160-bit seed slot.
pub fn check_identity(pk: &Fr) -> Result<(), CommitError> {
    if to_biguint(pk).bits() > IDENTITY_BITS as u64 {
        return Err(CommitError::IdentityTooWide(IDENTITY_BITS));
    }
    Ok(())
}

/// Build the per-point seed fed to the permutation.
pub fn concatenate_bits(position: u64, pk: &Fr, salt: &Fr) -> Result<Fr, CommitError> {
    check_identity(pk)?;

    let salt_mask = (BigUint::from(1u8) << SEED_SALT_BITS) - 1u8;
    let salt_low = to_biguint(salt) & salt_mask;

    let seed = BigUint::from(position)
        | (to_biguint(pk) << POSITION_BITS)
        | (salt_low << (POSITION_BITS + IDENTITY_BITS));

    Ok(normalize_unsigned(&seed))
}

/// First eight bits (little-endian) of a round hash.
pub fn bucket_index(hash: &Fr) -> u8 {
    low_bits_le(hash, BUCKET_BITS)
        .iter()
        .rev()
        .fold(0u8, |acc, bit| (acc << 1) | u8::from(*bit))
}

/// `2^k` as a field element.
fn power_of_two(k: usize) -> Fr {
    Fr::from(2u64).pow([k as u64])
}

/// In-circuit seed.
///
/// `position` is range-checked to its slot here. `pk` must already be
/// constrained to 160 bits by the caller, and `salt_bits` must be the
/// canonical little-endian decomposition of the salt.
pub fn concatenate_bits_var(
    position: &FpVar<Fr>,
    pk: &FpVar<Fr>,
    salt_bits: &[Boolean<Fr>],
) -> Result<FpVar<Fr>, SynthesisError> {
    enforce_bit_width(position, POSITION_BITS)?;

    let mut seed = position + pk * power_of_two(POSITION_BITS);

    let salt_offset = POSITION_BITS + IDENTITY_BITS;
    for (i, bit) in salt_bits.iter().take(SEED_SALT_BITS).enumerate() {
        seed += FpVar::from(bit.clone()) * power_of_two(salt_offset + i);
    }

    Ok(seed)
}

/// In-circuit bucket index bits of a round hash.
pub fn bucket_bits_var(hash: &FpVar<Fr>) -> Result<Vec<Boolean<Fr>>, SynthesisError> {
    let mut bits = hash.to_bits_le()?;
    bits.truncate(BUCKET_BITS);
    Ok(bits)
}

/// Expand index bits into a one-hot vector of `2^bits.len()` selectors,
/// all gated by `enable`.
///
/// After absorbing bit `k`, selector `j` is set iff the low `k + 1` index
/// bits spell `j`.
pub fn one_hot_var(
    bits: &[Boolean<Fr>],
    enable: &Boolean<Fr>,
) -> Result<Vec<Boolean<Fr>>, SynthesisError> {
    let mut selectors = vec![enable.clone()];

    for bit in bits {
        let not_bit = bit.not();
        let mut next = Vec::with_capacity(selectors.len() * 2);
        for s in &selectors {
            next.push(s.and(&not_bit)?);
        }
        for s in &selectors {
            next.push(s.and(bit)?);
        }
        selectors = next;
    }

    Ok(selectors)
}
