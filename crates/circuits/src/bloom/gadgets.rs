//! Bloom commitment R1CS gadget.
//!
//! The circuit works over a fixed number of slots. Each slot carries an
//! `active` flag; an inactive slot feeds a zero seed into the permutation
//! (the same zero padding the native builder uses) and its one-hot bucket
//! selectors are all gated off, so it never sets a bit.

use ark_bn254::Fr;
use ark_r1cs_std::{fields::fp::FpVar, prelude::*};
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use crate::encoding::{
    bucket_bits_var, concatenate_bits_var, one_hot_var, BUCKETS, IDENTITY_BITS,
};
use crate::griffin::permute_sequence_var;
use crate::hash_chain::hash_chain_var;
use crate::range_check::{enforce_bit_width, pack_bits_le};

/// Half of the 256-bit commitment, sized to fit a field element.
pub const LIMB_BITS: usize = 128;

/// In-circuit commitment bits, least significant first.
pub struct BloomCommitmentVar {
    bits: Vec<Boolean<Fr>>,
}

impl BloomCommitmentVar {
    pub fn bits(&self) -> &[Boolean<Fr>] {
        &self.bits
    }

    /// Pack into the `(lo, hi)` field limbs exposed as public inputs.
    pub fn to_field_limbs(&self) -> [FpVar<Fr>; 2] {
        [
            pack_bits_le(&self.bits[..LIMB_BITS]),
            pack_bits_le(&self.bits[LIMB_BITS..]),
        ]
    }
}

/// Recompute the commitment over fixed slots.
///
/// `positions` and `active` must have the same length. The caller is
/// responsible for constraining `active` to a prefix shape.
pub fn bloom_commitment_var(
    cs: ConstraintSystemRef<Fr>,
    positions: &[FpVar<Fr>],
    active: &[Boolean<Fr>],
    pk: &FpVar<Fr>,
    salt: &FpVar<Fr>,
    rounds: usize,
) -> Result<BloomCommitmentVar, SynthesisError> {
    if positions.len() != active.len() {
        return Err(SynthesisError::Unsatisfiable);
    }

    enforce_bit_width(pk, IDENTITY_BITS)?;
    let salt_bits = salt.to_bits_le()?;

    let mut seeds = Vec::with_capacity(positions.len());
    for (position, is_active) in positions.iter().zip(active) {
        let seed = concatenate_bits_var(position, pk, &salt_bits)?;
        seeds.push(seed * FpVar::from(is_active.clone()));
    }

    let permuted = permute_sequence_var(cs, &seeds)?;

    // Every (slot, round) pair contributes one selector per bucket.
    let mut hits: Vec<Vec<Boolean<Fr>>> = vec![Vec::new(); BUCKETS];
    for (g, is_active) in permuted.iter().zip(active) {
        for h in hash_chain_var(g, salt, rounds)? {
            let index = bucket_bits_var(&h)?;
            for (bucket, selector) in hits.iter_mut().zip(one_hot_var(&index, is_active)?) {
                bucket.push(selector);
            }
        }
    }

    let bits = hits
        .iter()
        .map(|bucket| {
            if bucket.is_empty() {
                Ok(Boolean::FALSE)
            } else {
                Boolean::kary_or(bucket)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BloomCommitmentVar { bits })
}
