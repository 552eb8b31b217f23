//! Griffin-π permutation over BN254 with state width 3.
//!
//! Griffin is an arithmetization-oriented permutation whose S-box mixes a
//! 5th root, a 5th power and a quadratic "Horst" term across the three
//! lanes. This module provides:
//!
//! - Native permutation (for computing commitments outside circuits)
//! - R1CS gadgets (for recomputing them inside the reveal circuit)
//!
//! Reference: "Horst Meets Fluid-SPN: Griffin for Zero-Knowledge
//! Applications" (CRYPTO 2023), https://eprint.iacr.org/2022/403

mod constants;
mod gadgets;
mod native;

#[cfg(test)]
mod tests;

pub use constants::{NUM_ROUNDS, WIDTH};
pub use gadgets::{permutation_var, permute_sequence_var, pow5_var, pow_inv5_var};
pub use native::{
    pad_to_groups, permutation, permute_sequence, pow5, pow_inv5, GriffinError, GriffinState,
};
