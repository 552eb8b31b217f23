//! MiMC-7 keyed hash for BN254.
//!
//! This is the round hash that stretches each permuted path point into a
//! chain of bucket hashes. It matches circomlib's `MiMC7(91)` so that
//! commitments computed here agree with circom reveal circuits.

mod constants;
mod gadgets;
mod native;


pub use constants::{round_constants, NUM_ROUNDS};
pub use gadgets::mimc7_hash_var;
pub use native::{mimc7_hash, pow7, Mimc7};
