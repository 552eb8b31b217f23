//! MiMC-7 round constants.
//!
//! `c[0] = 0` and `c[i] = keccak256^i(SEED)` read big-endian and reduced
//! mod `p`. The keccak chain runs over the raw 32-byte digests, so only the
//! stored constants are reduced.

use std::sync::OnceLock;

use ark_bn254::Fr;
use ark_ff::Zero;
use num_bigint::BigUint;
use sha3::{Digest, Keccak256};

use crate::field::normalize_unsigned;

/// Number of rounds.
pub const NUM_ROUNDS: usize = 91;

/// Seed of the keccak constant chain.
pub const SEED: &[u8] = b"mimc";

pub fn round_constants() -> &'static [Fr; NUM_ROUNDS] {
    static CONSTANTS: OnceLock<[Fr; NUM_ROUNDS]> = OnceLock::new();
    CONSTANTS.get_or_init(|| {
        let mut constants = [Fr::zero(); NUM_ROUNDS];
        let mut digest = Keccak256::digest(SEED);

        for c in constants.iter_mut().skip(1) {
            digest = Keccak256::digest(digest);
            *c = normalize_unsigned(&BigUint::from_bytes_be(&digest));
        }

        constants
    })
}

#[cfg(test)]
mod const_tests {
    use super::*;
    use ark_ff::MontFp;

    #[test]
    fn test_first_constants() {
        let c = round_constants();
        assert!(c[0].is_zero());

        let c1: Fr =
            MontFp!("20888961410941983456478427210666206549300505294776164667214940546594746570981");
        assert_eq!(c[1], c1);
    }

    #[test]
    fn test_constants_are_distinct() {
        let c = round_constants();
        for i in 1..NUM_ROUNDS {
            for j in (i + 1)..NUM_ROUNDS {
                assert_ne!(c[i], c[j], "c[{}] == c[{}]", i, j);
            }
        }
    }
}
