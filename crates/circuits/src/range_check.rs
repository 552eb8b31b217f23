//! Bit-width checks for values packed into the commitment seed.
//!
//! In a prime field nothing stops a prover from supplying a value that
//! overlaps the next bit range of the seed layout. Decomposing into
//! canonical bits and forcing the high bits to zero pins every packed
//! component to its slot.

use ark_ff::PrimeField;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::SynthesisError;

/// Enforce that `value < 2^num_bits` and return its low `num_bits` bits,
/// least significant first.
pub fn enforce_bit_width<F: PrimeField>(
    value: &FpVar<F>,
    num_bits: usize,
) -> Result<Vec<Boolean<F>>, SynthesisError> {
    let mut bits = value.to_bits_le()?;

    for bit in bits.iter().skip(num_bits) {
        bit.enforce_equal(&Boolean::FALSE)?;
    }

    bits.truncate(num_bits);
    Ok(bits)
}

/// Pack little-endian bits into a field element.
pub fn pack_bits_le<F: PrimeField>(bits: &[Boolean<F>]) -> FpVar<F> {
    let mut acc = FpVar::<F>::zero();
    let mut coeff = F::one();

    for bit in bits {
        acc += FpVar::from(bit.clone()) * coeff;
        coeff.double_in_place();
    }

    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_relations::r1cs::ConstraintSystem;
    use std::ops::Neg;

    #[test]
    fn test_width_valid() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let value = FpVar::new_witness(cs.clone(), || Ok(Fr::from(u64::MAX))).unwrap();

        let bits = enforce_bit_width(&value, 64).unwrap();

        assert_eq!(bits.len(), 64);
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_width_exceeded() {
        let cs = ConstraintSystem::<Fr>::new_ref();

        // 2^64 needs 65 bits
        let two_64 = Fr::from(u64::MAX) + Fr::from(1u64);
        let value = FpVar::new_witness(cs.clone(), || Ok(two_64)).unwrap();

        enforce_bit_width(&value, 64).unwrap();

        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_width_wrapped_value() {
        let cs = ConstraintSystem::<Fr>::new_ref();

        // p - 5 is a huge canonical value
        let value = FpVar::new_witness(cs.clone(), || Ok(Fr::from(5u64).neg())).unwrap();

        enforce_bit_width(&value, 160).unwrap();

        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_pack_roundtrip() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let value = FpVar::new_witness(cs.clone(), || Ok(Fr::from(0xdead_beefu64))).unwrap();

        let bits = enforce_bit_width(&value, 32).unwrap();
        let packed = pack_bits_le(&bits);

        assert_eq!(packed.value().unwrap(), Fr::from(0xdead_beefu64));
        assert!(cs.is_satisfied().unwrap());
    }
}
