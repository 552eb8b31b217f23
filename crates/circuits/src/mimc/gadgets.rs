//! MiMC-7 R1CS gadgets.

use ark_bn254::Fr;
use ark_r1cs_std::{fields::fp::FpVar, prelude::*};
use ark_relations::r1cs::SynthesisError;

use super::constants::round_constants;

/// `t^7` in-circuit (4 constraints).
fn pow7_var(t: &FpVar<Fr>) -> Result<FpVar<Fr>, SynthesisError> {
    let t2 = t.square()?;
    let t4 = t2.square()?;
    let t6 = &t4 * &t2;
    Ok(&t6 * t)
}

/// MiMC-7 keyed hash in-circuit.
pub fn mimc7_hash_var(x: &FpVar<Fr>, k: &FpVar<Fr>) -> Result<FpVar<Fr>, SynthesisError> {
    let mut r = FpVar::<Fr>::zero();

    for (i, c) in round_constants().iter().enumerate() {
        let t = if i == 0 { x + k } else { &r + k + *c };
        r = pow7_var(&t)?;
    }

    Ok(r + k)
}
