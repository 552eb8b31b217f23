//! Griffin R1CS gadgets.
//!
//! The 5th root on lane 0 is witnessed and checked with `w^5 = x`, so each
//! round costs three multiplications per power map plus two for the Horst
//! polynomial.

use ark_bn254::Fr;
use ark_r1cs_std::{fields::fp::FpVar, prelude::*};
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use super::constants::{HORST_ALPHA, HORST_BETA, NUM_ROUNDS, ROUND_CONSTANTS, WIDTH};
use super::native::pow_inv5;

/// Griffin state as circuit variables.
pub type GriffinStateVar = [FpVar<Fr>; WIDTH];

/// `x^5` in-circuit (3 constraints).
pub fn pow5_var(x: &FpVar<Fr>) -> Result<FpVar<Fr>, SynthesisError> {
    let x2 = x.square()?;
    let x4 = x2.square()?;
    Ok(&x4 * x)
}

/// `x^(1/5)` in-circuit: witness `w` natively and enforce `w^5 = x`.
pub fn pow_inv5_var(
    cs: ConstraintSystemRef<Fr>,
    x: &FpVar<Fr>,
) -> Result<FpVar<Fr>, SynthesisError> {
    let w = FpVar::new_witness(cs, || {
        let x_val = x.value()?;
        pow_inv5(x_val).map_err(|_| SynthesisError::Unsatisfiable)
    })?;

    pow5_var(&w)?.enforce_equal(x)?;

    Ok(w)
}

fn apply_sbox_var(
    cs: ConstraintSystemRef<Fr>,
    state: &mut GriffinStateVar,
) -> Result<(), SynthesisError> {
    state[0] = pow_inv5_var(cs, &state[0])?;
    state[1] = pow5_var(&state[1])?;

    let u = &state[0] + &state[1];
    let mix = u.square()? + &u * HORST_ALPHA + FpVar::constant(HORST_BETA);
    state[2] = &state[2] * &mix;

    Ok(())
}

fn apply_linear_layer_var(state: &mut GriffinStateVar) {
    let sum = &state[0] + &state[1] + &state[2];
    for lane in state.iter_mut() {
        *lane = &*lane + &sum;
    }
}

fn apply_round_constants_var(state: &mut GriffinStateVar, round: usize) {
    for (lane, rc) in state.iter_mut().zip(ROUND_CONSTANTS[round].iter()) {
        *lane = &*lane + *rc;
    }
}

/// Execute the full permutation in-circuit.
pub fn permutation_var(
    cs: ConstraintSystemRef<Fr>,
    input: GriffinStateVar,
) -> Result<GriffinStateVar, SynthesisError> {
    let mut state = input;
    apply_linear_layer_var(&mut state);

    for round in 0..NUM_ROUNDS {
        apply_round_constants_var(&mut state, round);
        apply_sbox_var(cs.clone(), &mut state)?;
        apply_linear_layer_var(&mut state);
    }

    Ok(state)
}

/// Permute a sequence of variables three at a time, zero-padding the last
/// group. Output length equals input length.
pub fn permute_sequence_var(
    cs: ConstraintSystemRef<Fr>,
    inputs: &[FpVar<Fr>],
) -> Result<Vec<FpVar<Fr>>, SynthesisError> {
    let mut out = Vec::with_capacity(inputs.len() + WIDTH);

    for group in inputs.chunks(WIDTH) {
        let lane = |i: usize| group.get(i).cloned().unwrap_or_else(FpVar::<Fr>::zero);
        out.extend(permutation_var(cs.clone(), [lane(0), lane(1), lane(2)])?);
    }

    out.truncate(inputs.len());
    Ok(out)
}
