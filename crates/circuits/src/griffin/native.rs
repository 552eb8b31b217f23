//! Native Griffin-π permutation over BN254.
//!
//! Round trace (13 states):
//! `s[0] = L(input)`, then `s[r + 1] = L(S(s[r] + RC[r]))` for `r = 0..12`.

use ark_bn254::Fr;
use ark_ff::{Field, Zero};
use thiserror::Error;

use super::constants::{inv_d, HORST_ALPHA, HORST_BETA, NUM_ROUNDS, ROUND_CONSTANTS, WIDTH};
use crate::field::{self, FieldError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GriffinError {
    #[error("fifth root round-trip failed: root^5 != input")]
    FifthRootMismatch,
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Griffin state: three field lanes.
pub type GriffinState = [Fr; WIDTH];

/// `x^5` by repeated squaring.
pub fn pow5(x: Fr) -> Fr {
    let x2 = x.square();
    let x4 = x2.square();
    x4 * x
}

/// `x^(1/5)`, verified by raising the result back to the 5th power.
pub fn pow_inv5(x: Fr) -> Result<Fr, GriffinError> {
    let root = field::pow(x, inv_d())?;

    if pow5(root) != x {
        return Err(GriffinError::FifthRootMismatch);
    }

    Ok(root)
}

/// Horst mixing term for lane 2.
fn horst(x: Fr, y0: Fr, y1: Fr) -> Fr {
    let u = y0 + y1;
    x * (u.square() + HORST_ALPHA * u + HORST_BETA)
}

fn apply_sbox(state: &mut GriffinState) -> Result<(), GriffinError> {
    state[0] = pow_inv5(state[0])?;
    state[1] = pow5(state[1]);
    state[2] = horst(state[2], state[0], state[1]);
    Ok(())
}

/// Circulant matrix `[[2,1,1],[1,2,1],[1,1,2]]`: each lane becomes
/// `sum + lane`.
fn apply_linear_layer(state: &mut GriffinState) {
    let sum = state[0] + state[1] + state[2];
    for lane in state.iter_mut() {
        *lane += sum;
    }
}

fn apply_round_constants(state: &mut GriffinState, round: usize) {
    for (lane, rc) in state.iter_mut().zip(ROUND_CONSTANTS[round].iter()) {
        *lane += rc;
    }
}

/// Execute the full permutation on one group of three lanes.
pub fn permutation(input: GriffinState) -> Result<GriffinState, GriffinError> {
    let mut state = input;
    apply_linear_layer(&mut state);

    for round in 0..NUM_ROUNDS {
        apply_round_constants(&mut state, round);
        apply_sbox(&mut state)?;
        apply_linear_layer(&mut state);
    }

    Ok(state)
}

/// Pad a sequence to a whole number of groups with zero lanes.
pub fn pad_to_groups(inputs: &[Fr]) -> Vec<Fr> {
    let mut padded = inputs.to_vec();
    let groups = inputs.len().div_ceil(WIDTH);
    padded.resize(groups * WIDTH, Fr::zero());
    padded
}

/// Permute a sequence three lanes at a time.
///
/// Every input slot is used; an incomplete last group is zero-padded and
/// the padding lanes are dropped from the output, which always has the
/// same length as `inputs`.
pub fn permute_sequence(inputs: &[Fr]) -> Result<Vec<Fr>, GriffinError> {
    let mut out = Vec::with_capacity(inputs.len() + WIDTH);

    for group in pad_to_groups(inputs).chunks_exact(WIDTH) {
        out.extend(permutation([group[0], group[1], group[2]])?);
    }

    out.truncate(inputs.len());
    Ok(out)
}
