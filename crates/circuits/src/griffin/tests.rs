//! Integration tests for the Griffin permutation.

use super::native::{permutation, permute_sequence};
use super::gadgets::{permutation_var, permute_sequence_var};
use ark_bn254::Fr;
use ark_ff::{MontFp, Zero};
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::ConstraintSystem;

#[test]
fn test_permutation_zero_vector() {
    let expected: [Fr; 3] = [
        MontFp!("6811725544123677258715010994978221292549626337644906899230579715766156407315"),
        MontFp!("8966607880334968851591865616865262707684927105755123429938104371604226768476"),
        MontFp!("3286848289285532704827490048464592286920374142570313381620894165595111698776"),
    ];

    let out = permutation([Fr::zero(); 3]).unwrap();
    assert_eq!(out, expected);

    // Same input, same output
    assert_eq!(permutation([Fr::zero(); 3]).unwrap(), out);
}

#[test]
fn test_permutation_changes_every_lane() {
    let input = [Fr::from(1u64), Fr::from(2u64), Fr::from(3u64)];
    let out = permutation(input).unwrap();

    for i in 0..3 {
        assert_ne!(out[i], input[i]);
    }

    let other = permutation([Fr::from(1u64), Fr::from(2u64), Fr::from(4u64)]).unwrap();
    assert_ne!(out, other);
}

#[test]
fn test_sequence_uses_every_slot() {
    let inputs: Vec<Fr> = (1u64..=4).map(Fr::from).collect();
    let out = permute_sequence(&inputs).unwrap();

    assert_eq!(out.len(), 4);
    assert_eq!(&out[..3], &permutation([inputs[0], inputs[1], inputs[2]]).unwrap());

    // The fourth slot is permuted together with two zero lanes, not dropped.
    let last = permutation([inputs[3], Fr::zero(), Fr::zero()]).unwrap();
    assert_eq!(out[3], last[0]);
    assert_ne!(out[3], permutation([Fr::zero(); 3]).unwrap()[0]);
}

#[test]
fn test_sequence_empty() {
    assert!(permute_sequence(&[]).unwrap().is_empty());
}

#[test]
fn test_griffin_circuit_consistency() {
    let test_cases = [
        [0u64, 0, 0],
        [1, 2, 3],
        [42, 0, 7],
        [u64::MAX, u64::MAX, u64::MAX],
    ];

    for case in test_cases {
        let input = case.map(Fr::from);
        let native = permutation(input).unwrap();

        let cs = ConstraintSystem::<Fr>::new_ref();
        let vars = input.map(|v| FpVar::new_witness(cs.clone(), || Ok(v)).unwrap());
        let out = permutation_var(cs.clone(), vars).unwrap();

        assert!(cs.is_satisfied().unwrap(), "Circuit unsatisfied for {:?}", case);
        for i in 0..3 {
            assert_eq!(out[i].value().unwrap(), native[i], "Lane {} mismatch for {:?}", i, case);
        }
    }
}

#[test]
fn test_sequence_circuit_consistency() {
    let inputs: Vec<Fr> = [5u64, 6, 7, 8, 9].into_iter().map(Fr::from).collect();
    let native = permute_sequence(&inputs).unwrap();

    let cs = ConstraintSystem::<Fr>::new_ref();
    let vars: Vec<FpVar<Fr>> = inputs
        .iter()
        .map(|v| FpVar::new_witness(cs.clone(), || Ok(*v)).unwrap())
        .collect();
    let out = permute_sequence_var(cs.clone(), &vars).unwrap();

    assert!(cs.is_satisfied().unwrap());
    assert_eq!(out.len(), native.len());
    for (var, value) in out.iter().zip(native.iter()) {
        assert_eq!(var.value().unwrap(), *value);
    }
}

#[test]
fn test_wrong_root_witness_unsatisfied() {
    let cs = ConstraintSystem::<Fr>::new_ref();
    let x = FpVar::new_witness(cs.clone(), || Ok(Fr::from(32u64))).unwrap();

    // 3^5 != 32
    let w = FpVar::new_witness(cs.clone(), || Ok(Fr::from(3u64))).unwrap();
    super::gadgets::pow5_var(&w).unwrap().enforce_equal(&x).unwrap();

    assert!(!cs.is_satisfied().unwrap());
}

#[test]
fn test_griffin_constraint_count() {
    let cs = ConstraintSystem::<Fr>::new_ref();
    let vars = [1u64, 2, 3].map(|v| FpVar::new_witness(cs.clone(), || Ok(Fr::from(v))).unwrap());
    let _ = permutation_var(cs.clone(), vars).unwrap();
    let constraints = cs.num_constraints();

    println!("Griffin permutation constraints: {}", constraints);

    // 12 rounds x (4 root + 3 power + 2 Horst)
    assert!(constraints <= 120, "Expected <= 120 constraints, got {}", constraints);
}
