//! Reveal Circuit for hidden army moves.
//!
//! Proves that a committed Bloom filter was built from a path ending at the
//! disclosed destination, without revealing any other point.
//!
//! Public inputs, in order:
//! - commitment_lo: bits 0..128 of the commitment
//! - commitment_hi: bits 128..256 of the commitment
//! - destination_hash: MiMC-7 of the last encoded position, keyed by the salt
//! - duration: claimed move duration (range-checked to 64 bits)
//! - target_occupied: whether the destination planet is occupied
//!
//! Witnesses:
//! - Encoded positions for every slot (unused slots zero)
//! - Per-slot activity flags, a non-empty prefix
//! - Owner identity `pk` and the salt

use ark_bn254::Fr;
use ark_ff::Zero;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::bloom::{bloom_commitment_var, destination_hash, BloomCommitment};
use crate::error::CommitError;
use crate::mimc::{mimc7_hash_var, Mimc7};
use crate::params::CircuitParams;
use crate::protocol::RevealWitness;
use crate::range_check::enforce_bit_width;

/// Number of public inputs the reveal circuit exposes.
pub const NUM_PUBLIC_INPUTS: usize = 5;

/// The values a verifier sees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealPublicInputs {
    pub commitment: BloomCommitment,
    pub destination_hash: Fr,
    pub duration: u64,
    pub target_occupied: bool,
}

impl RevealPublicInputs {
    /// Field elements in circuit order.
    pub fn to_field_elements(&self) -> Vec<Fr> {
        let [lo, hi] = self.commitment.to_field_limbs();
        vec![
            lo,
            hi,
            self.destination_hash,
            Fr::from(self.duration),
            Fr::from(self.target_occupied),
        ]
    }
}

/// Reveal Circuit.
#[derive(Clone)]
pub struct RevealCircuit {
    /// Fixed circuit shape
    pub params: CircuitParams,

    // Public inputs
    /// Claimed commitment
    pub commitment: Option<BloomCommitment>,
    /// Hash of the final position
    pub destination_hash: Option<Fr>,
    pub duration: Option<u64>,
    pub target_occupied: Option<bool>,

    // Witnesses
    /// Encoded positions, exactly `params.max_points` long
    pub positions: Option<Vec<u64>>,
    /// Number of real points at the front of `positions`
    pub path_len: Option<usize>,
    pub pk: Option<Fr>,
    pub salt: Option<Fr>,
}

impl RevealCircuit {
    /// Create a circuit for setup.
    /// Uses a one-point path at the origin so the constraint structure is
    /// the same as for any real reveal.
    pub fn empty(params: CircuitParams) -> Self {
        Self {
            params,
            commitment: Some(BloomCommitment::zero()),
            destination_hash: Some(Fr::zero()),
            duration: Some(0),
            target_occupied: Some(false),
            positions: Some(vec![0; params.max_points]),
            path_len: Some(1),
            pk: Some(Fr::zero()),
            salt: Some(Fr::zero()),
        }
    }

    /// Create a circuit with all witnesses from a reveal witness.
    ///
    /// The claimed commitment is used as-is; use
    /// [`crate::protocol::verify_reveal`] first to reject a reveal that
    /// would not satisfy the circuit.
    pub fn new(params: CircuitParams, witness: &RevealWitness) -> Result<Self, CommitError> {
        let input = &witness.input;
        input.validate(params.max_points)?;

        if input.points.is_empty() {
            return Err(CommitError::EmptyPath);
        }
        if input.hash_rounds != params.hash_rounds {
            return Err(CommitError::HashRoundsMismatch {
                got: input.hash_rounds,
                expected: params.hash_rounds,
            });
        }

        let mut positions = input.encoded_positions()?;
        let path_len = positions.len();
        positions.resize(params.max_points, 0);

        Ok(Self {
            params,
            commitment: Some(witness.commitment),
            destination_hash: Some(destination_hash(input, &Mimc7)?),
            duration: Some(witness.duration),
            target_occupied: Some(witness.target_occupied),
            positions: Some(positions),
            path_len: Some(path_len),
            pk: Some(input.pk),
            salt: Some(input.salt),
        })
    }

    pub fn public_inputs(&self) -> Option<RevealPublicInputs> {
        Some(RevealPublicInputs {
            commitment: self.commitment?,
            destination_hash: self.destination_hash?,
            duration: self.duration?,
            target_occupied: self.target_occupied?,
        })
    }
}

impl ConstraintSynthesizer<Fr> for RevealCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let max_points = self.params.max_points;
        if max_points == 0 {
            return Err(SynthesisError::Unsatisfiable);
        }

        // === Allocate public inputs ===
        // Order matters: commitment_lo, commitment_hi, destination_hash,
        // duration, target_occupied
        let limbs = self.commitment.map(|c| c.to_field_limbs());
        let commitment_lo_var = FpVar::new_input(cs.clone(), || {
            limbs.map(|l| l[0]).ok_or(SynthesisError::AssignmentMissing)
        })?;
        let commitment_hi_var = FpVar::new_input(cs.clone(), || {
            limbs.map(|l| l[1]).ok_or(SynthesisError::AssignmentMissing)
        })?;
        let destination_var = FpVar::new_input(cs.clone(), || {
            self.destination_hash.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let duration_var = FpVar::new_input(cs.clone(), || {
            self.duration
                .map(Fr::from)
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        let _target_occupied_var = Boolean::new_input(cs.clone(), || {
            self.target_occupied.ok_or(SynthesisError::AssignmentMissing)
        })?;

        // === Allocate path witnesses ===
        let mut position_vars = Vec::with_capacity(max_points);
        for i in 0..max_points {
            position_vars.push(FpVar::new_witness(cs.clone(), || {
                self.positions
                    .as_ref()
                    .and_then(|p| p.get(i).copied())
                    .map(Fr::from)
                    .ok_or(SynthesisError::AssignmentMissing)
            })?);
        }

        let mut active_vars = Vec::with_capacity(max_points);
        for i in 0..max_points {
            active_vars.push(Boolean::new_witness(cs.clone(), || {
                self.path_len
                    .map(|len| i < len)
                    .ok_or(SynthesisError::AssignmentMissing)
            })?);
        }

        let pk_var = FpVar::new_witness(cs.clone(), || {
            self.pk.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let salt_var = FpVar::new_witness(cs.clone(), || {
            self.salt.ok_or(SynthesisError::AssignmentMissing)
        })?;

        // === Constraint 1: activity flags form a non-empty prefix ===
        active_vars[0].enforce_equal(&Boolean::TRUE)?;
        for i in 1..max_points {
            let gap = active_vars[i].and(&active_vars[i - 1].not())?;
            gap.enforce_equal(&Boolean::FALSE)?;
        }

        // === Constraint 2: recompute the commitment ===
        let commitment = bloom_commitment_var(
            cs.clone(),
            &position_vars,
            &active_vars,
            &pk_var,
            &salt_var,
            self.params.hash_rounds,
        )?;
        let [lo, hi] = commitment.to_field_limbs();
        lo.enforce_equal(&commitment_lo_var)?;
        hi.enforce_equal(&commitment_hi_var)?;

        // === Constraint 3: select the last active position ===
        // Slot i is last iff active[i] and not active[i + 1].
        let mut destination = FpVar::<Fr>::zero();
        for i in 0..max_points {
            let next = active_vars.get(i + 1).cloned().unwrap_or(Boolean::FALSE);
            let is_last = FpVar::from(active_vars[i].clone()) - FpVar::from(next);
            destination += &position_vars[i] * is_last;
        }

        // === Constraint 4: destination hash ===
        let computed = mimc7_hash_var(&destination, &salt_var)?;
        computed.enforce_equal(&destination_var)?;

        // === Constraint 5: duration fits in 64 bits ===
        enforce_bit_width(&duration_var, 64)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bloom::{build_commitment, PathCommitmentInput};
    use crate::encoding::GridPosition;
    use crate::params::MAP_WIDTH;
    use ark_relations::r1cs::ConstraintSystem;

    const PARAMS: CircuitParams = CircuitParams {
        max_points: 3,
        hash_rounds: 1,
    };

    fn witness(points: &[(u32, u32)]) -> RevealWitness {
        let input = PathCommitmentInput::new(
            points.iter().map(|(x, y)| GridPosition::new(*x, *y)).collect(),
            Fr::from(1234u64),
            Fr::from(98765u64),
            MAP_WIDTH,
            PARAMS.hash_rounds,
        );
        let commitment = build_commitment(&input, &Mimc7).unwrap();

        RevealWitness {
            input,
            commitment,
            duration: 42,
            target_occupied: true,
        }
    }

    fn is_satisfied(circuit: RevealCircuit) -> bool {
        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        cs.is_satisfied().unwrap()
    }

    #[test]
    fn test_reveal_every_length() {
        let full = [(0, 0), (1, 0), (1, 1)];
        for len in 1..=PARAMS.max_points {
            let circuit = RevealCircuit::new(PARAMS, &witness(&full[..len])).unwrap();
            assert!(is_satisfied(circuit), "unsatisfied for length {}", len);
        }
    }

    #[test]
    fn test_reveal_wrong_commitment() {
        let mut w = witness(&[(0, 0), (1, 0)]);
        let flipped: Vec<bool> = w.commitment.bits_le().iter().map(|b| !b).collect();
        w.commitment = BloomCommitment::from_bits_le(&flipped);

        let circuit = RevealCircuit::new(PARAMS, &w).unwrap();
        assert!(!is_satisfied(circuit));
    }

    #[test]
    fn test_reveal_wrong_destination() {
        let mut circuit = RevealCircuit::new(PARAMS, &witness(&[(0, 0), (1, 0)])).unwrap();
        circuit.destination_hash = Some(Fr::from(7u64));

        assert!(!is_satisfied(circuit));
    }

    #[test]
    fn test_reveal_rejects_gap_in_path() {
        let mut circuit = RevealCircuit::new(PARAMS, &witness(&[(0, 0)])).unwrap();
        circuit.path_len = Some(0);

        assert!(!is_satisfied(circuit));
    }

    #[test]
    fn test_public_inputs_order() {
        let w = witness(&[(2, 2)]);
        let circuit = RevealCircuit::new(PARAMS, &w).unwrap();
        let inputs = circuit.public_inputs().unwrap().to_field_elements();

        let [lo, hi] = w.commitment.to_field_limbs();
        assert_eq!(inputs.len(), NUM_PUBLIC_INPUTS);
        assert_eq!(inputs[0], lo);
        assert_eq!(inputs[1], hi);
        assert_eq!(inputs[2], destination_hash(&w.input, &Mimc7).unwrap());
        assert_eq!(inputs[3], Fr::from(42u64));
        assert_eq!(inputs[4], Fr::from(1u64));
    }

    #[test]
    fn test_new_rejects_bad_shapes() {
        let too_long = witness(&[(0, 0), (1, 0), (2, 0), (3, 0)]);
        assert!(matches!(
            RevealCircuit::new(PARAMS, &too_long),
            Err(CommitError::TooManyPoints { count: 4, max: 3 })
        ));

        let empty = witness(&[]);
        assert_eq!(
            RevealCircuit::new(PARAMS, &empty).err(),
            Some(CommitError::EmptyPath)
        );

        let mut rounds = witness(&[(0, 0)]);
        rounds.input.hash_rounds = 2;
        assert_eq!(
            RevealCircuit::new(PARAMS, &rounds).err(),
            Some(CommitError::HashRoundsMismatch { got: 2, expected: 1 })
        );
    }

    #[test]
    fn test_empty_circuit_shape() {
        let cs_empty = ConstraintSystem::<Fr>::new_ref();
        RevealCircuit::empty(PARAMS)
            .generate_constraints(cs_empty.clone())
            .unwrap();

        let cs_real = ConstraintSystem::<Fr>::new_ref();
        RevealCircuit::new(PARAMS, &witness(&[(0, 0), (1, 0)]))
            .unwrap()
            .generate_constraints(cs_real.clone())
            .unwrap();

        assert_eq!(cs_empty.num_constraints(), cs_real.num_constraints());
        assert_eq!(cs_empty.num_instance_variables(), NUM_PUBLIC_INPUTS + 1);
    }
}
