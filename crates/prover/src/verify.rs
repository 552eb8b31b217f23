//! Local verification of reveal proofs.

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, Proof, VerifyingKey};
use ark_snark::SNARK;
use thiserror::Error;

use fogmove_circuits::{RevealPublicInputs, NUM_PUBLIC_INPUTS};

/// Errors during verification
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Verification failed: {0}")]
    Verification(String),
    #[error("Expected {expected} public inputs, got {got}")]
    InvalidInputs { expected: usize, got: usize },
}

/// Verify a reveal proof against its structured public inputs
pub fn verify_reveal_proof(
    vk: &VerifyingKey<Bn254>,
    proof: &Proof<Bn254>,
    public_inputs: &RevealPublicInputs,
) -> Result<bool, VerifyError> {
    verify_reveal_field_inputs(vk, proof, &public_inputs.to_field_elements())
}

/// Verify a reveal proof against raw field inputs in circuit order
pub fn verify_reveal_field_inputs(
    vk: &VerifyingKey<Bn254>,
    proof: &Proof<Bn254>,
    public_inputs: &[Fr],
) -> Result<bool, VerifyError> {
    if public_inputs.len() != NUM_PUBLIC_INPUTS {
        return Err(VerifyError::InvalidInputs {
            expected: NUM_PUBLIC_INPUTS,
            got: public_inputs.len(),
        });
    }

    Groth16::<Bn254>::verify(vk, public_inputs, proof)
        .map_err(|e| VerifyError::Verification(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prove::prove_reveal_with_rng;
    use crate::setup::{setup_reveal, RevealKeys};
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use fogmove_circuits::{
        ArmyMove, CircuitParams, GridPosition, PathCommitmentInput, MAP_WIDTH,
    };

    const PARAMS: CircuitParams = CircuitParams {
        max_points: 3,
        hash_rounds: 1,
    };

    fn proved() -> (RevealKeys, crate::prove::RevealProof) {
        let mut rng = StdRng::seed_from_u64(42);
        let keys = RevealKeys {
            params: PARAMS,
            keys: setup_reveal(&mut rng, PARAMS).unwrap(),
        };

        let input = PathCommitmentInput::new(
            vec![
                GridPosition::new(0, 0),
                GridPosition::new(0, 1),
                GridPosition::new(0, 2),
            ],
            Fr::from(2u64),
            Fr::from(1u64),
            MAP_WIDTH,
            PARAMS.hash_rounds,
        );
        let mut army = ArmyMove::new();
        army.commit(input, 20, 3).unwrap();
        let witness = army.reveal_witness(20, true).unwrap();

        let proof = prove_reveal_with_rng(&keys, &witness, &mut rng).unwrap();
        (keys, proof)
    }

    #[test]
    fn test_verify_reveal() {
        let (keys, proof) = proved();

        let valid =
            verify_reveal_proof(keys.verifying_key(), &proof.proof, &proof.public_inputs).unwrap();
        assert!(valid);

        // Wrong destination
        let mut wrong = proof.public_inputs.clone();
        wrong.destination_hash = Fr::from(99999u64);
        assert!(!verify_reveal_proof(keys.verifying_key(), &proof.proof, &wrong).unwrap());

        // Flipped occupancy flag
        let mut wrong = proof.public_inputs.clone();
        wrong.target_occupied = !wrong.target_occupied;
        assert!(!verify_reveal_proof(keys.verifying_key(), &proof.proof, &wrong).unwrap());
    }

    #[test]
    fn test_verify_wrong_input_count() {
        let (keys, proof) = proved();
        let mut inputs = proof.field_inputs();
        inputs.pop();

        assert!(matches!(
            verify_reveal_field_inputs(keys.verifying_key(), &proof.proof, &inputs),
            Err(VerifyError::InvalidInputs { expected: 5, got: 4 })
        ));
    }
}
