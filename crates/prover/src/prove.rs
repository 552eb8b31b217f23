//! Proof generation for the reveal circuit.

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, Proof};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use ark_std::rand::{rngs::StdRng, CryptoRng, RngCore, SeedableRng};
use thiserror::Error;

use fogmove_circuits::{
    verify_reveal, CommitError, Mimc7, RevealCircuit, RevealPublicInputs, RevealWitness,
    Verification,
};

use crate::setup::RevealKeys;

/// Errors during proof generation
#[derive(Error, Debug)]
pub enum ProveError {
    #[error("Proof generation failed: {0}")]
    ProofGeneration(String),
    #[error("Invalid reveal witness: {0}")]
    InvalidWitness(#[from] CommitError),
    #[error("Path does not reproduce the claimed commitment")]
    CommitmentMismatch,
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl ProveError {
    /// Failures that are not the caller's fault.
    pub fn is_internal(&self) -> bool {
        match self {
            ProveError::InvalidWitness(e) => e.is_internal(),
            ProveError::ProofGeneration(_) | ProveError::Serialization(_) => true,
            ProveError::CommitmentMismatch => false,
        }
    }
}

/// A reveal proof with its public inputs
#[derive(Clone, Debug)]
pub struct RevealProof {
    pub proof: Proof<Bn254>,
    pub public_inputs: RevealPublicInputs,
}

impl RevealProof {
    /// Serialize proof to bytes
    pub fn serialize_proof(&self) -> Result<Vec<u8>, ProveError> {
        let mut bytes = Vec::new();
        self.proof
            .serialize_compressed(&mut bytes)
            .map_err(|e| ProveError::Serialization(e.to_string()))?;
        Ok(bytes)
    }

    /// Serialize public inputs to bytes (each Fr is 32 bytes)
    pub fn serialize_public_inputs(&self) -> Result<Vec<u8>, ProveError> {
        let mut bytes = Vec::new();
        for input in self.field_inputs() {
            input
                .serialize_compressed(&mut bytes)
                .map_err(|e| ProveError::Serialization(e.to_string()))?;
        }
        Ok(bytes)
    }

    pub fn field_inputs(&self) -> Vec<Fr> {
        self.public_inputs.to_field_elements()
    }

    /// Deserialize proof from bytes
    pub fn deserialize_proof(bytes: &[u8]) -> Result<Proof<Bn254>, ProveError> {
        Proof::deserialize_compressed(bytes).map_err(|e| ProveError::Serialization(e.to_string()))
    }
}

/// Generate a reveal proof with fresh randomness
pub fn prove_reveal(keys: &RevealKeys, witness: &RevealWitness) -> Result<RevealProof, ProveError> {
    let mut rng = StdRng::from_entropy();
    prove_reveal_with_rng(keys, witness, &mut rng)
}

/// Generate a reveal proof.
///
/// The commitment is recomputed natively first so a wrong path is reported
/// as a mismatch instead of an unsatisfiable circuit.
pub fn prove_reveal_with_rng<R: RngCore + CryptoRng>(
    keys: &RevealKeys,
    witness: &RevealWitness,
    rng: &mut R,
) -> Result<RevealProof, ProveError> {
    if verify_reveal(witness, &Mimc7)? == Verification::Mismatch {
        return Err(ProveError::CommitmentMismatch);
    }

    let circuit = RevealCircuit::new(keys.params, witness)?;
    let public_inputs = circuit
        .public_inputs()
        .ok_or_else(|| ProveError::ProofGeneration("missing public inputs".to_string()))?;

    let proof = Groth16::<Bn254>::prove(keys.proving_key(), circuit, rng)
        .map_err(|e| ProveError::ProofGeneration(e.to_string()))?;

    tracing::info!(
        points = witness.input.points.len(),
        duration = witness.duration,
        "generated reveal proof"
    );

    Ok(RevealProof {
        proof,
        public_inputs,
    })
}
