//! ZK circuits for hidden army movement.
//!
//! This crate provides:
//! - The native path commitment pipeline: positional encoding, the Griffin
//!   permutation, MiMC-7 hash chains and the 256-bit Bloom filter
//! - R1CS gadgets for the same pipeline
//! - `RevealCircuit`: Prove a commitment was built from a path ending at the
//!   disclosed destination
//! - The commit/reveal state machine for one army move

pub mod bloom;
pub mod encoding;
pub mod error;
pub mod field;
pub mod griffin;
pub mod hash_chain;
pub mod mimc;
pub mod params;
pub mod protocol;
pub mod range_check;
pub mod reveal;


pub use bloom::{build_commitment, destination_hash, BloomCommitment, PathCommitmentInput};
pub use encoding::GridPosition;
pub use error::CommitError;
pub use hash_chain::RoundHash;
pub use mimc::Mimc7;
pub use params::{CircuitParams, HASH_ROUNDS, MAP_WIDTH, MAX_HASH_ROUNDS, MAX_POINT_NUM};
pub use protocol::{
    verify_reveal, ArmyMove, CommitSubmission, MoveState, ProtocolError, RevealWitness,
    Verification,
};
pub use reveal::{RevealCircuit, RevealPublicInputs, NUM_PUBLIC_INPUTS};
