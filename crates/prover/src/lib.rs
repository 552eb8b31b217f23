//! Proof generation library for hidden army movement.
//!
//! This crate provides utilities for:
//! - Trusted setup for the reveal circuit, and key persistence
//! - Reveal proof generation
//! - Local proof verification

pub mod prove;
pub mod setup;
pub mod verify;

pub use prove::{prove_reveal, prove_reveal_with_rng, ProveError, RevealProof};
pub use setup::{setup_reveal, setup_reveal_keys, CircuitKeyPair, RevealKeys, SetupError};
pub use verify::{verify_reveal_field_inputs, verify_reveal_proof, VerifyError};
