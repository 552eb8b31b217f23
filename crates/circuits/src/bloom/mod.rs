//! Bloom filter commitment over a secret path.
//!
//! Pipeline per point: encode position, pack the seed with `pk` and salt,
//! permute in groups of three, stretch each permuted value into a hash
//! chain, and set the bucket named by the low eight bits of every link.
//! The OR of all hits, bit 0 least significant, is the commitment.

mod gadgets;
mod native;


pub use gadgets::{bloom_commitment_var, BloomCommitmentVar, LIMB_BITS};
pub use native::{
    build_commitment, destination_hash, BloomCommitment, ParseCommitmentError,
    PathCommitmentInput,
};
