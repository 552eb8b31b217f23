//! Commit/reveal lifecycle of a hidden army move.
//!
//! The client keeps the path and salt to itself. At commit time only the
//! commitment, the duration and the source planet leave the client; at
//! reveal time the full witness goes to the prover.

use std::fmt;

use thiserror::Error;

use crate::bloom::{build_commitment, BloomCommitment, PathCommitmentInput};
use crate::error::CommitError;
use crate::hash_chain::RoundHash;
use crate::mimc::Mimc7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveState {
    Uncommitted,
    Committed,
    Revealed,
}

impl fmt::Display for MoveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MoveState::Uncommitted => "uncommitted",
            MoveState::Committed => "committed",
            MoveState::Revealed => "revealed",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("cannot {action} a move that is {from}")]
    InvalidTransition {
        from: MoveState,
        action: &'static str,
    },
    #[error(transparent)]
    Commit(#[from] CommitError),
}

/// What the ledger receives at commit time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitSubmission {
    pub commitment: BloomCommitment,
    pub duration: u64,
    pub source_planet_id: u64,
}

/// Everything the prover needs to open a commitment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealWitness {
    pub input: PathCommitmentInput,
    pub commitment: BloomCommitment,
    pub duration: u64,
    pub target_occupied: bool,
}

/// Outcome of checking a reveal. A mismatch is a normal result, not an
/// error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verification {
    Match,
    Mismatch,
}

impl Verification {
    pub fn is_match(self) -> bool {
        self == Verification::Match
    }
}

/// Recompute the commitment from the witness and compare it with the
/// claimed one over the full 256 bits.
pub fn verify_reveal<H: RoundHash + ?Sized>(
    witness: &RevealWitness,
    hasher: &H,
) -> Result<Verification, CommitError> {
    let recomputed = build_commitment(&witness.input, hasher)?;

    Ok(if recomputed.ct_eq(&witness.commitment) {
        Verification::Match
    } else {
        Verification::Mismatch
    })
}

/// Client-side record of one army move.
pub struct ArmyMove<H = Mimc7> {
    hasher: H,
    state: MoveState,
    input: Option<PathCommitmentInput>,
    commitment: Option<BloomCommitment>,
}

impl ArmyMove<Mimc7> {
    pub fn new() -> Self {
        Self::with_hasher(Mimc7)
    }
}

impl Default for ArmyMove<Mimc7> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: RoundHash> ArmyMove<H> {
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            hasher,
            state: MoveState::Uncommitted,
            input: None,
            commitment: None,
        }
    }

    pub fn state(&self) -> MoveState {
        self.state
    }

    pub fn commitment(&self) -> Option<&BloomCommitment> {
        self.commitment.as_ref()
    }

    fn require(&self, expected: MoveState, action: &'static str) -> Result<(), ProtocolError> {
        if self.state != expected {
            return Err(ProtocolError::InvalidTransition {
                from: self.state,
                action,
            });
        }
        Ok(())
    }

    /// Commit to a path. The path and salt stay in this record.
    pub fn commit(
        &mut self,
        input: PathCommitmentInput,
        duration: u64,
        source_planet_id: u64,
    ) -> Result<CommitSubmission, ProtocolError> {
        self.require(MoveState::Uncommitted, "commit")?;

        let commitment = build_commitment(&input, &self.hasher)?;
        self.input = Some(input);
        self.commitment = Some(commitment);
        self.state = MoveState::Committed;

        Ok(CommitSubmission {
            commitment,
            duration,
            source_planet_id,
        })
    }

    /// Assemble the witness for a reveal proof.
    pub fn reveal_witness(
        &self,
        duration: u64,
        target_occupied: bool,
    ) -> Result<RevealWitness, ProtocolError> {
        self.require(MoveState::Committed, "reveal")?;

        match (&self.input, self.commitment) {
            (Some(input), Some(commitment)) => Ok(RevealWitness {
                input: input.clone(),
                commitment,
                duration,
                target_occupied,
            }),
            _ => Err(ProtocolError::InvalidTransition {
                from: self.state,
                action: "reveal",
            }),
        }
    }

    /// Apply the ledger's verdict. Only a match moves the army to
    /// `Revealed`; a mismatch leaves it committed.
    pub fn record_verdict(&mut self, verdict: Verification) -> Result<MoveState, ProtocolError> {
        self.require(MoveState::Committed, "record a verdict for")?;

        if verdict.is_match() {
            self.state = MoveState::Revealed;
        }
        Ok(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::GridPosition;
    use crate::params::{HASH_ROUNDS, MAP_WIDTH};
    use ark_bn254::Fr;

    fn input(salt: u64) -> PathCommitmentInput {
        PathCommitmentInput::new(
            vec![
                GridPosition::new(1, 0),
                GridPosition::new(2, 0),
                GridPosition::new(3, 0),
            ],
            Fr::from(2u64),
            Fr::from(salt),
            MAP_WIDTH,
            HASH_ROUNDS,
        )
    }

    #[test]
    fn test_full_lifecycle() {
        let mut army = ArmyMove::new();
        assert_eq!(army.state(), MoveState::Uncommitted);

        let submission = army.commit(input(1), 30, 7).unwrap();
        assert_eq!(army.state(), MoveState::Committed);
        assert_eq!(submission.duration, 30);
        assert_eq!(submission.source_planet_id, 7);
        assert_eq!(army.commitment(), Some(&submission.commitment));

        let witness = army.reveal_witness(12, true).unwrap();
        assert_eq!(witness.commitment, submission.commitment);
        assert!(witness.target_occupied);

        let verdict = verify_reveal(&witness, &Mimc7).unwrap();
        assert_eq!(verdict, Verification::Match);
        assert_eq!(army.record_verdict(verdict).unwrap(), MoveState::Revealed);
    }

    #[test]
    fn test_tampered_reveal_is_mismatch() {
        let mut army = ArmyMove::new();
        army.commit(input(1), 30, 7).unwrap();

        let mut witness = army.reveal_witness(12, false).unwrap();
        witness.input.salt = Fr::from(2u64);

        let verdict = verify_reveal(&witness, &Mimc7).unwrap();
        assert_eq!(verdict, Verification::Mismatch);

        // Still committed, can try again
        assert_eq!(army.record_verdict(verdict).unwrap(), MoveState::Committed);
    }

    #[test]
    fn test_wrong_claimed_commitment_is_mismatch() {
        let mut army = ArmyMove::new();
        army.commit(input(1), 30, 7).unwrap();

        let mut witness = army.reveal_witness(12, false).unwrap();
        witness.commitment = BloomCommitment::from_buckets([0u8]);

        assert_eq!(verify_reveal(&witness, &Mimc7).unwrap(), Verification::Mismatch);
    }

    #[test]
    fn test_invalid_transitions() {
        let mut army = ArmyMove::new();
        assert!(matches!(
            army.reveal_witness(1, false),
            Err(ProtocolError::InvalidTransition { from: MoveState::Uncommitted, .. })
        ));
        assert!(army.record_verdict(Verification::Match).is_err());

        army.commit(input(1), 30, 7).unwrap();
        assert!(matches!(
            army.commit(input(2), 30, 7),
            Err(ProtocolError::InvalidTransition { from: MoveState::Committed, .. })
        ));

        army.record_verdict(Verification::Match).unwrap();
        assert!(army.reveal_witness(1, false).is_err());
    }

    #[test]
    fn test_commit_rejects_bad_path() {
        let mut army = ArmyMove::new();
        let mut bad = input(1);
        bad.points.push(GridPosition::new(MAP_WIDTH, 0));

        assert!(matches!(
            army.commit(bad, 30, 7),
            Err(ProtocolError::Commit(CommitError::CoordinateOutOfRange { .. }))
        ));
        assert_eq!(army.state(), MoveState::Uncommitted);
    }
}
