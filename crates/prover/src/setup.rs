//! Trusted setup utilities for generating proving and verifying keys.

use std::path::Path;

use ark_bn254::Bn254;
use ark_groth16::{Groth16, ProvingKey, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use ark_std::rand::{rngs::StdRng, CryptoRng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fogmove_circuits::{CircuitParams, RevealCircuit};

const PROVING_KEY_FILE: &str = "reveal.pk";
const VERIFYING_KEY_FILE: &str = "reveal.vk";
const PARAMS_FILE: &str = "params.json";

/// Errors that can occur during setup
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Circuit setup failed: {0}")]
    CircuitSetup(String),
    #[error("Serialization failed: {0}")]
    Serialization(String),
    #[error("Deserialization failed: {0}")]
    Deserialization(String),
    #[error("Key metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
    #[error("Keys were generated for {found:?}, expected {expected:?}")]
    ParamsMismatch {
        found: CircuitParams,
        expected: CircuitParams,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Keys for a single circuit
#[derive(Clone)]
pub struct CircuitKeyPair {
    pub proving_key: ProvingKey<Bn254>,
    pub verifying_key: VerifyingKey<Bn254>,
}

impl CircuitKeyPair {
    /// Serialize proving key to bytes
    pub fn serialize_pk(&self) -> Result<Vec<u8>, SetupError> {
        let mut bytes = Vec::new();
        self.proving_key
            .serialize_compressed(&mut bytes)
            .map_err(|e| SetupError::Serialization(e.to_string()))?;
        Ok(bytes)
    }

    /// Serialize verifying key to bytes
    pub fn serialize_vk(&self) -> Result<Vec<u8>, SetupError> {
        let mut bytes = Vec::new();
        self.verifying_key
            .serialize_compressed(&mut bytes)
            .map_err(|e| SetupError::Serialization(e.to_string()))?;
        Ok(bytes)
    }

    pub fn deserialize_pk(bytes: &[u8]) -> Result<ProvingKey<Bn254>, SetupError> {
        ProvingKey::deserialize_compressed(bytes)
            .map_err(|e| SetupError::Deserialization(e.to_string()))
    }

    pub fn deserialize_vk(bytes: &[u8]) -> Result<VerifyingKey<Bn254>, SetupError> {
        VerifyingKey::deserialize_compressed(bytes)
            .map_err(|e| SetupError::Deserialization(e.to_string()))
    }
}

/// On-disk description of the circuit shape the keys belong to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
struct KeyMetadata {
    max_points: usize,
    hash_rounds: usize,
}

impl From<CircuitParams> for KeyMetadata {
    fn from(params: CircuitParams) -> Self {
        Self {
            max_points: params.max_points,
            hash_rounds: params.hash_rounds,
        }
    }
}

impl From<KeyMetadata> for CircuitParams {
    fn from(meta: KeyMetadata) -> Self {
        CircuitParams::new(meta.max_points, meta.hash_rounds)
    }
}

/// Reveal circuit keys together with the shape they were generated for.
#[derive(Clone)]
pub struct RevealKeys {
    pub params: CircuitParams,
    pub keys: CircuitKeyPair,
}

impl RevealKeys {
    pub fn proving_key(&self) -> &ProvingKey<Bn254> {
        &self.keys.proving_key
    }

    pub fn verifying_key(&self) -> &VerifyingKey<Bn254> {
        &self.keys.verifying_key
    }

    /// Save keys and shape metadata to a directory
    pub fn save_to_directory(&self, dir: &Path) -> Result<(), SetupError> {
        std::fs::create_dir_all(dir)?;

        std::fs::write(dir.join(PROVING_KEY_FILE), self.keys.serialize_pk()?)?;
        std::fs::write(dir.join(VERIFYING_KEY_FILE), self.keys.serialize_vk()?)?;

        let meta = serde_json::to_string_pretty(&KeyMetadata::from(self.params))?;
        std::fs::write(dir.join(PARAMS_FILE), meta)?;

        Ok(())
    }

    /// Load keys from a directory
    pub fn load_from_directory(dir: &Path) -> Result<Self, SetupError> {
        let meta: KeyMetadata = serde_json::from_slice(&std::fs::read(dir.join(PARAMS_FILE))?)?;

        let keys = CircuitKeyPair {
            proving_key: CircuitKeyPair::deserialize_pk(&std::fs::read(
                dir.join(PROVING_KEY_FILE),
            )?)?,
            verifying_key: CircuitKeyPair::deserialize_vk(&std::fs::read(
                dir.join(VERIFYING_KEY_FILE),
            )?)?,
        };

        Ok(Self {
            params: meta.into(),
            keys,
        })
    }

    /// Load keys for `params` from `dir`, running a fresh setup and saving
    /// the result if the directory holds no keys yet.
    pub fn load_or_setup(dir: &Path, params: CircuitParams) -> Result<Self, SetupError> {
        if dir.join(PARAMS_FILE).exists() {
            let keys = Self::load_from_directory(dir)?;
            if keys.params != params {
                return Err(SetupError::ParamsMismatch {
                    found: keys.params,
                    expected: params,
                });
            }
            tracing::info!(dir = %dir.display(), "loaded reveal keys");
            return Ok(keys);
        }

        let keys = setup_reveal_keys(params)?;
        keys.save_to_directory(dir)?;
        tracing::info!(dir = %dir.display(), "saved reveal keys");
        Ok(keys)
    }
}

/// Setup RevealCircuit
pub fn setup_reveal<R: RngCore + CryptoRng>(
    rng: &mut R,
    params: CircuitParams,
) -> Result<CircuitKeyPair, SetupError> {
    let circuit = RevealCircuit::empty(params);
    let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(circuit, rng)
        .map_err(|e| SetupError::CircuitSetup(e.to_string()))?;
    Ok(CircuitKeyPair {
        proving_key: pk,
        verifying_key: vk,
    })
}

/// Run trusted setup for the reveal circuit with fresh randomness
pub fn setup_reveal_keys(params: CircuitParams) -> Result<RevealKeys, SetupError> {
    tracing::info!(
        max_points = params.max_points,
        hash_rounds = params.hash_rounds,
        "running reveal circuit setup"
    );

    let mut rng = StdRng::from_entropy();
    let keys = setup_reveal(&mut rng, params)?;

    Ok(RevealKeys { params, keys })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: CircuitParams = CircuitParams {
        max_points: 2,
        hash_rounds: 1,
    };

    fn small_keys() -> RevealKeys {
        let mut rng = StdRng::seed_from_u64(42);
        RevealKeys {
            params: PARAMS,
            keys: setup_reveal(&mut rng, PARAMS).unwrap(),
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let keys = small_keys();
        keys.save_to_directory(dir.path()).unwrap();

        assert!(dir.path().join("reveal.pk").exists());
        assert!(dir.path().join("reveal.vk").exists());
        assert!(dir.path().join("params.json").exists());

        let loaded = RevealKeys::load_from_directory(dir.path()).unwrap();
        assert_eq!(loaded.params, PARAMS);
        assert_eq!(loaded.keys.serialize_vk().unwrap(), keys.keys.serialize_vk().unwrap());
    }

    #[test]
    fn test_load_or_setup_rejects_other_shape() {
        let dir = tempfile::tempdir().unwrap();
        small_keys().save_to_directory(dir.path()).unwrap();

        let other = CircuitParams::new(3, 1);
        assert!(matches!(
            RevealKeys::load_or_setup(dir.path(), other),
            Err(SetupError::ParamsMismatch { .. })
        ));

        let same = RevealKeys::load_or_setup(dir.path(), PARAMS).unwrap();
        assert_eq!(same.params, PARAMS);
    }

    #[test]
    fn test_load_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            RevealKeys::load_from_directory(&dir.path().join("nope")),
            Err(SetupError::Io(_))
        ));
    }

    #[test]
    fn test_corrupt_key_rejected() {
        assert!(matches!(
            CircuitKeyPair::deserialize_vk(&[1, 2, 3]),
            Err(SetupError::Deserialization(_))
        ));
    }
}
