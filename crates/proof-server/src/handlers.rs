//! HTTP request handlers for commitments and reveal proofs.

use std::sync::Arc;

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use ark_std::rand::{thread_rng, Rng};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

use fogmove_circuits::field::{self, modulus};
use fogmove_circuits::{
    build_commitment, verify_reveal as check_reveal, BloomCommitment, CommitError, GridPosition,
    Mimc7, PathCommitmentInput, RevealWitness, Verification,
};
use fogmove_prover::{prove, verify, ProveError, RevealProof, VerifyError};

use crate::AppState;

pub type SharedState = Arc<RwLock<AppState>>;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Error response
#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

impl From<CommitError> for ApiError {
    fn from(e: CommitError) -> Self {
        if e.is_internal() {
            ApiError::Internal(e.to_string())
        } else {
            ApiError::BadRequest(e.to_string())
        }
    }
}

impl From<ProveError> for ApiError {
    fn from(e: ProveError) -> Self {
        if e.is_internal() {
            ApiError::Internal(e.to_string())
        } else {
            ApiError::BadRequest(e.to_string())
        }
    }
}

impl From<VerifyError> for ApiError {
    fn from(e: VerifyError) -> Self {
        match e {
            VerifyError::InvalidInputs { .. } => ApiError::BadRequest(e.to_string()),
            VerifyError::Verification(_) => ApiError::Internal(e.to_string()),
        }
    }
}

/// Parse a decimal or `0x`-prefixed big-endian hex integer.
fn parse_integer(value: &str) -> Result<BigUint, ApiError> {
    field::parse_integer(value)
        .map_err(|e| ApiError::BadRequest(format!("Invalid integer {:?}: {}", value.trim(), e)))
}

/// Parse a canonical field element
fn parse_fr(value: &str) -> Result<Fr, ApiError> {
    let n = parse_integer(value)?;
    if n >= modulus() {
        return Err(ApiError::BadRequest(format!(
            "{:?} is not below the field modulus",
            value.trim()
        )));
    }
    Ok(field::normalize_unsigned(&n))
}

fn parse_commitment(value: &str) -> Result<BloomCommitment, ApiError> {
    value
        .parse()
        .map_err(|e: fogmove_circuits::bloom::ParseCommitmentError| {
            ApiError::BadRequest(e.to_string())
        })
}

/// Serialize Fr to 32-byte big-endian hex
fn serialize_fr(f: &Fr) -> String {
    format!("0x{}", hex::encode(f.into_bigint().to_bytes_be()))
}

/// Grid point in API requests
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PointRequest {
    pub x: u32,
    pub y: u32,
}

/// Secret path fields shared by several requests
#[derive(Debug, Deserialize)]
pub struct PathRequest {
    pub points: Vec<PointRequest>,
    pub pk: String,
    pub salt: String,
    pub map_width: Option<u32>,
    pub hash_rounds: Option<usize>,
}

impl PathRequest {
    /// `hash_rounds` may be omitted, but if given it must match the depth
    /// the server's keys were generated for.
    fn to_input(
        &self,
        default_width: u32,
        key_rounds: usize,
    ) -> Result<PathCommitmentInput, ApiError> {
        if let Some(rounds) = self.hash_rounds {
            if rounds != key_rounds {
                return Err(CommitError::HashRoundsMismatch {
                    got: rounds,
                    expected: key_rounds,
                }
                .into());
            }
        }

        Ok(PathCommitmentInput::new(
            self.points
                .iter()
                .map(|p| GridPosition::new(p.x, p.y))
                .collect(),
            parse_fr(&self.pk)?,
            parse_fr(&self.salt)?,
            self.map_width.unwrap_or(default_width),
            key_rounds,
        ))
    }
}

async fn request_input(
    state: &SharedState,
    path: &PathRequest,
) -> Result<PathCommitmentInput, ApiError> {
    let state = state.read().await;
    path.to_input(state.config.map_width, state.keys.params.hash_rounds)
}

// ============ Commitment ============

#[derive(Serialize, Deserialize)]
pub struct CommitmentResponse {
    pub commitment: String,
    pub commitment_decimal: String,
}

pub async fn create_commitment(
    State(state): State<SharedState>,
    Json(req): Json<PathRequest>,
) -> Result<Json<CommitmentResponse>, ApiError> {
    let input = request_input(&state, &req).await?;
    let commitment = build_commitment(&input, &Mimc7)?;

    Ok(Json(CommitmentResponse {
        commitment: commitment.to_hex(),
        commitment_decimal: commitment.to_string(),
    }))
}

#[derive(Deserialize)]
pub struct VerifyCommitmentRequest {
    #[serde(flatten)]
    pub path: PathRequest,
    pub commitment: String,
}

#[derive(Serialize, Deserialize)]
pub struct VerifyCommitmentResponse {
    pub matches: bool,
}

pub async fn verify_commitment(
    State(state): State<SharedState>,
    Json(req): Json<VerifyCommitmentRequest>,
) -> Result<Json<VerifyCommitmentResponse>, ApiError> {
    let input = request_input(&state, &req.path).await?;
    let witness = RevealWitness {
        input,
        commitment: parse_commitment(&req.commitment)?,
        duration: 0,
        target_occupied: false,
    };

    let verdict = check_reveal(&witness, &Mimc7)?;
    Ok(Json(VerifyCommitmentResponse {
        matches: verdict == Verification::Match,
    }))
}

// ============ Salt ============

#[derive(Serialize, Deserialize)]
pub struct SaltResponse {
    pub salt: String,
}

/// Random 32-bit salt, as a decimal string
pub async fn generate_salt() -> Json<SaltResponse> {
    let salt: u32 = thread_rng().gen();
    Json(SaltResponse {
        salt: salt.to_string(),
    })
}

// ============ Reveal ============

#[derive(Deserialize)]
pub struct RevealRequest {
    #[serde(flatten)]
    pub path: PathRequest,
    pub commitment: String,
    pub duration: u64,
    pub target_occupied: bool,
}

#[derive(Serialize, Deserialize)]
pub struct RevealResponse {
    pub proof: String,
    pub public_inputs: Vec<String>,
    pub destination_hash: String,
}

pub async fn prove_reveal(
    State(state): State<SharedState>,
    Json(req): Json<RevealRequest>,
) -> Result<Json<RevealResponse>, ApiError> {
    let witness = RevealWitness {
        input: request_input(&state, &req.path).await?,
        commitment: parse_commitment(&req.commitment)?,
        duration: req.duration,
        target_occupied: req.target_occupied,
    };

    let keys = state.read().await.keys.clone();
    let proof = tokio::task::spawn_blocking(move || prove::prove_reveal(&keys, &witness))
        .await
        .map_err(|e| ApiError::Internal(format!("Proving task failed: {}", e)))??;

    let proof_bytes = proof.serialize_proof()?;
    Ok(Json(RevealResponse {
        proof: format!("0x{}", hex::encode(proof_bytes)),
        public_inputs: proof.field_inputs().iter().map(serialize_fr).collect(),
        destination_hash: serialize_fr(&proof.public_inputs.destination_hash),
    }))
}

#[derive(Deserialize)]
pub struct VerifyRevealRequest {
    pub proof: String,
    pub public_inputs: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct VerifyRevealResponse {
    pub valid: bool,
}

pub async fn verify_reveal(
    State(state): State<SharedState>,
    Json(req): Json<VerifyRevealRequest>,
) -> Result<Json<VerifyRevealResponse>, ApiError> {
    let bytes = hex::decode(req.proof.trim().trim_start_matches("0x"))
        .map_err(|e| ApiError::BadRequest(format!("Invalid hex: {}", e)))?;
    let proof = RevealProof::deserialize_proof(&bytes)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let public_inputs = req
        .public_inputs
        .iter()
        .map(|v| parse_fr(v))
        .collect::<Result<Vec<_>, _>>()?;

    let state = state.read().await;
    let valid =
        verify::verify_reveal_field_inputs(state.keys.verifying_key(), &proof, &public_inputs)?;

    Ok(Json(VerifyRevealResponse { valid }))
}
