//! Native Bloom commitment builder.

use std::fmt;
use std::str::FromStr;

use ark_bn254::Fr;
use ark_ff::Zero;
use num_bigint::BigUint;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::encoding::{
    bucket_index, check_identity, concatenate_bits, encode_position, GridPosition,
};
use crate::error::{CommitError, Result};
use crate::field::{normalize_unsigned, parse_integer};
use crate::griffin::{permutation, GriffinError, WIDTH};
use crate::hash_chain::{hash_chain, RoundHash};
use crate::params::{MAX_HASH_ROUNDS, MAX_POINT_NUM};

const LIMBS: usize = 4;

/// A secret path together with everything needed to commit to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathCommitmentInput {
    pub points: Vec<GridPosition>,
    pub pk: Fr,
    pub salt: Fr,
    pub map_width: u32,
    pub hash_rounds: usize,
}

impl PathCommitmentInput {
    pub fn new(
        points: Vec<GridPosition>,
        pk: Fr,
        salt: Fr,
        map_width: u32,
        hash_rounds: usize,
    ) -> Self {
        Self {
            points,
            pk,
            salt,
            map_width,
            hash_rounds,
        }
    }

    /// Check the path against a slot limit, the hash-chain depth, the map
    /// bounds and the identity width.
    pub fn validate(&self, max_points: usize) -> Result<()> {
        if self.points.len() > max_points {
            return Err(CommitError::TooManyPoints {
                count: self.points.len(),
                max: max_points,
            });
        }
        if self.hash_rounds == 0 || self.hash_rounds > MAX_HASH_ROUNDS {
            return Err(CommitError::InvalidHashRounds {
                got: self.hash_rounds,
                max: MAX_HASH_ROUNDS,
            });
        }
        check_identity(&self.pk)?;
        self.encoded_positions().map(|_| ())
    }

    /// Row-major encodings of every point, in path order.
    pub fn encoded_positions(&self) -> Result<Vec<u64>> {
        self.points
            .iter()
            .map(|p| encode_position(*p, self.map_width))
            .collect()
    }

    /// Per-point permutation seeds.
    pub fn seeds(&self) -> Result<Vec<Fr>> {
        self.encoded_positions()?
            .into_iter()
            .map(|pos| concatenate_bits(pos, &self.pk, &self.salt))
            .collect()
    }
}

/// 256-bit Bloom filter over path buckets; bit `i` is bucket `i`.
///
/// Equality is always evaluated over the full width.
#[derive(Clone, Copy, Debug, Default)]
pub struct BloomCommitment {
    limbs: [u64; LIMBS],
}

impl BloomCommitment {
    pub const BITS: usize = 256;

    pub fn zero() -> Self {
        Self::default()
    }

    /// Set one bit per bucket index.
    pub fn from_buckets<I: IntoIterator<Item = u8>>(buckets: I) -> Self {
        let mut commitment = Self::zero();
        for bucket in buckets {
            commitment.set(bucket as usize);
        }
        commitment
    }

    /// Pack little-endian bits. Missing high bits are zero, extra bits are
    /// ignored.
    pub fn from_bits_le(bits: &[bool]) -> Self {
        let mut commitment = Self::zero();
        for (i, bit) in bits.iter().take(Self::BITS).enumerate() {
            if *bit {
                commitment.set(i);
            }
        }
        commitment
    }

    pub fn from_bytes_be(bytes: [u8; 32]) -> Self {
        let mut limbs = [0u64; LIMBS];
        for (i, chunk) in bytes.chunks_exact(8).enumerate() {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            limbs[LIMBS - 1 - i] = u64::from_be_bytes(word);
        }
        Self { limbs }
    }

    /// `None` if the integer is wider than 256 bits.
    pub fn from_biguint(value: &BigUint) -> Option<Self> {
        if value.bits() > Self::BITS as u64 {
            return None;
        }
        let mut limbs = [0u64; LIMBS];
        for (limb, digit) in limbs.iter_mut().zip(value.to_u64_digits()) {
            *limb = digit;
        }
        Some(Self { limbs })
    }

    fn set(&mut self, i: usize) {
        self.limbs[i / 64] |= 1 << (i % 64);
    }

    pub fn bit(&self, i: usize) -> bool {
        i < Self::BITS && (self.limbs[i / 64] >> (i % 64)) & 1 == 1
    }

    /// Indices of all set buckets, ascending.
    pub fn set_bits(&self) -> Vec<usize> {
        (0..Self::BITS).filter(|i| self.bit(*i)).collect()
    }

    pub fn count_ones(&self) -> u32 {
        self.limbs.iter().map(|l| l.count_ones()).sum()
    }

    pub fn is_zero(&self) -> bool {
        self.limbs.iter().all(|l| *l == 0)
    }

    pub fn bits_le(&self) -> Vec<bool> {
        (0..Self::BITS).map(|i| self.bit(i)).collect()
    }

    /// True if every bucket set in `other` is also set here.
    pub fn contains(&self, other: &Self) -> bool {
        self.limbs
            .iter()
            .zip(other.limbs.iter())
            .all(|(a, b)| a & b == *b)
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut limbs = self.limbs;
        for (l, o) in limbs.iter_mut().zip(other.limbs.iter()) {
            *l |= o;
        }
        Self { limbs }
    }

    /// Full-width comparison that never exits early.
    pub fn ct_eq(&self, other: &Self) -> bool {
        let diff = self
            .limbs
            .iter()
            .zip(other.limbs.iter())
            .fold(0u64, |acc, (a, b)| acc | (a ^ b));
        diff == 0
    }

    pub fn to_bytes_be(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        for (i, limb) in self.limbs.iter().rev().enumerate() {
            bytes[i * 8..(i + 1) * 8].copy_from_slice(&limb.to_be_bytes());
        }
        bytes
    }

    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.to_bytes_be())
    }

    /// `0x`-prefixed, zero-padded, big-endian hex.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(66);
        out.push_str("0x");
        for limb in self.limbs.iter().rev() {
            out.push_str(&format!("{:016x}", limb));
        }
        out
    }

    /// Low and high 128-bit halves as field elements, the form the reveal
    /// circuit exposes.
    pub fn to_field_limbs(&self) -> [Fr; 2] {
        let half = |lo: u64, hi: u64| {
            let value = (BigUint::from(hi) << 64) | BigUint::from(lo);
            normalize_unsigned(&value)
        };
        [
            half(self.limbs[0], self.limbs[1]),
            half(self.limbs[2], self.limbs[3]),
        ]
    }
}

impl PartialEq for BloomCommitment {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other)
    }
}

impl Eq for BloomCommitment {}

impl fmt::Display for BloomCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_biguint())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid commitment literal: {0}")]
pub struct ParseCommitmentError(String);

/// Accepts a decimal integer or `0x`/`0X`-prefixed hex.
impl FromStr for BloomCommitment {
    type Err = ParseCommitmentError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        parse_integer(trimmed)
            .ok()
            .and_then(|v| Self::from_biguint(&v))
            .ok_or_else(|| ParseCommitmentError(trimmed.to_string()))
    }
}

/// Buckets hit by one permutation group.
fn group_buckets<H: RoundHash + ?Sized>(
    hasher: &H,
    group: &[Fr],
    salt: Fr,
    rounds: usize,
) -> std::result::Result<Vec<u8>, GriffinError> {
    let mut lanes = [Fr::zero(); WIDTH];
    lanes[..group.len()].copy_from_slice(group);
    let permuted = permutation(lanes)?;

    Ok(permuted[..group.len()]
        .iter()
        .flat_map(|g| hash_chain(hasher, *g, salt, rounds))
        .map(|h| bucket_index(&h))
        .collect())
}

/// Compute the commitment of a path.
///
/// Points are permuted three at a time (the last group zero-padded), each
/// permuted value seeds a `hash_rounds`-long chain, and every chain link
/// sets the bucket named by its low eight bits.
pub fn build_commitment<H: RoundHash + ?Sized>(
    input: &PathCommitmentInput,
    hasher: &H,
) -> Result<BloomCommitment> {
    input.validate(MAX_POINT_NUM)?;
    let seeds = input.seeds()?;

    #[cfg(feature = "parallel")]
    let groups = seeds
        .par_chunks(WIDTH)
        .map(|group| group_buckets(hasher, group, input.salt, input.hash_rounds))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    #[cfg(not(feature = "parallel"))]
    let groups = seeds
        .chunks(WIDTH)
        .map(|group| group_buckets(hasher, group, input.salt, input.hash_rounds))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let commitment = BloomCommitment::from_buckets(groups.into_iter().flatten());

    tracing::debug!(
        points = input.points.len(),
        rounds = input.hash_rounds,
        buckets_set = commitment.count_ones(),
        "built path commitment"
    );

    Ok(commitment)
}

/// `H(encode(last point), salt)`, the position hash disclosed on reveal.
pub fn destination_hash<H: RoundHash + ?Sized>(
    input: &PathCommitmentInput,
    hasher: &H,
) -> Result<Fr> {
    let last = input.points.last().ok_or(CommitError::EmptyPath)?;
    let encoded = encode_position(*last, input.map_width)?;
    Ok(hasher.hash(Fr::from(encoded), input.salt))
}

#[cfg(test)]
mod native_tests {
    use super::*;

    #[test]
    fn test_bits_and_bytes() {
        let c = BloomCommitment::from_buckets([0u8, 7, 64, 255]);
        assert_eq!(c.set_bits(), vec![0, 7, 64, 255]);
        assert_eq!(c.count_ones(), 4);

        let bytes = c.to_bytes_be();
        assert_eq!(bytes[31], 0b1000_0001);
        assert_eq!(bytes[0], 0x80);
        assert_eq!(BloomCommitment::from_bytes_be(bytes), c);
    }

    #[test]
    fn test_parse_decimal_and_hex() {
        let c = BloomCommitment::from_buckets([1u8, 200]);
        assert_eq!(c.to_string().parse::<BloomCommitment>().unwrap(), c);
        assert_eq!(c.to_hex().parse::<BloomCommitment>().unwrap(), c);
        assert_eq!(c.to_hex().len(), 66);

        assert!("0x1".parse::<BloomCommitment>().unwrap().bit(0));
        let upper = c.to_hex().to_uppercase();
        assert!(upper.starts_with("0X"));
        assert_eq!(upper.parse::<BloomCommitment>().unwrap(), c);
        assert!("not a number".parse::<BloomCommitment>().is_err());

        let too_wide = format!("0x1{}", "0".repeat(64));
        assert!(too_wide.parse::<BloomCommitment>().is_err());
    }

    #[test]
    fn test_ct_eq_full_width() {
        let a = BloomCommitment::from_buckets([3u8, 250]);
        let b = BloomCommitment::from_buckets([3u8]);
        assert!(a.ct_eq(&a));
        assert!(!a.ct_eq(&b));
        assert!(a.contains(&b));
        assert!(!b.contains(&a));
        assert_eq!(b.union(&BloomCommitment::from_buckets([250u8])), a);
    }

    #[test]
    fn test_field_limbs() {
        let c = BloomCommitment::from_buckets([0u8, 128]);
        let [lo, hi] = c.to_field_limbs();
        assert_eq!(lo, Fr::from(1u64));
        assert_eq!(hi, Fr::from(1u64));
    }

    #[test]
    fn test_from_bits_le() {
        let mut bits = vec![false; 256];
        bits[5] = true;
        bits[190] = true;
        let c = BloomCommitment::from_bits_le(&bits);
        assert_eq!(c.set_bits(), vec![5, 190]);
        assert_eq!(c.bits_le(), bits);
    }
}
