//! Deployment parameters.

/// Fixed number of path slots in the reveal circuit.
pub const MAX_POINT_NUM: usize = 20;
/// Default width of the square game map.
pub const MAP_WIDTH: u32 = 20;
/// Depth `R` of the per-point hash chain.
pub const HASH_ROUNDS: usize = 2;
/// Upper bound on the hash-chain depth accepted from callers.
pub const MAX_HASH_ROUNDS: usize = 16;

/// Shape of a reveal circuit.
///
/// Keys generated for one shape cannot prove or verify another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CircuitParams {
    pub max_points: usize,
    pub hash_rounds: usize,
}

impl CircuitParams {
    pub fn new(max_points: usize, hash_rounds: usize) -> Self {
        Self {
            max_points,
            hash_rounds,
        }
    }
}

impl Default for CircuitParams {
    fn default() -> Self {
        Self::new(MAX_POINT_NUM, HASH_ROUNDS)
    }
}
