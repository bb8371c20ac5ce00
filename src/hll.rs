/*!
 * HyperLogLog Cardinality Sketch
 *
 * Fixed-size probabilistic distinct counter: 2^14 registers, one byte per
 * register, fed by a 64-bit xxh3 hash. The low 14 bits of the hash pick a
 * register; the register keeps the longest run of trailing zeros (+1) seen
 * in the remaining 50 bits.
 *
 * Estimation uses the standard harmonic-mean estimator with linear
 * counting for small cardinalities. Standard error is 1.04 / sqrt(2^14),
 * about 0.81%.
 */

use xxhash_rust::xxh3::xxh3_64;

/// Register-index bits
pub const HLL_P: u32 = 14;
/// Number of registers
pub const HLL_REGISTERS: usize = 1 << HLL_P;

const INDEX_MASK: u64 = (HLL_REGISTERS as u64) - 1;
/// Guard bit so the rank of the 50 remaining bits never exceeds 51
const RANK_GUARD: u64 = 1 << (64 - HLL_P);

#[derive(Clone, PartialEq, Eq)]
pub struct HyperLogLog {
    registers: Box<[u8]>,
}

impl std::fmt::Debug for HyperLogLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperLogLog")
            .field("estimate", &self.count())
            .finish()
    }
}

impl Default for HyperLogLog {
    fn default() -> Self {
        Self::new()
    }
}

impl HyperLogLog {
    pub fn new() -> Self {
        Self {
            registers: vec![0u8; HLL_REGISTERS].into_boxed_slice(),
        }
    }

    /// Observe one element. Returns `true` if any register changed.
    pub fn add(&mut self, element: &[u8]) -> bool {
        let hash = xxh3_64(element);
        let index = (hash & INDEX_MASK) as usize;
        let rank = ((hash >> HLL_P) | RANK_GUARD).trailing_zeros() as u8 + 1;
        if rank > self.registers[index] {
            self.registers[index] = rank;
            true
        } else {
            false
        }
    }

    /// Approximate number of distinct elements observed
    pub fn count(&self) -> u64 {
        let m = HLL_REGISTERS as f64;
        let mut harmonic = 0.0f64;
        let mut zeros = 0usize;
        for &r in self.registers.iter() {
            harmonic += 1.0 / (1u64 << r) as f64;
            if r == 0 {
                zeros += 1;
            }
        }

        let alpha = 0.7213 / (1.0 + 1.079 / m);
        let raw = alpha * m * m / harmonic;

        let estimate = if raw <= 2.5 * m && zeros > 0 {
            // linear counting
            m * (m / zeros as f64).ln()
        } else {
            raw
        };
        estimate.round() as u64
    }

    /// Fold `other` into `self` (register-wise max)
    pub fn merge(&mut self, other: &HyperLogLog) {
        for (mine, theirs) in self.registers.iter_mut().zip(other.registers.iter()) {
            if *theirs > *mine {
                *mine = *theirs;
            }
        }
    }
}
