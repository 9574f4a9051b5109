//! Prime sequence loading and membership lookup.
//!
//! The whole input file is read into memory up front: the scan indexes the
//! sequence randomly (`sequence[i + k]` for small `k`) and the nearest-prime
//! search needs O(1) membership checks, so both the ordered vector and a
//! hash-set index over the same values stay resident for the lifetime of a
//! run. For a 100M-prime input expect the set to cost roughly twice the
//! vector.

use crate::errors::{Error, Result};
use std::collections::HashSet;
use std::path::Path;

/// An ordered, strictly increasing sequence of primes with an O(1)
/// membership index.
///
/// Immutable after construction. Primality of the entries is trusted; strict
/// monotonicity is validated at load time.
#[derive(Debug, Clone)]
pub struct PrimeSequence {
    primes: Vec<u64>,
    index: HashSet<u64>,
}

impl PrimeSequence {
    /// Load a sequence from a text file with one base-10 integer per line.
    ///
    /// Fails with [`Error::MissingInput`] if the path does not exist, and
    /// with [`Error::ParseLine`] / [`Error::NotIncreasing`] on malformed
    /// content.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingInput {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let sequence = Self::from_lines(content.lines())?;
        tracing::info!(
            path = %path.display(),
            count = sequence.len(),
            "loaded prime sequence"
        );
        Ok(sequence)
    }

    /// Build a sequence from already-split lines. Exposed for tests and for
    /// callers that hold the primes in memory.
    pub fn from_lines<'a>(lines: impl Iterator<Item = &'a str>) -> Result<Self> {
        let mut primes = Vec::new();
        for (n, line) in lines.enumerate() {
            let value: u64 = line.trim().parse().map_err(|_| Error::ParseLine {
                line: n + 1,
                content: line.to_string(),
            })?;
            if let Some(&previous) = primes.last() {
                if value <= previous {
                    return Err(Error::NotIncreasing {
                        line: n + 1,
                        value,
                        previous,
                    });
                }
            }
            primes.push(value);
        }
        Ok(Self::from_vec_unchecked(primes))
    }

    /// Wrap an in-memory list without re-validating monotonicity. The caller
    /// vouches for ordering.
    pub fn from_vec_unchecked(primes: Vec<u64>) -> Self {
        let index = primes.iter().copied().collect();
        Self { primes, index }
    }

    /// Number of primes in the sequence.
    pub fn len(&self) -> usize {
        self.primes.len()
    }

    /// True when the sequence holds no primes.
    pub fn is_empty(&self) -> bool {
        self.primes.is_empty()
    }

    /// The prime at position `i`.
    pub fn get(&self, i: usize) -> Option<u64> {
        self.primes.get(i).copied()
    }

    /// O(1) membership check against the loaded primes.
    pub fn contains(&self, n: u64) -> bool {
        self.index.contains(&n)
    }

    /// The raw ordered slice.
    pub fn as_slice(&self) -> &[u64] {
        &self.primes
    }

    /// Require at least `required` primes, failing with
    /// [`Error::InsufficientData`] otherwise. Callers run this before any
    /// scan work so no partial result is ever produced.
    pub fn require(&self, required: usize) -> Result<()> {
        if self.primes.len() < required {
            return Err(Error::InsufficientData {
                required,
                available: self.primes.len(),
            });
        }
        Ok(())
    }
}
