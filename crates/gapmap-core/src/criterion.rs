//! The failure criterion: classify an anchor by its nearest prime neighbor.
//!
//! For an anchor `S`, find the minimal offset `k >= 1` such that `S - k` or
//! `S + k` is prime. The anchor is a failure when that `k` is composite,
//! i.e. neither 1 nor itself prime. The search is bounded; exceeding the
//! bound is inconclusive, never a classification.

use crate::sequence::PrimeSequence;

/// Default search radius for the nearest-prime offset.
pub const DEFAULT_SEARCH_RADIUS: u64 = 2000;

/// Outcome of classifying one anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Nearest prime reached via offset 1 or a prime offset.
    Clean,
    /// Nearest prime reached via a composite offset.
    Failure,
    /// No prime found within the search radius. The anchor must be skipped,
    /// not classified.
    Inconclusive,
}

/// Minimal `k` in `[1, radius]` with `anchor - k` or `anchor + k` prime,
/// checked against the loaded membership index. `None` when the radius is
/// exhausted.
pub fn nearest_prime_offset(anchor: u64, primes: &PrimeSequence, radius: u64) -> Option<u64> {
    for k in 1..=radius {
        if anchor >= k && primes.contains(anchor - k) {
            return Some(k);
        }
        if primes.contains(anchor + k) {
            return Some(k);
        }
    }
    None
}

/// Classify one anchor with a bounded nearest-prime search.
pub fn classify(anchor: u64, primes: &PrimeSequence, radius: u64) -> Verdict {
    match nearest_prime_offset(anchor, primes, radius) {
        None => Verdict::Inconclusive,
        Some(1) => Verdict::Clean,
        Some(k) if primes.contains(k) => Verdict::Clean,
        Some(_) => Verdict::Failure,
    }
}
