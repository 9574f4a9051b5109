//! Scoring engines over loaded frequency maps.
//!
//! A lower score marks a "cleaner" anchor; downstream rankers always sort
//! ascending. Engines are plain owned values wrapping loaded maps. There is
//! no process-wide loader state, and scoring is purely functional.

use crate::errors::{Error, Result};
use crate::map::FrequencyMap;
use std::cmp::Ordering;

/// Composite score combining the residue failure rate with the candidate's
/// gap: `(rate + 1.0) * gap`.
///
/// The `+ 1.0` keeps a zero-failure-rate bucket from collapsing every gap to
/// a zero score; the result stays finite and sortable whenever the rate is.
pub fn weighted_score(rate: f64, gap: u64) -> f64 {
    (rate + 1.0) * gap as f64
}

/// An ordered score pair: `primary` decides, `secondary` breaks ties.
///
/// Total order, ascending on both components (`f64::total_cmp`), replacing
/// the ad hoc tuples the scoring variants used to sort lexicographically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateScore {
    pub primary: f64,
    pub secondary: f64,
}

impl CandidateScore {
    pub fn new(primary: f64, secondary: f64) -> Self {
        Self { primary, secondary }
    }
}

impl Eq for CandidateScore {}

impl PartialOrd for CandidateScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CandidateScore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.primary
            .total_cmp(&other.primary)
            .then(self.secondary.total_cmp(&other.secondary))
    }
}

/// One tier of a [`TieredEngine`]: used when the gap exceeds `min_gap`.
#[derive(Debug, Clone)]
struct Tier {
    min_gap: u64,
    map: FrequencyMap,
}

/// Gap-adaptive strategy selection over several maps.
///
/// Tiers form an ordered list of `(threshold, map)` pairs evaluated
/// top-down; the first tier whose threshold the gap exceeds wins. The
/// conventional arrangement routes wide gaps to coarse moduli:
/// gap > 210 uses the mod-210 map, gap > 30 the mod-30 map, and anything
/// else the mod-6 map (a final tier with threshold 0).
#[derive(Debug, Clone, Default)]
pub struct TieredEngine {
    tiers: Vec<Tier>,
}

impl TieredEngine {
    /// An engine with no tiers. Scoring fails with `EngineNotLoaded` until a
    /// tier is pushed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tier. Tiers are consulted in insertion order, so callers
    /// push thresholds from highest to lowest, ending with 0 as the
    /// catch-all.
    pub fn push_tier(&mut self, min_gap: u64, map: FrequencyMap) -> &mut Self {
        self.tiers.push(Tier { min_gap, map });
        self
    }

    /// Number of registered tiers.
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// The map selected for `gap`: first tier with `gap > min_gap`, else the
    /// last tier.
    fn select(&self, gap: u64) -> Result<&FrequencyMap> {
        let last = self.tiers.last().ok_or(Error::EngineNotLoaded)?;
        let tier = self
            .tiers
            .iter()
            .find(|t| gap > t.min_gap)
            .unwrap_or(last);
        Ok(&tier.map)
    }

    /// Score pair for a candidate anchor: the selected map's failure rate as
    /// the primary component, the gap as the tie-break.
    pub fn score(&self, anchor: u64, gap: u64) -> Result<CandidateScore> {
        let map = self.select(gap)?;
        Ok(CandidateScore::new(
            map.rate(anchor, Some(gap)),
            gap as f64,
        ))
    }
}
