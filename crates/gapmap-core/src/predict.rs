//! Successor prediction: rank candidate next-primes by messiness score and
//! benchmark the hit rate against the known sequence.

use crate::engine::{weighted_score, CandidateScore, TieredEngine};
use crate::errors::Result;
use crate::map::FrequencyMap;
use crate::sequence::PrimeSequence;

/// How often to emit a progress event, in predictions.
const PROGRESS_EVERY: u64 = 1_000_000;

/// Scoring strategy for the benchmark.
#[derive(Debug)]
pub enum Predictor {
    /// `(rate + 1.0) * gap` against a single map. The dominant variant.
    Weighted(FrequencyMap),
    /// Gap-adaptive tier selection with the gap as tie-break.
    Tiered(TieredEngine),
}

impl Predictor {
    /// Score one candidate successor `q` of `p_n`.
    pub fn score(&self, p_n: u64, q: u64) -> Result<CandidateScore> {
        let anchor = p_n + q;
        let gap = q - p_n;
        match self {
            Predictor::Weighted(map) => {
                let rate = map.rate(anchor, Some(gap));
                Ok(CandidateScore::new(weighted_score(rate, gap), gap as f64))
            }
            Predictor::Tiered(engine) => engine.score(anchor, gap),
        }
    }
}

/// A candidate with its score, as returned by [`rank_candidates`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCandidate {
    pub candidate: u64,
    pub score: CandidateScore,
}

/// Score every candidate and sort ascending (best first). Stable on ties:
/// equal scores keep their input order.
pub fn rank_candidates(
    predictor: &Predictor,
    p_n: u64,
    candidates: &[u64],
) -> Result<Vec<RankedCandidate>> {
    let mut ranked = Vec::with_capacity(candidates.len());
    for &q in candidates {
        ranked.push(RankedCandidate {
            candidate: q,
            score: predictor.score(p_n, q)?,
        });
    }
    ranked.sort_by(|a, b| a.score.cmp(&b.score));
    Ok(ranked)
}

/// Tallies from one benchmark run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BenchReport {
    pub predictions: u64,
    pub hits: u64,
    /// Predictions where more than one candidate tied for the best score.
    pub ties: u64,
}

impl BenchReport {
    /// Hits over predictions, as a fraction.
    pub fn hit_rate(&self) -> f64 {
        if self.predictions == 0 {
            0.0
        } else {
            self.hits as f64 / self.predictions as f64
        }
    }
}

/// For each index `i` in `[start, start + count)`, rank the next
/// `candidates` primes as successors of `sequence[i]` and count a hit when
/// the true successor is among the candidates tied for the best score (the
/// tied-for-first convention).
///
/// Requires `start + count + candidates` primes; checked up front.
pub fn run_benchmark(
    sequence: &PrimeSequence,
    predictor: &Predictor,
    start: usize,
    count: usize,
    candidates: usize,
) -> Result<BenchReport> {
    if candidates == 0 {
        return Ok(BenchReport::default());
    }
    sequence.require(start + count + candidates)?;

    let mut report = BenchReport::default();
    let primes = sequence.as_slice();

    for i in start..start + count {
        let p_n = primes[i];
        let pool = &primes[i + 1..=i + candidates];
        let ranked = rank_candidates(predictor, p_n, pool)?;

        let best = ranked[0].score;
        let winners = ranked.iter().take_while(|r| r.score == best);
        let mut tied = 0u64;
        let mut hit = false;
        let true_successor = pool[0];
        for r in winners {
            tied += 1;
            if r.candidate == true_successor {
                hit = true;
            }
        }

        report.predictions += 1;
        if hit {
            report.hits += 1;
        }
        if tied > 1 {
            report.ties += 1;
        }

        if report.predictions % PROGRESS_EVERY == 0 {
            tracing::info!(
                predictions = report.predictions,
                hits = report.hits,
                hit_rate = report.hit_rate(),
                "benchmark progress"
            );
        }
    }

    Ok(report)
}
