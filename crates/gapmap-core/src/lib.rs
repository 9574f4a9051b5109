//! Residue-class statistics for prime gaps.
//!
//! gapmap scans consecutive prime pairs `(p_n, p_{n+1})`, buckets the anchor
//! sum `p_n + p_{n+1}` by residue class (mod 6, 30, or 210) and optionally
//! by gap size, and accumulates how often each bucket's nearest-prime
//! neighborhood looks "messy" (reached via a composite offset). The
//! resulting frequency maps persist as JSON and back heuristic scoring of
//! candidate successor primes.
//!
//! - [`sequence::PrimeSequence`]: the loaded input plus an O(1) membership
//!   index.
//! - [`builder::build`]: the single-pass scan producing a
//!   [`map::FrequencyMap`].
//! - [`engine`]: scoring over loaded maps, including gap-adaptive tier
//!   selection.
//! - [`predict`]: the successor-prediction benchmark consuming the engines.

pub mod bucket;
pub mod builder;
pub mod criterion;
pub mod engine;
pub mod errors;
pub mod map;
pub mod predict;
pub mod sequence;

pub use bucket::{BucketKey, Classifier, GapCategory, GapThresholds, Modulus};
pub use builder::{build, ScanReport, ScanWindow};
pub use criterion::DEFAULT_SEARCH_RADIUS;
pub use engine::{weighted_score, CandidateScore, TieredEngine};
pub use errors::{Error, Result};
pub use map::{BucketStats, FrequencyMap};
pub use predict::{run_benchmark, BenchReport, Predictor};
pub use sequence::PrimeSequence;
