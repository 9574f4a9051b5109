//! Single-pass construction of a frequency map from a prime sequence.

use crate::bucket::Classifier;
use crate::criterion::{self, Verdict};
use crate::errors::Result;
use crate::map::FrequencyMap;
use crate::sequence::PrimeSequence;

/// How often to emit a progress event, in pairs.
const PROGRESS_EVERY: u64 = 1_000_000;

/// The slice of consecutive pairs to scan: indices `[start, start + pairs)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    pub start: usize,
    pub pairs: usize,
}

impl ScanWindow {
    pub fn new(start: usize, pairs: usize) -> Self {
        Self { start, pairs }
    }

    /// Primes the sequence must hold for this window: the scanned pairs plus
    /// a lookahead margin covering the bounded search radius.
    pub fn required_len(&self, radius: u64) -> usize {
        self.start + self.pairs + radius as usize + 1
    }
}

/// Tallies from one build pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Pairs that contributed to the map.
    pub pairs_scanned: u64,
    /// Anchors classified as failures.
    pub failures: u64,
    /// Pairs dropped because the nearest-prime search exhausted its radius.
    /// Non-fatal; callers judge representativeness against this count.
    pub skipped: u64,
}

/// Scan `window` over `sequence` and accumulate a frequency map under
/// `classifier`, evaluating the failure criterion with search radius
/// `radius`.
///
/// Fails with `InsufficientData` before touching any counter when the
/// sequence cannot cover the window plus the lookahead margin. A pair whose
/// nearest-prime search exceeds the radius is skipped entirely: neither its
/// anchor nor a failure is counted, and the skip is tallied in the report.
///
/// Counts are integers and the pass is strictly sequential, so the same
/// inputs always produce an identical map. Persistence is the caller's
/// explicit next step.
pub fn build(
    sequence: &PrimeSequence,
    window: ScanWindow,
    classifier: Classifier,
    radius: u64,
) -> Result<(FrequencyMap, ScanReport)> {
    sequence.require(window.required_len(radius))?;

    tracing::info!(
        start = window.start,
        pairs = window.pairs,
        modulus = %classifier.modulus,
        compound = classifier.gap_thresholds.is_some(),
        radius,
        "starting frequency map scan"
    );

    let mut map = FrequencyMap::new(classifier);
    let mut report = ScanReport::default();
    let primes = sequence.as_slice();

    for i in window.start..window.start + window.pairs {
        let p_n = primes[i];
        let p_next = primes[i + 1];
        let anchor = p_n + p_next;
        let gap = p_next - p_n;

        match criterion::classify(anchor, sequence, radius) {
            Verdict::Inconclusive => {
                report.skipped += 1;
                tracing::debug!(index = i, anchor, "nearest-prime search exhausted, pair skipped");
                continue;
            }
            verdict => {
                let failure = verdict == Verdict::Failure;
                map.record(classifier.classify(anchor, gap), failure);
                report.pairs_scanned += 1;
                if failure {
                    report.failures += 1;
                }
            }
        }

        let done = (i - window.start + 1) as u64;
        if done % PROGRESS_EVERY == 0 {
            tracing::info!(
                scanned = done,
                total = window.pairs,
                failures = report.failures,
                "scan progress"
            );
        }
    }

    map.set_scan_counts(report.pairs_scanned, report.skipped);
    tracing::info!(
        pairs = report.pairs_scanned,
        failures = report.failures,
        skipped = report.skipped,
        "scan complete"
    );
    Ok((map, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::{BucketKey, Modulus};
    use crate::errors::Error;

    fn prefix() -> PrimeSequence {
        PrimeSequence::from_vec_unchecked(vec![
            2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79,
            83, 89, 97,
        ])
    }

    #[test]
    fn window_shorter_than_sequence_plus_margin_is_rejected() {
        let seq = prefix();
        let err = build(
            &seq,
            ScanWindow::new(3, 6),
            Classifier::residue(Modulus::M6),
            50,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InsufficientData { .. }));
    }

    #[test]
    fn counts_bucket_by_residue() {
        let seq = prefix();
        // Pairs from p=7 through p=23: anchors 18, 24, 30, 36, 42 (residue 0)
        // and 52 (residue 4).
        let (map, report) = build(
            &seq,
            ScanWindow::new(3, 6),
            Classifier::residue(Modulus::M6),
            15,
        )
        .unwrap();
        assert_eq!(report.pairs_scanned, 6);
        assert_eq!(report.skipped, 0);
        assert_eq!(map.stats(&BucketKey::Residue(0)).unwrap().anchors, 5);
        assert_eq!(map.stats(&BucketKey::Residue(4)).unwrap().anchors, 1);
        assert_eq!(map.stats(&BucketKey::Residue(2)).unwrap().anchors, 0);
    }

    #[test]
    fn exhausted_search_skips_the_pair_entirely() {
        // A sparse fake tail: the gap between 89 and 997 means anchors near
        // the end find no prime within a tiny radius.
        let seq = PrimeSequence::from_vec_unchecked(vec![
            2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79,
            83, 89, 997, 1009, 1013, 1019, 1021, 1031, 1033, 1039,
        ]);
        // Pair (89, 997): anchor 1086, nearest loaded prime 1013 at k=73.
        let (map, report) = build(
            &seq,
            ScanWindow::new(23, 1),
            Classifier::residue(Modulus::M6),
            7,
        )
        .unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(report.pairs_scanned, 0);
        let total: u64 = map.iter().map(|(_, s)| s.anchors).sum();
        assert_eq!(total, 0);
    }

    #[test]
    fn identical_inputs_build_identical_maps() {
        let seq = prefix();
        let window = ScanWindow::new(1, 8);
        let classifier = Classifier::residue(Modulus::M30);
        let (a, _) = build(&seq, window, classifier, 10).unwrap();
        let (b, _) = build(&seq, window, classifier, 10).unwrap();
        assert_eq!(
            a.to_json_string().unwrap(),
            b.to_json_string().unwrap()
        );
    }
}
