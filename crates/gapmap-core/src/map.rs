//! The frequency map: per-bucket counters, derived failure rates, and the
//! persisted JSON artifact.
//!
//! The map always covers the full key domain of its classifier. A bucket
//! that never saw an anchor keeps `anchors == 0` and reads back as an
//! infinite rate ("impossible"), which is a different thing from an observed
//! bucket with zero failures (rate exactly 0.0). Lookups therefore never
//! miss, and no error path can degrade into a plausible finite score.

use crate::bucket::{BucketKey, Classifier};
use crate::errors::{Error, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Current artifact schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Sentinel token for an infinite rate in the JSON artifact (JSON has no
/// infinity literal).
const INF_TOKEN: &str = "inf";

/// Integer counters for one bucket. The rate is derived on read, never
/// accumulated as a float, so rebuilding from the same input is bit-exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketStats {
    pub anchors: u64,
    pub failures: u64,
}

impl BucketStats {
    /// Failures over anchors; +inf for a never-observed bucket.
    pub fn failure_rate(&self) -> f64 {
        if self.anchors == 0 {
            f64::INFINITY
        } else {
            self.failures as f64 / self.anchors as f64
        }
    }
}

/// A finished residue/gap frequency map.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyMap {
    classifier: Classifier,
    pairs_scanned: u64,
    skipped: u64,
    buckets: BTreeMap<BucketKey, BucketStats>,
}

impl FrequencyMap {
    /// An empty map seeded with every key in the classifier's domain.
    pub fn new(classifier: Classifier) -> Self {
        let buckets = classifier
            .domain()
            .map(|key| (key, BucketStats::default()))
            .collect();
        Self {
            classifier,
            pairs_scanned: 0,
            skipped: 0,
            buckets,
        }
    }

    /// The classification scheme this map was built with.
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Count one anchor in `key`, and one failure when `failure` is set.
    pub(crate) fn record(&mut self, key: BucketKey, failure: bool) {
        let stats = self.buckets.entry(key).or_default();
        stats.anchors += 1;
        if failure {
            stats.failures += 1;
        }
    }

    pub(crate) fn set_scan_counts(&mut self, pairs_scanned: u64, skipped: u64) {
        self.pairs_scanned = pairs_scanned;
        self.skipped = skipped;
    }

    /// Pairs that contributed to the counters.
    pub fn pairs_scanned(&self) -> u64 {
        self.pairs_scanned
    }

    /// Pairs dropped because the nearest-prime search exhausted its radius.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Counters for one bucket. Present for every in-domain key.
    pub fn stats(&self, key: &BucketKey) -> Option<&BucketStats> {
        self.buckets.get(key)
    }

    /// Iterate buckets in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&BucketKey, &BucketStats)> {
        self.buckets.iter()
    }

    /// Failure rate for an anchor, possibly infinite.
    ///
    /// Single-axis maps ignore `gap`. A compound map looked up without a gap
    /// answers with infinity: the bucket cannot be resolved, and ambiguity
    /// surfaces as the sentinel rather than a fabricated finite score.
    pub fn rate(&self, anchor: u64, gap: Option<u64>) -> f64 {
        let gap = match (self.classifier.gap_thresholds, gap) {
            (Some(_), None) => return f64::INFINITY,
            (_, g) => g.unwrap_or(0),
        };
        let key = self.classifier.classify(anchor, gap);
        self.buckets
            .get(&key)
            .map(BucketStats::failure_rate)
            .unwrap_or(f64::INFINITY)
    }

    /// Serialize to the canonical artifact JSON. Stable key order; two maps
    /// with identical counters produce identical bytes.
    pub fn to_json_string(&self) -> Result<String> {
        let artifact = Artifact::from(self);
        let mut out = serde_json::to_string_pretty(&artifact)?;
        out.push('\n');
        Ok(out)
    }

    /// Write the artifact, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_json_string()?)?;
        tracing::info!(path = %path.display(), buckets = self.buckets.len(), "saved frequency map");
        Ok(())
    }

    /// Load and validate a persisted artifact.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingInput {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let artifact: Artifact = serde_json::from_str(&content)?;
        artifact.try_into()
    }
}

/// One bucket in the serialized artifact. `rate` is redundant with the
/// counters but kept in the file so the artifact is readable on its own.
#[derive(Debug, Serialize, Deserialize)]
struct BucketRecord {
    anchors: u64,
    failures: u64,
    rate: Rate,
}

/// The on-disk shape of a frequency map.
#[derive(Debug, Serialize, Deserialize)]
struct Artifact {
    schema_version: u32,
    #[serde(flatten)]
    classifier: Classifier,
    pairs_scanned: u64,
    skipped: u64,
    buckets: BTreeMap<String, BucketRecord>,
}

impl From<&FrequencyMap> for Artifact {
    fn from(map: &FrequencyMap) -> Self {
        let buckets = map
            .buckets
            .iter()
            .map(|(key, stats)| {
                (
                    key.to_string(),
                    BucketRecord {
                        anchors: stats.anchors,
                        failures: stats.failures,
                        rate: Rate(stats.failure_rate()),
                    },
                )
            })
            .collect();
        Artifact {
            schema_version: SCHEMA_VERSION,
            classifier: map.classifier,
            pairs_scanned: map.pairs_scanned,
            skipped: map.skipped,
            buckets,
        }
    }
}

impl TryFrom<Artifact> for FrequencyMap {
    type Error = Error;

    fn try_from(artifact: Artifact) -> Result<Self> {
        if artifact.schema_version != SCHEMA_VERSION {
            return Err(Error::BadArtifact {
                reason: format!(
                    "unsupported schema_version {} (expected {})",
                    artifact.schema_version, SCHEMA_VERSION
                ),
            });
        }
        let mut map = FrequencyMap::new(artifact.classifier);
        for (raw_key, record) in &artifact.buckets {
            let key = BucketKey::parse(raw_key)?;
            if record.failures > record.anchors {
                return Err(Error::BadArtifact {
                    reason: format!(
                        "bucket {raw_key}: failures {} exceed anchors {}",
                        record.failures, record.anchors
                    ),
                });
            }
            let Some(stats) = map.buckets.get_mut(&key) else {
                return Err(Error::BadArtifact {
                    reason: format!("bucket {raw_key} outside the classifier domain"),
                });
            };
            *stats = BucketStats {
                anchors: record.anchors,
                failures: record.failures,
            };
        }
        if artifact.buckets.len() != map.classifier.key_count() {
            return Err(Error::BadArtifact {
                reason: format!(
                    "artifact has {} buckets, classifier domain has {}",
                    artifact.buckets.len(),
                    map.classifier.key_count()
                ),
            });
        }
        map.pairs_scanned = artifact.pairs_scanned;
        map.skipped = artifact.skipped;
        Ok(map)
    }
}

/// A failure rate as persisted: a JSON number, or the `"inf"` token.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Rate(f64);

impl Serialize for Rate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.0.is_infinite() {
            serializer.serialize_str(INF_TOKEN)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Rate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RateVisitor;

        impl Visitor<'_> for RateVisitor {
            type Value = Rate;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a number or the string {INF_TOKEN:?}")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Rate, E> {
                Ok(Rate(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Rate, E> {
                Ok(Rate(v as f64))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Rate, E> {
                Ok(Rate(v as f64))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Rate, E> {
                if v == INF_TOKEN {
                    Ok(Rate(f64::INFINITY))
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(v), &self))
                }
            }
        }

        deserializer.deserialize_any(RateVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::{GapThresholds, Modulus};

    fn sample_map() -> FrequencyMap {
        let mut map = FrequencyMap::new(Classifier::residue(Modulus::M6));
        map.record(BucketKey::Residue(0), false);
        map.record(BucketKey::Residue(0), true);
        map.record(BucketKey::Residue(2), false);
        map.set_scan_counts(3, 1);
        map
    }

    #[test]
    fn empty_bucket_reads_as_infinity_not_zero() {
        let map = sample_map();
        assert!(map.rate(3, None).is_infinite());
        // Observed but failure-free: a real, finite, perfectly clean score.
        assert_eq!(map.rate(2, None), 0.0);
        assert_eq!(map.rate(6, None), 0.5);
    }

    #[test]
    fn artifact_round_trips_including_the_sentinel() {
        let map = sample_map();
        let json = map.to_json_string().unwrap();
        assert!(json.contains("\"inf\""));
        let artifact: Artifact = serde_json::from_str(&json).unwrap();
        let restored = FrequencyMap::try_from(artifact).unwrap();
        assert_eq!(restored, map);
        assert!(restored.rate(1, None).is_infinite());
    }

    #[test]
    fn serialization_is_deterministic() {
        let a = sample_map().to_json_string().unwrap();
        let b = sample_map().to_json_string().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn compound_lookup_without_a_gap_is_infinite() {
        let mut map = FrequencyMap::new(Classifier::compound(
            Modulus::M6,
            GapThresholds::DEFAULT,
        ));
        let key = map.classifier.classify(12, 4);
        map.record(key, false);
        assert_eq!(map.rate(12, Some(4)), 0.0);
        assert!(map.rate(12, None).is_infinite());
    }

    #[test]
    fn load_rejects_out_of_domain_buckets() {
        let json = r#"{
            "schema_version": 1,
            "modulus": 6,
            "pairs_scanned": 0,
            "skipped": 0,
            "buckets": {
                "0": {"anchors": 0, "failures": 0, "rate": "inf"},
                "1": {"anchors": 0, "failures": 0, "rate": "inf"},
                "2": {"anchors": 0, "failures": 0, "rate": "inf"},
                "3": {"anchors": 0, "failures": 0, "rate": "inf"},
                "4": {"anchors": 0, "failures": 0, "rate": "inf"},
                "9": {"anchors": 0, "failures": 0, "rate": "inf"}
            }
        }"#;
        let artifact: Artifact = serde_json::from_str(json).unwrap();
        let err = FrequencyMap::try_from(artifact).unwrap_err();
        assert!(matches!(err, Error::BadArtifact { .. }));
    }

    #[test]
    fn load_rejects_failures_exceeding_anchors() {
        let json = r#"{
            "schema_version": 1,
            "modulus": 6,
            "pairs_scanned": 0,
            "skipped": 0,
            "buckets": {
                "0": {"anchors": 1, "failures": 2, "rate": 2.0},
                "1": {"anchors": 0, "failures": 0, "rate": "inf"},
                "2": {"anchors": 0, "failures": 0, "rate": "inf"},
                "3": {"anchors": 0, "failures": 0, "rate": "inf"},
                "4": {"anchors": 0, "failures": 0, "rate": "inf"},
                "5": {"anchors": 0, "failures": 0, "rate": "inf"}
            }
        }"#;
        let artifact: Artifact = serde_json::from_str(json).unwrap();
        let err = FrequencyMap::try_from(artifact).unwrap_err();
        assert!(matches!(err, Error::BadArtifact { .. }));
    }
}
