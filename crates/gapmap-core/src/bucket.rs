//! Bucket classification: residue axis, optional gap-category axis, and the
//! string key encoding used by the persisted artifact.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported residue moduli. Primorials 6, 30, and 210.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum Modulus {
    M6,
    M30,
    M210,
}

impl Modulus {
    /// The numeric modulus.
    pub fn value(self) -> u64 {
        match self {
            Modulus::M6 => 6,
            Modulus::M30 => 30,
            Modulus::M210 => 210,
        }
    }

    /// Residue of an anchor under this modulus.
    pub fn residue(self, anchor: u64) -> u64 {
        anchor % self.value()
    }
}

impl TryFrom<u64> for Modulus {
    type Error = String;

    fn try_from(value: u64) -> std::result::Result<Self, Self::Error> {
        match value {
            6 => Ok(Modulus::M6),
            30 => Ok(Modulus::M30),
            210 => Ok(Modulus::M210),
            other => Err(format!("unsupported modulus {other}: expected 6, 30, or 210")),
        }
    }
}

impl From<Modulus> for u64 {
    fn from(m: Modulus) -> u64 {
        m.value()
    }
}

impl fmt::Display for Modulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl FromStr for Modulus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let value: u64 = s
            .parse()
            .map_err(|_| format!("not a modulus: {s:?}"))?;
        Modulus::try_from(value)
    }
}

/// Three-way discretization of a prime gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GapCategory {
    Small,
    Medium,
    Large,
}

impl GapCategory {
    /// All categories, in key order.
    pub const ALL: [GapCategory; 3] = [GapCategory::Small, GapCategory::Medium, GapCategory::Large];
}

impl fmt::Display for GapCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GapCategory::Small => "Small",
            GapCategory::Medium => "Medium",
            GapCategory::Large => "Large",
        };
        f.write_str(s)
    }
}

impl FromStr for GapCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Small" => Ok(GapCategory::Small),
            "Medium" => Ok(GapCategory::Medium),
            "Large" => Ok(GapCategory::Large),
            other => Err(format!("unknown gap category {other:?}")),
        }
    }
}

/// Fixed cutoffs for the gap axis. Empirical constants around the observed
/// mean gap of a prior scan; never recomputed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapThresholds {
    /// Gaps strictly below this are Small.
    pub small_below: u64,
    /// Gaps at or above this are Large.
    pub large_from: u64,
}

impl GapThresholds {
    /// Defaults derived from the 50M-pair survey (mean gap ~19.6).
    pub const DEFAULT: GapThresholds = GapThresholds {
        small_below: 18,
        large_from: 22,
    };

    /// Bucket a gap into Small / Medium / Large.
    pub fn categorize(&self, gap: u64) -> GapCategory {
        if gap < self.small_below {
            GapCategory::Small
        } else if gap >= self.large_from {
            GapCategory::Large
        } else {
            GapCategory::Medium
        }
    }
}

impl Default for GapThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A bucket in the frequency map: a residue, optionally crossed with a gap
/// category.
///
/// The ordering (residue first, category second) fixes the iteration order of
/// the map and therefore the byte layout of the serialized artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BucketKey {
    Residue(u64),
    Compound(u64, GapCategory),
}

impl BucketKey {
    /// The residue component.
    pub fn residue(&self) -> u64 {
        match self {
            BucketKey::Residue(r) | BucketKey::Compound(r, _) => *r,
        }
    }

    /// Parse the string encoding used by the persisted artifact:
    /// `"<residue>"` or `"<residue>,<Category>"`.
    pub fn parse(key: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidKey {
            key: key.to_string(),
            reason: reason.to_string(),
        };
        match key.split_once(',') {
            None => {
                let residue = key
                    .parse()
                    .map_err(|_| invalid("residue is not an integer"))?;
                Ok(BucketKey::Residue(residue))
            }
            Some((residue, category)) => {
                let residue = residue
                    .parse()
                    .map_err(|_| invalid("residue is not an integer"))?;
                let category = category.parse().map_err(|_| {
                    invalid("gap category is not one of Small, Medium, Large")
                })?;
                Ok(BucketKey::Compound(residue, category))
            }
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketKey::Residue(r) => write!(f, "{r}"),
            BucketKey::Compound(r, c) => write!(f, "{r},{c}"),
        }
    }
}

/// Classification scheme: a modulus, optionally crossed with gap thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classifier {
    pub modulus: Modulus,
    /// Present for compound (residue x gap-category) maps.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub gap_thresholds: Option<GapThresholds>,
}

impl Classifier {
    /// Single-axis residue classification.
    pub fn residue(modulus: Modulus) -> Self {
        Self {
            modulus,
            gap_thresholds: None,
        }
    }

    /// Compound residue x gap-category classification.
    pub fn compound(modulus: Modulus, thresholds: GapThresholds) -> Self {
        Self {
            modulus,
            gap_thresholds: Some(thresholds),
        }
    }

    /// Classify one anchor pair.
    pub fn classify(&self, anchor: u64, gap: u64) -> BucketKey {
        let residue = self.modulus.residue(anchor);
        match self.gap_thresholds {
            None => BucketKey::Residue(residue),
            Some(t) => BucketKey::Compound(residue, t.categorize(gap)),
        }
    }

    /// Number of keys in the full domain: M, or 3M for compound schemes.
    pub fn key_count(&self) -> usize {
        let m = self.modulus.value() as usize;
        if self.gap_thresholds.is_some() {
            m * GapCategory::ALL.len()
        } else {
            m
        }
    }

    /// Every key in the domain, in serialization order. The builder seeds
    /// the map from this so downstream lookups never hit a missing key.
    pub fn domain(&self) -> impl Iterator<Item = BucketKey> + '_ {
        let compound = self.gap_thresholds.is_some();
        (0..self.modulus.value()).flat_map(move |r| {
            let keys: Vec<BucketKey> = if compound {
                GapCategory::ALL
                    .iter()
                    .map(|&c| BucketKey::Compound(r, c))
                    .collect()
            } else {
                vec![BucketKey::Residue(r)]
            };
            keys
        })
    }
}
