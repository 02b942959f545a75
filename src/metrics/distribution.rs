//! Frequency tables for strength and clustering values

use crate::config::{KeyPolicy, Normalization, MAX_KEY_DECIMALS};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Totally ordered `f64` map key
#[derive(Debug, Clone, Copy)]
struct Key(f64);

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Fold `-0.0` into `0.0` so both land in one bucket
fn fold_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

impl KeyPolicy {
    /// Map a raw value to its bucket key
    pub fn key(self, value: f64) -> f64 {
        match self {
            KeyPolicy::Exact => fold_zero(value),
            KeyPolicy::Quantized { decimals } => {
                let scale = 10f64.powi(decimals.min(MAX_KEY_DECIMALS) as i32);
                let scaled = value * scale;
                // Values too large to scale already carry no fractional digits
                if !scaled.is_finite() {
                    return fold_zero(value);
                }
                fold_zero(scaled.round() / scale)
            }
        }
    }
}

/// Ordered value -> occurrence count table
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    policy: KeyPolicy,
    counts: BTreeMap<Key, usize>,
}

impl FrequencyTable {
    pub fn new(policy: KeyPolicy) -> Self {
        Self {
            policy,
            counts: BTreeMap::new(),
        }
    }

    /// Count one occurrence of `value`
    pub fn insert(&mut self, value: f64) {
        *self.counts.entry(Key(self.policy.key(value))).or_insert(0) += 1;
    }

    /// Occurrences recorded for `value` under this table's key policy
    pub fn count(&self, value: f64) -> usize {
        self.counts
            .get(&Key(self.policy.key(value)))
            .copied()
            .unwrap_or(0)
    }

    /// `(value, count)` pairs in ascending value order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (f64, usize)> + '_ {
        self.counts.iter().map(|(key, &count)| (key.0, count))
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total_count(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn max_key(&self) -> Option<f64> {
        self.counts.keys().next_back().map(|key| key.0)
    }

    /// Derive the survival distribution: for every key `s`, the summed
    /// count of keys `>= s` over the normalization divisor.
    pub fn cumulative(&self, normalization: Normalization) -> CumulativeDistribution {
        let divisor = match normalization {
            Normalization::TotalCount => self.total_count() as f64,
            Normalization::MaxKeyCount => self
                .counts
                .values()
                .next_back()
                .map_or(0.0, |&count| count as f64),
            Normalization::MaxKey => self.max_key().unwrap_or(0.0),
        };

        let mut suffix = 0usize;
        let mut values = BTreeMap::new();
        for (&key, &count) in self.counts.iter().rev() {
            suffix += count;
            let fraction = if divisor > 0.0 && divisor.is_finite() {
                suffix as f64 / divisor
            } else {
                0.0
            };
            values.insert(key, fraction);
        }

        CumulativeDistribution { values }
    }
}

/// Ordered threshold -> fraction mapping
#[derive(Debug, Clone, Default)]
pub struct CumulativeDistribution {
    values: BTreeMap<Key, f64>,
}

impl CumulativeDistribution {
    /// `(threshold, fraction)` pairs in ascending threshold order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (f64, f64)> + '_ {
        self.values.iter().map(|(key, &fraction)| (key.0, fraction))
    }

    pub fn get(&self, threshold: f64) -> Option<f64> {
        self.values.get(&Key(fold_zero(threshold))).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(f64, f64)> for CumulativeDistribution {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(threshold, fraction)| (Key(fold_zero(threshold)), fraction))
                .collect(),
        }
    }
}

/// Strength and clustering tables filled during one pass
#[derive(Debug, Clone)]
pub struct Distributions {
    pub strength: FrequencyTable,
    pub clustering: FrequencyTable,
}

impl Distributions {
    pub fn new(policy: KeyPolicy) -> Self {
        Self {
            strength: FrequencyTable::new(policy),
            clustering: FrequencyTable::new(policy),
        }
    }

    /// Stream one node's values into both tables
    pub fn record(&mut self, strength: f64, clustering: f64) {
        self.strength.insert(strength);
        self.clustering.insert(clustering);
    }

    pub fn cumulative_strength(&self, normalization: Normalization) -> CumulativeDistribution {
        self.strength.cumulative(normalization)
    }
}
