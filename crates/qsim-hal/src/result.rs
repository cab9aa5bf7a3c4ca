//! Measurement results.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Histogram of measured bitstrings.
///
/// Backed by a `BTreeMap` so iteration and serialization order are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: BTreeMap<String, u64>,
}

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Merge another histogram into this one.
    pub fn merge(&mut self, other: Counts) {
        for (bitstring, count) in other.counts {
            self.insert(bitstring, count);
        }
    }

    /// Occurrences of `bitstring` (0 if never seen).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check whether no outcome was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(bitstring, count)` in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.counts.iter()
    }

    /// Outcomes sorted by descending count, ties by bitstring.
    pub fn sorted(&self) -> Vec<(&String, &u64)> {
        let mut sorted: Vec<_> = self.counts.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        sorted
    }

    /// The most frequent outcome.
    pub fn most_frequent(&self) -> Option<(&String, &u64)> {
        self.sorted().into_iter().next()
    }

    /// Relative frequency of each outcome.
    pub fn probabilities(&self) -> BTreeMap<String, f64> {
        let total = self.total_shots() as f64;
        if total == 0.0 {
            return BTreeMap::new();
        }
        self.counts
            .iter()
            .map(|(k, &v)| (k.clone(), v as f64 / total))
            .collect()
    }
}

impl FromIterator<(String, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (bitstring, count) in iter {
            counts.insert(bitstring, count);
        }
        counts
    }
}

/// Outcome of one circuit execution.
///
/// A failed run carries `successful = false`, an `error_message` and empty
/// counts; a successful run satisfies `counts.total_shots() == shots`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Id of the executed circuit.
    pub circuit_id: String,
    /// Backend that produced the result.
    pub backend: String,
    /// Measurement histogram.
    pub counts: Counts,
    /// Requested shots.
    pub shots: u32,
    /// Whether the run completed.
    pub successful: bool,
    /// Reason for failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Wall-clock time of the run.
    pub processing_time_ms: u64,
    /// `1 − max norm drift` observed during evolution, clamped to
    /// `[0, 1]`; 1.0 for an exact noiseless simulation.
    pub fidelity: f64,
    /// When the run finished.
    pub completed_at: DateTime<Utc>,
}

impl ExecutionResult {
    /// Create a successful result.
    pub fn success(
        circuit_id: impl Into<String>,
        backend: impl Into<String>,
        counts: Counts,
        shots: u32,
    ) -> Self {
        Self {
            circuit_id: circuit_id.into(),
            backend: backend.into(),
            counts,
            shots,
            successful: true,
            error_message: None,
            processing_time_ms: 0,
            fidelity: 1.0,
            completed_at: Utc::now(),
        }
    }

    /// Create a failed result.
    pub fn failure(
        circuit_id: impl Into<String>,
        backend: impl Into<String>,
        shots: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            circuit_id: circuit_id.into(),
            backend: backend.into(),
            counts: Counts::new(),
            shots,
            successful: false,
            error_message: Some(message.into()),
            processing_time_ms: 0,
            fidelity: 0.0,
            completed_at: Utc::now(),
        }
    }

    /// Set the processing time.
    #[must_use]
    pub fn with_processing_time(mut self, ms: u64) -> Self {
        self.processing_time_ms = ms;
        self
    }

    /// Set the fidelity.
    #[must_use]
    pub fn with_fidelity(mut self, fidelity: f64) -> Self {
        self.fidelity = fidelity.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let mut counts = Counts::new();
        counts.insert("00", 3);
        counts.insert("11", 5);
        counts.insert("00", 2);

        assert_eq!(counts.get("00"), 5);
        assert_eq!(counts.get("01"), 0);
        assert_eq!(counts.total_shots(), 10);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_counts_sorted_and_most_frequent() {
        let counts: Counts = [("01".to_string(), 4), ("10".to_string(), 9), ("00".to_string(), 4)]
            .into_iter()
            .collect();

        let sorted: Vec<_> = counts.sorted().into_iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(sorted, vec!["10", "00", "01"]);
        assert_eq!(counts.most_frequent(), Some((&"10".to_string(), &9)));
    }

    #[test]
    fn test_counts_merge_and_probabilities() {
        let mut a = Counts::new();
        a.insert("0", 1);
        let mut b = Counts::new();
        b.insert("0", 1);
        b.insert("1", 2);
        a.merge(b);

        let p = a.probabilities();
        assert!((p["0"] - 0.5).abs() < 1e-12);
        assert!((p["1"] - 0.5).abs() < 1e-12);
        assert!(Counts::new().probabilities().is_empty());
    }

    #[test]
    fn test_result_wire_form() {
        let mut counts = Counts::new();
        counts.insert("11", 100);
        let result = ExecutionResult::success("c1", "simulator", counts, 100)
            .with_processing_time(7)
            .with_fidelity(1.2);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["counts"]["11"], 100);
        assert_eq!(json["successful"], true);
        assert_eq!(json["processingTimeMs"], 7);
        assert_eq!(json["fidelity"], 1.0);
        assert!(json.get("errorMessage").is_none());
    }

    #[test]
    fn test_failure_result() {
        let result = ExecutionResult::failure("c1", "simulator", 10, "boom");
        assert!(!result.successful);
        assert_eq!(result.error_message.as_deref(), Some("boom"));
        assert!(result.counts.is_empty());
    }
}
