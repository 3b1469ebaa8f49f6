use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::infrastructure::Settled;

/// One row of the ground-truth table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkCase {
    pub artwork_id: String,
    pub title: String,
    pub artist_name: String,
    pub reference_image_path: String,
    pub query_image_path: String,
}

/// Result of querying the similarity endpoint for one case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkOutcome {
    pub artwork_id: String,
    pub title: String,
    /// 1-based rank of the expected artwork, `None` when outside the top-N
    pub position: Option<usize>,
    pub milliseconds: u64,
}

/// How latency is recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LatencyMode {
    /// Full elapsed duration
    #[default]
    Elapsed,
    /// Milliseconds within the current second, as the old harness measured it
    SubSecond,
}

impl LatencyMode {
    pub fn measure(self, elapsed: Duration) -> u64 {
        let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        match self {
            LatencyMode::Elapsed => millis,
            LatencyMode::SubSecond => millis % 1000,
        }
    }
}

/// Aggregate accuracy and latency figures of a benchmark run
///
/// `total` only counts settled-fulfilled cases, rejected ones are tallied
/// in `failed` and kept out of every other ratio.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    pub first: u64,
    pub firsts5: u64,
    pub found: u64,
    pub failed: u64,
    pub total: u64,
    pub firsts_percentage: f64,
    pub firsts5_percentage: f64,
    pub found_percentage: f64,
    pub failed_percentage: f64,
    pub failed_over_found_percentage: f64,
    pub not_found: u64,
    pub milliseconds: u64,
    pub not_found_percentage: f64,
    pub not_found_over_found_relation: f64,
    pub milliseconds_average: f64,
}

impl AggregateReport {
    /// Folds every settled outcome and derives the ratios
    pub fn from_settled<E>(settled: &[Settled<BenchmarkOutcome, E>]) -> Self {
        let mut report = Self::default();
        for outcome in settled {
            match outcome {
                Ok(outcome) => report.record(outcome),
                Err(_) => report.record_failure(),
            }
        }
        report.finalize();
        report
    }

    pub fn record(&mut self, outcome: &BenchmarkOutcome) {
        match outcome.position {
            Some(position) => {
                if position == 1 {
                    self.first += 1;
                }
                if position <= 5 {
                    self.firsts5 += 1;
                }
                self.found += 1;
            }
            None => self.not_found += 1,
        }
        self.total += 1;
        self.milliseconds += outcome.milliseconds;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Derives the ratios from the counters, divisions by zero give 0
    pub fn finalize(&mut self) {
        let total = self.total as f64;
        let found = self.found as f64;
        let attempted = (self.total + self.failed) as f64;

        self.firsts_percentage = percentage(self.first as f64, total);
        self.firsts5_percentage = percentage(self.firsts5 as f64, total);
        self.found_percentage = percentage(found, total);
        self.not_found_percentage = percentage(self.not_found as f64, total);
        self.failed_percentage = percentage(self.failed as f64, attempted);
        self.failed_over_found_percentage = percentage(self.failed as f64, found);
        self.not_found_over_found_relation = ratio(self.not_found as f64, found);
        self.milliseconds_average = ratio(self.milliseconds as f64, total);
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

fn percentage(numerator: f64, denominator: f64) -> f64 {
    ratio(numerator, denominator) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::TaskFailure;

    fn outcome(id: &str, position: Option<usize>, milliseconds: u64) -> BenchmarkOutcome {
        BenchmarkOutcome {
            artwork_id: id.to_string(),
            title: format!("artwork {}", id),
            position,
            milliseconds,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.01,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_aggregates_found_not_found_and_failed() {
        let settled: Vec<Settled<BenchmarkOutcome, String>> = vec![
            Ok(outcome("1", Some(1), 100)),
            Ok(outcome("2", Some(3), 200)),
            Ok(outcome("3", None, 300)),
            Err(TaskFailure::Failed("connection reset".to_string())),
        ];

        let report = AggregateReport::from_settled(&settled);

        assert_eq!(report.total, 3);
        assert_eq!(report.first, 1);
        assert_eq!(report.firsts5, 2);
        assert_eq!(report.found, 2);
        assert_eq!(report.not_found, 1);
        assert_eq!(report.failed, 1);
        assert_close(report.found_percentage, 66.67);
        assert_close(report.firsts_percentage, 33.33);
        assert_close(report.firsts5_percentage, 66.67);
        assert_close(report.not_found_percentage, 33.33);
        assert_close(report.failed_percentage, 25.0);
        assert_close(report.failed_over_found_percentage, 50.0);
        assert_close(report.not_found_over_found_relation, 0.5);
        assert_close(report.milliseconds_average, 200.0);
    }

    #[test]
    fn test_rank_beyond_five_counts_as_found_only() {
        let mut report = AggregateReport::default();
        report.record(&outcome("9", Some(8), 10));
        report.finalize();

        assert_eq!(report.found, 1);
        assert_eq!(report.firsts5, 0);
        assert_eq!(report.first, 0);
    }

    #[test]
    fn test_empty_run_has_zero_ratios() {
        let report = AggregateReport::from_settled::<String>(&[]);
        assert_eq!(report, AggregateReport::default());
    }

    #[test]
    fn test_report_uses_camel_case_keys() {
        let value = serde_json::to_value(AggregateReport::default()).unwrap();
        for key in [
            "firsts5",
            "firstsPercentage",
            "firsts5Percentage",
            "notFound",
            "notFoundOverFoundRelation",
            "millisecondsAverage",
            "failedOverFoundPercentage",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_latency_modes() {
        let elapsed = Duration::from_millis(2345);
        assert_eq!(LatencyMode::Elapsed.measure(elapsed), 2345);
        assert_eq!(LatencyMode::SubSecond.measure(elapsed), 345);
    }
}
