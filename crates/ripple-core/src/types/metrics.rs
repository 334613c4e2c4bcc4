//! Edge metrics, the latency-metric selector, and the scaling-model kind.

use serde::{Deserialize, Serialize};

/// Which latency percentile a simulation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatencyMetric {
    P50,
    P95,
    P99,
}

impl LatencyMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P50 => "p50",
            Self::P95 => "p95",
            Self::P99 => "p99",
        }
    }
}

impl std::fmt::Display for LatencyMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which latency model a scaling simulation applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingModelKind {
    BoundedSqrt,
    Linear,
}

impl ScalingModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BoundedSqrt => "bounded_sqrt",
            Self::Linear => "linear",
        }
    }
}

/// Observed metrics on one caller→callee edge.
///
/// Rate and error rate are non-negative and coerce missing values to 0 when
/// merging. Latency percentiles stay `None` when no observation carried
/// them, so absence propagates as "unknown" into scaling math instead of a
/// silent zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeMetrics {
    pub rate: f64,
    pub error_rate: f64,
    pub p50: Option<f64>,
    pub p95: Option<f64>,
    pub p99: Option<f64>,
}

impl EdgeMetrics {
    /// Read the selected latency percentile.
    pub fn latency(&self, metric: LatencyMetric) -> Option<f64> {
        match metric {
            LatencyMetric::P50 => self.p50,
            LatencyMetric::P95 => self.p95,
            LatencyMetric::P99 => self.p99,
        }
    }

    /// Merge a parallel observation of the same ordered `(from, to)` pair.
    ///
    /// Rates sum; error rates are rate-weighted (falling back to the max
    /// when the combined rate is 0); latencies take the pairwise max, the
    /// worst observed. Commutative and associative on rates and latencies.
    pub fn merge(&self, other: &EdgeMetrics) -> EdgeMetrics {
        let rate = self.rate + other.rate;
        let error_rate = if rate > 0.0 {
            (self.error_rate * self.rate + other.error_rate * other.rate) / rate
        } else {
            self.error_rate.max(other.error_rate)
        };
        EdgeMetrics {
            rate,
            error_rate,
            p50: max_latency(self.p50, other.p50),
            p95: max_latency(self.p95, other.p95),
            p99: max_latency(self.p99, other.p99),
        }
    }
}

/// Max of two optional latencies; a present value always wins over absence.
fn max_latency(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.max(y)),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(rate: f64, error_rate: f64, p95: Option<f64>) -> EdgeMetrics {
        EdgeMetrics {
            rate,
            error_rate,
            p50: None,
            p95,
            p99: None,
        }
    }

    #[test]
    fn merge_sums_rates_and_weights_errors() {
        let merged = edge(10.0, 0.1, Some(100.0)).merge(&edge(20.0, 0.05, Some(120.0)));
        assert_eq!(merged.rate, 30.0);
        assert!((merged.error_rate - (10.0 * 0.1 + 20.0 * 0.05) / 30.0).abs() < 1e-12);
        assert_eq!(merged.p95, Some(120.0));
    }

    #[test]
    fn merge_zero_rate_falls_back_to_max_error() {
        let merged = edge(0.0, 0.2, None).merge(&edge(0.0, 0.7, None));
        assert_eq!(merged.rate, 0.0);
        assert_eq!(merged.error_rate, 0.7);
    }

    #[test]
    fn merge_keeps_latency_unknown_only_when_both_absent() {
        let merged = edge(1.0, 0.0, None).merge(&edge(1.0, 0.0, Some(15.0)));
        assert_eq!(merged.p95, Some(15.0));
        let merged = edge(1.0, 0.0, None).merge(&edge(1.0, 0.0, None));
        assert_eq!(merged.p95, None);
    }
}
