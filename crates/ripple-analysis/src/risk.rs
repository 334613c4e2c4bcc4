//! Risk ranking from upstream centrality scores.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ripple_core::{CentralityScore, DataFreshness};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskMetric {
    Pagerank,
    Betweenness,
}

impl RiskMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pagerank => "pagerank",
            Self::Betweenness => "betweenness",
        }
    }
}

impl std::fmt::Display for RiskMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Band assigned by position within the returned slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskEntry {
    pub service: String,
    pub metric: RiskMetric,
    pub score: f64,
    pub rank: usize,
    pub band: RiskBand,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskList {
    pub metric: RiskMetric,
    pub entries: Vec<RiskEntry>,
    pub data_freshness: DataFreshness,
    pub generated_at: DateTime<Utc>,
}

/// Sort descending by the selected metric, slice to `limit`, band by
/// position: top 20% high, next 30% medium, the rest (and any zero
/// score) low.
pub fn rank_services(
    mut scores: Vec<CentralityScore>,
    metric: RiskMetric,
    limit: usize,
) -> Vec<RiskEntry> {
    let read = |s: &CentralityScore| match metric {
        RiskMetric::Pagerank => s.pagerank,
        RiskMetric::Betweenness => s.betweenness,
    };
    scores.sort_by(|a, b| {
        read(b)
            .partial_cmp(&read(a))
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.service.cmp(&b.service))
    });
    scores.truncate(limit);

    let n = scores.len();
    let high_cut = (n as f64 * 0.2).ceil() as usize;
    let medium_cut = (n as f64 * 0.5).ceil() as usize;

    scores
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            let score = read(&s);
            let band = if score <= 0.0 {
                RiskBand::Low
            } else if i < high_cut {
                RiskBand::High
            } else if i < medium_cut {
                RiskBand::Medium
            } else {
                RiskBand::Low
            };
            let explanation = explain(&s.service, metric, score, i + 1, n);
            RiskEntry {
                service: s.service,
                metric,
                score,
                rank: i + 1,
                band,
                explanation,
            }
        })
        .collect()
}

fn explain(service: &str, metric: RiskMetric, score: f64, rank: usize, total: usize) -> String {
    match metric {
        RiskMetric::Pagerank => format!(
            "{service} ranks #{rank} of {total} by pagerank (score {score:.4}); many services \
             depend on it directly or transitively, so an outage spreads wide."
        ),
        RiskMetric::Betweenness => format!(
            "{service} ranks #{rank} of {total} by betweenness (score {score:.4}); it sits on \
             many call paths between other services, so it is a frequent chokepoint."
        ),
    }
}
