//! Latency models for replica-count changes.
//!
//! Both models are single-shot: applied once to the baseline, never
//! iterated. The bounded_sqrt clamp keeps projections from promising more
//! than `min_latency_factor` of the baseline no matter how many replicas
//! are added.

use ripple_core::ScalingModelKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LatencyModel {
    /// `projected = baseline · (α + (1−α)/√r)` with `r = new/current`,
    /// floored at `baseline · min_latency_factor`.
    BoundedSqrt { alpha: f64, min_latency_factor: f64 },
    /// `projected = baseline · (current/new)`.
    Linear,
}

impl LatencyModel {
    pub fn kind(&self) -> ScalingModelKind {
        match self {
            Self::BoundedSqrt { .. } => ScalingModelKind::BoundedSqrt,
            Self::Linear => ScalingModelKind::Linear,
        }
    }

    pub fn project(&self, baseline: f64, current_pods: u32, new_pods: u32) -> f64 {
        if current_pods == new_pods {
            // Identity: unchanged replica counts project the baseline
            // exactly, independent of float rounding in α arithmetic.
            return baseline;
        }
        match self {
            Self::BoundedSqrt {
                alpha,
                min_latency_factor,
            } => {
                let ratio = f64::from(new_pods) / f64::from(current_pods);
                let improvement = 1.0 / ratio.sqrt();
                let projected = baseline * (alpha + (1.0 - alpha) * improvement);
                projected.max(baseline * min_latency_factor)
            }
            Self::Linear => baseline * (f64::from(current_pods) / f64::from(new_pods)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_sqrt_scale_up() {
        let model = LatencyModel::BoundedSqrt {
            alpha: 0.5,
            min_latency_factor: 0.6,
        };
        // r = 3, improvement = 1/√3 ≈ 0.5774
        let projected = model.project(34.67, 2, 6);
        assert!((projected - 27.343).abs() < 0.01, "got {projected}");
        // Above the clamp floor of 20.80.
        assert!(projected > 34.67 * 0.6);
    }

    #[test]
    fn bounded_sqrt_clamps_extreme_scale_up() {
        let model = LatencyModel::BoundedSqrt {
            alpha: 0.5,
            min_latency_factor: 0.6,
        };
        let projected = model.project(100.0, 1, 1000);
        assert_eq!(projected, 60.0);
    }

    #[test]
    fn bounded_sqrt_scale_down_degrades_unclamped() {
        let model = LatencyModel::BoundedSqrt {
            alpha: 0.5,
            min_latency_factor: 0.6,
        };
        // r = 0.5, improvement = 1/√0.5 ≈ 1.414, so latency rises.
        let projected = model.project(100.0, 4, 2);
        assert!(projected > 100.0);
    }

    #[test]
    fn linear_halves_on_doubling() {
        assert_eq!(LatencyModel::Linear.project(100.0, 2, 4), 50.0);
    }

    #[test]
    fn equal_pods_is_identity_for_both_models() {
        let bounded = LatencyModel::BoundedSqrt {
            alpha: 0.3,
            min_latency_factor: 0.6,
        };
        assert_eq!(bounded.project(123.45, 5, 5), 123.45);
        assert_eq!(LatencyModel::Linear.project(123.45, 5, 5), 123.45);
    }
}
