//! Property tests for the edge-dedup merge.

use proptest::prelude::*;

use ripple_core::EdgeMetrics;

fn arb_metrics() -> impl Strategy<Value = EdgeMetrics> {
    (
        0.0..1000.0f64,
        0.0..1.0f64,
        proptest::option::of(0.0..500.0f64),
        proptest::option::of(0.0..500.0f64),
        proptest::option::of(0.0..500.0f64),
    )
        .prop_map(|(rate, error_rate, p50, p95, p99)| EdgeMetrics {
            rate,
            error_rate,
            p50,
            p95,
            p99,
        })
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

fn close_opt(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => close(x, y),
        (None, None) => true,
        _ => false,
    }
}

proptest! {
    // Rate sum and latency max are exactly commutative; the rate-weighted
    // error mean is commutative up to float rounding.
    #[test]
    fn merge_is_commutative(a in arb_metrics(), b in arb_metrics()) {
        let ab = a.merge(&b);
        let ba = b.merge(&a);
        prop_assert!(close(ab.rate, ba.rate));
        prop_assert!(close(ab.error_rate, ba.error_rate));
        prop_assert_eq!(ab.p50, ba.p50);
        prop_assert_eq!(ab.p95, ba.p95);
        prop_assert_eq!(ab.p99, ba.p99);
    }

    // Three parallel edges merge to the same result in any grouping.
    #[test]
    fn merge_is_associative(a in arb_metrics(), b in arb_metrics(), c in arb_metrics()) {
        let left = a.merge(&b).merge(&c);
        let right = a.merge(&b.merge(&c));
        prop_assert!(close(left.rate, right.rate));
        prop_assert!(close(left.error_rate, right.error_rate));
        prop_assert!(close_opt(left.p50, right.p50));
        prop_assert!(close_opt(left.p95, right.p95));
        prop_assert!(close_opt(left.p99, right.p99));
    }

    // The merged error rate is the rate-weighted mean of its inputs, so it
    // never leaves the span of the observed error rates.
    #[test]
    fn merged_error_rate_is_bounded_by_inputs(a in arb_metrics(), b in arb_metrics()) {
        let merged = a.merge(&b);
        let lo = a.error_rate.min(b.error_rate);
        let hi = a.error_rate.max(b.error_rate);
        prop_assert!(merged.error_rate >= lo - 1e-12);
        prop_assert!(merged.error_rate <= hi + 1e-12);
    }

    // Merging never loses a known latency.
    #[test]
    fn merge_preserves_latency_knowledge(a in arb_metrics(), b in arb_metrics()) {
        let merged = a.merge(&b);
        prop_assert_eq!(merged.p95.is_some(), a.p95.is_some() || b.p95.is_some());
        if let (Some(x), Some(y), Some(m)) = (a.p95, b.p95, merged.p95) {
            prop_assert_eq!(m, x.max(y));
        }
    }
}
