//! Property tests for frequency clamping and quadrature decoding.

use axis_controller::config::{FeedConfig, PulseLimits, SpindleConfig};
use axis_controller::encoder::{decode, QuadratureDecoder};
use proptest::prelude::*;

const GRAY: [(bool, bool); 4] = [(false, false), (true, false), (true, true), (false, true)];

proptest! {
    #[test]
    fn clamped_frequency_stays_in_limits(hz in proptest::num::f32::ANY) {
        let limits = PulseLimits::default();
        let clamped = limits.clamp(hz);
        prop_assert!(clamped >= limits.min_frequency.0);
        prop_assert!(clamped <= limits.max_frequency.0);
    }

    #[test]
    fn in_range_frequency_is_unchanged(hz in 1.0f32..=375_000.0) {
        prop_assert_eq!(PulseLimits::default().clamp(hz), hz);
    }

    #[test]
    fn spindle_frequency_is_rpm_times_ppr(rpm in 100u16..=6000) {
        let config = SpindleConfig::default();
        let expected = rpm as f32 * 22_333.0 / 60.0;
        let actual = config.frequency_for_rpm(rpm);
        prop_assert!((actual - expected).abs() <= expected * 1e-5);
    }

    #[test]
    fn feed_frequency_is_velocity_times_steps(velocity in 1.0f32..=400.0) {
        let config = FeedConfig::default();
        prop_assert!((config.frequency_for_velocity(velocity) - velocity * 750.0).abs() < 0.1);
    }

    #[test]
    fn single_direction_counts_one_per_edge(edges in 0usize..2000, forward in any::<bool>(), start in 0usize..4) {
        let decoder = QuadratureDecoder::new();
        let (a, b) = GRAY[start];
        decoder.prime(a, b);

        let mut phase = start;
        for _ in 0..edges {
            phase = if forward { (phase + 1) % 4 } else { (phase + 3) % 4 };
            let (a, b) = GRAY[phase];
            decoder.on_edge(a, b);
        }

        let expected = if forward { edges as i32 } else { -(edges as i32) };
        prop_assert_eq!(decoder.counts(), expected);
    }

    #[test]
    fn invalid_transitions_count_zero(prev in 0u8..4) {
        // staying put, or jumping to the opposite state
        prop_assert_eq!(decode(prev, prev), 0);
        prop_assert_eq!(decode(prev, prev ^ 0b11), 0);
    }
}
