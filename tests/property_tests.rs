//! Property-based tests for the control-loop invariants
//!
//! Mathematical invariants the rest of the system leans on: every
//! normalized reading, PID output, and motor command stays inside its
//! documented bounds for any input.

use proptest::prelude::*;

use sendero::control::{MotorPair, PidController, SensorArray, TrackState};
use sendero::sim::{lateral_error, NoiseSource};

// ============================================================================
// Strategies
// ============================================================================

fn arb_unit_vec(len: usize) -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(0.0f64..=1.0, len)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: normalization lands in [0, 1] for any calibration,
    /// including white == black (the epsilon guard).
    #[test]
    fn prop_normalized_always_unit_interval(
        white in arb_unit_vec(5),
        black in arb_unit_vec(5),
        raw in arb_unit_vec(5),
    ) {
        let mut array = SensorArray::new(5);
        let mut noise = NoiseSource::disabled();
        array.calibrate(&white, &black, &mut noise).unwrap();

        let normalized = array.read_normalized(&raw).unwrap();
        prop_assert!(normalized.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    /// Property: calibration references stay in [0, 1] under any seed.
    #[test]
    fn prop_calibration_stays_unit_interval(
        white in arb_unit_vec(5),
        black in arb_unit_vec(5),
        seed in any::<u64>(),
    ) {
        let mut array = SensorArray::new(5);
        let mut noise = NoiseSource::seeded(seed);
        array.calibrate(&white, &black, &mut noise).unwrap();

        for channel in 0..5 {
            let (w, b) = array.calibration(channel).unwrap();
            prop_assert!((0.0..=1.0).contains(&w));
            prop_assert!((0.0..=1.0).contains(&b));
        }
    }

    /// Property: PID output is clamped to [-1, 1] for any error sequence
    /// and positive dt.
    #[test]
    fn prop_pid_output_clamped(
        errors in proptest::collection::vec(-1e6f64..1e6, 1..20),
        dt in 1e-3f64..10.0,
    ) {
        let mut pid = PidController::new(0.8, 0.1, 0.2);
        for error in errors {
            let output = pid.update(error, dt);
            prop_assert!((-1.0..=1.0).contains(&output));
        }
    }

    /// Property: motor commands are clamped to [-1, 1] regardless of
    /// base speed and correction magnitude.
    #[test]
    fn prop_motor_outputs_clamped(
        base in -10.0f64..10.0,
        diff in -10.0f64..10.0,
    ) {
        let (left, right) = MotorPair::new().drive(base, diff);
        prop_assert!((-1.0..=1.0).contains(&left));
        prop_assert!((-1.0..=1.0).contains(&right));
    }

    /// Property: on-track classification agrees with the frame mean.
    #[test]
    fn prop_track_matches_mean(frame in arb_unit_vec(5)) {
        let mean = frame.iter().sum::<f64>() / 5.0;
        let expected = (0.2..=0.8).contains(&mean);
        prop_assert_eq!(TrackState::new().update(&frame), expected);
    }

    /// Property: left-right symmetric frames carry no lateral error.
    #[test]
    fn prop_symmetric_frames_zero_error(
        half in arb_unit_vec(2),
        center in 0.0f64..=1.0,
    ) {
        let mut frame = half.clone();
        frame.push(center);
        frame.extend(half.iter().rev());
        prop_assert!(lateral_error(&frame).abs() < 1e-9);
    }
}
