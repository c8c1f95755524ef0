//! Calibrated IR sensor array model

use tracing::debug;

use crate::sim::NoiseSource;
use crate::{Error, Result};

/// Guard against division by zero when a channel's white and black
/// reference levels coincide.
const NORMALIZE_EPSILON: f64 = 1e-6;

/// Model of an N-channel IR line-sensor array.
///
/// Holds one `(white, black)` reference-intensity pair per channel, each
/// clamped to `[0, 1]`. Raw readings are affine-mapped into `[0, 1]`
/// position confidence, where 0 is the darkest reference and 1 the
/// lightest.
#[derive(Debug, Clone)]
pub struct SensorArray {
    white: Vec<f64>,
    black: Vec<f64>,
}

impl SensorArray {
    /// Create an array of `channels` sensors with the identity calibration
    /// (white = 1.0, black = 0.0).
    #[must_use]
    pub fn new(channels: usize) -> Self {
        Self {
            white: vec![1.0; channels],
            black: vec![0.0; channels],
        }
    }

    /// Number of channels in the array.
    #[must_use]
    pub fn len(&self) -> usize {
        self.white.len()
    }

    /// Check whether the array has no channels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.white.is_empty()
    }

    /// Get the stored `(white, black)` pair for a channel, if it exists.
    #[must_use]
    pub fn calibration(&self, channel: usize) -> Option<(f64, f64)> {
        Some((*self.white.get(channel)?, *self.black.get(channel)?))
    }

    /// Calibrate every channel against the supplied reference levels.
    ///
    /// Each white reference is perturbed by noise drawn from `[-0.05, 0)`
    /// and each black reference by noise from `[0, 0.05)` to emulate sensor
    /// variance, then clamped to `[0, 1]` and stored. A disabled noise
    /// source stores the references exactly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Scenario`] if either level slice does not match the
    /// channel count.
    pub fn calibrate(
        &mut self,
        white_levels: &[f64],
        black_levels: &[f64],
        noise: &mut NoiseSource,
    ) -> Result<()> {
        if white_levels.len() != self.len() || black_levels.len() != self.len() {
            return Err(Error::Scenario(format!(
                "calibration levels for {}/{} channels, array has {}",
                white_levels.len(),
                black_levels.len(),
                self.len()
            )));
        }

        for channel in 0..self.len() {
            let white = white_levels[channel] + noise.draw(-0.05, 0.0);
            let black = black_levels[channel] + noise.draw(0.0, 0.05);
            self.white[channel] = white.clamp(0.0, 1.0);
            self.black[channel] = black.clamp(0.0, 1.0);
            debug!(
                channel,
                white = self.white[channel],
                black = self.black[channel],
                "channel calibrated"
            );
        }

        Ok(())
    }

    /// Map raw channel intensities into normalized `[0, 1]` readings.
    ///
    /// Pure function of the current calibration and the input; output is
    /// always within `[0, 1]`, even when a channel's white and black
    /// references coincide.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Scenario`] if `raw` does not match the channel
    /// count.
    pub fn read_normalized(&self, raw: &[f64]) -> Result<Vec<f64>> {
        if raw.len() != self.len() {
            return Err(Error::Scenario(format!(
                "frame has {} channels, array has {}",
                raw.len(),
                self.len()
            )));
        }

        Ok(raw
            .iter()
            .zip(self.white.iter().zip(&self.black))
            .map(|(value, (white, black))| {
                ((value - black) / (white - black + NORMALIZE_EPSILON)).clamp(0.0, 1.0)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_calibration_passthrough() {
        let array = SensorArray::new(3);
        let norm = array.read_normalized(&[0.0, 0.5, 1.0]).unwrap();
        assert!(norm[0].abs() < 1e-9);
        assert!((norm[1] - 0.5).abs() < 1e-3);
        assert!((norm[2] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_calibrate_without_noise_is_exact() {
        let mut array = SensorArray::new(2);
        let mut noise = NoiseSource::disabled();
        array.calibrate(&[0.9, 0.8], &[0.1, 0.2], &mut noise).unwrap();
        assert_eq!(array.calibration(0), Some((0.9, 0.1)));
        assert_eq!(array.calibration(1), Some((0.8, 0.2)));
    }

    #[test]
    fn test_calibrate_clamps_references() {
        let mut array = SensorArray::new(1);
        let mut noise = NoiseSource::disabled();
        array.calibrate(&[1.5], &[-0.5], &mut noise).unwrap();
        assert_eq!(array.calibration(0), Some((1.0, 0.0)));
    }

    #[test]
    fn test_white_equals_black_stays_bounded() {
        let mut array = SensorArray::new(1);
        let mut noise = NoiseSource::disabled();
        array.calibrate(&[0.5], &[0.5], &mut noise).unwrap();
        let norm = array.read_normalized(&[0.7]).unwrap();
        assert!((0.0..=1.0).contains(&norm[0]));
    }

    #[test]
    fn test_frame_width_mismatch_is_error() {
        let array = SensorArray::new(5);
        assert!(array.read_normalized(&[0.1, 0.2]).is_err());
    }

    #[test]
    fn test_calibration_width_mismatch_is_error() {
        let mut array = SensorArray::new(5);
        let mut noise = NoiseSource::disabled();
        assert!(array.calibrate(&[1.0; 3], &[0.0; 5], &mut noise).is_err());
    }

    #[test]
    fn test_seeded_calibration_noise_direction() {
        let mut array = SensorArray::new(4);
        let mut noise = NoiseSource::seeded(7);
        array.calibrate(&[1.0; 4], &[0.0; 4], &mut noise).unwrap();
        for channel in 0..4 {
            let (white, black) = array.calibration(channel).unwrap();
            // White noise only ever lowers, black noise only ever raises.
            assert!(white <= 1.0 && white >= 0.95);
            assert!(black >= 0.0 && black <= 0.05);
        }
    }
}
