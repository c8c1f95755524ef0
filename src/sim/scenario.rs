//! Scenario definitions - labeled sequences of raw sensor frames

/// A labeled sequence of raw sensor frames driven through one run.
///
/// Each frame holds one raw intensity per channel. Frames are consumed in
/// order; the run's step index is 1-based over them.
#[derive(Debug, Clone)]
pub struct Scenario {
    label: String,
    frames: Vec<Vec<f64>>,
}

impl Scenario {
    /// Create a scenario from raw frames.
    #[must_use]
    pub fn new(label: impl Into<String>, frames: Vec<Vec<f64>>) -> Self {
        Self {
            label: label.into(),
            frames,
        }
    }

    /// Get the human-readable label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the raw frames.
    #[must_use]
    pub fn frames(&self) -> &[Vec<f64>] {
        &self.frames
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Check whether the scenario has no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Canned run: the robot holds the line for all ten frames.
    #[must_use]
    pub fn line_hold() -> Self {
        Self::new(
            "robot holds the line",
            vec![
                vec![0.9, 0.6, 0.2, 0.6, 0.9],
                vec![0.85, 0.55, 0.25, 0.55, 0.85],
                vec![0.8, 0.5, 0.3, 0.5, 0.8],
                vec![0.9, 0.5, 0.25, 0.5, 0.9],
                vec![0.85, 0.55, 0.3, 0.55, 0.85],
                vec![0.8, 0.5, 0.25, 0.5, 0.8],
                vec![0.85, 0.55, 0.25, 0.55, 0.85],
                vec![0.9, 0.6, 0.2, 0.6, 0.9],
                vec![0.9, 0.55, 0.25, 0.55, 0.9],
                vec![0.85, 0.5, 0.3, 0.5, 0.85],
            ],
        )
    }

    /// Canned run: the line drifts left and is lost in the final frames.
    #[must_use]
    pub fn line_drift() -> Self {
        Self::new(
            "robot drifts off the line",
            vec![
                vec![0.9, 0.6, 0.2, 0.6, 0.9],
                vec![0.85, 0.55, 0.25, 0.55, 0.85],
                vec![0.8, 0.5, 0.3, 0.5, 0.8],
                vec![0.9, 0.5, 0.25, 0.5, 0.9],
                vec![0.6, 0.3, 0.2, 0.7, 0.9],
                vec![0.5, 0.25, 0.2, 0.8, 0.95],
                vec![0.4, 0.2, 0.2, 0.9, 1.0],
                vec![0.3, 0.15, 0.25, 0.95, 1.0],
                vec![0.9, 0.9, 0.9, 0.9, 0.9],
                vec![0.95, 0.95, 0.95, 0.95, 0.95],
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_scenarios_shape() {
        for scenario in [Scenario::line_hold(), Scenario::line_drift()] {
            assert_eq!(scenario.len(), 10);
            assert!(scenario.frames().iter().all(|frame| frame.len() == 5));
            assert!(!scenario.is_empty());
        }
    }

    #[test]
    fn test_frames_within_unit_interval() {
        for scenario in [Scenario::line_hold(), Scenario::line_drift()] {
            for frame in scenario.frames() {
                assert!(frame.iter().all(|v| (0.0..=1.0).contains(v)));
            }
        }
    }
}
