/// Uniform time samples covering `[t0, t_max]`, endpoint included.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeGrid {
    samples: Vec<f64>,
}

impl TimeGrid {
    /// Builds `num` evenly spaced samples from `start` to `stop` inclusive.
    ///
    /// Spacing is `(stop - start) / (num - 1)`; the last sample is pinned to
    /// `stop` so accumulated rounding never leaves it short.
    pub fn linspace(start: f64, stop: f64, num: usize) -> Self {
        let samples = match num {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (stop - start) / (num - 1) as f64;
                let mut samples: Vec<f64> =
                    (0..num).map(|k| start + k as f64 * step).collect();
                samples[num - 1] = stop;
                samples
            }
        };
        Self { samples }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the trace holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Borrows the samples in grid order.
    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    /// Consumes the trace, returning its samples.
    pub fn into_inner(self) -> Vec<f64> {
        self.samples
    }
}

/// Applied current per grid sample: a single rectangular pulse.
#[derive(Clone, Debug, PartialEq)]
pub struct InputCurrentTrace {
    samples: Vec<f64>,
}

impl InputCurrentTrace {
    /// Zero current of length `len` with `magnitude` on `[onset, offset)`.
    ///
    /// Both bounds are clamped to `len`, so a window reaching past the end of
    /// the grid is cut short and one starting past it leaves the trace zero.
    pub fn pulse(len: usize, onset: usize, offset: usize, magnitude: f64) -> Self {
        let mut samples = vec![0.0; len];
        let start = onset.min(len);
        let end = offset.min(len);
        if start < end {
            samples[start..end].fill(magnitude);
        }
        Self { samples }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the trace holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Borrows the samples in grid order.
    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    /// Consumes the trace, returning its samples.
    pub fn into_inner(self) -> Vec<f64> {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints() {
        let grid = TimeGrid::linspace(0.0, 2.0, 20000);
        assert_eq!(grid.len(), 20000);
        assert_eq!(grid.as_slice()[0], 0.0);
        assert_eq!(grid.as_slice()[19999], 2.0);
    }

    #[test]
    fn test_linspace_is_increasing() {
        let grid = TimeGrid::linspace(0.5, 1.0, 11);
        assert!(grid.as_slice().windows(2).all(|w| w[1] > w[0]));
        assert!((grid.as_slice()[1] - 0.55).abs() < 1e-12);
    }

    #[test]
    fn test_linspace_degenerate_sizes() {
        assert!(TimeGrid::linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(TimeGrid::linspace(0.3, 1.0, 1).as_slice(), &[0.3]);
    }

    #[test]
    fn test_pulse_window() {
        let current = InputCurrentTrace::pulse(10, 3, 6, 2.0);
        assert_eq!(
            current.as_slice(),
            &[0.0, 0.0, 0.0, 2.0, 2.0, 2.0, 0.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_pulse_offset_clamped() {
        let current = InputCurrentTrace::pulse(5, 3, 9, 1.0);
        assert_eq!(current.len(), 5);
        assert_eq!(current.as_slice(), &[0.0, 0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_pulse_outside_grid_is_silent() {
        let current = InputCurrentTrace::pulse(5, 7, 9, 1.0);
        assert!(current.as_slice().iter().all(|&i| i == 0.0));
    }

    #[test]
    fn test_zero_magnitude_pulse() {
        let current = InputCurrentTrace::pulse(4, 1, 3, 0.0);
        assert!(current.as_slice().iter().all(|&i| i == 0.0));
    }
}
