//! Sample statistics for the benchmark driver.

use std::vec::Vec;

/// A growing set of timing samples, in nanoseconds per operation.
///
/// # Examples
///
/// ```
/// use ordered_treap::stats::SampleStats;
///
/// let mut stats = SampleStats::new();
/// for sample in &[1.0, 2.0, 3.0] {
///     stats.push(*sample);
/// }
/// assert_eq!(stats.mean(), 2.0);
/// assert_eq!(stats.median(), 2.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SampleStats {
    samples: Vec<f64>,
    sum: f64,
}

impl SampleStats {
    pub fn new() -> Self {
        SampleStats::default()
    }

    pub fn push(&mut self, sample: f64) {
        self.samples.push(sample);
        self.sum += sample;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.samples.len() as f64
    }

    /// Population standard deviation of the samples.
    pub fn stddev(&self) -> f64 {
        let mean = self.mean();
        let squares: f64 = self.samples.iter().map(|sample| (sample - mean).powi(2)).sum();
        (squares / self.samples.len() as f64).sqrt()
    }

    /// Coefficient of variation, in percent.
    pub fn cv_percent(&self) -> f64 {
        self.stddev() / self.mean() * 100.0
    }

    /// Returns the lower median of the samples, or NaN if there are none.
    pub fn median(&self) -> f64 {
        if self.samples.is_empty() {
            return f64::NAN;
        }
        let mut sorted = self.samples.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        sorted[(sorted.len() - 1) / 2]
    }

    pub fn min(&self) -> f64 {
        self.samples.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Returns `true` once there are at least `min_samples` samples and their coefficient of
    /// variation is below `max_cv_percent`.
    pub fn is_stable(&self, min_samples: usize, max_cv_percent: f64) -> bool {
        self.len() >= min_samples && self.cv_percent() < max_cv_percent
    }

    /// Drops samples more than three standard deviations away from the mean.
    pub fn remove_outliers(&mut self) {
        if self.samples.is_empty() {
            return;
        }
        let mean = self.mean();
        let limit = 3.0 * self.stddev();
        self.samples.retain(|sample| (sample - mean).abs() <= limit);
        self.sum = self.samples.iter().sum();
    }
}

#[cfg(test)]
mod tests {
    use super::SampleStats;

    fn stats_of(samples: &[f64]) -> SampleStats {
        let mut stats = SampleStats::new();
        for sample in samples {
            stats.push(*sample);
        }
        stats
    }

    #[test]
    fn test_summary() {
        let stats = stats_of(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(stats.len(), 8);
        assert_eq!(stats.mean(), 5.0);
        assert_eq!(stats.stddev(), 2.0);
        assert!((stats.cv_percent() - 40.0).abs() < 1e-9);
        assert_eq!(stats.median(), 4.0);
        assert_eq!(stats.min(), 2.0);
        assert_eq!(stats.max(), 9.0);
    }

    #[test]
    fn test_empty() {
        let stats = SampleStats::new();
        assert!(stats.is_empty());
        assert_eq!(stats.len(), 0);
        assert!(stats.median().is_nan());
        assert!(stats.mean().is_nan());
        assert!(!stats.is_stable(0, 1.0));

        let mut stats = stats_of(&[1.0]);
        assert!(!stats.is_empty());
        stats.remove_outliers();
        assert_eq!(stats.median(), 1.0);
    }

    #[test]
    fn test_is_stable() {
        let stats = stats_of(&[10.0; 30]);
        assert!(stats.is_stable(30, 1.0));
        assert!(!stats.is_stable(31, 1.0));
        assert!(!stats_of(&[1.0, 100.0]).is_stable(2, 1.0));
    }

    #[test]
    fn test_remove_outliers() {
        let mut samples = vec![10.0; 20];
        samples.push(1000.0);
        let mut stats = stats_of(&samples);
        stats.remove_outliers();
        assert_eq!(stats.len(), 20);
        assert_eq!(stats.mean(), 10.0);
    }
}
