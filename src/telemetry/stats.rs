//! Summary statistics over a sequence of samples.

use serde::Serialize;

/// Current value and extrema of a sample sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowStats {
    /// Most recent (last) sample.
    pub current: f64,
    /// Smallest sample.
    pub min: f64,
    /// Largest sample.
    pub max: f64,
    /// `max - min`.
    pub range: f64,
}

impl WindowStats {
    /// Summarizes `samples` in order. Returns `None` for an empty sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// use gcs_telemetry::telemetry::stats::WindowStats;
    ///
    /// let stats = WindowStats::summarize([12.0, 8.0, 15.0]).unwrap();
    /// assert_eq!(stats.current, 15.0);
    /// assert_eq!(stats.range, 7.0);
    /// assert!(WindowStats::summarize(Vec::<f64>::new()).is_none());
    /// ```
    pub fn summarize<I>(samples: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut iter = samples.into_iter();
        let first = iter.next()?;

        let (current, min, max) = iter.fold((first, first, first), |(_, min, max), s| {
            (s, min.min(s), max.max(s))
        });

        Some(Self {
            current,
            min,
            max,
            range: max - min,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_sample() {
        let stats = WindowStats::summarize([42.0]).unwrap();
        assert_eq!(
            stats,
            WindowStats { current: 42.0, min: 42.0, max: 42.0, range: 0.0 }
        );
    }

    #[test]
    fn test_current_is_last_not_max() {
        let stats = WindowStats::summarize([1.0, 9.0, 4.0]).unwrap();
        assert_eq!(stats.current, 4.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 9.0);
        assert_eq!(stats.range, 8.0);
    }

    #[test]
    fn test_negative_samples() {
        let stats = WindowStats::summarize([-3.0, -10.0, 2.0, -1.0]).unwrap();
        assert_eq!(stats.min, -10.0);
        assert_eq!(stats.max, 2.0);
        assert_eq!(stats.range, stats.max - stats.min);
    }

    #[test]
    fn test_empty_is_none() {
        assert!(WindowStats::summarize(std::iter::empty()).is_none());
    }
}
