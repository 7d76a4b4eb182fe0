//! # Rolling Window
//!
//! Fixed-capacity FIFO of samples for one channel.
//!
//! Samples are kept in insertion order (oldest first, newest last). Once the
//! window holds `capacity` samples, every push evicts exactly one sample from
//! the front, so the length never exceeds the capacity.
//!
//! ## Usage
//!
//! ```
//! use gcs_telemetry::telemetry::window::RollingWindow;
//!
//! let mut window = RollingWindow::filled(3, 10.0)?;
//! window.push(12.0);
//! window.push(8.0);
//! window.push(15.0);
//!
//! assert_eq!(window.snapshot(), vec![12.0, 8.0, 15.0]);
//! # Ok::<(), gcs_telemetry::error::GcsError>(())
//! ```

use std::collections::VecDeque;

use super::stats::WindowStats;
use crate::error::{GcsError, Result};

/// Default window capacity (samples per channel).
pub const DEFAULT_CAPACITY: usize = 100;

/// Bounded sliding window of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl RollingWindow {
    /// Creates an empty window.
    ///
    /// # Errors
    ///
    /// Returns [`GcsError::InvalidConfig`] if `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(GcsError::InvalidConfig(
                "window capacity must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Creates a window pre-filled to capacity with `baseline`.
    ///
    /// # Errors
    ///
    /// Returns [`GcsError::InvalidConfig`] if `capacity` is 0.
    pub fn filled(capacity: usize, baseline: f64) -> Result<Self> {
        let mut window = Self::new(capacity)?;
        window.samples.extend(std::iter::repeat(baseline).take(capacity));
        Ok(window)
    }

    /// Appends `sample`, evicting the oldest sample if the window is full.
    ///
    /// Returns the evicted sample, if any.
    pub fn push(&mut self, sample: f64) -> Option<f64> {
        let evicted = if self.samples.len() == self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(sample);
        evicted
    }

    /// Copy of the window, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }

    /// Most recent sample.
    #[must_use]
    pub fn last(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    /// Current/min/max/range over the whole window, `None` while empty.
    #[must_use]
    pub fn stats(&self) -> Option<WindowStats> {
        WindowStats::summarize(self.samples.iter().copied())
    }

    /// Number of samples held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the window holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of samples retained.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
