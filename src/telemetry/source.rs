//! Trait abstraction for sample production so the simulated generator can be
//! swapped for a real sensor feed (or a mock in tests).

use crate::error::Result;

/// Produces the next reading for a channel on each tick.
#[cfg_attr(test, mockall::automock)]
pub trait SampleSource: Send {
    /// Next sample of a windowed channel, given its most recent sample and
    /// the channel's step bound.
    fn next_value(&mut self, channel: &str, previous: f64, bound: u32) -> Result<f64>;

    /// Fresh, history-free value of a composite entry in `[0, max)`.
    fn fresh_value(&mut self, channel: &str, max: f64) -> Result<f64>;
}
