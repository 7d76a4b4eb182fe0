//! # Channels
//!
//! A channel is either a windowed scalar stream with a sliding history or a
//! stateless composite entry (e.g. one detected metal) that is redrawn every
//! tick. Both share an identifier and a current value; they differ in how a
//! tick updates them.

use serde::Serialize;

use super::generator::{DEFAULT_FRESH_MAX, DEFAULT_STEP_BOUND};
use super::source::SampleSource;
use super::stats::WindowStats;
use super::window::{RollingWindow, DEFAULT_CAPACITY};
use crate::error::{GcsError, Result};

/// Construction parameters for a windowed scalar channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSpec {
    /// Channel identifier (e.g. "temperature").
    pub id: String,
    /// Window capacity.
    pub capacity: usize,
    /// Value the window is pre-filled with.
    pub baseline: f64,
    /// Maximum change between consecutive samples.
    pub step_bound: u32,
    /// Display unit, passed through to consumers.
    pub unit: Option<String>,
}

impl ChannelSpec {
    /// Spec with the default capacity and step bound.
    ///
    /// # Examples
    ///
    /// ```
    /// use gcs_telemetry::telemetry::channel::ChannelSpec;
    ///
    /// let spec = ChannelSpec::new("temperature", 30.0).with_unit("°C");
    /// assert_eq!(spec.capacity, 100);
    /// assert_eq!(spec.step_bound, 5);
    /// ```
    pub fn new(id: impl Into<String>, baseline: f64) -> Self {
        Self {
            id: id.into(),
            capacity: DEFAULT_CAPACITY,
            baseline,
            step_bound: DEFAULT_STEP_BOUND,
            unit: None,
        }
    }

    /// Overrides the window capacity.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Overrides the step bound.
    #[must_use]
    pub fn with_step_bound(mut self, step_bound: u32) -> Self {
        self.step_bound = step_bound;
        self
    }

    /// Sets the display unit.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Checks id, capacity, baseline and step bound.
    ///
    /// # Errors
    ///
    /// Returns [`GcsError::InvalidChannel`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        let reason = if self.id.trim().is_empty() {
            Some("id cannot be empty")
        } else if self.capacity == 0 {
            Some("capacity must be greater than 0")
        } else if !self.baseline.is_finite() {
            Some("baseline must be a finite number")
        } else if self.step_bound == 0 {
            Some("step_bound must be greater than 0")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(GcsError::InvalidChannel {
                channel: self.id.clone(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Construction parameters for a composite (category) entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeSpec {
    /// Entry identifier (e.g. "Copper").
    pub id: String,
    /// Group the entry is summarized with (e.g. "metals").
    pub group: String,
    /// Display color, passed through unchanged.
    pub color: String,
    /// Exclusive upper bound of the redrawn value.
    pub max: f64,
    /// Value before the first tick; drawn from the source when `None`.
    pub initial: Option<f64>,
}

impl CompositeSpec {
    /// Spec with the default `[0, 100)` value range.
    pub fn new(id: impl Into<String>, group: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            group: group.into(),
            color: color.into(),
            max: DEFAULT_FRESH_MAX,
            initial: None,
        }
    }

    /// Overrides the upper bound.
    #[must_use]
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = max;
        self
    }

    /// Fixes the value held before the first tick.
    #[must_use]
    pub fn with_initial(mut self, initial: f64) -> Self {
        self.initial = Some(initial);
        self
    }

    /// Checks id, group, bound and initial value.
    ///
    /// # Errors
    ///
    /// Returns [`GcsError::InvalidChannel`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        let reason = if self.id.trim().is_empty() {
            Some("id cannot be empty")
        } else if self.group.trim().is_empty() {
            Some("group cannot be empty")
        } else if !self.max.is_finite() || self.max <= 0.0 {
            Some("max must be a finite number greater than 0")
        } else if self.initial.is_some_and(|v| !v.is_finite()) {
            Some("initial must be a finite number")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(GcsError::InvalidChannel {
                channel: self.id.clone(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Scalar channel with a rolling history.
#[derive(Debug, Clone)]
pub struct WindowedChannel {
    id: String,
    unit: Option<String>,
    step_bound: u32,
    window: RollingWindow,
}

impl WindowedChannel {
    /// Builds the channel with its window pre-filled to capacity.
    ///
    /// # Errors
    ///
    /// Returns [`GcsError::InvalidChannel`] if the spec is malformed.
    pub fn new(spec: ChannelSpec) -> Result<Self> {
        spec.validate()?;
        let window = RollingWindow::filled(spec.capacity, spec.baseline)?;
        Ok(Self {
            id: spec.id,
            unit: spec.unit,
            step_bound: spec.step_bound,
            window,
        })
    }

    /// Channel identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display unit.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Step bound used on each tick.
    pub fn step_bound(&self) -> u32 {
        self.step_bound
    }

    /// The channel's window.
    pub fn window(&self) -> &RollingWindow {
        &self.window
    }

    /// Appends a sample with FIFO eviction.
    pub fn push(&mut self, sample: f64) -> Option<f64> {
        self.window.push(sample)
    }

    /// Window contents, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`GcsError::EmptyWindow`] if the window holds no samples.
    pub fn snapshot(&self) -> Result<Vec<f64>> {
        if self.window.is_empty() {
            return Err(GcsError::EmptyWindow(self.id.clone()));
        }
        Ok(self.window.snapshot())
    }

    /// Summary over the whole window.
    ///
    /// # Errors
    ///
    /// Returns [`GcsError::EmptyWindow`] if the window holds no samples.
    pub fn stats(&self) -> Result<WindowStats> {
        self.window
            .stats()
            .ok_or_else(|| GcsError::EmptyWindow(self.id.clone()))
    }

    fn advance(&mut self, source: &mut dyn SampleSource) -> Result<f64> {
        let previous = self
            .window
            .last()
            .ok_or_else(|| GcsError::EmptyWindow(self.id.clone()))?;
        let sample = source.next_value(&self.id, previous, self.step_bound)?;
        ensure_finite(&self.id, sample)?;
        self.window.push(sample);
        Ok(sample)
    }
}

/// Stateless category entry, redrawn each tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeChannel {
    id: String,
    group: String,
    color: String,
    max: f64,
    value: f64,
}

impl CompositeChannel {
    /// Builds the entry holding `spec.initial`, or a value freshly drawn
    /// from `source` when no initial value is given.
    ///
    /// # Errors
    ///
    /// Returns [`GcsError::InvalidChannel`] if the spec is malformed, and
    /// propagates source failures or a non-finite draw.
    pub fn new(spec: CompositeSpec, source: &mut dyn SampleSource) -> Result<Self> {
        spec.validate()?;
        let value = match spec.initial {
            Some(initial) => initial,
            None => {
                let drawn = source.fresh_value(&spec.id, spec.max)?;
                ensure_finite(&spec.id, drawn)?;
                drawn
            }
        };
        Ok(Self {
            id: spec.id,
            group: spec.group,
            color: spec.color,
            max: spec.max,
            value,
        })
    }

    /// Entry identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Group name.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Display color.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Latest value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Replaces the value in place.
    pub fn set(&mut self, value: f64) {
        self.value = value;
    }

    fn advance(&mut self, source: &mut dyn SampleSource) -> Result<f64> {
        let value = source.fresh_value(&self.id, self.max)?;
        ensure_finite(&self.id, value)?;
        self.value = value;
        Ok(value)
    }
}

/// A telemetry channel of either kind.
#[derive(Debug, Clone)]
pub enum Channel {
    /// Scalar stream with a sliding window.
    Windowed(WindowedChannel),
    /// Category entry without history.
    Composite(CompositeChannel),
}

impl Channel {
    /// Channel identifier.
    pub fn id(&self) -> &str {
        match self {
            Channel::Windowed(ch) => ch.id(),
            Channel::Composite(ch) => ch.id(),
        }
    }

    /// Most recent value.
    pub fn current(&self) -> Option<f64> {
        match self {
            Channel::Windowed(ch) => ch.window().last(),
            Channel::Composite(ch) => Some(ch.value()),
        }
    }

    /// Draws the next value from `source` and stores it.
    ///
    /// Windowed channels push with eviction; composite entries replace their
    /// value. On error the channel is left untouched.
    ///
    /// # Errors
    ///
    /// Propagates source failures and rejects non-finite samples with
    /// [`GcsError::NonFiniteSample`].
    pub fn advance(&mut self, source: &mut dyn SampleSource) -> Result<f64> {
        match self {
            Channel::Windowed(ch) => ch.advance(source),
            Channel::Composite(ch) => ch.advance(source),
        }
    }
}

/// Rejects NaN and infinite samples for `channel`.
pub(crate) fn ensure_finite(channel: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GcsError::NonFiniteSample {
            channel: channel.to_string(),
        })
    }
}
