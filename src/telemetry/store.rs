//! # Rolling Window Store
//!
//! Owns every channel of the dashboard and answers push and query calls
//! against them.
//!
//! ## Tick
//!
//! [`Store::tick`] advances all channels once: windowed channels receive
//! `next_value(last, R)` with FIFO eviction, composite entries receive a
//! fresh value in place. A channel whose source fails is skipped for that
//! tick and reported; the others still advance.
//!
//! ## Usage
//!
//! ```
//! use gcs_telemetry::telemetry::channel::ChannelSpec;
//! use gcs_telemetry::telemetry::generator::RandomWalk;
//! use gcs_telemetry::telemetry::store::Store;
//!
//! let mut store = Store::initialize([
//!     ChannelSpec::new("temperature", 30.0),
//!     ChannelSpec::new("altitude", 1100.0),
//! ])?;
//! let mut source = RandomWalk::seeded(1);
//!
//! store.tick(&mut source);
//!
//! assert_eq!(store.snapshot("temperature")?.len(), 100);
//! let stats = store.stats("altitude")?;
//! assert_eq!(stats.range, stats.max - stats.min);
//! # Ok::<(), gcs_telemetry::error::GcsError>(())
//! ```

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, warn};

use super::channel::{
    ensure_finite, Channel, ChannelSpec, CompositeChannel, CompositeSpec, WindowedChannel,
};
use super::frame::{CategoryFrame, Frame, SeriesFrame};
use super::source::SampleSource;
use super::stats::WindowStats;
use crate::error::{GcsError, Result};

/// Outcome of one [`Store::tick`].
#[derive(Debug, Default)]
pub struct TickReport {
    /// Channels that received a new value.
    pub updated: usize,
    /// Channels skipped this tick, with the reason.
    pub failures: Vec<GcsError>,
}

impl TickReport {
    /// Whether every channel advanced.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// All telemetry channels, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct Store {
    channels: Vec<Channel>,
}

impl Store {
    /// Builds a store of windowed channels, each pre-filled with its
    /// baseline.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a malformed spec or a duplicate id.
    pub fn initialize<I>(specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = ChannelSpec>,
    {
        let mut channels = Vec::new();
        let mut seen = HashSet::new();

        for spec in specs {
            if !seen.insert(spec.id.clone()) {
                return Err(GcsError::InvalidConfig(format!("duplicate channel id '{}'", spec.id)));
            }
            channels.push(Channel::Windowed(WindowedChannel::new(spec)?));
        }

        debug!("Initialized store with {} channels", channels.len());
        Ok(Self { channels })
    }

    /// Builds a store of windowed channels and composite entries.
    ///
    /// Composite entries without an initial value get one drawn from
    /// `source`, so the store is fully populated before the first tick.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a malformed spec or an id used
    /// twice across both kinds, and propagates a failed initial draw.
    pub fn new<I, J>(specs: I, composites: J, source: &mut dyn SampleSource) -> Result<Self>
    where
        I: IntoIterator<Item = ChannelSpec>,
        J: IntoIterator<Item = CompositeSpec>,
    {
        let mut store = Self::initialize(specs)?;

        for spec in composites {
            if store.channel(&spec.id).is_ok() {
                return Err(GcsError::InvalidConfig(format!("duplicate channel id '{}'", spec.id)));
            }
            let composite = CompositeChannel::new(spec, source)?;
            store.channels.push(Channel::Composite(composite));
        }

        debug!("Added {} composite entries", store.composites().count());
        Ok(store)
    }

    /// Advances every channel by one sample drawn from `source`.
    ///
    /// Failures are isolated per channel: the failing channel keeps its
    /// previous state and the remaining channels are still updated.
    pub fn tick(&mut self, source: &mut dyn SampleSource) -> TickReport {
        let mut report = TickReport::default();

        for channel in &mut self.channels {
            match channel.advance(source) {
                Ok(value) => {
                    debug!("{} <- {}", channel.id(), value);
                    report.updated += 1;
                }
                Err(e) => {
                    warn!("Skipping channel {} this tick: {}", channel.id(), e);
                    report.failures.push(e);
                }
            }
        }

        report
    }

    /// Stores `sample` on channel `id`.
    ///
    /// Windowed channels append with FIFO eviction and return the evicted
    /// sample; composite entries replace their value and return `None`.
    ///
    /// # Errors
    ///
    /// Returns [`GcsError::UnknownChannel`] if `id` is not in the store and
    /// [`GcsError::NonFiniteSample`] for NaN or infinity; the store is left
    /// unchanged in both cases.
    pub fn push(&mut self, id: &str, sample: f64) -> Result<Option<f64>> {
        let channel = self.channel_mut(id)?;
        ensure_finite(id, sample)?;
        match channel {
            Channel::Windowed(ch) => Ok(ch.push(sample)),
            Channel::Composite(ch) => {
                ch.set(sample);
                Ok(None)
            }
        }
    }

    /// Copy of channel `id`'s window, oldest first.
    ///
    /// A composite entry has no history and yields its single current value.
    ///
    /// # Errors
    ///
    /// Returns [`GcsError::UnknownChannel`] for an unknown id and
    /// [`GcsError::EmptyWindow`] for a window without samples.
    pub fn snapshot(&self, id: &str) -> Result<Vec<f64>> {
        match self.channel(id)? {
            Channel::Windowed(ch) => ch.snapshot(),
            Channel::Composite(ch) => Ok(vec![ch.value()]),
        }
    }

    /// Current/min/max/range of channel `id`.
    ///
    /// # Errors
    ///
    /// Returns [`GcsError::UnknownChannel`] for an unknown id and
    /// [`GcsError::EmptyWindow`] for a window without samples.
    pub fn stats(&self, id: &str) -> Result<WindowStats> {
        match self.channel(id)? {
            Channel::Windowed(ch) => ch.stats(),
            Channel::Composite(ch) => WindowStats::summarize([ch.value()])
                .ok_or_else(|| GcsError::EmptyWindow(id.to_string())),
        }
    }

    /// Current/min/max/range across the entries of a composite group.
    ///
    /// `current` is the value of the group's last entry in configuration
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`GcsError::UnknownChannel`] if no entry belongs to `group`.
    pub fn category_stats(&self, group: &str) -> Result<WindowStats> {
        let values = self.composites().filter(|c| c.group() == group).map(CompositeChannel::value);
        WindowStats::summarize(values).ok_or_else(|| GcsError::UnknownChannel(group.to_string()))
    }

    /// Looks up a channel by id.
    ///
    /// # Errors
    ///
    /// Returns [`GcsError::UnknownChannel`] if `id` is not in the store.
    pub fn channel(&self, id: &str) -> Result<&Channel> {
        self.channels
            .iter()
            .find(|ch| ch.id() == id)
            .ok_or_else(|| GcsError::UnknownChannel(id.to_string()))
    }

    fn channel_mut(&mut self, id: &str) -> Result<&mut Channel> {
        self.channels
            .iter_mut()
            .find(|ch| ch.id() == id)
            .ok_or_else(|| GcsError::UnknownChannel(id.to_string()))
    }

    /// All channels in configuration order.
    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }

    /// Windowed channels in configuration order.
    pub fn windowed(&self) -> impl Iterator<Item = &WindowedChannel> {
        self.channels.iter().filter_map(|ch| match ch {
            Channel::Windowed(w) => Some(w),
            Channel::Composite(_) => None,
        })
    }

    /// Composite entries in configuration order.
    pub fn composites(&self) -> impl Iterator<Item = &CompositeChannel> {
        self.channels.iter().filter_map(|ch| match ch {
            Channel::Composite(c) => Some(c),
            Channel::Windowed(_) => None,
        })
    }

    /// Number of channels of both kinds.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether the store holds no channels.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Consistent picture of every channel, stamped with `tick`.
    pub fn frame(&self, tick: u64) -> Frame {
        let series = self
            .windowed()
            .filter_map(|ch| {
                let stats = ch.stats().ok()?;
                Some(SeriesFrame {
                    id: ch.id().to_string(),
                    unit: ch.unit().map(str::to_string),
                    samples: ch.window().snapshot(),
                    stats,
                })
            })
            .collect();

        let categories = self
            .composites()
            .map(|c| CategoryFrame {
                id: c.id().to_string(),
                group: c.group().to_string(),
                color: c.color().to_string(),
                value: c.value(),
            })
            .collect();

        Frame {
            tick,
            timestamp: Utc::now(),
            series,
            categories,
        }
    }
}
