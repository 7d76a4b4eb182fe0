//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every field has a default, so an empty file yields the stock dashboard:
//! four windowed channels (temperature, altitude, pressure, moisture), seven
//! detected metals and the battery gauge.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{GcsError, Result};
use crate::telemetry::channel::{ChannelSpec, CompositeSpec};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    #[serde(default = "default_channels")]
    pub channels: Vec<ChannelConfig>,

    #[serde(default = "default_composites")]
    pub composites: Vec<CompositeConfig>,
}

/// Tick timing and window defaults
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TelemetryConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    #[serde(default = "default_capacity")]
    pub capacity: usize,

    #[serde(default = "default_step_bound")]
    pub step_bound: u32,

    /// Fixed seed for reproducible runs; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_status_interval_ticks")]
    pub status_interval_ticks: u64,
}

/// Windowed channel definition
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ChannelConfig {
    pub id: String,

    pub baseline: f64,

    #[serde(default)]
    pub unit: Option<String>,

    /// Overrides `telemetry.capacity`.
    #[serde(default)]
    pub capacity: Option<usize>,

    /// Overrides `telemetry.step_bound`.
    #[serde(default)]
    pub step_bound: Option<u32>,
}

/// Composite (category) entry definition
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CompositeConfig {
    pub id: String,

    #[serde(default = "default_group")]
    pub group: String,

    #[serde(default)]
    pub color: String,

    #[serde(default = "default_max")]
    pub max: f64,

    /// Value before the first tick; drawn from the source when absent.
    #[serde(default)]
    pub initial: Option<f64>,
}

// Default value functions
fn default_tick_interval_ms() -> u64 { 250 }
fn default_capacity() -> usize { 100 }
fn default_step_bound() -> u32 { 5 }
fn default_status_interval_ticks() -> u64 { 40 }

fn default_group() -> String { "metals".to_string() }
fn default_max() -> f64 { 100.0 }

fn default_channels() -> Vec<ChannelConfig> {
    [
        ("temperature", 30.0, "°C"),
        ("altitude", 1100.0, "m"),
        ("pressure", 76.0, "hPa"),
        ("moisture", 50.0, "%"),
    ]
    .into_iter()
    .map(|(id, baseline, unit)| ChannelConfig {
        id: id.to_string(),
        baseline,
        unit: Some(unit.to_string()),
        capacity: None,
        step_bound: None,
    })
    .collect()
}

fn default_composites() -> Vec<CompositeConfig> {
    let metals = [
        ("Aluminum", "#ffffff"),
        ("Copper", "#b87333"),
        ("Iron", "#a19d94"),
        ("Lead", "#b8b8b8"),
        ("Magnesium", "#ff7f00"),
        ("Nickel", "#808080"),
        ("Silver", "#c0c0c0"),
    ];

    metals
        .into_iter()
        .map(|(id, color)| (id, default_group(), color, None))
        .chain(std::iter::once(("battery", "battery".to_string(), "#a3e635", Some(100.0))))
        .map(|(id, group, color, initial)| CompositeConfig {
            id: id.to_string(),
            group,
            color: color.to_string(),
            max: default_max(),
            initial,
        })
        .collect()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            capacity: default_capacity(),
            step_bound: default_step_bound(),
            seed: None,
            status_interval_ticks: default_status_interval_ticks(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            telemetry: TelemetryConfig::default(),
            channels: default_channels(),
            composites: default_composites(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gcs_telemetry::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from a TOML string
    ///
    /// # Examples
    ///
    /// ```
    /// use gcs_telemetry::config::Config;
    ///
    /// let config = Config::from_toml_str("[telemetry]\ntick_interval_ms = 500\n")?;
    /// assert_eq!(config.telemetry.tick_interval_ms, 500);
    /// assert_eq!(config.channels.len(), 4);
    /// # Ok::<(), gcs_telemetry::error::GcsError>(())
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Tick period as a [`Duration`]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.telemetry.tick_interval_ms)
    }

    /// Windowed channel specs with global defaults applied
    pub fn channel_specs(&self) -> Vec<ChannelSpec> {
        self.channels
            .iter()
            .map(|ch| {
                let mut spec = ChannelSpec::new(ch.id.clone(), ch.baseline)
                    .with_capacity(ch.capacity.unwrap_or(self.telemetry.capacity))
                    .with_step_bound(ch.step_bound.unwrap_or(self.telemetry.step_bound));
                spec.unit = ch.unit.clone();
                spec
            })
            .collect()
    }

    /// Composite entry specs
    pub fn composite_specs(&self) -> Vec<CompositeSpec> {
        self.composites
            .iter()
            .map(|c| {
                let mut spec = CompositeSpec::new(c.id.clone(), c.group.clone(), c.color.clone())
                    .with_max(c.max);
                spec.initial = c.initial;
                spec
            })
            .collect()
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range, a
    /// channel is malformed, or an id is used twice
    pub fn validate(&self) -> Result<()> {
        if self.telemetry.tick_interval_ms == 0 || self.telemetry.tick_interval_ms > 60000 {
            return Err(GcsError::InvalidConfig(
                "tick_interval_ms must be between 1 and 60000".to_string(),
            ));
        }

        if self.telemetry.capacity == 0 {
            return Err(GcsError::InvalidConfig(
                "capacity must be greater than 0".to_string(),
            ));
        }

        if self.telemetry.step_bound == 0 {
            return Err(GcsError::InvalidConfig(
                "step_bound must be greater than 0".to_string(),
            ));
        }

        if self.telemetry.status_interval_ticks == 0 {
            return Err(GcsError::InvalidConfig(
                "status_interval_ticks must be greater than 0".to_string(),
            ));
        }

        if self.channels.is_empty() && self.composites.is_empty() {
            return Err(GcsError::InvalidConfig(
                "at least one channel must be configured".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for spec in self.channel_specs() {
            spec.validate()?;
            if !seen.insert(spec.id.clone()) {
                return Err(GcsError::InvalidConfig(format!("duplicate channel id '{}'", spec.id)));
            }
        }

        for spec in self.composite_specs() {
            spec.validate()?;
            if !seen.insert(spec.id.clone()) {
                return Err(GcsError::InvalidConfig(format!("duplicate channel id '{}'", spec.id)));
            }
        }

        Ok(())
    }
}
