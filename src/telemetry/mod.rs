//! # Telemetry Module
//!
//! Simulated multi-channel telemetry with bounded history.
//!
//! This module handles:
//! - Generating samples as a bounded random walk (seedable)
//! - Keeping a fixed-capacity sliding window per scalar channel
//! - Redrawing stateless composite entries (detected metals, battery)
//! - Summary statistics (current, min, max, range)
//! - Serializable frames for consumers

pub mod channel;
pub mod frame;
pub mod generator;
pub mod source;
pub mod stats;
pub mod store;
pub mod window;
