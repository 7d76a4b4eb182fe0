//! # GCS Telemetry Library
//!
//! Rolling telemetry windows and a synthetic signal generator for a
//! ground-control dashboard.
//!
//! This library provides the data engine behind the dashboard charts: a
//! store of fixed-capacity sample windows advanced by a bounded random walk
//! at a fixed tick rate, plus summary queries for detail views. Rendering is
//! left to consumers, which pull snapshots or subscribe to frames.

pub mod config;
pub mod driver;
pub mod error;
pub mod telemetry;
