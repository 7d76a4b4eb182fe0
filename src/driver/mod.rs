//! # Driver Module
//!
//! Periodic scheduler that advances the store.
//!
//! This module handles:
//! - Firing a tick every `tick_interval` on a tokio interval
//! - Running each tick under the store's write lock, so readers see either
//!   the pre-tick or the post-tick state
//! - Publishing a [`Frame`] to observers after every tick, before the write
//!   lock is released
//! - Periodic status logging
//! - Stopping when the shutdown future resolves

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, RwLock};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::{GcsError, Result};
use crate::telemetry::frame::Frame;
use crate::telemetry::source::SampleSource;
use crate::telemetry::store::{Store, TickReport};

/// Store handle shared between the driver and readers.
pub type SharedStore = Arc<RwLock<Store>>;

/// Default number of ticks between status log messages
pub const DEFAULT_STATUS_INTERVAL_TICKS: u64 = 40;

/// Drives a [`Store`] at a fixed tick rate.
pub struct TelemetryDriver {
    store: SharedStore,
    source: Box<dyn SampleSource>,
    tick_interval: Duration,
    status_interval_ticks: u64,
    frames: watch::Sender<Frame>,
    ticks: u64,
}

impl std::fmt::Debug for TelemetryDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryDriver")
            .field("tick_interval", &self.tick_interval)
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

impl TelemetryDriver {
    /// Creates a driver owning `store` and `source`.
    ///
    /// # Errors
    ///
    /// Returns [`GcsError::InvalidConfig`] if `tick_interval` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use gcs_telemetry::driver::TelemetryDriver;
    /// use gcs_telemetry::telemetry::channel::ChannelSpec;
    /// use gcs_telemetry::telemetry::generator::RandomWalk;
    /// use gcs_telemetry::telemetry::store::Store;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> gcs_telemetry::error::Result<()> {
    /// let store = Store::initialize([ChannelSpec::new("temperature", 30.0)])?;
    /// let mut driver = TelemetryDriver::new(
    ///     store,
    ///     Box::new(RandomWalk::seeded(1)),
    ///     Duration::from_millis(250),
    /// )?;
    ///
    /// driver.tick_once().await;
    /// assert_eq!(driver.subscribe().borrow().tick, 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(
        store: Store,
        source: Box<dyn SampleSource>,
        tick_interval: Duration,
    ) -> Result<Self> {
        if tick_interval.is_zero() {
            return Err(GcsError::InvalidConfig(
                "tick interval must be greater than 0".to_string(),
            ));
        }

        let (frames, _) = watch::channel(store.frame(0));
        Ok(Self {
            store: Arc::new(RwLock::new(store)),
            source,
            tick_interval,
            status_interval_ticks: DEFAULT_STATUS_INTERVAL_TICKS,
            frames,
            ticks: 0,
        })
    }

    /// Sets how many ticks pass between status log lines.
    #[must_use]
    pub fn with_status_interval(mut self, ticks: u64) -> Self {
        self.status_interval_ticks = ticks.max(1);
        self
    }

    /// Shared handle for pull-based readers.
    pub fn store(&self) -> SharedStore {
        Arc::clone(&self.store)
    }

    /// Receiver that sees the frame published after each tick.
    pub fn subscribe(&self) -> watch::Receiver<Frame> {
        self.frames.subscribe()
    }

    /// Ticks performed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Performs one tick and publishes the resulting frame.
    ///
    /// The frame is published while the write lock is held, so a reader
    /// holding the read lock always finds the latest frame in step with the
    /// store.
    pub async fn tick_once(&mut self) -> TickReport {
        let report = {
            let mut store = self.store.write().await;
            let report = store.tick(self.source.as_mut());
            self.ticks += 1;
            self.frames.send_replace(store.frame(self.ticks));
            report
        };

        if !report.is_clean() {
            warn!(
                "Tick {}: {} channel(s) skipped",
                self.ticks,
                report.failures.len()
            );
        }

        debug!("Tick {} updated {} channel(s)", self.ticks, report.updated);
        report
    }

    /// Ticks until `shutdown` resolves, then returns the total tick count.
    ///
    /// The first tick fires immediately.
    pub async fn run<F>(mut self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        info!(
            "Starting telemetry loop every {}ms",
            self.tick_interval.as_millis()
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick_once().await;

                    if self.ticks % self.status_interval_ticks == 0 {
                        log_status(&self.store, self.ticks).await;
                    }
                }

                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping telemetry loop");
                    info!("Total ticks: {}", self.ticks);
                    break;
                }
            }
        }

        self.ticks
    }
}

async fn log_status(store: &RwLock<Store>, ticks: u64) {
    let store = store.read().await;
    for ch in store.windowed() {
        if let Ok(stats) = ch.stats() {
            info!(
                "{} [{}{}] min={} max={} range={}",
                ch.id(),
                stats.current,
                ch.unit().unwrap_or(""),
                stats.min,
                stats.max,
                stats.range
            );
        }
    }
    info!("Tick {} ({} channels)", ticks, store.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::channel::{ChannelSpec, CompositeSpec};
    use crate::telemetry::generator::RandomWalk;
    use tokio::sync::oneshot;
    use tokio_test::assert_ok;

    fn store() -> Store {
        Store::new(
            [
                ChannelSpec::new("temperature", 30.0).with_capacity(10),
                ChannelSpec::new("altitude", 1100.0).with_capacity(10),
            ],
            [CompositeSpec::new("Silver", "metals", "#c0c0c0")],
            &mut RandomWalk::seeded(4),
        )
        .unwrap()
    }

    fn driver(tick_ms: u64) -> TelemetryDriver {
        TelemetryDriver::new(store(), Box::new(RandomWalk::seeded(5)), Duration::from_millis(tick_ms))
            .unwrap()
    }

    #[test]
    fn test_zero_tick_interval_rejected() {
        let result = TelemetryDriver::new(store(), Box::new(RandomWalk::seeded(1)), Duration::ZERO);
        match result {
            Err(GcsError::InvalidConfig(msg)) => assert!(msg.contains("tick interval")),
            other => panic!("Expected InvalidConfig, got: {:?}", other),
        }
    }

    #[test]
    fn test_sub_millisecond_tick_interval_accepted() {
        let result = TelemetryDriver::new(store(), Box::new(RandomWalk::seeded(1)), Duration::from_micros(500));
        assert_ok!(result);
    }

    #[tokio::test]
    async fn test_initial_frame_is_tick_zero() {
        let driver = driver(10);
        let rx = driver.subscribe();
        let frame = rx.borrow();
        assert_eq!(frame.tick, 0);
        assert_eq!(frame.series("temperature").unwrap().samples, vec![30.0; 10]);
    }

    #[tokio::test]
    async fn test_tick_once_publishes_frame() {
        let mut driver = driver(10);
        let mut rx = driver.subscribe();

        let report = driver.tick_once().await;
        assert!(report.is_clean());
        assert_eq!(report.updated, 3);

        assert!(rx.has_changed().unwrap());
        let frame = rx.borrow_and_update().clone();
        assert_eq!(frame.tick, 1);

        let store = driver.store();
        let store = store.read().await;
        assert_eq!(
            frame.series("altitude").unwrap().samples,
            store.snapshot("altitude").unwrap()
        );
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let driver = driver(5).with_status_interval(2);
        let mut rx = driver.subscribe();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(driver.run(async {
            let _ = stop_rx.await;
        }));

        for _ in 0..3 {
            assert_ok!(rx.changed().await);
        }
        let _ = stop_tx.send(());

        let ticks = assert_ok!(handle.await);
        assert!(ticks >= 3, "expected at least 3 ticks, got {}", ticks);
    }

    #[tokio::test]
    async fn test_readers_never_see_partial_tick() {
        let driver = driver(1);
        let store = driver.store();
        let mut rx = driver.subscribe();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(driver.run(async {
            let _ = stop_rx.await;
        }));

        let mut last_tick = 0;
        for _ in 0..20 {
            assert_ok!(rx.changed().await);

            let guard = store.read().await;
            let frame = rx.borrow_and_update().clone();
            assert!(frame.tick > last_tick, "frames must advance");
            last_tick = frame.tick;

            // Under the read lock the store cannot move, so the latest
            // frame must describe exactly this state.
            for ch in guard.windowed() {
                assert_eq!(
                    frame.series(ch.id()).unwrap().samples,
                    ch.window().snapshot(),
                    "{} diverged from frame {}",
                    ch.id(),
                    frame.tick
                );
            }
            for c in guard.composites() {
                assert_eq!(frame.category(c.id()).unwrap().value, c.value());
            }
            drop(guard);
        }

        let _ = stop_tx.send(());
        let ticks = assert_ok!(handle.await);
        assert!(ticks >= last_tick);
    }
}
