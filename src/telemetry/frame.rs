//! Serializable picture of every channel at one tick, handed to consumers
//! such as the JSON feed.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::stats::WindowStats;

/// All channels of a store after a given tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Tick counter (0 before the first tick).
    pub tick: u64,
    /// Wall-clock time the frame was taken.
    pub timestamp: DateTime<Utc>,
    /// Windowed channels in configuration order.
    pub series: Vec<SeriesFrame>,
    /// Composite entries in configuration order.
    pub categories: Vec<CategoryFrame>,
}

/// One windowed channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesFrame {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub samples: Vec<f64>,
    pub stats: WindowStats,
}

/// One composite entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryFrame {
    pub id: String,
    pub group: String,
    pub color: String,
    pub value: f64,
}

impl Frame {
    /// Looks up a series by channel id.
    pub fn series(&self, id: &str) -> Option<&SeriesFrame> {
        self.series.iter().find(|s| s.id == id)
    }

    /// Looks up a category by entry id.
    pub fn category(&self, id: &str) -> Option<&CategoryFrame> {
        self.categories.iter().find(|c| c.id == id)
    }
}
