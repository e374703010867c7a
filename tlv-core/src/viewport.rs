//! Visible time window around the cursor

use crate::ZoomLevel;

/// Closed time window `[start_msec, end_msec]` shown by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub start_msec: i64,
    pub end_msec: i64,
}

impl Viewport {
    /// Centers a window of the zoom level's width on `cursor_msec`
    pub fn centered(cursor_msec: i64, zoom: ZoomLevel) -> Self {
        let half = zoom.interval_msec() / 2;
        Self {
            start_msec: cursor_msec.saturating_sub(half),
            end_msec: cursor_msec.saturating_add(half),
        }
    }

    pub fn width_msec(&self) -> i64 {
        self.end_msec - self.start_msec
    }

    pub fn contains(&self, ts: i64) -> bool {
        ts >= self.start_msec && ts <= self.end_msec
    }
}
