//! Timeline configuration

use crate::ZoomLevel;

/// Timeline configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimelineConfig {
    /// Duration of animated cursor/zoom moves, handed to the renderer
    pub animation_duration_msec: u64,
    /// Delay after an animation before UI state (zoom limits) is re-read.
    /// Unset means one millisecond past the animation, see
    /// [`TimelineConfig::settle_delay_msec`].
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub settle_delay_msec: Option<u64>,
    /// How far before a background segment's end goto-last lands
    pub background_tail_msec: u64,
    /// Zoom level used when no persisted level is available
    pub default_zoom: ZoomLevel,
    /// Whether the cursor is written on session end
    pub persist_cursor: bool,
    /// Whether the zoom level is written on session end
    pub persist_zoom: bool,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            animation_duration_msec: 150,
            settle_delay_msec: None,
            background_tail_msec: 30_000,
            default_zoom: ZoomLevel::Hour1,
            persist_cursor: true,
            persist_zoom: true,
        }
    }
}

impl TimelineConfig {
    /// Effective settle delay: the configured value, else the animation
    /// duration plus one millisecond
    pub fn settle_delay_msec(&self) -> u64 {
        self.settle_delay_msec
            .unwrap_or_else(|| self.animation_duration_msec.saturating_add(1))
    }

    /// Background tail as a timestamp offset
    pub fn background_tail(&self) -> i64 {
        i64::try_from(self.background_tail_msec).unwrap_or(i64::MAX)
    }
}
