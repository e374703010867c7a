//! Zoom ladder: the discrete visible intervals a timeline can show

use crate::{Error, Result};

const MINUTE: i64 = 60 * 1000;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Visible timeline interval, from 1 minute up to 7 days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ZoomLevel {
    Min1,
    Min5,
    Min15,
    Min30,
    #[default]
    Hour1,
    Hour6,
    Hour12,
    Day1,
    Day7,
}

impl ZoomLevel {
    /// All rungs, narrowest first
    pub const LADDER: [ZoomLevel; 9] = [
        ZoomLevel::Min1,
        ZoomLevel::Min5,
        ZoomLevel::Min15,
        ZoomLevel::Min30,
        ZoomLevel::Hour1,
        ZoomLevel::Hour6,
        ZoomLevel::Hour12,
        ZoomLevel::Day1,
        ZoomLevel::Day7,
    ];

    pub const MIN: ZoomLevel = ZoomLevel::Min1;
    pub const MAX: ZoomLevel = ZoomLevel::Day7;

    /// Width of the visible interval in milliseconds
    pub fn interval_msec(self) -> i64 {
        match self {
            ZoomLevel::Min1 => MINUTE,
            ZoomLevel::Min5 => 5 * MINUTE,
            ZoomLevel::Min15 => 15 * MINUTE,
            ZoomLevel::Min30 => 30 * MINUTE,
            ZoomLevel::Hour1 => HOUR,
            ZoomLevel::Hour6 => 6 * HOUR,
            ZoomLevel::Hour12 => 12 * HOUR,
            ZoomLevel::Day1 => DAY,
            ZoomLevel::Day7 => 7 * DAY,
        }
    }

    /// Position on the ladder; this is the integer persisted between sessions
    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn from_index(index: u32) -> Result<Self> {
        Self::LADDER
            .get(index as usize)
            .copied()
            .ok_or(Error::UnknownZoomLevel(index))
    }

    /// Picks the widest rung whose interval does not exceed `interval_msec`,
    /// clamped to the ends of the ladder
    pub fn nearest(interval_msec: i64) -> Self {
        Self::LADDER
            .iter()
            .rev()
            .copied()
            .find(|z| z.interval_msec() <= interval_msec)
            .unwrap_or(Self::MIN)
    }

    /// One rung narrower, saturating at 1 minute
    pub fn zoom_in(self) -> Self {
        match self.index() {
            0 => self,
            i => Self::LADDER[i as usize - 1],
        }
    }

    /// One rung wider, saturating at 7 days
    pub fn zoom_out(self) -> Self {
        Self::LADDER
            .get(self.index() as usize + 1)
            .copied()
            .unwrap_or(self)
    }

    pub fn is_min(self) -> bool {
        self == Self::MIN
    }

    pub fn is_max(self) -> bool {
        self == Self::MAX
    }
}

impl TryFrom<u32> for ZoomLevel {
    type Error = Error;

    fn try_from(index: u32) -> Result<Self> {
        Self::from_index(index)
    }
}
