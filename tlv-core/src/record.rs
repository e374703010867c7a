//! Time record data structures for TLV timelines

use crate::{Error, Result};
use std::fmt;

/// 32-bit ARGB draw color, used to override a tier's default color per record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    pub const RED: Color = Color(0xFFFF_0000);
    pub const GREEN: Color = Color(0xFF00_FF00);
    pub const BLUE: Color = Color(0xFF00_00FF);
    pub const YELLOW: Color = Color(0xFFFF_FF00);

    /// Builds a color from its alpha, red, green and blue channels
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }
}

/// A single time-stamped event on the timeline.
///
/// Records are immutable once built; [`TimeRecord::new`] refuses negative
/// timestamps and durations so a tier never holds a malformed record. The
/// payload is opaque to the timeline and only carried along for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "RawRecord<P>",
        bound(
            serialize = "P: serde::Serialize",
            deserialize = "P: serde::Deserialize<'de>"
        )
    )
)]
pub struct TimeRecord<P = ()> {
    timestamp_msec: i64,
    duration_msec: i64,
    payload: P,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    color: Option<Color>,
}

impl<P> TimeRecord<P> {
    /// Creates a new record starting at `timestamp_msec` (epoch milliseconds).
    ///
    /// A duration of 0 means the event is instantaneous or its length is unknown.
    pub fn new(timestamp_msec: i64, duration_msec: i64, payload: P) -> Result<Self> {
        if timestamp_msec < 0 {
            return Err(Error::InvalidArgument(format!(
                "negative record timestamp: {timestamp_msec}"
            )));
        }
        if duration_msec < 0 {
            return Err(Error::InvalidArgument(format!(
                "negative record duration: {duration_msec}"
            )));
        }
        Ok(Self {
            timestamp_msec,
            duration_msec,
            payload,
            color: None,
        })
    }

    /// Creates a new record that is drawn with `color` instead of the tier default
    pub fn with_color(timestamp_msec: i64, duration_msec: i64, payload: P, color: Color) -> Result<Self> {
        let mut record = Self::new(timestamp_msec, duration_msec, payload)?;
        record.color = Some(color);
        Ok(record)
    }

    /// Start time in epoch milliseconds
    pub fn timestamp_msec(&self) -> i64 {
        self.timestamp_msec
    }

    /// Duration in milliseconds (0 = instantaneous or unknown)
    pub fn duration_msec(&self) -> i64 {
        self.duration_msec
    }

    /// End time in epoch milliseconds
    pub fn end_msec(&self) -> i64 {
        self.timestamp_msec.saturating_add(self.duration_msec)
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Draw color override, if any
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Checks if `ts` falls inside `[start, end)`
    pub fn contains(&self, ts: i64) -> bool {
        ts >= self.timestamp_msec && ts < self.end_msec()
    }

    /// Checks if `ts` falls inside `[start, end]`
    pub fn contains_inclusive(&self, ts: i64) -> bool {
        ts >= self.timestamp_msec && ts <= self.end_msec()
    }

    /// Checks if the record's closed span intersects `[start, end]`
    pub fn overlaps(&self, start: i64, end: i64) -> bool {
        self.end_msec() >= start && self.timestamp_msec <= end
    }

    /// Consumes the record, returning its payload
    pub fn into_payload(self) -> P {
        self.payload
    }
}

impl<P> fmt::Display for TimeRecord<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TimeRecord {{timestamp: {}, duration: {}}}",
            self.timestamp_msec, self.duration_msec
        )
    }
}

/// Unvalidated wire form; deserialization goes through [`TimeRecord::new`]
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawRecord<P> {
    timestamp_msec: i64,
    #[serde(default)]
    duration_msec: i64,
    payload: P,
    #[serde(default)]
    color: Option<Color>,
}

#[cfg(feature = "serde")]
impl<P> TryFrom<RawRecord<P>> for TimeRecord<P> {
    type Error = Error;

    fn try_from(raw: RawRecord<P>) -> Result<Self> {
        let mut record = TimeRecord::new(raw.timestamp_msec, raw.duration_msec, raw.payload)?;
        record.color = raw.color;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative_fields() {
        assert!(matches!(
            TimeRecord::new(-1, 0, ()),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            TimeRecord::new(1_000, -5, ()),
            Err(Error::InvalidArgument(_))
        ));
        assert!(TimeRecord::new(0, 0, ()).is_ok());
    }

    #[test]
    fn test_value_equality() {
        let a = TimeRecord::new(1_000, 500, "event").unwrap();
        let b = TimeRecord::new(1_000, 500, "event").unwrap();
        let c = TimeRecord::with_color(1_000, 500, "event", Color::YELLOW).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(c.color(), Some(Color::YELLOW));
    }

    #[test]
    fn test_span_checks() {
        let record = TimeRecord::new(1_000, 500, ()).unwrap();

        assert_eq!(record.end_msec(), 1_500);
        assert!(record.contains(1_000));
        assert!(record.contains(1_499));
        assert!(!record.contains(1_500));
        assert!(record.contains_inclusive(1_500));
        assert!(record.overlaps(1_500, 2_000));
        assert!(!record.overlaps(1_501, 2_000));

        let instant = TimeRecord::new(2_000, 0, ()).unwrap();
        assert!(!instant.contains(2_000));
        assert!(instant.contains_inclusive(2_000));
    }

    #[test]
    fn test_color_channels() {
        let color = Color::from_argb(0x80, 0x11, 0x22, 0x33);
        assert_eq!(color, Color(0x8011_2233));
        assert_eq!(color.alpha(), 0x80);
        assert_eq!(color.red(), 0x11);
        assert_eq!(color.green(), 0x22);
        assert_eq!(color.blue(), 0x33);
        assert_eq!(Color::YELLOW, Color::from_argb(0xFF, 0xFF, 0xFF, 0x00));
    }

    #[test]
    fn test_display() {
        let record = TimeRecord::new(42, 7, ()).unwrap();
        assert_eq!(record.to_string(), "TimeRecord {timestamp: 42, duration: 7}");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates() {
        let ok: TimeRecord<String> = serde_json::from_str(
            r#"{"timestamp_msec": 10, "duration_msec": 5, "payload": "a", "color": 4294967040}"#,
        )
        .unwrap();
        assert_eq!(ok.color(), Some(Color::YELLOW));

        let bad = serde_json::from_str::<TimeRecord<String>>(
            r#"{"timestamp_msec": 10, "duration_msec": -5, "payload": "a"}"#,
        );
        assert!(bad.is_err());
    }
}
