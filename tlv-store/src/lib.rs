//! TLV Store Library
//!
//! This library provides JSON file persistence for TLV timelines: the
//! session params store, record batch files and timeline configuration.

pub mod batch;
pub mod file_store;

pub use batch::RecordBatch;
pub use file_store::JsonFileStore;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tlv_core::TimelineConfig;

/// Result type for tlv-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for tlv-store operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("TLV core error: {0}")]
    Core(#[from] tlv_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<Error> for tlv_core::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Core(inner) => inner,
            other => tlv_core::Error::Persistence(other.to_string()),
        }
    }
}

/// Reads a timeline configuration; missing keys take their defaults
pub fn read_config<R: Read>(reader: R) -> Result<TimelineConfig> {
    Ok(serde_json::from_reader(reader)?)
}

/// Reads a timeline configuration from a JSON file
pub fn load_config(path: &Path) -> Result<TimelineConfig> {
    read_config(BufReader::new(File::open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlv_core::ZoomLevel;

    #[test]
    fn test_read_config() {
        let config = read_config(r#"{"background_tail_msec": 10000, "default_zoom": "day1"}"#.as_bytes())
            .unwrap();
        assert_eq!(config.background_tail_msec, 10_000);
        assert_eq!(config.default_zoom, ZoomLevel::Day1);
        assert_eq!(config.animation_duration_msec, 150);
    }

    #[test]
    fn test_settle_delay_tracks_configured_animation() {
        let config = read_config(r#"{"animation_duration_msec": 300}"#.as_bytes()).unwrap();
        assert_eq!(config.settle_delay_msec(), 301);

        let config =
            read_config(r#"{"animation_duration_msec": 300, "settle_delay_msec": 40}"#.as_bytes())
                .unwrap();
        assert_eq!(config.settle_delay_msec(), 40);
    }

    #[test]
    fn test_negative_background_tail_is_rejected() {
        assert!(read_config(r#"{"background_tail_msec": -5}"#.as_bytes()).is_err());
    }

    #[test]
    fn test_error_maps_to_persistence() {
        let io = Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "gone"));
        assert!(matches!(tlv_core::Error::from(io), tlv_core::Error::Persistence(_)));

        let core = Error::Core(tlv_core::Error::UnknownZoomLevel(12));
        assert_eq!(tlv_core::Error::from(core), tlv_core::Error::UnknownZoomLevel(12));
    }
}
