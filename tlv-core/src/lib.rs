//! TLV Core Library
//!
//! This library provides the record model and cursor navigation logic for
//! TLV (timeline view) timelines: three independently-fed record tiers, a
//! single playhead that steps across major events, a zoom ladder, and the
//! session state persisted between runs.

pub mod config;
pub mod host;
pub mod model;
pub mod navigation;
pub mod record;
pub mod session;
pub mod tier;
pub mod viewport;
pub mod zoom;

pub use config::TimelineConfig;
pub use host::{NoopHost, Reposition, TimelineHost};
pub use model::{Selection, SelectionResult, TierRecord, TimelineModel};
pub use record::{Color, TimeRecord};
pub use session::{MemoryStore, SessionParams, SessionStore, TimelineSession};
pub use tier::{RecordTier, TierKind};
pub use viewport::Viewport;
pub use zoom::ZoomLevel;

/// Result type for tlv-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for tlv-core operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown zoom level: {0}")]
    UnknownZoomLevel(u32),

    #[error("Persistence error: {0}")]
    Persistence(String),
}
