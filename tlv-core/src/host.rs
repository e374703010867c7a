//! Host collaborator interface
//!
//! The host renders the timeline and feeds it records. It is told about
//! selections and asked for more data through [`TimelineHost`].

use crate::{TierKind, TimeRecord};

/// How the renderer should move to a new cursor position.
/// The core never animates; it only passes this through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reposition {
    Instant,
    #[default]
    Animated,
}

/// Callbacks a host implements to follow timeline state
pub trait TimelineHost<P> {
    /// A selection is about to change
    fn on_selecting(&mut self) {}

    /// The cursor moved to `timestamp_msec`, optionally onto `record`
    fn on_selected(
        &mut self,
        _timestamp_msec: i64,
        _record: Option<&TimeRecord<P>>,
        _reposition: Reposition,
    ) {
    }

    /// The viewport reaches past the oldest record of `tier`
    fn on_request_more_data(&mut self, _tier: TierKind) {}
}

/// Host that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHost;

impl<P> TimelineHost<P> for NoopHost {}
