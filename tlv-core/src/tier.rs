//! Record tiers: one ordered collection of records per timeline lane

use crate::TimeRecord;
use std::fmt;
use tracing::{trace, warn};

/// Identifies one of the three independently-fed record streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TierKind {
    /// Long segments used only as a goto-last fallback anchor
    Background,
    /// Primary major events
    Major1,
    /// Secondary major events
    Major2,
}

impl TierKind {
    pub const ALL: [TierKind; 3] = [TierKind::Background, TierKind::Major1, TierKind::Major2];

    /// Returns true for tiers eligible for prev/next stepping
    pub fn is_major(self) -> bool {
        matches!(self, TierKind::Major1 | TierKind::Major2)
    }
}

impl fmt::Display for TierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TierKind::Background => "background",
            TierKind::Major1 => "major1",
            TierKind::Major2 => "major2",
        };
        f.write_str(name)
    }
}

/// Ordered records of one tier, most recent first.
///
/// Index 0 is always the most recent record. The tier is replaced wholesale
/// via [`RecordTier::set_records`] and never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTier<P = ()> {
    kind: TierKind,
    records: Vec<TimeRecord<P>>,
}

impl<P> RecordTier<P> {
    /// Creates an empty tier
    pub fn new(kind: TierKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
        }
    }

    pub fn kind(&self) -> TierKind {
        self.kind
    }

    /// Replaces the tier contents.
    ///
    /// Callers are expected to supply records sorted by timestamp descending.
    /// An unsorted batch is stably re-sorted so equal timestamps keep their
    /// supplied order.
    pub fn set_records(&mut self, mut records: Vec<TimeRecord<P>>) {
        if !is_descending(&records) {
            warn!(
                tier = %self.kind,
                count = records.len(),
                "records not sorted by timestamp descending, re-sorting"
            );
            records.sort_by(|a, b| b.timestamp_msec().cmp(&a.timestamp_msec()));
        }
        trace!(tier = %self.kind, count = records.len(), "tier replaced");
        self.records = records;
    }

    /// Removes all records
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Returns the most recent record, if any
    pub fn most_recent(&self) -> Option<&TimeRecord<P>> {
        self.records.first()
    }

    /// Returns the oldest record, if any
    pub fn oldest(&self) -> Option<&TimeRecord<P>> {
        self.records.last()
    }

    /// Finds the record with the largest timestamp strictly less than `ts`.
    /// Equal timestamps resolve to the earliest position in the tier.
    pub fn find_prev(&self, ts: i64) -> Option<&TimeRecord<P>> {
        let mut best: Option<&TimeRecord<P>> = None;
        for record in &self.records {
            let t = record.timestamp_msec();
            if t < ts && best.map_or(true, |b| t > b.timestamp_msec()) {
                best = Some(record);
            }
        }
        best
    }

    /// Finds the record with the smallest timestamp strictly greater than `ts`.
    /// Equal timestamps resolve to the earliest position in the tier.
    pub fn find_next(&self, ts: i64) -> Option<&TimeRecord<P>> {
        let mut best: Option<&TimeRecord<P>> = None;
        for record in &self.records {
            let t = record.timestamp_msec();
            if t > ts && best.map_or(true, |b| t < b.timestamp_msec()) {
                best = Some(record);
            }
        }
        best
    }

    /// Finds the first record whose `[start, end)` span contains `ts`
    pub fn record_at(&self, ts: i64) -> Option<&TimeRecord<P>> {
        self.records.iter().find(|r| r.contains(ts))
    }

    /// Returns all records whose closed span intersects `[start, end]`
    pub fn overlapping(&self, start: i64, end: i64) -> Vec<&TimeRecord<P>> {
        self.records.iter().filter(|r| r.overlaps(start, end)).collect()
    }

    pub fn records(&self) -> &[TimeRecord<P>] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeRecord<P>> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a, P> IntoIterator for &'a RecordTier<P> {
    type Item = &'a TimeRecord<P>;
    type IntoIter = std::slice::Iter<'a, TimeRecord<P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn is_descending<P>(records: &[TimeRecord<P>]) -> bool {
    records
        .windows(2)
        .all(|w| w[0].timestamp_msec() >= w[1].timestamp_msec())
}
