//! Navigation policy: pure decisions for goto-last, prev, next and snapping
//!
//! Nothing here touches the model's cursor. Each function inspects tiers
//! and returns a [`Decision`] that [`crate::TimelineModel`] applies.

use crate::{RecordTier, TierKind, TimeRecord};

/// Where a navigation request lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Tier holding the selected record
    pub tier: TierKind,
    /// Position of the record within its tier
    pub index: usize,
    /// New cursor value
    pub cursor_msec: i64,
}

/// One major record in the merged Major1 ∪ Major2 order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MajorEntry {
    pub timestamp_msec: i64,
    pub tier: TierKind,
    pub index: usize,
}

impl MajorEntry {
    fn decision(&self) -> Decision {
        Decision {
            tier: self.tier,
            index: self.index,
            cursor_msec: self.timestamp_msec,
        }
    }
}

/// Both major tiers merged into one descending timestamp order.
///
/// Rebuilt whenever either major tier is replaced. At equal timestamps a
/// Major1 entry precedes a Major2 entry, and entries of the same tier keep
/// their tier order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MajorIndex {
    entries: Vec<MajorEntry>,
}

impl MajorIndex {
    pub fn build<P>(major1: &RecordTier<P>, major2: &RecordTier<P>) -> Self {
        let mut entries: Vec<MajorEntry> = [major1, major2]
            .into_iter()
            .flat_map(|tier| {
                tier.iter().enumerate().map(move |(index, record)| MajorEntry {
                    timestamp_msec: record.timestamp_msec(),
                    tier: tier.kind(),
                    index,
                })
            })
            .collect();
        entries.sort_by(|a, b| b.timestamp_msec.cmp(&a.timestamp_msec));
        Self { entries }
    }

    pub fn entries(&self) -> &[MajorEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nearest entry strictly earlier than `cursor`; none for an unset cursor
    pub fn prev(&self, cursor: Option<i64>) -> Option<&MajorEntry> {
        let cursor = cursor?;
        let at = self.entries.partition_point(|e| e.timestamp_msec >= cursor);
        self.entries.get(at)
    }

    /// Nearest entry strictly later than `cursor`; none for an unset cursor
    pub fn next(&self, cursor: Option<i64>) -> Option<&MajorEntry> {
        let cursor = cursor?;
        let later = self.entries.partition_point(|e| e.timestamp_msec > cursor);
        let target = self.entries[..later].last()?.timestamp_msec;
        let first = self.entries.partition_point(|e| e.timestamp_msec > target);
        self.entries.get(first)
    }
}

/// Cursor position for the goto-last background fallback: `tail_msec`
/// before the segment's end, never before its start nor past its end
pub fn background_fallback_cursor<P>(record: &TimeRecord<P>, tail_msec: i64) -> i64 {
    let lead = record
        .duration_msec()
        .saturating_sub(tail_msec.max(0))
        .max(0);
    record.timestamp_msec().saturating_add(lead)
}

/// Goto-last: the most recent Major1 record, else the background fallback
pub fn last<P>(
    major1: &RecordTier<P>,
    background: &RecordTier<P>,
    tail_msec: i64,
) -> Option<Decision> {
    if let Some(record) = major1.most_recent() {
        return Some(Decision {
            tier: TierKind::Major1,
            index: 0,
            cursor_msec: record.timestamp_msec(),
        });
    }
    background.most_recent().map(|record| Decision {
        tier: TierKind::Background,
        index: 0,
        cursor_msec: background_fallback_cursor(record, tail_msec),
    })
}

/// Nearest earlier major event across both major tiers
pub fn prev(index: &MajorIndex, cursor: Option<i64>) -> Option<Decision> {
    index.prev(cursor).map(MajorEntry::decision)
}

/// Nearest later major event across both major tiers
pub fn next(index: &MajorIndex, cursor: Option<i64>) -> Option<Decision> {
    index.next(cursor).map(MajorEntry::decision)
}

/// Snaps a tapped time onto a major record.
///
/// A Major2 record under `ts` wins, then a Major1 record under `ts`; both
/// use closed spans. A tap in the gap between two Major1 records snaps to
/// the start of the newer one. Otherwise `ts` is returned as is.
pub fn snap<P>(major1: &RecordTier<P>, major2: &RecordTier<P>, ts: i64) -> i64 {
    if let Some(record) = major2.iter().find(|r| r.contains_inclusive(ts)) {
        return record.timestamp_msec();
    }

    let mut newer: Option<&TimeRecord<P>> = None;
    for record in major1 {
        if record.contains_inclusive(ts) {
            return record.timestamp_msec();
        }
        if let Some(newer) = newer {
            if ts > record.end_msec() && ts < newer.timestamp_msec() {
                return newer.timestamp_msec();
            }
        }
        newer = Some(record);
    }
    ts
}
