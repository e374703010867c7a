//! Timeline model: three record tiers, one cursor, one zoom level

use crate::navigation::{self, Decision, MajorIndex};
use crate::{RecordTier, Reposition, TierKind, TimeRecord, TimelineConfig, Viewport, ZoomLevel};
use tracing::debug;

/// A selected record, tagged with the tier it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierRecord<P> {
    Background(TimeRecord<P>),
    Major1(TimeRecord<P>),
    Major2(TimeRecord<P>),
}

impl<P> TierRecord<P> {
    fn new(kind: TierKind, record: TimeRecord<P>) -> Self {
        match kind {
            TierKind::Background => TierRecord::Background(record),
            TierKind::Major1 => TierRecord::Major1(record),
            TierKind::Major2 => TierRecord::Major2(record),
        }
    }

    pub fn kind(&self) -> TierKind {
        match self {
            TierRecord::Background(_) => TierKind::Background,
            TierRecord::Major1(_) => TierKind::Major1,
            TierRecord::Major2(_) => TierKind::Major2,
        }
    }

    pub fn record(&self) -> &TimeRecord<P> {
        match self {
            TierRecord::Background(r) | TierRecord::Major1(r) | TierRecord::Major2(r) => r,
        }
    }

    pub fn into_record(self) -> TimeRecord<P> {
        match self {
            TierRecord::Background(r) | TierRecord::Major1(r) | TierRecord::Major2(r) => r,
        }
    }
}

/// Outcome of a successful navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<P> {
    /// New cursor position
    pub timestamp_msec: i64,
    /// Record the cursor was moved onto, if any
    pub record: Option<TierRecord<P>>,
    /// Renderer hint, passed through from the caller
    pub reposition: Reposition,
}

/// `None` means nothing qualified: no previous/next/last record.
/// The model is left untouched in that case.
pub type SelectionResult<P> = Option<Selection<P>>;

/// Owns the three record tiers plus the cursor and zoom state of one session.
///
/// The cursor starts unset and is a free-floating playhead: it need not sit
/// on a record boundary. Navigation moves it onto record starts, except for
/// the goto-last background fallback.
#[derive(Debug, Clone)]
pub struct TimelineModel<P = ()> {
    background: RecordTier<P>,
    major1: RecordTier<P>,
    major2: RecordTier<P>,
    majors: MajorIndex,
    cursor_msec: Option<i64>,
    zoom: ZoomLevel,
    background_tail_msec: i64,
}

impl<P> Default for TimelineModel<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> TimelineModel<P> {
    /// Creates an empty model with default configuration
    pub fn new() -> Self {
        Self::with_config(&TimelineConfig::default())
    }

    pub fn with_config(config: &TimelineConfig) -> Self {
        Self {
            background: RecordTier::new(TierKind::Background),
            major1: RecordTier::new(TierKind::Major1),
            major2: RecordTier::new(TierKind::Major2),
            majors: MajorIndex::default(),
            cursor_msec: None,
            zoom: config.default_zoom,
            background_tail_msec: config.background_tail(),
        }
    }

    /// Installs all three tiers. The cursor is left as is.
    pub fn load_initial(
        &mut self,
        major1: Vec<TimeRecord<P>>,
        major2: Vec<TimeRecord<P>>,
        background: Vec<TimeRecord<P>>,
    ) {
        self.major1.set_records(major1);
        self.major2.set_records(major2);
        self.background.set_records(background);
        self.majors = MajorIndex::build(&self.major1, &self.major2);
        debug!(
            major1 = self.major1.len(),
            major2 = self.major2.len(),
            background = self.background.len(),
            "timeline loaded"
        );
    }

    /// Replaces a single tier, e.g. after the host fetched more data
    pub fn set_records(&mut self, kind: TierKind, records: Vec<TimeRecord<P>>) {
        match kind {
            TierKind::Background => self.background.set_records(records),
            TierKind::Major1 => self.major1.set_records(records),
            TierKind::Major2 => self.major2.set_records(records),
        }
        if kind.is_major() {
            self.majors = MajorIndex::build(&self.major1, &self.major2);
        }
    }

    pub fn tier(&self, kind: TierKind) -> &RecordTier<P> {
        match kind {
            TierKind::Background => &self.background,
            TierKind::Major1 => &self.major1,
            TierKind::Major2 => &self.major2,
        }
    }

    /// Major records of both tiers in merged descending order
    pub fn majors(&self) -> &MajorIndex {
        &self.majors
    }

    /// Current cursor, `None` while nothing has been selected
    pub fn cursor_msec(&self) -> Option<i64> {
        self.cursor_msec
    }

    pub fn is_selected(&self) -> bool {
        self.cursor_msec.is_some()
    }

    /// Moves the playhead without selecting a record
    pub fn set_cursor(&mut self, cursor_msec: i64) {
        self.cursor_msec = Some(cursor_msec);
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: ZoomLevel) {
        self.zoom = zoom;
    }

    /// Narrows the visible interval by one rung
    pub fn zoom_in(&mut self) -> ZoomLevel {
        self.zoom = self.zoom.zoom_in();
        self.zoom
    }

    /// Widens the visible interval by one rung
    pub fn zoom_out(&mut self) -> ZoomLevel {
        self.zoom = self.zoom.zoom_out();
        self.zoom
    }

    /// Visible window around the cursor
    pub fn viewport(&self) -> Option<Viewport> {
        self.cursor_msec.map(|c| Viewport::centered(c, self.zoom))
    }

    /// Records of `kind` inside the viewport
    pub fn visible(&self, kind: TierKind) -> Vec<&TimeRecord<P>> {
        match self.viewport() {
            Some(v) => self.tier(kind).overlapping(v.start_msec, v.end_msec),
            None => Vec::new(),
        }
    }

    /// Tiers whose oldest record starts after the viewport start, i.e.
    /// the viewport shows time the host has not supplied records for yet
    pub fn tiers_needing_more_data(&self) -> Vec<TierKind> {
        let Some(viewport) = self.viewport() else {
            return Vec::new();
        };
        [TierKind::Major1, TierKind::Major2, TierKind::Background]
            .into_iter()
            .filter(|&kind| {
                self.tier(kind)
                    .oldest()
                    .is_some_and(|r| viewport.start_msec < r.timestamp_msec())
            })
            .collect()
    }

    /// Record under the cursor in `kind`. Major2 spans include their end.
    pub fn highlighted(&self, kind: TierKind) -> Option<&TimeRecord<P>> {
        let cursor = self.cursor_msec?;
        match kind {
            TierKind::Major2 => self.major2.iter().find(|r| r.contains_inclusive(cursor)),
            _ => self.tier(kind).record_at(cursor),
        }
    }

    /// Time a tap at `ts` would select
    pub fn snap(&self, ts: i64) -> i64 {
        navigation::snap(&self.major1, &self.major2, ts)
    }
}

impl<P: Clone> TimelineModel<P> {
    /// Selects the most recent Major1 record, or falls back to the tail of
    /// the most recent background segment when there are no Major1 records
    pub fn goto_last(&mut self, reposition: Reposition) -> SelectionResult<P> {
        let decision = navigation::last(&self.major1, &self.background, self.background_tail_msec);
        debug!(?decision, "goto last");
        decision.map(|d| self.apply(d, reposition))
    }

    /// Steps to the nearest earlier major event of either major tier
    pub fn goto_prev(&mut self, reposition: Reposition) -> SelectionResult<P> {
        let decision = navigation::prev(&self.majors, self.cursor_msec);
        debug!(cursor = ?self.cursor_msec, ?decision, "goto prev");
        decision.map(|d| self.apply(d, reposition))
    }

    /// Steps to the nearest later major event of either major tier
    pub fn goto_next(&mut self, reposition: Reposition) -> SelectionResult<P> {
        let decision = navigation::next(&self.majors, self.cursor_msec);
        debug!(cursor = ?self.cursor_msec, ?decision, "goto next");
        decision.map(|d| self.apply(d, reposition))
    }

    /// Moves the cursor to where a tap at `ts` snaps and reports the
    /// background segment under the new cursor
    pub fn select_at(&mut self, ts: i64, reposition: Reposition) -> Selection<P> {
        let cursor = self.snap(ts);
        debug!(tapped = ts, cursor, "select at");
        self.cursor_msec = Some(cursor);
        Selection {
            timestamp_msec: cursor,
            record: self
                .background
                .record_at(cursor)
                .map(|r| TierRecord::Background(r.clone())),
            reposition,
        }
    }

    fn apply(&mut self, decision: Decision, reposition: Reposition) -> Selection<P> {
        let record = self.tier(decision.tier).records()[decision.index].clone();
        self.cursor_msec = Some(decision.cursor_msec);
        Selection {
            timestamp_msec: decision.cursor_msec,
            record: Some(TierRecord::new(decision.tier, record)),
            reposition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(spans: &[(i64, i64)]) -> Vec<TimeRecord<u32>> {
        spans
            .iter()
            .enumerate()
            .map(|(i, &(ts, dur))| TimeRecord::new(ts, dur, i as u32).unwrap())
            .collect()
    }

    #[test]
    fn test_load_initial_keeps_cursor_unset() {
        let mut model = TimelineModel::new();
        model.load_initial(records(&[(300, 0)]), records(&[(200, 0)]), records(&[(100, 50)]));

        assert!(!model.is_selected());
        assert_eq!(model.majors().len(), 2);
        assert_eq!(model.tier(TierKind::Background).len(), 1);
    }

    #[test]
    fn test_goto_last_failure_leaves_state() {
        let mut model: TimelineModel<u32> = TimelineModel::new();
        assert!(model.goto_last(Reposition::Instant).is_none());
        assert_eq!(model.cursor_msec(), None);

        model.set_cursor(1_234);
        assert!(model.goto_last(Reposition::Instant).is_none());
        assert_eq!(model.cursor_msec(), Some(1_234));
    }

    #[test]
    fn test_prev_and_next_need_a_cursor() {
        let mut model = TimelineModel::new();
        model.load_initial(records(&[(5_000, 0)]), Vec::new(), Vec::new());

        assert!(model.goto_prev(Reposition::Animated).is_none());
        assert!(model.goto_next(Reposition::Animated).is_none());
        assert_eq!(model.cursor_msec(), None);
    }

    #[test]
    fn test_selection_discloses_tier_and_hint() {
        let mut model = TimelineModel::new();
        model.load_initial(records(&[(1_000, 0)]), records(&[(2_000, 0)]), Vec::new());
        model.set_cursor(1_500);

        let selection = model.goto_next(Reposition::Instant).unwrap();
        assert_eq!(selection.timestamp_msec, 2_000);
        assert_eq!(selection.reposition, Reposition::Instant);
        let record = selection.record.unwrap();
        assert_eq!(record.kind(), TierKind::Major2);
        assert_eq!(record.record().timestamp_msec(), 2_000);
    }

    #[test]
    fn test_refill_rebuilds_major_index() {
        let mut model = TimelineModel::new();
        model.load_initial(records(&[(1_000, 0)]), Vec::new(), Vec::new());
        model.goto_last(Reposition::Animated);
        assert!(model.goto_prev(Reposition::Animated).is_none());

        model.set_records(TierKind::Major2, records(&[(500, 0)]));
        let selection = model.goto_prev(Reposition::Animated).unwrap();
        assert_eq!(selection.timestamp_msec, 500);
        assert_eq!(model.cursor_msec(), Some(500));
    }

    #[test]
    fn test_zoom_and_viewport() {
        let mut model: TimelineModel<u32> = TimelineModel::new();
        assert!(model.viewport().is_none());

        model.set_cursor(10_000_000);
        assert_eq!(model.zoom(), ZoomLevel::Hour1);
        assert_eq!(model.zoom_in(), ZoomLevel::Min30);
        assert_eq!(model.zoom_out(), ZoomLevel::Hour1);

        let viewport = model.viewport().unwrap();
        assert_eq!(viewport.start_msec, 10_000_000 - 1_800_000);
        assert_eq!(viewport.end_msec, 10_000_000 + 1_800_000);
    }

    #[test]
    fn test_visible_and_more_data() {
        let mut model = TimelineModel::new();
        model.load_initial(
            records(&[(10_000_000, 0), (9_000_000, 0)]),
            records(&[(1_000_000, 0)]),
            records(&[(9_500_000, 600_000)]),
        );
        model.set_zoom(ZoomLevel::Min30);
        model.set_cursor(9_800_000);

        // window is [8_900_000, 10_700_000]
        assert_eq!(model.visible(TierKind::Major1).len(), 2);
        assert_eq!(model.visible(TierKind::Major2).len(), 0);
        assert_eq!(model.visible(TierKind::Background).len(), 1);
        assert_eq!(
            model.tiers_needing_more_data(),
            vec![TierKind::Major1, TierKind::Background]
        );
    }

    #[test]
    fn test_highlighted() {
        let mut model = TimelineModel::new();
        model.load_initial(
            records(&[(1_000, 100)]),
            records(&[(2_000, 100)]),
            records(&[(0, 5_000)]),
        );
        model.set_cursor(2_100);

        assert!(model.highlighted(TierKind::Major1).is_none());
        assert_eq!(model.highlighted(TierKind::Major2).map(|r| r.timestamp_msec()), Some(2_000));
        assert_eq!(model.highlighted(TierKind::Background).map(|r| r.timestamp_msec()), Some(0));

        model.set_cursor(1_100);
        assert!(model.highlighted(TierKind::Major1).is_none());
    }

    #[test]
    fn test_select_at_snaps_and_reports_background() {
        let mut model = TimelineModel::new();
        model.load_initial(
            records(&[(10_000, 1_000), (5_000, 1_000)]),
            Vec::new(),
            records(&[(0, 20_000)]),
        );

        let selection = model.select_at(8_000, Reposition::Animated);
        assert_eq!(selection.timestamp_msec, 10_000);
        assert_eq!(model.cursor_msec(), Some(10_000));
        let record = selection.record.unwrap();
        assert_eq!(record.kind(), TierKind::Background);
        assert_eq!(record.into_record().timestamp_msec(), 0);

        let selection = model.select_at(30_000, Reposition::Instant);
        assert_eq!(selection.timestamp_msec, 30_000);
        assert!(selection.record.is_none());
    }
}
