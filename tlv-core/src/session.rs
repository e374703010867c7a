//! Session state: what survives between runs, and the controller that
//! restores it, drives the model and notifies the host

use crate::{
    Reposition, Result, SelectionResult, TierKind, TimeRecord, TimelineConfig, TimelineHost,
    TimelineModel, ZoomLevel,
};
use tracing::{debug, warn};

/// Cursor and zoom state persisted between sessions.
/// Every field is optional; an all-`None` value means "no prior state".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionParams {
    pub cursor_timestamp_msec: Option<i64>,
    /// Index on the zoom ladder, see [`ZoomLevel::index`]
    pub zoom_level: Option<u32>,
}

/// Storage backend for [`SessionParams`]
pub trait SessionStore {
    /// Returns the stored params, or `None` if nothing was saved yet
    fn load(&self) -> Result<Option<SessionParams>>;

    fn save(&mut self, params: &SessionParams) -> Result<()>;
}

impl SessionParams {
    /// Snapshots the fields of `model` that `config` asks to persist
    pub fn from_model<P>(model: &TimelineModel<P>, config: &TimelineConfig) -> Self {
        Self {
            cursor_timestamp_msec: model.cursor_msec().filter(|_| config.persist_cursor),
            zoom_level: Some(model.zoom().index()).filter(|_| config.persist_zoom),
        }
    }

    /// Loads params from `store`. Never fails: a missing or unreadable
    /// store yields empty params.
    pub fn restore<S: SessionStore + ?Sized>(store: &S) -> Self {
        match store.load() {
            Ok(Some(params)) => params,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!(error = %e, "could not load session params, starting fresh");
                Self::default()
            }
        }
    }

    /// Saves params to `store`, best-effort. Returns whether the write happened.
    pub fn persist<S: SessionStore + ?Sized>(&self, store: &mut S) -> bool {
        match store.save(self) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "could not save session params, skipping");
                false
            }
        }
    }

    /// The persisted zoom level, if present and known
    pub fn zoom(&self) -> Option<ZoomLevel> {
        let index = self.zoom_level?;
        match ZoomLevel::from_index(index) {
            Ok(zoom) => Some(zoom),
            Err(e) => {
                warn!(error = %e, "ignoring persisted zoom level");
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cursor_timestamp_msec.is_none() && self.zoom_level.is_none()
    }
}

/// In-memory [`SessionStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    params: Option<SessionParams>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: SessionParams) -> Self {
        Self {
            params: Some(params),
        }
    }

    pub fn params(&self) -> Option<SessionParams> {
        self.params
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<SessionParams>> {
        Ok(self.params)
    }

    fn save(&mut self, params: &SessionParams) -> Result<()> {
        self.params = Some(*params);
        Ok(())
    }
}

/// One UI session over a [`TimelineModel`].
///
/// Restores params on [`start`](Self::start), forwards navigation to the
/// model, reports every selection to the host, and saves params on
/// [`finish`](Self::finish).
pub struct TimelineSession<P, H, S> {
    model: TimelineModel<P>,
    host: H,
    store: S,
    config: TimelineConfig,
}

impl<P, H, S> TimelineSession<P, H, S>
where
    P: Clone,
    H: TimelineHost<P>,
    S: SessionStore,
{
    pub fn new(host: H, store: S, config: TimelineConfig) -> Self {
        Self {
            model: TimelineModel::with_config(&config),
            host,
            store,
            config,
        }
    }

    /// Restores params, installs the initial records and jumps to the
    /// last event. A restored cursor is only used when there is nothing
    /// to jump to.
    pub fn start(
        &mut self,
        major1: Vec<TimeRecord<P>>,
        major2: Vec<TimeRecord<P>>,
        background: Vec<TimeRecord<P>>,
    ) -> SelectionResult<P> {
        let params = SessionParams::restore(&self.store);
        debug!(?params, "session start");

        self.model.load_initial(major1, major2, background);
        self.model
            .set_zoom(params.zoom().unwrap_or(self.config.default_zoom));

        let selection = self.goto_last(Reposition::Animated);
        if selection.is_none() {
            if let Some(cursor) = params.cursor_timestamp_msec {
                self.host.on_selecting();
                self.model.set_cursor(cursor);
                self.host.on_selected(cursor, None, Reposition::Instant);
                self.request_more_data();
            }
        }
        selection
    }

    pub fn goto_last(&mut self, reposition: Reposition) -> SelectionResult<P> {
        let selection = self.model.goto_last(reposition);
        self.notify(&selection);
        selection
    }

    pub fn goto_prev(&mut self, reposition: Reposition) -> SelectionResult<P> {
        let selection = self.model.goto_prev(reposition);
        self.notify(&selection);
        selection
    }

    pub fn goto_next(&mut self, reposition: Reposition) -> SelectionResult<P> {
        let selection = self.model.goto_next(reposition);
        self.notify(&selection);
        selection
    }

    /// Selects where a tap at `ts` snaps to
    pub fn select_at(&mut self, ts: i64, reposition: Reposition) -> SelectionResult<P> {
        let selection = Some(self.model.select_at(ts, reposition));
        self.notify(&selection);
        selection
    }

    pub fn zoom_in(&mut self) -> ZoomLevel {
        let zoom = self.model.zoom_in();
        self.request_more_data();
        zoom
    }

    pub fn zoom_out(&mut self) -> ZoomLevel {
        let zoom = self.model.zoom_out();
        self.request_more_data();
        zoom
    }

    /// Replaces one tier with a fresh batch from the host
    pub fn refill(&mut self, kind: TierKind, records: Vec<TimeRecord<P>>) {
        self.model.set_records(kind, records);
    }

    /// Saves params without ending the session
    pub fn save(&mut self) -> bool {
        SessionParams::from_model(&self.model, &self.config).persist(&mut self.store)
    }

    /// Saves params best-effort and hands back the model and store
    pub fn finish(mut self) -> (TimelineModel<P>, S) {
        self.save();
        (self.model, self.store)
    }

    pub fn model(&self) -> &TimelineModel<P> {
        &self.model
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    fn notify(&mut self, selection: &SelectionResult<P>) {
        let Some(selection) = selection else {
            return;
        };
        self.host.on_selecting();
        self.host.on_selected(
            selection.timestamp_msec,
            selection.record.as_ref().map(|r| r.record()),
            selection.reposition,
        );
        self.request_more_data();
    }

    fn request_more_data(&mut self) {
        for kind in self.model.tiers_needing_more_data() {
            self.host.on_request_more_data(kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[derive(Default)]
    struct RecordingHost {
        selecting: usize,
        selected: Vec<(i64, Option<i64>, Reposition)>,
        requested: Vec<TierKind>,
    }

    impl TimelineHost<()> for RecordingHost {
        fn on_selecting(&mut self) {
            self.selecting += 1;
        }

        fn on_selected(&mut self, ts: i64, record: Option<&TimeRecord>, reposition: Reposition) {
            self.selected
                .push((ts, record.map(|r| r.timestamp_msec()), reposition));
        }

        fn on_request_more_data(&mut self, tier: TierKind) {
            self.requested.push(tier);
        }
    }

    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn load(&self) -> Result<Option<SessionParams>> {
            Err(Error::Persistence("disk on fire".into()))
        }

        fn save(&mut self, _params: &SessionParams) -> Result<()> {
            Err(Error::Persistence("disk on fire".into()))
        }
    }

    fn recs(timestamps: &[i64]) -> Vec<TimeRecord> {
        timestamps
            .iter()
            .map(|&ts| TimeRecord::new(ts, 0, ()).unwrap())
            .collect()
    }

    #[test]
    fn test_restore_soft_fails() {
        assert!(SessionParams::restore(&MemoryStore::new()).is_empty());
        assert!(SessionParams::restore(&BrokenStore).is_empty());
        assert!(!SessionParams::default().persist(&mut BrokenStore));
    }

    #[test]
    fn test_unknown_zoom_is_ignored() {
        let params = SessionParams {
            cursor_timestamp_msec: None,
            zoom_level: Some(42),
        };
        assert_eq!(params.zoom(), None);
    }

    #[test]
    fn test_from_model_honours_config() {
        let mut model: TimelineModel = TimelineModel::new();
        model.set_cursor(5_000);
        model.set_zoom(ZoomLevel::Day1);

        let all = SessionParams::from_model(&model, &TimelineConfig::default());
        assert_eq!(all.cursor_timestamp_msec, Some(5_000));
        assert_eq!(all.zoom_level, Some(ZoomLevel::Day1.index()));

        let config = TimelineConfig {
            persist_cursor: false,
            ..TimelineConfig::default()
        };
        let zoom_only = SessionParams::from_model(&model, &config);
        assert_eq!(zoom_only.cursor_timestamp_msec, None);
        assert_eq!(zoom_only.zoom_level, Some(ZoomLevel::Day1.index()));
    }

    #[test]
    fn test_session_lifecycle() {
        let store = MemoryStore::with_params(SessionParams {
            cursor_timestamp_msec: Some(1),
            zoom_level: Some(ZoomLevel::Min5.index()),
        });
        let mut session =
            TimelineSession::new(RecordingHost::default(), store, TimelineConfig::default());

        let first = session.start(recs(&[100_000, 50_000]), Vec::new(), Vec::new());
        assert_eq!(first.map(|s| s.timestamp_msec), Some(100_000));
        assert_eq!(session.model().zoom(), ZoomLevel::Min5);

        assert!(session.goto_prev(Reposition::Instant).is_some());
        assert!(session.goto_prev(Reposition::Instant).is_none());
        assert_eq!(session.zoom_out(), ZoomLevel::Min15);

        let host = session.host();
        assert_eq!(host.selecting, 2);
        assert_eq!(
            host.selected,
            vec![
                (100_000, Some(100_000), Reposition::Animated),
                (50_000, Some(50_000), Reposition::Instant),
            ]
        );

        let (model, store) = session.finish();
        assert_eq!(model.cursor_msec(), Some(50_000));
        assert_eq!(
            store.params(),
            Some(SessionParams {
                cursor_timestamp_msec: Some(50_000),
                zoom_level: Some(ZoomLevel::Min15.index()),
            })
        );
    }

    #[test]
    fn test_restored_cursor_used_when_nothing_to_select() {
        let store = MemoryStore::with_params(SessionParams {
            cursor_timestamp_msec: Some(7_000),
            zoom_level: None,
        });
        let mut session: TimelineSession<(), _, _> =
            TimelineSession::new(RecordingHost::default(), store, TimelineConfig::default());

        assert!(session.start(Vec::new(), Vec::new(), Vec::new()).is_none());
        assert_eq!(session.model().cursor_msec(), Some(7_000));
        assert_eq!(session.model().zoom(), ZoomLevel::Hour1);
        assert_eq!(session.host().selecting, 1);
        assert_eq!(session.host().selected, vec![(7_000, None, Reposition::Instant)]);
    }

    #[test]
    fn test_broken_store_does_not_abort_session() {
        let mut session =
            TimelineSession::new(RecordingHost::default(), BrokenStore, TimelineConfig::default());

        assert!(session.start(recs(&[10_000]), Vec::new(), Vec::new()).is_some());
        assert!(!session.save());
        let (model, _) = session.finish();
        assert_eq!(model.cursor_msec(), Some(10_000));
    }

    #[test]
    fn test_requests_more_data_past_oldest_record() {
        let mut session =
            TimelineSession::new(RecordingHost::default(), MemoryStore::new(), TimelineConfig::default());

        // one hour window centred on 10_000_000 starts before the oldest record
        session.start(recs(&[10_000_000, 9_000_000]), Vec::new(), Vec::new());
        assert_eq!(session.host().requested, vec![TierKind::Major1]);

        session.host_mut().requested.clear();
        session.refill(TierKind::Major1, recs(&[10_000_000, 9_000_000, 1_000]));
        session.zoom_in();
        assert!(session.host().requested.is_empty());
    }
}
