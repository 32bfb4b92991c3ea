//! AppState — shared read-only data passed to all components during
//! render/event handling.
//!
//! The App event-loop is the only writer. The profile is written only by
//! the preference-submission path and the dataset fields only by the
//! dataset-switch path.

use std::collections::HashMap;

use scout_proto::model::{
    DatasetMeta, DatasetSource, FeedbackStats, PreferenceProfile, SessionRecord, Song,
};

/// The full shared state of the client session.
pub struct AppState {
    // ── Session ──────────────────────────────────────────────────────────────
    /// Current preference profile; `None` until the form is first submitted.
    pub profile: Option<PreferenceProfile>,
    /// Active catalog, mirrored from the dataset selector.
    pub dataset: DatasetSource,
    /// Whether an upload has succeeded (this session or a prior one).
    pub upload_ok: bool,

    // ── Fetched view data ────────────────────────────────────────────────────
    pub meta: DatasetMeta,
    pub home_recs: Vec<Song>,
    pub trending: Vec<Song>,
    pub results: Vec<Song>,
    pub stats: FeedbackStats,
    pub top_songs: Vec<(String, u64)>,
    pub sessions: Vec<SessionRecord>,
    /// Resolved similar-song lists for the *current* dataset, by song id.
    /// Rebuilt from the dataset-scoped cache as lookups resolve.
    pub similar: HashMap<String, Vec<Song>>,

    // ── Transient UI flags ───────────────────────────────────────────────────
    pub loading_home: bool,
    pub loading_results: bool,
    pub loading_dashboard: bool,
    pub retraining: bool,
}

impl AppState {
    pub fn new(profile: Option<PreferenceProfile>, dataset: DatasetSource, upload_ok: bool) -> Self {
        Self {
            profile,
            dataset,
            upload_ok,
            meta: DatasetMeta::default(),
            home_recs: Vec::new(),
            trending: Vec::new(),
            results: Vec::new(),
            stats: FeedbackStats::default(),
            top_songs: Vec::new(),
            sessions: Vec::new(),
            similar: HashMap::new(),
            loading_home: false,
            loading_results: false,
            loading_dashboard: false,
            retraining: false,
        }
    }

    pub fn has_profile(&self) -> bool {
        self.profile.is_some()
    }
}
