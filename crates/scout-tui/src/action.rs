//! Action enum — all user-initiated intents flowing from components to the
//! app event loop.

use scout_proto::model::{DatasetSource, PreferenceProfile, Verdict};

/// Which full-screen view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    Form,
    Results,
    Dashboard,
}

/// Which in-memory song list a feedback toggle targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SongList {
    HomeRecs,
    Results,
}

/// Actions produced by components; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Navigation ───────────────────────────────────────────────────────────
    ShowView(View),
    ToggleHelp,
    Quit,

    // ── Data ─────────────────────────────────────────────────────────────────
    /// Re-fetch the active view's data.
    Refresh,
    /// Save the profile wholesale and move to the results view.
    SubmitPreferences(PreferenceProfile),
    /// Optimistic like/dislike toggle on one song.
    ToggleFeedback {
        list: SongList,
        song_id: String,
        verdict: Verdict,
    },
    /// Lazy similar-songs lookup for one song.
    ShowSimilar { song_id: String },

    // ── Dataset ──────────────────────────────────────────────────────────────
    SwitchDataset(DatasetSource),
    /// Upload the CSV at this local path as the user dataset.
    UploadDataset(String),
    DownloadDemo,

    // ── Dashboard ────────────────────────────────────────────────────────────
    Retrain,

    Noop,
}
