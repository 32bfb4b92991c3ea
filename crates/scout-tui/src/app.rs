//! App — component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks.
//! - The event loop draws each frame, then awaits the next message.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - Fetches run as spawned tasks tagged with the epoch they were started
//!   under; responses from a superseded epoch are dropped, so a dataset
//!   switch or profile change can never be overwritten by stale data.

use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use scout_proto::api::{ApiClient, RemoteService};
use scout_proto::model::{DatasetSource, FeedbackStats, SessionRecord, Song};
use scout_proto::session::SessionStore;

use crate::{
    action::{Action, SongList, View},
    app_state::AppState,
    component::Component,
    components::{
        dashboard::Dashboard, help_overlay::HelpOverlay, home::HomePanel, pref_form::PrefForm,
        results::ResultsList,
    },
    core::{
        self,
        dataset::{DatasetSelector, SwitchOutcome},
        feedback,
        similar::SimilarityCache,
        HomeData, UploadOutcome,
    },
    widgets::{
        status_bar,
        toast::{Severity, ToastManager},
    },
};

/// How many recorded sessions the dashboard keeps.
const RECENT_SESSIONS: usize = 20;

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    /// Home view data resolved for the tagged epoch.
    HomeLoaded { epoch: u64, data: HomeData },
    /// Full recommendation list resolved for the tagged epoch.
    ResultsLoaded { epoch: u64, songs: Vec<Song> },
    DashboardLoaded {
        epoch: u64,
        stats: FeedbackStats,
        top_songs: Vec<(String, u64)>,
        sessions: Vec<SessionRecord>,
    },
    /// A similar-songs lookup resolved; only applied while `dataset` is
    /// still the active catalog.
    SimilarLoaded {
        dataset: DatasetSource,
        song_id: String,
        result: Result<Vec<Song>, String>,
    },
    DemoSaved(Result<PathBuf, String>),
    RetrainDone(Result<(), String>),
}

pub struct App {
    svc: Arc<ApiClient>,
    session: SessionStore,
    selector: DatasetSelector,
    similar_cache: Arc<SimilarityCache>,
    downloads_dir: PathBuf,

    state: AppState,
    active: View,
    /// Bumped whenever fetched data would no longer be valid (dataset
    /// switch, profile change, view refresh). Tags every spawned fetch.
    epoch: u64,

    home: HomePanel,
    form: PrefForm,
    results: ResultsList,
    dashboard: Dashboard,
    help_overlay: HelpOverlay,
    toast: ToastManager,

    msg_tx: Option<mpsc::Sender<AppMessage>>,
    should_quit: bool,
}

impl App {
    pub fn new(
        svc: Arc<ApiClient>,
        session: SessionStore,
        selector: DatasetSelector,
        downloads_dir: PathBuf,
    ) -> Self {
        let profile = session.load_profile();
        let state = AppState::new(profile, selector.current(), selector.can_select_uploaded());
        Self {
            svc,
            session,
            selector,
            similar_cache: Arc::new(SimilarityCache::new()),
            downloads_dir,
            state,
            active: View::Home,
            epoch: 0,
            home: HomePanel::new(),
            form: PrefForm::new(),
            results: ResultsList::new(),
            dashboard: Dashboard::new(),
            help_overlay: HelpOverlay::new(),
            toast: ToastManager::new(),
            msg_tx: None,
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);
        self.msg_tx = Some(tx.clone());

        // ── Background task: keyboard events ──────────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // Toast expiry + spinner animation.
        let mut toast_tick = tokio::time::interval(Duration::from_millis(100));
        toast_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        info!("scout started on {} catalog", self.state.dataset.label());
        self.refresh_active();

        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }

            if self.should_quit {
                break;
            }

            needs_redraw = tokio::select! {
                Some(msg) = rx.recv() => {
                    let mut redraw = self.handle_message(msg).await;
                    // Drain whatever else is queued before redrawing.
                    while let Ok(next) = rx.try_recv() {
                        redraw |= self.handle_message(next).await;
                    }
                    redraw
                }

                _ = toast_tick.tick() => {
                    self.toast.tick();
                    true
                }
            };
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    // ── Message handling ──────────────────────────────────────────────────────

    async fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                self.handle_key_event(key).await;
                true
            }
            AppMessage::Event(Event::Resize(_, _)) => true,
            AppMessage::Event(_) => false,

            AppMessage::HomeLoaded { epoch, data } => {
                if epoch != self.epoch {
                    debug!("dropping stale home fetch (epoch {} < {})", epoch, self.epoch);
                    return false;
                }
                self.state.home_recs = data.recommendations;
                self.state.trending = data.trending;
                self.state.meta = data.meta;
                self.state.loading_home = false;
                true
            }

            AppMessage::ResultsLoaded { epoch, songs } => {
                if epoch != self.epoch {
                    debug!("dropping stale results fetch (epoch {} < {})", epoch, self.epoch);
                    return false;
                }
                self.state.results = songs;
                self.state.loading_results = false;
                true
            }

            AppMessage::DashboardLoaded {
                epoch,
                stats,
                top_songs,
                sessions,
            } => {
                if epoch != self.epoch {
                    debug!("dropping stale dashboard fetch");
                    return false;
                }
                self.state.stats = stats;
                self.state.top_songs = top_songs;
                self.state.sessions = sessions;
                self.state.loading_dashboard = false;
                true
            }

            AppMessage::SimilarLoaded {
                dataset,
                song_id,
                result,
            } => {
                if dataset != self.state.dataset {
                    debug!("dropping similar songs for inactive {} catalog", dataset.label());
                    return false;
                }
                match result {
                    Ok(songs) => {
                        self.state.similar.insert(song_id, songs);
                    }
                    Err(e) => self.toast.error(format!("similar songs failed: {}", e)),
                }
                true
            }

            AppMessage::DemoSaved(Ok(path)) => {
                self.toast
                    .resolve_spinner(Severity::Success, format!("demo CSV saved to {}", path.display()));
                true
            }
            AppMessage::DemoSaved(Err(e)) => {
                self.toast
                    .resolve_spinner(Severity::Error, format!("demo download failed: {}", e));
                true
            }

            AppMessage::RetrainDone(result) => {
                self.state.retraining = false;
                match result {
                    Ok(()) => {
                        self.toast
                            .resolve_spinner(Severity::Success, "model retrained");
                        self.refresh_active();
                    }
                    Err(e) => self
                        .toast
                        .resolve_spinner(Severity::Error, format!("retrain failed: {}", e)),
                }
                true
            }
        }
    }

    async fn handle_key_event(&mut self, key: KeyEvent) {
        if self.help_overlay.handle_key(key) {
            return;
        }
        if key.kind != KeyEventKind::Press {
            return;
        }

        // Ctrl+C always quits, even inside a text input.
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Global keys, unless the active view is consuming text.
        let typing = match self.active {
            View::Home => self.home.wants_text_input(&self.state),
            View::Form => self.form.wants_text_input(&self.state),
            View::Results => self.results.wants_text_input(&self.state),
            View::Dashboard => self.dashboard.wants_text_input(&self.state),
        };
        if !typing {
            let global = match key.code {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('?') => Some(Action::ToggleHelp),
                KeyCode::Char('1') => Some(Action::ShowView(View::Home)),
                KeyCode::Char('2') => Some(Action::ShowView(View::Form)),
                KeyCode::Char('3') => Some(Action::ShowView(View::Results)),
                KeyCode::Char('4') => Some(Action::ShowView(View::Dashboard)),
                _ => None,
            };
            if let Some(action) = global {
                self.dispatch_all(vec![action]).await;
                return;
            }
        }

        let actions = match self.active {
            View::Home => self.home.handle_key(key, &self.state),
            View::Form => self.form.handle_key(key, &self.state),
            View::Results => self.results.handle_key(key, &self.state),
            View::Dashboard => self.dashboard.handle_key(key, &self.state),
        };
        self.dispatch_all(actions).await;
    }

    // ── Action dispatch ───────────────────────────────────────────────────────

    async fn dispatch_all(&mut self, actions: Vec<Action>) {
        let mut queue: VecDeque<Action> = actions.into();
        while let Some(action) = queue.pop_front() {
            let follow_ups = self.dispatch(action).await;
            queue.extend(follow_ups);
        }
    }

    async fn dispatch(&mut self, action: Action) -> Vec<Action> {
        debug!("dispatch: {:?}", action);
        match &action {
            Action::Quit => {
                self.should_quit = true;
            }

            Action::ToggleHelp => self.help_overlay.toggle(),

            Action::ShowView(view) => {
                // Results without a profile redirects to the form.
                let target = if *view == View::Results && !self.state.has_profile() {
                    self.toast.info("set your preferences first");
                    View::Form
                } else {
                    *view
                };
                if target != self.active {
                    self.active = target;
                    self.refresh_active();
                }
            }

            Action::Refresh => self.refresh_active(),

            Action::SubmitPreferences(profile) => {
                if let Err(e) = self.session.save_profile(profile) {
                    warn!("failed to persist preference profile: {}", e);
                    self.toast
                        .warning("preferences not saved to disk; using them for this session");
                }
                self.state.profile = Some(profile.clone());
                self.active = View::Results;
                self.refresh_active();
            }

            Action::ToggleFeedback {
                list,
                song_id,
                verdict,
            } => {
                let profile = self.state.profile.clone().unwrap_or_default();
                let songs = match list {
                    SongList::HomeRecs => &mut self.state.home_recs,
                    SongList::Results => &mut self.state.results,
                };
                if let Err(e) =
                    feedback::toggle_and_submit(&*self.svc, songs, song_id, *verdict, &profile)
                        .await
                {
                    self.toast
                        .error(format!("feedback not saved remotely: {}", e));
                }
            }

            Action::ShowSimilar { song_id } => {
                // Second request toggles the inline section closed.
                if self.state.similar.remove(song_id).is_some() {
                    return Vec::new();
                }
                self.spawn_similar_fetch(song_id.clone());
            }

            Action::SwitchDataset(target) => {
                match self.selector.switch(&*self.svc, *target).await {
                    Ok(SwitchOutcome::Switched) => {
                        self.state.dataset = self.selector.current();
                        self.state.similar.clear();
                        self.toast
                            .success(format!("switched to {} catalog", target.label()));
                        self.refresh_active();
                    }
                    Ok(SwitchOutcome::AlreadyActive) => {}
                    Ok(SwitchOutcome::UploadRequired) => {
                        self.toast.warning("upload a CSV before switching to it");
                    }
                    Err(e) => {
                        self.toast
                            .error(format!("dataset switch failed: {}", e));
                    }
                }
            }

            Action::UploadDataset(path) => self.upload_dataset(path.clone()).await,

            Action::DownloadDemo => self.spawn_demo_download(),

            Action::Retrain => {
                if !self.state.retraining {
                    self.state.retraining = true;
                    self.toast.spinner("retraining model…");
                    self.spawn_retrain();
                }
            }

            Action::Noop => {}
        }

        // Let every component observe the action (cursor resets, prefill).
        let mut follow_ups = Vec::new();
        follow_ups.extend(self.home.on_action(&action, &self.state));
        follow_ups.extend(self.form.on_action(&action, &self.state));
        follow_ups.extend(self.results.on_action(&action, &self.state));
        follow_ups.extend(self.dashboard.on_action(&action, &self.state));
        follow_ups
    }

    async fn upload_dataset(&mut self, path: String) {
        let path = expand_home(&path);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.toast
                    .error(format!("cannot read {}: {}", path.display(), e));
                return;
            }
        };

        match core::upload_and_activate(&*self.svc, &mut self.selector, &file_name, bytes).await {
            Ok(UploadOutcome::Activated) => {
                if let Err(e) = self.session.mark_upload_seen() {
                    warn!("failed to persist upload flag: {}", e);
                }
                self.state.upload_ok = true;
                self.state.dataset = self.selector.current();
                self.state.similar.clear();
                self.toast
                    .success(format!("{} uploaded and active", file_name));
                self.refresh_active();
            }
            Ok(UploadOutcome::Rejected(message)) => {
                // Shown exactly as the service phrased it.
                self.toast.error(message);
            }
            Err(e) => {
                self.toast.error(format!("upload failed: {}", e));
            }
        }
    }

    // ── Background fetches ────────────────────────────────────────────────────

    /// Re-fetch the active view's data under a fresh epoch.
    fn refresh_active(&mut self) {
        self.epoch += 1;
        match self.active {
            View::Home => self.spawn_home_fetch(),
            View::Form => {}
            View::Results => self.spawn_results_fetch(),
            View::Dashboard => self.spawn_dashboard_fetch(),
        }
    }

    fn spawn_home_fetch(&mut self) {
        let Some(tx) = self.msg_tx.clone() else { return };
        self.state.loading_home = true;
        let svc = self.svc.clone();
        let profile = self.state.profile.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            let data = core::load_home(&*svc, profile.as_ref()).await;
            let _ = tx.send(AppMessage::HomeLoaded { epoch, data }).await;
        });
    }

    fn spawn_results_fetch(&mut self) {
        let Some(tx) = self.msg_tx.clone() else { return };
        let Some(profile) = self.state.profile.clone() else { return };
        self.state.loading_results = true;
        let svc = self.svc.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            let songs = match svc.recommend(&profile).await {
                Ok(songs) => songs,
                Err(e) => {
                    warn!("recommendation fetch failed: {}", e);
                    Vec::new()
                }
            };
            let _ = tx.send(AppMessage::ResultsLoaded { epoch, songs }).await;
        });
    }

    fn spawn_dashboard_fetch(&mut self) {
        let Some(tx) = self.msg_tx.clone() else { return };
        self.state.loading_dashboard = true;
        let svc = self.svc.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            let stats = svc.feedback_stats().await.unwrap_or_else(|e| {
                warn!("feedback-stats fetch failed: {}", e);
                FeedbackStats::default()
            });
            let top_songs = svc.song_popularity().await.unwrap_or_else(|e| {
                warn!("song-popularity fetch failed: {}", e);
                Vec::new()
            });
            let mut sessions = svc.user_sessions().await.unwrap_or_else(|e| {
                warn!("user-sessions fetch failed: {}", e);
                Vec::new()
            });
            // The service reports sessions oldest-first; the dashboard
            // wants the latest on top and only a recent window.
            sessions.reverse();
            sessions.truncate(RECENT_SESSIONS);
            let _ = tx
                .send(AppMessage::DashboardLoaded {
                    epoch,
                    stats,
                    top_songs,
                    sessions,
                })
                .await;
        });
    }

    fn spawn_similar_fetch(&mut self, song_id: String) {
        let Some(tx) = self.msg_tx.clone() else { return };
        let svc = self.svc.clone();
        let cache = self.similar_cache.clone();
        let dataset = self.state.dataset;
        tokio::spawn(async move {
            let result = cache
                .get_similar(&*svc, dataset, &song_id)
                .await
                .map_err(|e| e.to_string());
            let _ = tx
                .send(AppMessage::SimilarLoaded {
                    dataset,
                    song_id,
                    result,
                })
                .await;
        });
    }

    fn spawn_demo_download(&mut self) {
        let Some(tx) = self.msg_tx.clone() else { return };
        self.toast.spinner("downloading demo CSV…");
        let svc = self.svc.clone();
        let target = self.downloads_dir.join("demo_music_dataset.csv");
        tokio::spawn(async move {
            let result = core::save_demo_dataset(&*svc, &target)
                .await
                .map(|()| target)
                .map_err(|e| e.to_string());
            let _ = tx.send(AppMessage::DemoSaved(result)).await;
        });
    }

    fn spawn_retrain(&mut self) {
        let Some(tx) = self.msg_tx.clone() else { return };
        let svc = self.svc.clone();
        tokio::spawn(async move {
            let result = svc.retrain().await.map_err(|e| e.to_string());
            let _ = tx.send(AppMessage::RetrainDone(result)).await;
        });
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(1)])
            .split(area);

        match self.active {
            View::Home => self.home.draw(frame, rows[0], &self.state),
            View::Form => self.form.draw(frame, rows[0], &self.state),
            View::Results => self.results.draw(frame, rows[0], &self.state),
            View::Dashboard => self.dashboard.draw(frame, rows[0], &self.state),
        }

        let hint = match self.active {
            View::Home => "j/k: move · l/x: feedback · s: similar · u: upload · ?: help",
            View::Form => "tab: next field · enter: choose · ctrl+s: submit",
            View::Results => "o: sort · l/x: feedback · s: similar · b: back",
            View::Dashboard => "R: retrain · r: refresh",
        };
        status_bar::draw(frame, rows[1], self.active, &self.state, hint);

        self.help_overlay.draw(frame, area);
        self.toast.draw(frame, area);
    }
}

/// Expand a leading `~/` to the user's home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
