//! In-memory `RemoteService` fake with call counters, used across the core
//! tests to assert exactly how often (and with what) the network would have
//! been touched.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use scout_proto::api::{ApiError, RemoteService};
use scout_proto::model::{
    DatasetMeta, DatasetSource, FeedbackStats, PreferenceProfile, SessionRecord, Song, Verdict,
};

/// A plain song list with ids "1".."n".
pub fn sample_songs(n: usize) -> Vec<Song> {
    (1..=n)
        .map(|i| Song {
            id: i.to_string(),
            title: format!("Track {}", i),
            artist: format!("Artist {}", i),
            genre: "rock".to_string(),
            year: 2000 + i as u32,
            bpm: 100 + i as u32,
            energy: 50,
            danceability: 50,
            duration: "3:30".to_string(),
            score: Some(0.9 - i as f64 * 0.05),
            likes: None,
            liked: false,
            disliked: false,
        })
        .collect()
}

#[derive(Default)]
pub struct Calls {
    recommend: AtomicUsize,
    trending: AtomicUsize,
    meta: AtomicUsize,
    switch_dataset: AtomicUsize,
    upload: AtomicUsize,
    feedback: AtomicUsize,
    similar: Mutex<HashMap<String, usize>>,
}

impl Calls {
    pub fn recommend(&self) -> usize {
        self.recommend.load(Ordering::SeqCst)
    }
    pub fn trending(&self) -> usize {
        self.trending.load(Ordering::SeqCst)
    }
    pub fn meta(&self) -> usize {
        self.meta.load(Ordering::SeqCst)
    }
    pub fn switch_dataset(&self) -> usize {
        self.switch_dataset.load(Ordering::SeqCst)
    }
    pub fn upload(&self) -> usize {
        self.upload.load(Ordering::SeqCst)
    }
    pub fn feedback(&self) -> usize {
        self.feedback.load(Ordering::SeqCst)
    }
    pub fn similar_for(&self, song_id: &str) -> usize {
        self.similar
            .lock()
            .unwrap()
            .get(song_id)
            .copied()
            .unwrap_or(0)
    }
}

pub struct FakeService {
    pub calls: Calls,
    current: Mutex<DatasetSource>,
    fail_current: AtomicBool,
    fail_switch: AtomicBool,
    fail_feedback: AtomicBool,
    fail_similar_once: AtomicBool,
    reject_upload_with: Mutex<Option<String>>,
    similar_delay: Mutex<Option<Duration>>,
    pub last_recommend_profile: Mutex<Option<PreferenceProfile>>,
    pub last_feedback: Mutex<Option<(String, Verdict, PreferenceProfile)>>,
}

impl FakeService {
    pub fn new() -> Self {
        Self {
            calls: Calls::default(),
            current: Mutex::new(DatasetSource::Demo),
            fail_current: AtomicBool::new(false),
            fail_switch: AtomicBool::new(false),
            fail_feedback: AtomicBool::new(false),
            fail_similar_once: AtomicBool::new(false),
            reject_upload_with: Mutex::new(None),
            similar_delay: Mutex::new(None),
            last_recommend_profile: Mutex::new(None),
            last_feedback: Mutex::new(None),
        }
    }

    pub fn set_current_dataset(&self, source: DatasetSource) {
        *self.current.lock().unwrap() = source;
    }

    pub fn fail_current_dataset(&self) {
        self.fail_current.store(true, Ordering::SeqCst);
    }

    pub fn fail_switch_dataset(&self) {
        self.fail_switch.store(true, Ordering::SeqCst);
    }

    pub fn fail_feedback(&self) {
        self.fail_feedback.store(true, Ordering::SeqCst);
    }

    /// Make the next similar-songs call fail; later calls succeed.
    pub fn fail_similar_once(&self) {
        self.fail_similar_once.store(true, Ordering::SeqCst);
    }

    pub fn reject_upload(&self, message: &str) {
        *self.reject_upload_with.lock().unwrap() = Some(message.to_string());
    }

    pub fn delay_similar(&self, delay: Duration) {
        *self.similar_delay.lock().unwrap() = Some(delay);
    }

    fn unreachable_err() -> ApiError {
        ApiError::Status(503)
    }
}

#[async_trait]
impl RemoteService for FakeService {
    async fn recommend(&self, profile: &PreferenceProfile) -> Result<Vec<Song>, ApiError> {
        self.calls.recommend.fetch_add(1, Ordering::SeqCst);
        *self.last_recommend_profile.lock().unwrap() = Some(profile.clone());
        Ok(sample_songs(5))
    }

    async fn trending_songs(&self) -> Result<Vec<Song>, ApiError> {
        self.calls.trending.fetch_add(1, Ordering::SeqCst);
        let mut songs = sample_songs(3);
        for (i, song) in songs.iter_mut().enumerate() {
            song.score = None;
            song.likes = Some(10 - i as u64);
        }
        Ok(songs)
    }

    async fn similar_songs(&self, song_id: &str) -> Result<Vec<Song>, ApiError> {
        let delay = *self.similar_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        *self
            .calls
            .similar
            .lock()
            .unwrap()
            .entry(song_id.to_string())
            .or_insert(0) += 1;
        if self.fail_similar_once.swap(false, Ordering::SeqCst) {
            return Err(Self::unreachable_err());
        }
        Ok(sample_songs(3))
    }

    async fn dataset_meta(&self) -> Result<DatasetMeta, ApiError> {
        self.calls.meta.fetch_add(1, Ordering::SeqCst);
        Ok(DatasetMeta {
            genres: vec!["rock".into(), "jazz".into()],
            artists: vec!["Artist 1".into(), "Artist 2".into()],
            moods: vec!["energetic".into(), "calm".into()],
        })
    }

    async fn submit_feedback(
        &self,
        song_id: &str,
        verdict: Verdict,
        profile: &PreferenceProfile,
    ) -> Result<(), ApiError> {
        self.calls.feedback.fetch_add(1, Ordering::SeqCst);
        if self.fail_feedback.load(Ordering::SeqCst) {
            return Err(Self::unreachable_err());
        }
        *self.last_feedback.lock().unwrap() =
            Some((song_id.to_string(), verdict, profile.clone()));
        Ok(())
    }

    async fn switch_dataset(&self, source: DatasetSource) -> Result<(), ApiError> {
        self.calls.switch_dataset.fetch_add(1, Ordering::SeqCst);
        if self.fail_switch.load(Ordering::SeqCst) {
            return Err(Self::unreachable_err());
        }
        *self.current.lock().unwrap() = source;
        Ok(())
    }

    async fn current_dataset(&self) -> Result<DatasetSource, ApiError> {
        if self.fail_current.load(Ordering::SeqCst) {
            return Err(Self::unreachable_err());
        }
        Ok(*self.current.lock().unwrap())
    }

    async fn upload_dataset(&self, _file_name: &str, _bytes: Vec<u8>) -> Result<(), ApiError> {
        self.calls.upload.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.reject_upload_with.lock().unwrap().clone() {
            return Err(ApiError::Rejected(message));
        }
        Ok(())
    }

    async fn download_demo_dataset(&self) -> Result<Vec<u8>, ApiError> {
        Ok(b"id,title,artist\n".to_vec())
    }

    async fn retrain(&self) -> Result<(), ApiError> {
        Ok(())
    }

    async fn feedback_stats(&self) -> Result<FeedbackStats, ApiError> {
        Ok(FeedbackStats {
            likes: 6,
            dislikes: 2,
            total: 8,
        })
    }

    async fn song_popularity(&self) -> Result<Vec<(String, u64)>, ApiError> {
        Ok(vec![("1".to_string(), 6), ("2".to_string(), 3)])
    }

    async fn user_sessions(&self) -> Result<Vec<SessionRecord>, ApiError> {
        Ok(Vec::new())
    }
}
