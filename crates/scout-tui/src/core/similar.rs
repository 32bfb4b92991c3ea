//! SimilarityCache — lazy per-song "similar songs" lookups.
//!
//! Entries are keyed by `(DatasetSource, song_id)` so a dataset switch can
//! never surface lists computed against the other catalog, and switching
//! back reuses the warm entries. Each key holds a `OnceCell`: concurrent
//! callers share one in-flight request, a resolved entry answers from
//! memory with no further network traffic, and a failed fetch leaves the
//! cell empty so a user-initiated retry can try again. Entries are kept for
//! the lifetime of the session.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

use scout_proto::api::{ApiError, RemoteService};
use scout_proto::model::{DatasetSource, Song};

type CacheKey = (DatasetSource, String);

#[derive(Default)]
pub struct SimilarityCache {
    entries: Mutex<HashMap<CacheKey, Arc<OnceCell<Vec<Song>>>>>,
}

impl SimilarityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the similar-song list for `song_id` under `dataset`,
    /// fetching at most once per key.
    pub async fn get_similar<S: RemoteService>(
        &self,
        svc: &S,
        dataset: DatasetSource,
        song_id: &str,
    ) -> Result<Vec<Song>, ApiError> {
        let cell = {
            let mut entries = self.entries.lock().await;
            entries
                .entry((dataset, song_id.to_string()))
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };
        // OnceCell serializes initializers: the first caller runs the fetch
        // and every concurrent caller awaits the same resolution.
        let songs = cell
            .get_or_try_init(|| async {
                tracing::debug!("fetching similar songs for {} ({})", song_id, dataset.label());
                svc.similar_songs(song_id).await
            })
            .await?;
        Ok(songs.clone())
    }

    /// Already-resolved entry, if any.
    #[cfg(test)]
    pub async fn peek(&self, dataset: DatasetSource, song_id: &str) -> Option<Vec<Song>> {
        let entries = self.entries.lock().await;
        entries
            .get(&(dataset, song_id.to_string()))
            .and_then(|cell| cell.get())
            .cloned()
    }
}
