//! Session orchestration core: dataset selection, similarity caching,
//! feedback toggling, and the fetch plans the views run through the app's
//! background tasks.

pub mod dataset;
pub mod feedback;
pub mod similar;

#[cfg(test)]
pub mod testutil;
#[cfg(test)]
mod tests;

use std::path::Path;

use scout_proto::api::{ApiError, RemoteService};
use scout_proto::model::{DatasetMeta, DatasetSource, PreferenceProfile, Song};

use dataset::{DatasetSelector, SwitchOutcome};

/// Everything the home view needs from one refresh pass.
#[derive(Debug, Default)]
pub struct HomeData {
    pub recommendations: Vec<Song>,
    pub trending: Vec<Song>,
    pub meta: DatasetMeta,
}

/// Fetch the home view's data. Personalized recommendations are requested
/// only when a profile exists; without one the view is trending-only.
/// Individual fetch failures degrade to empty sections rather than failing
/// the whole refresh.
pub async fn load_home<S: RemoteService>(
    svc: &S,
    profile: Option<&PreferenceProfile>,
) -> HomeData {
    let mut data = HomeData::default();

    if let Some(profile) = profile {
        match svc.recommend(profile).await {
            Ok(songs) => data.recommendations = songs,
            Err(e) => tracing::warn!("recommendation fetch failed: {}", e),
        }
    }

    match svc.trending_songs().await {
        Ok(songs) => data.trending = songs,
        Err(e) => tracing::warn!("trending fetch failed: {}", e),
    }

    match svc.dataset_meta().await {
        Ok(meta) => data.meta = meta,
        Err(e) => tracing::warn!("dataset-meta fetch failed: {}", e),
    }

    data
}

/// Result of an upload attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Upload accepted; the selector now points at the uploaded catalog.
    Activated,
    /// The service refused the file; message is shown verbatim and the
    /// selector is untouched.
    Rejected(String),
}

/// Upload a dataset and, on acceptance, make it the active catalog.
pub async fn upload_and_activate<S: RemoteService>(
    svc: &S,
    selector: &mut DatasetSelector,
    file_name: &str,
    bytes: Vec<u8>,
) -> Result<UploadOutcome, ApiError> {
    match svc.upload_dataset(file_name, bytes).await {
        Ok(()) => {}
        Err(ApiError::Rejected(message)) => return Ok(UploadOutcome::Rejected(message)),
        Err(e) => return Err(e),
    }

    selector.note_upload_success();
    match selector.switch(svc, DatasetSource::Uploaded).await? {
        SwitchOutcome::Switched | SwitchOutcome::AlreadyActive => Ok(UploadOutcome::Activated),
        // Unreachable: note_upload_success ran just above.
        SwitchOutcome::UploadRequired => Ok(UploadOutcome::Activated),
    }
}

/// Fetch the demo catalog CSV and write it to `target`, creating parent
/// directories as needed.
pub async fn save_demo_dataset<S: RemoteService>(svc: &S, target: &Path) -> anyhow::Result<()> {
    let bytes = svc.download_demo_dataset().await?;
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(target, bytes).await?;
    Ok(())
}
