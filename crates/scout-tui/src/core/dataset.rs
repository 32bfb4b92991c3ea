//! DatasetSelector — which catalog (demo vs uploaded) the session is on.
//!
//! Single writer: only the app event loop calls `switch` /
//! `note_upload_success`. Views read the current source and the generation
//! counter; a bumped generation means cached view data belongs to another
//! catalog and must be re-fetched.

use scout_proto::api::{ApiError, RemoteService};
use scout_proto::model::DatasetSource;

/// Result of a `switch` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The remote acknowledged and local state now points at `target`.
    Switched,
    /// `target` was already active; nothing was sent.
    AlreadyActive,
    /// `Uploaded` requested but no upload has ever succeeded; nothing was
    /// sent.
    UploadRequired,
}

pub struct DatasetSelector {
    current: DatasetSource,
    upload_ok: bool,
    generation: u64,
}

impl DatasetSelector {
    /// Query the service for its current source once at startup; a failed
    /// query falls back to the demo catalog.
    pub async fn init<S: RemoteService>(svc: &S, upload_seen: bool) -> Self {
        let current = match svc.current_dataset().await {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("current-dataset query failed, assuming demo: {}", e);
                DatasetSource::Demo
            }
        };
        Self {
            current,
            upload_ok: upload_seen,
            generation: 0,
        }
    }

    #[cfg(test)]
    pub fn with_state(current: DatasetSource, upload_ok: bool) -> Self {
        Self {
            current,
            upload_ok,
            generation: 0,
        }
    }

    pub fn current(&self) -> DatasetSource {
        self.current
    }

    /// Monotonic counter bumped on every successful switch.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn can_select_uploaded(&self) -> bool {
        self.upload_ok
    }

    /// Record that an upload succeeded on the remote side, making the
    /// uploaded catalog selectable for the rest of the session.
    pub fn note_upload_success(&mut self) {
        self.upload_ok = true;
    }

    /// Switch the active catalog. Local state only changes after the remote
    /// acknowledges; on failure the selector stays where it was.
    pub async fn switch<S: RemoteService>(
        &mut self,
        svc: &S,
        target: DatasetSource,
    ) -> Result<SwitchOutcome, ApiError> {
        if target == self.current {
            return Ok(SwitchOutcome::AlreadyActive);
        }
        if target == DatasetSource::Uploaded && !self.upload_ok {
            return Ok(SwitchOutcome::UploadRequired);
        }
        svc.switch_dataset(target).await?;
        self.current = target;
        self.generation += 1;
        tracing::info!("dataset switched to {} (gen {})", target.label(), self.generation);
        Ok(SwitchOutcome::Switched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testutil::FakeService;

    #[tokio::test]
    async fn test_uploaded_rejected_without_prior_upload() {
        let svc = FakeService::new();
        let mut selector = DatasetSelector::with_state(DatasetSource::Demo, false);

        let outcome = selector.switch(&svc, DatasetSource::Uploaded).await.unwrap();
        assert_eq!(outcome, SwitchOutcome::UploadRequired);
        assert_eq!(selector.current(), DatasetSource::Demo);
        assert_eq!(selector.generation(), 0);
        // The no-op must not reach the service at all.
        assert_eq!(svc.calls.switch_dataset(), 0);
    }

    #[tokio::test]
    async fn test_switch_after_upload_success() {
        let svc = FakeService::new();
        let mut selector = DatasetSelector::with_state(DatasetSource::Demo, false);
        selector.note_upload_success();

        let outcome = selector.switch(&svc, DatasetSource::Uploaded).await.unwrap();
        assert_eq!(outcome, SwitchOutcome::Switched);
        assert_eq!(selector.current(), DatasetSource::Uploaded);
        assert_eq!(selector.generation(), 1);
        assert_eq!(svc.calls.switch_dataset(), 1);

        // Both directions work without another upload.
        assert_eq!(
            selector.switch(&svc, DatasetSource::Demo).await.unwrap(),
            SwitchOutcome::Switched
        );
        assert_eq!(
            selector.switch(&svc, DatasetSource::Uploaded).await.unwrap(),
            SwitchOutcome::Switched
        );
        assert_eq!(selector.generation(), 3);
    }

    #[tokio::test]
    async fn test_same_target_is_local_noop() {
        let svc = FakeService::new();
        let mut selector = DatasetSelector::with_state(DatasetSource::Demo, true);
        let outcome = selector.switch(&svc, DatasetSource::Demo).await.unwrap();
        assert_eq!(outcome, SwitchOutcome::AlreadyActive);
        assert_eq!(svc.calls.switch_dataset(), 0);
    }

    #[tokio::test]
    async fn test_remote_failure_leaves_state_unchanged() {
        let svc = FakeService::new();
        svc.fail_switch_dataset();
        let mut selector = DatasetSelector::with_state(DatasetSource::Demo, true);

        let err = selector.switch(&svc, DatasetSource::Uploaded).await;
        assert!(err.is_err());
        assert_eq!(selector.current(), DatasetSource::Demo);
        assert_eq!(selector.generation(), 0);
    }

    #[tokio::test]
    async fn test_init_uses_remote_answer_or_demo_fallback() {
        let svc = FakeService::new();
        svc.set_current_dataset(DatasetSource::Uploaded);
        let selector = DatasetSelector::init(&svc, true).await;
        assert_eq!(selector.current(), DatasetSource::Uploaded);

        let broken = FakeService::new();
        broken.fail_current_dataset();
        let selector = DatasetSelector::init(&broken, false).await;
        assert_eq!(selector.current(), DatasetSource::Demo);
    }
}
