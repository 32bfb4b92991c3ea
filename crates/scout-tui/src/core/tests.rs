//! End-to-end session flows against the in-memory service fake.

use tempfile::TempDir;

use scout_proto::model::{DatasetSource, PreferenceProfile, Verdict};
use scout_proto::session::SessionStore;

use super::dataset::{DatasetSelector, SwitchOutcome};
use super::feedback::toggle_in_list;
use super::testutil::{sample_songs, FakeService};
use super::{load_home, save_demo_dataset, upload_and_activate, UploadOutcome};
use scout_proto::api::RemoteService;

/// No saved profile: the home view asks for trending only and the
/// personalized section stays empty.
#[tokio::test]
async fn test_home_without_profile_is_trending_only() {
    let svc = FakeService::new();
    let data = load_home(&svc, None).await;

    assert!(data.recommendations.is_empty());
    assert!(!data.trending.is_empty());
    assert_eq!(svc.calls.recommend(), 0);
    assert_eq!(svc.calls.trending(), 1);
}

/// Saved profile flows to the recommendation request exactly as submitted.
#[tokio::test]
async fn test_submitted_profile_reaches_service_verbatim() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));

    let mut profile = PreferenceProfile::new();
    profile.set("genre", "rock");
    profile.set("mood", "energetic");
    store.save_profile(&profile).unwrap();

    // A later view loads the profile back and requests recommendations.
    let svc = FakeService::new();
    let loaded = store.load_profile().unwrap();
    let data = load_home(&svc, Some(&loaded)).await;

    assert!(!data.recommendations.is_empty());
    assert_eq!(svc.calls.recommend(), 1);
    assert_eq!(
        svc.last_recommend_profile.lock().unwrap().clone(),
        Some(profile)
    );
}

/// Upload success auto-switches to the uploaded catalog; afterwards both
/// switch directions work without re-uploading.
#[tokio::test]
async fn test_upload_activates_and_unlocks_switching() {
    let svc = FakeService::new();
    let mut selector = DatasetSelector::with_state(DatasetSource::Demo, false);

    let outcome = upload_and_activate(&svc, &mut selector, "songs.csv", b"id,title\n".to_vec())
        .await
        .unwrap();
    assert_eq!(outcome, UploadOutcome::Activated);
    assert_eq!(selector.current(), DatasetSource::Uploaded);
    assert_eq!(svc.calls.upload(), 1);

    assert_eq!(
        selector.switch(&svc, DatasetSource::Demo).await.unwrap(),
        SwitchOutcome::Switched
    );
    assert_eq!(
        selector.switch(&svc, DatasetSource::Uploaded).await.unwrap(),
        SwitchOutcome::Switched
    );
    assert_eq!(svc.calls.upload(), 1);
}

/// A rejected upload surfaces the service's message verbatim and leaves
/// the selector on the demo catalog.
#[tokio::test]
async fn test_rejected_upload_leaves_selector_untouched() {
    let svc = FakeService::new();
    svc.reject_upload("Invalid file type");
    let mut selector = DatasetSelector::with_state(DatasetSource::Demo, false);

    let outcome = upload_and_activate(&svc, &mut selector, "notes.txt", b"hello".to_vec())
        .await
        .unwrap();
    assert_eq!(outcome, UploadOutcome::Rejected("Invalid file type".to_string()));
    assert_eq!(selector.current(), DatasetSource::Demo);
    assert!(!selector.can_select_uploaded());
    assert_eq!(svc.calls.switch_dataset(), 0);
}

/// The demo CSV lands on disk at the requested path, creating the
/// directory on the way.
#[tokio::test]
async fn test_demo_dataset_saved_to_downloads_dir() {
    let svc = FakeService::new();
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("downloads").join("demo_music_dataset.csv");

    save_demo_dataset(&svc, &target).await.unwrap();

    let written = std::fs::read(&target).unwrap();
    assert_eq!(written, b"id,title,artist\n");
}

/// Toggling like on one song in a list of five flips exactly that entry.
#[tokio::test]
async fn test_like_toggle_touches_only_target() {
    let mut songs = sample_songs(5);
    songs[3].id = "42".to_string();
    let before = songs.clone();

    assert!(toggle_in_list(&mut songs, "42", Verdict::Like));

    for (i, song) in songs.iter().enumerate() {
        if song.id == "42" {
            assert!(song.liked);
            assert!(!song.disliked);
        } else {
            assert_eq!(*song, before[i]);
        }
    }
}

/// The feedback request carries the current profile alongside the verdict.
#[tokio::test]
async fn test_feedback_carries_profile() {
    let svc = FakeService::new();
    let mut profile = PreferenceProfile::new();
    profile.set("genre", "jazz");

    svc.submit_feedback("9", Verdict::Dislike, &profile).await.unwrap();

    let last = svc.last_feedback.lock().unwrap().clone().unwrap();
    assert_eq!(last.0, "9");
    assert_eq!(last.1, Verdict::Dislike);
    assert_eq!(last.2, profile);
}
