//! Feedback toggle semantics.
//!
//! Exactly one of `liked`/`disliked` may be true at any time. Toggling the
//! verdict a song already carries clears it; toggling the other verdict
//! sets it and forces the opposite flag off. The local flip is optimistic:
//! it happens before the remote submission and is not rolled back if that
//! submission fails — the divergence is logged and reported to the caller
//! so the view can show an error indicator.

use scout_proto::api::{ApiError, RemoteService};
use scout_proto::model::{PreferenceProfile, Song, Verdict};

/// Apply one toggle to a single song's flag pair.
pub fn apply_verdict(song: &mut Song, verdict: Verdict) {
    match verdict {
        Verdict::Like => {
            song.liked = !song.liked;
            if song.liked {
                song.disliked = false;
            }
        }
        Verdict::Dislike => {
            song.disliked = !song.disliked;
            if song.disliked {
                song.liked = false;
            }
        }
    }
}

/// Toggle the song with `song_id` in place. Every other entry is left
/// untouched. Returns false when the id is not in the list.
pub fn toggle_in_list(songs: &mut [Song], song_id: &str, verdict: Verdict) -> bool {
    match songs.iter_mut().find(|s| s.id == song_id) {
        Some(song) => {
            apply_verdict(song, verdict);
            true
        }
        None => false,
    }
}

/// Optimistic toggle: flip the local flags first, then tell the service.
/// A remote failure leaves the local flags as toggled and is returned so
/// the caller can surface it.
pub async fn toggle_and_submit<S: RemoteService>(
    svc: &S,
    songs: &mut [Song],
    song_id: &str,
    verdict: Verdict,
    profile: &PreferenceProfile,
) -> Result<(), ApiError> {
    if !toggle_in_list(songs, song_id, verdict) {
        tracing::debug!("feedback toggle for unknown song id {}", song_id);
        return Ok(());
    }
    if let Err(e) = svc.submit_feedback(song_id, verdict, profile).await {
        tracing::warn!(
            "feedback submission failed for song {} ({}); local state kept: {}",
            song_id,
            verdict.label(),
            e
        );
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testutil::{sample_songs, FakeService};

    #[test]
    fn test_double_toggle_restores_toggled_flag() {
        // Toggling the same verdict twice always restores the flag it
        // toggles. The opposite flag only survives when it was already
        // clear: the first toggle forces it off.
        for (liked, disliked) in [(false, false), (true, false), (false, true)] {
            for verdict in [Verdict::Like, Verdict::Dislike] {
                let mut songs = sample_songs(1);
                songs[0].liked = liked;
                songs[0].disliked = disliked;
                let before = songs[0].clone();

                apply_verdict(&mut songs[0], verdict);
                assert!(!(songs[0].liked && songs[0].disliked));
                apply_verdict(&mut songs[0], verdict);
                assert!(!(songs[0].liked && songs[0].disliked));

                let (toggled_now, toggled_before, opposite_before) = match verdict {
                    Verdict::Like => (songs[0].liked, before.liked, before.disliked),
                    Verdict::Dislike => (songs[0].disliked, before.disliked, before.liked),
                };
                assert_eq!(toggled_now, toggled_before, "verdict {:?}", verdict);
                if !opposite_before {
                    assert_eq!(songs[0], before, "verdict {:?}", verdict);
                }
            }
        }
    }

    #[test]
    fn test_flags_never_both_true() {
        let mut songs = sample_songs(1);
        let sequence = [
            Verdict::Like,
            Verdict::Dislike,
            Verdict::Dislike,
            Verdict::Like,
            Verdict::Like,
            Verdict::Dislike,
        ];
        for verdict in sequence {
            apply_verdict(&mut songs[0], verdict);
            assert!(!(songs[0].liked && songs[0].disliked));
        }
    }

    #[test]
    fn test_dislike_overrides_like() {
        let mut songs = sample_songs(1);
        apply_verdict(&mut songs[0], Verdict::Like);
        assert!(songs[0].liked);
        apply_verdict(&mut songs[0], Verdict::Dislike);
        assert!(songs[0].disliked);
        assert!(!songs[0].liked);
    }

    #[test]
    fn test_other_entries_untouched() {
        let mut songs = sample_songs(5);
        let before: Vec<_> = songs.clone();
        assert!(toggle_in_list(&mut songs, &before[2].id.clone(), Verdict::Like));
        for (i, song) in songs.iter().enumerate() {
            if i == 2 {
                assert!(song.liked);
                assert!(!song.disliked);
            } else {
                assert_eq!(*song, before[i]);
            }
        }
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut songs = sample_songs(3);
        let before = songs.clone();
        assert!(!toggle_in_list(&mut songs, "no-such-id", Verdict::Dislike));
        assert_eq!(songs, before);
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_local_flags() {
        let svc = FakeService::new();
        svc.fail_feedback();
        let mut songs = sample_songs(2);
        let profile = PreferenceProfile::new();

        let result = toggle_and_submit(&svc, &mut songs, "1", Verdict::Like, &profile).await;
        assert!(result.is_err());
        // Optimistic flip survives the failure.
        assert!(songs.iter().find(|s| s.id == "1").unwrap().liked);
    }
}
