//! Data model shared between the client and the recommendation service.
//!
//! Every remote operation has an explicit response shape here; the client
//! decodes into these types at the boundary so a malformed payload fails
//! with a typed error instead of leaking into rendering.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single user preference value — the form mixes free text (genre,
/// artist, mood) with numeric knobs, so both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Str(String),
    Num(f64),
}

impl From<&str> for PrefValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<f64> for PrefValue {
    fn from(n: f64) -> Self {
        Self::Num(n)
    }
}

/// The user's preference profile: a sparse key → value map.
///
/// Overwritten wholesale on every form submission; never merged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceProfile(pub BTreeMap<String, PrefValue>);

impl PreferenceProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PrefValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(PrefValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compact one-line rendering for the dashboard session list.
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(k, v)| match v {
                PrefValue::Str(s) => format!("{}={}", k, s),
                PrefValue::Num(n) => format!("{}={}", k, n),
            })
            .collect();
        parts.join(", ")
    }
}

/// Which song catalog the service is currently operating over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetSource {
    #[default]
    Demo,
    Uploaded,
}

impl DatasetSource {
    pub fn label(self) -> &'static str {
        match self {
            Self::Demo => "demo",
            Self::Uploaded => "uploaded",
        }
    }
}

/// A like/dislike signal on a song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Like,
    Dislike,
}

impl Verdict {
    pub fn label(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

/// A song as returned by the service.
///
/// `liked`/`disliked` are client-session state layered onto the list after
/// a fetch — the wire never carries them, and the toggle controller keeps
/// them mutually exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub year: u32,
    #[serde(default)]
    pub bpm: u32,
    /// Energy percentage 0–100.
    #[serde(default)]
    pub energy: u32,
    /// Danceability percentage 0–100.
    #[serde(default)]
    pub danceability: u32,
    /// Display duration as the service renders it, e.g. "3:45".
    #[serde(default)]
    pub duration: String,
    /// Recommendation confidence, 0.0–1.0. Absent on trending rows.
    #[serde(default)]
    pub score: Option<f64>,
    /// Like count. Only present on trending rows.
    #[serde(default)]
    pub likes: Option<u64>,
    #[serde(default, skip_serializing)]
    pub liked: bool,
    #[serde(default, skip_serializing)]
    pub disliked: bool,
}

/// Catalog metadata used to drive the preference form pickers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetMeta {
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub moods: Vec<String>,
}

/// Aggregate feedback counters for the dashboard.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FeedbackStats {
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub dislikes: u64,
    #[serde(default)]
    pub total: u64,
}

impl FeedbackStats {
    /// Share of positive feedback, 0.0–100.0. Zero when no feedback yet.
    pub fn positive_pct(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.likes as f64 / self.total as f64 * 100.0
        }
    }
}

/// One feedback entry inside a recorded session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub song_id: String,
    pub feedback: Verdict,
    #[serde(default)]
    pub timestamp: i64,
}

/// A recorded user session as the service reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Unix seconds.
    pub timestamp: i64,
    #[serde(default)]
    pub preferences: PreferenceProfile,
    #[serde(default)]
    pub recommended_songs: Vec<String>,
    #[serde(default)]
    pub feedback: Vec<FeedbackEntry>,
}

impl SessionRecord {
    pub fn local_time(&self) -> String {
        chrono::DateTime::from_timestamp(self.timestamp, 0)
            .map(|dt| {
                dt.with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|| self.timestamp.to_string())
    }
}

// ── Response envelopes ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct TrendingResponse {
    #[serde(default)]
    pub trending: Vec<Song>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimilarResponse {
    #[serde(default)]
    pub similar: Vec<Song>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PopularityResponse {
    /// (song id, like count) pairs, most liked first.
    #[serde(default)]
    pub top_songs: Vec<(String, u64)>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionsResponse {
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentDatasetResponse {
    pub source: DatasetSource,
}

/// Plain acknowledgement body ({"status": ...}).
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_roundtrip() {
        let mut p = PreferenceProfile::new();
        p.set("genre", "rock");
        p.set("mood", "energetic");
        p.set("min_bpm", 120.0);
        let json = serde_json::to_string(&p).unwrap();
        let back: PreferenceProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
        assert_eq!(back.get_str("genre"), Some("rock"));
    }

    #[test]
    fn test_dataset_source_wire_names() {
        assert_eq!(serde_json::to_string(&DatasetSource::Demo).unwrap(), "\"demo\"");
        assert_eq!(
            serde_json::to_string(&DatasetSource::Uploaded).unwrap(),
            "\"uploaded\""
        );
        let cur: CurrentDatasetResponse =
            serde_json::from_str(r#"{"source":"uploaded"}"#).unwrap();
        assert_eq!(cur.source, DatasetSource::Uploaded);
    }

    #[test]
    fn test_verdict_wire_names() {
        assert_eq!(serde_json::to_string(&Verdict::Like).unwrap(), "\"like\"");
        assert_eq!(serde_json::to_string(&Verdict::Dislike).unwrap(), "\"dislike\"");
    }

    #[test]
    fn test_song_decodes_without_flags_or_score() {
        let json = r#"{
            "id": "7", "title": "Night Drive", "artist": "Neon Owls",
            "genre": "synthwave", "year": 2019, "bpm": 110,
            "energy": 74, "danceability": 61, "duration": "4:02"
        }"#;
        let song: Song = serde_json::from_str(json).unwrap();
        assert_eq!(song.id, "7");
        assert!(!song.liked && !song.disliked);
        assert!(song.score.is_none());
        assert!(song.likes.is_none());
    }

    #[test]
    fn test_trending_envelope_carries_likes() {
        let json = r#"{"trending":[{"id":"3","title":"A","artist":"B","likes":12}]}"#;
        let resp: TrendingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.trending.len(), 1);
        assert_eq!(resp.trending[0].likes, Some(12));
    }

    #[test]
    fn test_popularity_pairs() {
        let json = r#"{"top_songs":[["5",9],["12",4]]}"#;
        let resp: PopularityResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.top_songs, vec![("5".to_string(), 9), ("12".to_string(), 4)]);
    }

    #[test]
    fn test_positive_pct() {
        let stats = FeedbackStats { likes: 3, dislikes: 1, total: 4 };
        assert!((stats.positive_pct() - 75.0).abs() < f64::EPSILON);
        assert_eq!(FeedbackStats::default().positive_pct(), 0.0);
    }
}
