//! Remote recommendation service client.
//!
//! One typed method per remote capability, no retries — failures propagate
//! to the calling view, which renders a fallback. The `RemoteService` trait
//! is the substitution seam for tests; `ApiClient` is the reqwest-backed
//! implementation used by the app.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use crate::config::ApiConfig;
use crate::model::{
    Ack, CurrentDatasetResponse, DatasetMeta, DatasetSource, FeedbackStats, PopularityResponse,
    PreferenceProfile, SessionRecord, SessionsResponse, SimilarResponse, Song, TrendingResponse,
    UploadResponse, Verdict,
};

/// Errors at the remote-service boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Service unreachable / connection-level failure.
    #[error("service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-success HTTP status without a usable error payload.
    #[error("service returned status {0}")]
    Status(u16),
    /// Response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
    /// The service rejected an uploaded dataset; message shown verbatim.
    #[error("{0}")]
    Rejected(String),
}

/// The request/response contract with the recommendation service.
#[async_trait]
pub trait RemoteService: Send + Sync {
    async fn recommend(&self, profile: &PreferenceProfile) -> Result<Vec<Song>, ApiError>;
    async fn trending_songs(&self) -> Result<Vec<Song>, ApiError>;
    async fn similar_songs(&self, song_id: &str) -> Result<Vec<Song>, ApiError>;
    async fn dataset_meta(&self) -> Result<DatasetMeta, ApiError>;
    async fn submit_feedback(
        &self,
        song_id: &str,
        verdict: Verdict,
        profile: &PreferenceProfile,
    ) -> Result<(), ApiError>;
    async fn switch_dataset(&self, source: DatasetSource) -> Result<(), ApiError>;
    async fn current_dataset(&self) -> Result<DatasetSource, ApiError>;
    /// Returns `Rejected` with the service's message when the upload is
    /// refused (malformed file, wrong type, ...).
    async fn upload_dataset(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), ApiError>;
    async fn download_demo_dataset(&self) -> Result<Vec<u8>, ApiError>;
    async fn retrain(&self) -> Result<(), ApiError>;
    async fn feedback_stats(&self) -> Result<FeedbackStats, ApiError>;
    async fn song_popularity(&self) -> Result<Vec<(String, u64)>, ApiError>;
    async fn user_sessions(&self) -> Result<Vec<SessionRecord>, ApiError>;
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Check the status, then decode the body through serde so shape errors
    /// surface as `Decode` rather than as transport noise.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.http.get(self.url(path)).send().await?;
        Self::decode(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiError> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl RemoteService for ApiClient {
    async fn recommend(&self, profile: &PreferenceProfile) -> Result<Vec<Song>, ApiError> {
        let response = self
            .http
            .post(self.url("recommend"))
            .json(profile)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn trending_songs(&self) -> Result<Vec<Song>, ApiError> {
        let resp: TrendingResponse = self.get_json("trending-songs").await?;
        Ok(resp.trending)
    }

    async fn similar_songs(&self, song_id: &str) -> Result<Vec<Song>, ApiError> {
        let resp: SimilarResponse = self.get_json(&format!("similar-songs/{}", song_id)).await?;
        Ok(resp.similar)
    }

    async fn dataset_meta(&self) -> Result<DatasetMeta, ApiError> {
        self.get_json("dataset-meta").await
    }

    async fn submit_feedback(
        &self,
        song_id: &str,
        verdict: Verdict,
        profile: &PreferenceProfile,
    ) -> Result<(), ApiError> {
        let body = json!({
            "song_id": song_id,
            "feedback": verdict,
            "user_preferences": profile,
        });
        let _: Ack = self.post_json("feedback", &body).await?;
        Ok(())
    }

    async fn switch_dataset(&self, source: DatasetSource) -> Result<(), ApiError> {
        let body = json!({ "source": source });
        let _: Ack = self.post_json("switch-dataset", &body).await?;
        Ok(())
    }

    async fn current_dataset(&self) -> Result<DatasetSource, ApiError> {
        let resp: CurrentDatasetResponse = self.get_json("current-dataset").await?;
        Ok(resp.source)
    }

    async fn upload_dataset(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        let response = self
            .http
            .post(self.url("upload-dataset"))
            .multipart(form)
            .send()
            .await?;

        // Rejections come back as a JSON error payload on a non-success
        // status; that message must reach the user verbatim.
        let status = response.status();
        let body = response.text().await?;
        let parsed: UploadResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        if status.is_success() && parsed.status.as_deref() == Some("success") {
            Ok(())
        } else {
            let message = parsed
                .error
                .unwrap_or_else(|| format!("upload failed with status {}", status.as_u16()));
            Err(ApiError::Rejected(message))
        }
    }

    async fn download_demo_dataset(&self) -> Result<Vec<u8>, ApiError> {
        let response = self.http.get(self.url("download-demo-dataset")).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn retrain(&self) -> Result<(), ApiError> {
        let _: Ack = self.post_json("retrain", &json!({})).await?;
        Ok(())
    }

    async fn feedback_stats(&self) -> Result<FeedbackStats, ApiError> {
        self.get_json("feedback-stats").await
    }

    async fn song_popularity(&self) -> Result<Vec<(String, u64)>, ApiError> {
        let resp: PopularityResponse = self.get_json("song-popularity").await?;
        Ok(resp.top_songs)
    }

    async fn user_sessions(&self) -> Result<Vec<SessionRecord>, ApiError> {
        let resp: SessionsResponse = self.get_json("user-sessions").await?;
        Ok(resp.sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;

    #[test]
    fn test_url_join_strips_trailing_slash() {
        let client = ApiClient::new(&ApiConfig {
            base_url: "http://localhost:5000/api/".to_string(),
            timeout_secs: 10,
        })
        .unwrap();
        assert_eq!(client.url("recommend"), "http://localhost:5000/api/recommend");
        assert_eq!(
            client.url("similar-songs/42"),
            "http://localhost:5000/api/similar-songs/42"
        );
    }

    #[test]
    fn test_rejection_message_is_verbatim() {
        let err = ApiError::Rejected("Invalid file type".to_string());
        assert_eq!(err.to_string(), "Invalid file type");
    }
}
