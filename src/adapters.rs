use std::pin::Pin;
use std::time::Duration;

use time::OffsetDateTime;

use crate::config::ApiConfig;
use crate::ports;
use crate::types::notification::{NotificationId, NotificationPage};

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimeProvider;

impl ports::TimeProvider for TokioTimeProvider {
    type Sleep<'a>
        = tokio::time::Sleep
    where
        Self: 'a;

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    fn sleep<'a>(&'a self, duration: Duration) -> Self::Sleep<'a> {
        tokio::time::sleep(duration)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid api url '{0}'")]
    InvalidBaseUrl(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Talks to the dashboard backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpNotificationApi {
    base_url: reqwest::Url,
    client: reqwest::Client,
}

impl HttpNotificationApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = reqwest::Url::parse(config.base_url.trim())
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ApiError::InvalidBaseUrl(config.base_url.clone()))?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("alertfeed/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { base_url, client })
    }

    /// Appends `segments` to the base path, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> reqwest::Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn post(&self, url: reqwest::Url) -> Result<(), ApiError> {
        let response = self.client.post(url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(())
    }
}

impl ports::NotificationApi for HttpNotificationApi {
    type Error = ApiError;
    type FetchFut<'a>
        = Pin<Box<dyn Future<Output = Result<NotificationPage, Self::Error>> + Send + 'a>>
    where
        Self: 'a;
    type AckFut<'a>
        = Pin<Box<dyn Future<Output = Result<(), Self::Error>> + Send + 'a>>
    where
        Self: 'a;

    fn fetch<'a>(&'a self, limit: usize) -> Self::FetchFut<'a> {
        Box::pin(async move {
            let response = self
                .client
                .get(self.endpoint(&["notifications"]))
                .query(&[("limit", limit)])
                .send()
                .await?;
            if !response.status().is_success() {
                return Err(ApiError::Status(response.status()));
            }
            let body = response.bytes().await?;
            Ok(serde_json::from_slice(&body)?)
        })
    }

    fn mark_read<'a>(&'a self, id: &'a NotificationId) -> Self::AckFut<'a> {
        Box::pin(async move {
            let id = id.to_string();
            self.post(self.endpoint(&["notifications", id.as_str(), "read"])).await
        })
    }

    fn mark_all_read<'a>(&'a self) -> Self::AckFut<'a> {
        Box::pin(async move { self.post(self.endpoint(&["notifications", "read-all"])).await })
    }
}
