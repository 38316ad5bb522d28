pub mod adapters;
pub mod config;
pub mod feed;
pub mod ports;
pub mod report;
pub mod state;
pub mod toast;
pub mod types;

mod app;
#[cfg(test)]
mod test_support;

pub use app::app;

use crate::adapters::{ApiError, HttpNotificationApi, TokioTimeProvider};
use crate::feed::NotificationFeed;
use crate::ports::NotificationApi;
use crate::report::{DedupReporter, ToastReporter};
use crate::toast::ToastScheduler;
use crate::types::notification::{NotificationId, NotificationPage};

use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Polls the backend, turns new notifications into toasts and serves both.
pub async fn serve(config: config::AppConfig) -> Result<(), ServeError> {
    let api = HttpNotificationApi::new(&config.api)?;
    let toasts = ToastScheduler::new(TokioTimeProvider, config.toast);
    let reporter = DedupReporter::new(
        ToastReporter::new(toasts.clone(), TokioTimeProvider),
        TokioTimeProvider,
        config.report_window,
    );
    let feed = Arc::new(NotificationFeed::new(
        api,
        TokioTimeProvider,
        Arc::new(reporter),
        config.feed,
    ));

    let on_new = toasts.clone();
    feed.start(move |items| {
        for item in items {
            on_new.add_toast(item);
        }
    });

    let state = state::AppState {
        feed: Arc::clone(&feed),
        toasts,
    };
    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .map_err(|source| ServeError::Bind {
            addr: config.listen,
            source,
        })?;
    tracing::info!(addr = %config.listen, api = %config.api.base_url, "listening");
    let result = axum::serve(listener, app(state)).await;
    feed.stop();
    result.map_err(ServeError::Serve)
}

/// Fetches one page without starting a feed.
pub async fn fetch_once(config: &config::AppConfig) -> Result<NotificationPage, ApiError> {
    let api = HttpNotificationApi::new(&config.api)?;
    api.fetch(config.feed.limit).await
}

pub async fn mark_read_once(config: &config::AppConfig, id: &str) -> Result<(), ApiError> {
    let api = HttpNotificationApi::new(&config.api)?;
    api.mark_read(&NotificationId::parse(id)).await
}

pub async fn mark_all_read_once(config: &config::AppConfig) -> Result<(), ApiError> {
    let api = HttpNotificationApi::new(&config.api)?;
    api.mark_all_read().await
}
