use crate::ports::{NotificationApi, TimeProvider};
use crate::state;

use axum::Router;
use axum::routing::{get, post};

mod notifications;
mod toasts;

/// JSON surface read by the dashboard's presentation layer.
pub fn app<A, T>(state: state::AppState<A, T>) -> Router
where
    A: NotificationApi,
    T: TimeProvider,
{
    Router::new()
        .route(
            "/api/notifications",
            get(notifications::notification_list::<A, T>),
        )
        .route(
            "/api/notifications/read-all",
            post(notifications::notification_read_all::<A, T>),
        )
        .route(
            "/api/notifications/{id}/read",
            post(notifications::notification_read::<A, T>),
        )
        .route("/api/toasts", get(toasts::toast_list::<A, T>))
        .route(
            "/api/toasts/{id}/dismiss",
            post(toasts::toast_dismiss::<A, T>),
        )
        .route("/health", get(health))
        .with_state(state)
}

pub(crate) async fn health() -> &'static str {
    "ok"
}
