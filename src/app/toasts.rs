use crate::ports::{NotificationApi, TimeProvider};
use crate::state::AppState;
use crate::toast::ToastEntry;
use crate::types::notification::NotificationId;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Serialize)]
pub(crate) struct ToastListResponse {
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) server_time: OffsetDateTime,
    pub(crate) toasts: Vec<ToastEntry>,
}

pub(crate) async fn toast_list<A, T>(State(state): State<AppState<A, T>>) -> Json<ToastListResponse>
where
    A: NotificationApi,
    T: TimeProvider,
{
    Json(ToastListResponse {
        server_time: state.toasts.now(),
        toasts: state.toasts.entries(),
    })
}

pub(crate) async fn toast_dismiss<A, T>(
    State(state): State<AppState<A, T>>,
    Path(raw): Path<String>,
) -> StatusCode
where
    A: NotificationApi,
    T: TimeProvider,
{
    let id = state
        .toasts
        .entries()
        .into_iter()
        .map(|entry| entry.id)
        .find(|id| id.to_string() == raw)
        .unwrap_or_else(|| NotificationId::parse(&raw));
    state.toasts.dismiss_toast(&id);
    StatusCode::NO_CONTENT
}
