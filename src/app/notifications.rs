use crate::feed::FeedSnapshot;
use crate::ports::{NotificationApi, TimeProvider};
use crate::state::AppState;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

pub(crate) async fn notification_list<A, T>(
    State(state): State<AppState<A, T>>,
) -> Json<FeedSnapshot>
where
    A: NotificationApi,
    T: TimeProvider,
{
    Json(state.feed.snapshot())
}

pub(crate) async fn notification_read<A, T>(
    State(state): State<AppState<A, T>>,
    Path(id): Path<String>,
) -> StatusCode
where
    A: NotificationApi,
    T: TimeProvider,
{
    let id = state.feed.resolve_id(&id);
    state.feed.mark_read(&id).await;
    StatusCode::NO_CONTENT
}

pub(crate) async fn notification_read_all<A, T>(State(state): State<AppState<A, T>>) -> StatusCode
where
    A: NotificationApi,
    T: TimeProvider,
{
    state.feed.mark_all_read().await;
    StatusCode::NO_CONTENT
}
