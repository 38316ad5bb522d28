//! Polling notification feed.
//!
//! The feed owns the cached page, the unread count and the set of ids seen on the
//! previous poll. Each tick issues a fetch in its own task so a slow response never
//! delays the next tick; whichever response lands last wins. A response that lands
//! after [`NotificationFeed::stop`] (or after a restart) is dropped.

use crate::config::FeedConfig;
use crate::ports::{ErrorReporter, NotificationApi, TimeProvider};
use crate::types::notification::{Notification, NotificationId, NotificationPage};

use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

pub const INITIAL_LOAD_FAILED: &str = "Could not load notifications";

pub type NewItemsCallback = Arc<dyn Fn(Vec<Notification>) + Send + Sync>;

/// Ids observed as of the last completed poll. `None` until the first poll lands,
/// which is not the same as an empty set.
#[derive(Debug, Clone, Default)]
pub(crate) struct SeenIds(Option<HashSet<NotificationId>>);

impl SeenIds {
    /// Records the ids of `items` and returns the ones that were not seen before.
    /// The first observation only records.
    pub(crate) fn observe(&mut self, items: &[Notification]) -> Vec<Notification> {
        let current: HashSet<NotificationId> =
            items.iter().filter_map(|item| item.id.clone()).collect();
        let fresh = match self.0.as_ref() {
            None => Vec::new(),
            Some(seen) => items
                .iter()
                .filter(|item| item.id.as_ref().is_some_and(|id| !seen.contains(id)))
                .cloned()
                .collect(),
        };
        self.0 = Some(current);
        fresh
    }

    pub(crate) fn is_initialized(&self) -> bool {
        self.0.is_some()
    }
}

#[derive(Debug, Default)]
struct FeedState {
    notifications: Vec<Notification>,
    unread_count: u64,
    seen: SeenIds,
    loaded: bool,
    failure_reported: bool,
    epoch: u64,
    running: bool,
}

impl FeedState {
    fn apply(&mut self, page: NotificationPage) -> Vec<Notification> {
        let fresh = self.seen.observe(&page.notifications);
        self.notifications = page.notifications;
        self.unread_count = page.unread_count;
        self.loaded = true;
        fresh
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.running && self.epoch == epoch
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedSnapshot {
    pub notifications: Vec<Notification>,
    pub unread_count: u64,
    pub loaded: bool,
}

pub struct NotificationFeed<A, T> {
    poller: Poller<A, T>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl<A, T> NotificationFeed<A, T>
where
    A: NotificationApi,
    T: TimeProvider,
{
    pub fn new(api: A, time: T, reporter: Arc<dyn ErrorReporter>, config: FeedConfig) -> Self {
        Self {
            poller: Poller {
                api,
                time,
                reporter,
                config,
                state: Arc::new(Mutex::new(FeedState::default())),
            },
            poll_task: Mutex::new(None),
        }
    }

    /// Polls now and then every `poll_interval`. Calling it again restarts the loop;
    /// responses from the previous run are ignored.
    pub fn start<F>(&self, on_new_items: F)
    where
        F: Fn(Vec<Notification>) + Send + Sync + 'static,
    {
        let on_new_items: NewItemsCallback = Arc::new(on_new_items);
        let mut task = self.poll_task.lock().expect("poll task lock");
        if let Some(handle) = task.take() {
            handle.abort();
        }
        let epoch = {
            let mut state = self.poller.state.lock().expect("feed state lock");
            state.epoch += 1;
            state.running = true;
            state.epoch
        };
        tracing::info!(
            interval_ms = self.poller.config.poll_interval.as_millis() as u64,
            limit = self.poller.config.limit,
            "notification polling started"
        );
        let poller = self.poller.clone();
        *task = Some(tokio::spawn(async move {
            poller.run(epoch, on_new_items).await;
        }));
    }

    pub fn stop(&self) {
        let handle = self.poll_task.lock().expect("poll task lock").take();
        let was_running = {
            let mut state = self.poller.state.lock().expect("feed state lock");
            std::mem::replace(&mut state.running, false)
        };
        if let Some(handle) = handle {
            handle.abort();
        }
        if was_running {
            tracing::info!("notification polling stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.poller.state.lock().expect("feed state lock").running
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        let state = self.poller.state.lock().expect("feed state lock");
        FeedSnapshot {
            notifications: state.notifications.clone(),
            unread_count: state.unread_count,
            loaded: state.loaded,
        }
    }

    /// Maps a textual id onto a cached id with the same display form, so `"7"` finds
    /// a backend integer id `7` and `"a-1"` finds a string id.
    pub fn resolve_id(&self, raw: &str) -> NotificationId {
        let state = self.poller.state.lock().expect("feed state lock");
        state
            .notifications
            .iter()
            .filter_map(|item| item.id.as_ref())
            .find(|id| id.to_string() == raw)
            .cloned()
            .unwrap_or_else(|| NotificationId::parse(raw))
    }

    /// Marks one notification read locally, then tells the backend. Backend failures
    /// are logged and never rolled back.
    pub async fn mark_read(&self, id: &NotificationId) {
        {
            let mut state = self.poller.state.lock().expect("feed state lock");
            let cached = state
                .notifications
                .iter_mut()
                .find(|item| item.id.as_ref() == Some(id));
            let was_unread = match cached {
                Some(item) => !std::mem::replace(&mut item.is_read, true),
                // Not on the cached page; it may still count toward unread.
                None => true,
            };
            if was_unread {
                state.unread_count = state.unread_count.saturating_sub(1);
            }
        }
        if let Err(err) = self.poller.api.mark_read(id).await {
            tracing::debug!(%id, error = %err, "mark read request failed");
        }
    }

    pub async fn mark_all_read(&self) {
        {
            let mut state = self.poller.state.lock().expect("feed state lock");
            for item in state.notifications.iter_mut() {
                item.is_read = true;
            }
            state.unread_count = 0;
        }
        if let Err(err) = self.poller.api.mark_all_read().await {
            tracing::debug!(error = %err, "mark all read request failed");
        }
    }
}

impl<A, T> Drop for NotificationFeed<A, T> {
    fn drop(&mut self) {
        // Fetches already spawned outlive the loop; they must find the feed stopped.
        if let Ok(mut state) = self.poller.state.lock() {
            state.running = false;
        }
        if let Ok(mut task) = self.poll_task.lock()
            && let Some(handle) = task.take()
        {
            handle.abort();
        }
    }
}

#[derive(Clone)]
struct Poller<A, T> {
    api: A,
    time: T,
    reporter: Arc<dyn ErrorReporter>,
    config: FeedConfig,
    state: Arc<Mutex<FeedState>>,
}

impl<A, T> Poller<A, T>
where
    A: NotificationApi,
    T: TimeProvider,
{
    async fn run(self, epoch: u64, on_new_items: NewItemsCallback) {
        loop {
            let poller = self.clone();
            let on_new_items = Arc::clone(&on_new_items);
            tokio::spawn(async move {
                poller.poll_once(epoch, on_new_items).await;
            });
            self.time.sleep(self.config.poll_interval).await;
        }
    }

    async fn poll_once(self, epoch: u64, on_new_items: NewItemsCallback) {
        let result = self.api.fetch(self.config.limit).await;
        let fresh = {
            let mut state = self.state.lock().expect("feed state lock");
            if !state.is_current(epoch) {
                return;
            }
            match result {
                Ok(page) => {
                    let first = !state.seen.is_initialized();
                    let fresh = state.apply(page);
                    tracing::debug!(
                        count = state.notifications.len(),
                        unread = state.unread_count,
                        first,
                        "notifications polled"
                    );
                    fresh
                }
                Err(err) => {
                    tracing::warn!(error = %err, "notification poll failed");
                    let report = !state.loaded && !state.failure_reported;
                    state.failure_reported |= report;
                    drop(state);
                    if report {
                        self.reporter
                            .report(INITIAL_LOAD_FAILED, Some(&err.to_string()));
                    }
                    return;
                }
            }
        };
        if !fresh.is_empty() {
            tracing::info!(count = fresh.len(), "new notifications");
            on_new_items(fresh);
        }
    }
}
