use crate::config::ToastConfig;
use crate::ports::TimeProvider;
use crate::types::notification::{Notification, NotificationId};

use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastPhase {
    Visible,
    Exiting,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToastEntry {
    pub id: NotificationId,
    pub exiting: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub added_at: OffsetDateTime,
    pub notification: Notification,
    #[serde(skip)]
    seq: u64,
}

impl ToastEntry {
    pub fn phase(&self) -> ToastPhase {
        if self.exiting {
            ToastPhase::Exiting
        } else {
            ToastPhase::Visible
        }
    }
}

struct AutoDismiss {
    seq: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct ToastState {
    /// Newest first.
    entries: Vec<ToastEntry>,
    timers: HashMap<NotificationId, AutoDismiss>,
}

impl ToastState {
    fn cancel_timer(&mut self, id: &NotificationId, seq: u64) {
        if self.timers.get(id).is_some_and(|timer| timer.seq == seq)
            && let Some(timer) = self.timers.remove(id)
        {
            timer.handle.abort();
        }
    }
}

/// Bounded stack of transient alerts, each with its own auto-dismiss timer.
///
/// Entries leave through one path: [`ToastScheduler::dismiss_toast`] flags them as
/// exiting and removes them after the exit delay. Capacity eviction is the exception
/// and drops the oldest entries on the spot.
#[derive(Clone)]
pub struct ToastScheduler<T> {
    time: T,
    config: ToastConfig,
    state: Arc<Mutex<ToastState>>,
    next_seq: Arc<AtomicU64>,
}

impl<T: TimeProvider> ToastScheduler<T> {
    pub fn new(time: T, config: ToastConfig) -> Self {
        Self {
            time,
            config,
            state: Arc::new(Mutex::new(ToastState::default())),
            next_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Pushes `notification` on top of the stack and returns its toast id. A toast
    /// whose id is already on the stack is left alone.
    pub fn add_toast(&self, notification: Notification) -> NotificationId {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let id = notification.id.clone().unwrap_or_else(|| {
            NotificationId::Text(format!("local-{}-{seq}", self.time.unix_millis()))
        });

        let mut state = self.state.lock().expect("toast state lock");
        if state.entries.iter().any(|entry| entry.id == id) {
            tracing::debug!(%id, "toast already shown");
            return id;
        }

        state.entries.insert(
            0,
            ToastEntry {
                id: id.clone(),
                exiting: false,
                added_at: self.time.now(),
                notification,
                seq,
            },
        );
        tracing::debug!(%id, grade = ?state.entries[0].notification.grade, "toast shown");

        while state.entries.len() > self.config.max_visible {
            let Some(evicted) = state.entries.pop() else {
                break;
            };
            state.cancel_timer(&evicted.id, evicted.seq);
            tracing::debug!(id = %evicted.id, "toast evicted");
        }

        if state.entries.iter().any(|entry| entry.seq == seq) {
            let scheduler = self.clone();
            let timer_id = id.clone();
            let handle = tokio::spawn(async move {
                scheduler.time.sleep(scheduler.config.auto_dismiss).await;
                scheduler.begin_exit(&timer_id, Some(seq));
            });
            if let Some(previous) = state.timers.insert(id.clone(), AutoDismiss { seq, handle }) {
                previous.handle.abort();
            }
        }
        id
    }

    /// Starts the exit of the toast with `id`. Unknown or already-exiting toasts are
    /// left as they are.
    pub fn dismiss_toast(&self, id: &NotificationId) {
        self.begin_exit(id, None);
    }

    pub fn entries(&self) -> Vec<ToastEntry> {
        self.state.lock().expect("toast state lock").entries.clone()
    }

    /// Current time on the clock that stamps `added_at`.
    pub fn now(&self) -> OffsetDateTime {
        self.time.now()
    }

    /// `None` once the toast is gone.
    pub fn phase(&self, id: &NotificationId) -> Option<ToastPhase> {
        let state = self.state.lock().expect("toast state lock");
        state
            .entries
            .iter()
            .find(|entry| &entry.id == id)
            .map(ToastEntry::phase)
    }

    fn begin_exit(&self, id: &NotificationId, expected_seq: Option<u64>) {
        let mut state = self.state.lock().expect("toast state lock");
        let Some(entry) = state
            .entries
            .iter_mut()
            .find(|entry| &entry.id == id && expected_seq.is_none_or(|seq| seq == entry.seq))
        else {
            return;
        };
        if entry.exiting {
            return;
        }
        entry.exiting = true;
        let seq = entry.seq;
        tracing::debug!(%id, "toast dismissed");

        let scheduler = self.clone();
        let id = id.clone();
        tokio::spawn(async move {
            scheduler.time.sleep(scheduler.config.exit_animation).await;
            scheduler.remove(&id, seq);
        });
    }

    fn remove(&self, id: &NotificationId, seq: u64) {
        let mut state = self.state.lock().expect("toast state lock");
        let before = state.entries.len();
        state.entries.retain(|entry| entry.seq != seq);
        state.cancel_timer(id, seq);
        if state.entries.len() < before {
            tracing::debug!(%id, "toast removed");
        }
    }
}
