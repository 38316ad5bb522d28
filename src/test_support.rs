use crate::ports;
use crate::types::notification::{Notification, NotificationId, NotificationPage};

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::oneshot;

pub(crate) fn fixed_now() -> OffsetDateTime {
    OffsetDateTime::parse("2025-01-12T09:30:00Z", &Rfc3339).expect("parse now")
}

/// Lets spawned tasks on the current-thread runtime run until they block again.
pub(crate) async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

pub(crate) fn notification(id: i64, is_read: bool) -> Notification {
    Notification {
        id: Some(NotificationId::Int(id)),
        grade: Some("A".to_string()),
        is_read,
        created_at: Some("2025-01-12T09:00:00Z".to_string()),
        ..Notification::default()
    }
}

pub(crate) fn page(ids: &[i64], unread_count: u64) -> NotificationPage {
    NotificationPage {
        notifications: ids.iter().map(|id| notification(*id, false)).collect(),
        unread_count,
    }
}

/// Sleeps complete only when a test fires them by duration.
#[derive(Clone)]
pub(crate) struct ManualTime {
    now: Arc<Mutex<OffsetDateTime>>,
    sleeps: Arc<Mutex<Vec<(Duration, oneshot::Sender<()>)>>>,
}

impl ManualTime {
    pub(crate) fn new(now: OffsetDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
            sleeps: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().expect("now lock");
        *now += duration;
    }

    /// Number of live sleeps of exactly `duration`.
    pub(crate) fn pending(&self, duration: Duration) -> usize {
        self.sleeps
            .lock()
            .expect("sleeps lock")
            .iter()
            .filter(|(d, sender)| *d == duration && !sender.is_closed())
            .count()
    }

    /// Advances the clock by `duration` and wakes every sleep of that length.
    pub(crate) fn fire(&self, duration: Duration) {
        self.advance(duration);
        let mut sleeps = self.sleeps.lock().expect("sleeps lock");
        let (due, rest): (Vec<_>, Vec<_>) = sleeps.drain(..).partition(|(d, _)| *d == duration);
        *sleeps = rest;
        for (_, sender) in due {
            let _ = sender.send(());
        }
    }
}

pub(crate) struct ManualSleep {
    receiver: oneshot::Receiver<()>,
}

impl Future for ManualSleep {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(_) => Poll::Ready(()),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl ports::TimeProvider for ManualTime {
    type Sleep<'a>
        = ManualSleep
    where
        Self: 'a;

    fn now(&self) -> OffsetDateTime {
        *self.now.lock().expect("now lock")
    }

    fn sleep<'a>(&'a self, duration: Duration) -> Self::Sleep<'a> {
        let (sender, receiver) = oneshot::channel();
        self.sleeps
            .lock()
            .expect("sleeps lock")
            .push((duration, sender));
        ManualSleep { receiver }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StubError(pub(crate) String);

impl std::fmt::Display for StubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scripted backend. Each fetch pops the next response; an empty script fails.
#[derive(Clone, Default)]
pub(crate) struct StubApi {
    responses: Arc<Mutex<VecDeque<Result<NotificationPage, StubError>>>>,
    gates: Arc<Mutex<VecDeque<oneshot::Receiver<()>>>>,
    fetch_limits: Arc<Mutex<Vec<usize>>>,
    read_ids: Arc<Mutex<Vec<NotificationId>>>,
    read_all_calls: Arc<Mutex<usize>>,
    fail_acks: Arc<Mutex<bool>>,
}

impl StubApi {
    pub(crate) fn push_page(&self, page: NotificationPage) {
        self.responses
            .lock()
            .expect("responses lock")
            .push_back(Ok(page));
    }

    pub(crate) fn push_failure(&self, message: &str) {
        self.responses
            .lock()
            .expect("responses lock")
            .push_back(Err(StubError(message.to_string())));
    }

    /// Holds the next fetch open until the returned sender fires.
    pub(crate) fn gate_next(&self) -> oneshot::Sender<()> {
        let (sender, receiver) = oneshot::channel();
        self.gates.lock().expect("gates lock").push_back(receiver);
        sender
    }

    pub(crate) fn fail_acks(&self) {
        *self.fail_acks.lock().expect("fail acks lock") = true;
    }

    pub(crate) fn fetch_limits(&self) -> Vec<usize> {
        self.fetch_limits.lock().expect("fetch limits lock").clone()
    }

    pub(crate) fn read_ids(&self) -> Vec<NotificationId> {
        self.read_ids.lock().expect("read ids lock").clone()
    }

    pub(crate) fn read_all_calls(&self) -> usize {
        *self.read_all_calls.lock().expect("read all lock")
    }

    fn ack(&self) -> Result<(), StubError> {
        if *self.fail_acks.lock().expect("fail acks lock") {
            Err(StubError("backend unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl ports::NotificationApi for StubApi {
    type Error = StubError;
    type FetchFut<'a>
        = Pin<Box<dyn Future<Output = Result<NotificationPage, Self::Error>> + Send + 'a>>
    where
        Self: 'a;
    type AckFut<'a>
        = std::future::Ready<Result<(), Self::Error>>
    where
        Self: 'a;

    fn fetch<'a>(&'a self, limit: usize) -> Self::FetchFut<'a> {
        self.fetch_limits
            .lock()
            .expect("fetch limits lock")
            .push(limit);
        let response = self
            .responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| Err(StubError("no scripted response".to_string())));
        let gate = self.gates.lock().expect("gates lock").pop_front();
        Box::pin(async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            response
        })
    }

    fn mark_read<'a>(&'a self, id: &'a NotificationId) -> Self::AckFut<'a> {
        self.read_ids
            .lock()
            .expect("read ids lock")
            .push(id.clone());
        std::future::ready(self.ack())
    }

    fn mark_all_read<'a>(&'a self) -> Self::AckFut<'a> {
        *self.read_all_calls.lock().expect("read all lock") += 1;
        std::future::ready(self.ack())
    }
}

#[derive(Clone, Default)]
pub(crate) struct RecordingReporter {
    reports: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl RecordingReporter {
    pub(crate) fn reports(&self) -> Vec<(String, Option<String>)> {
        self.reports.lock().expect("reports lock").clone()
    }
}

impl ports::ErrorReporter for RecordingReporter {
    fn report(&self, message: &str, detail: Option<&str>) {
        self.reports
            .lock()
            .expect("reports lock")
            .push((message.to_string(), detail.map(str::to_string)));
    }
}
