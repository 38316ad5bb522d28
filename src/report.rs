use crate::ports::{ErrorReporter, TimeProvider};
use crate::toast::ToastScheduler;
use crate::types::notification::Notification;

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use time::OffsetDateTime;

/// Surfaces reports as error toasts.
#[derive(Clone)]
pub struct ToastReporter<T> {
    toasts: ToastScheduler<T>,
    time: T,
}

impl<T: TimeProvider> ToastReporter<T> {
    pub fn new(toasts: ToastScheduler<T>, time: T) -> Self {
        Self { toasts, time }
    }
}

impl<T: TimeProvider> ErrorReporter for ToastReporter<T> {
    fn report(&self, message: &str, detail: Option<&str>) {
        tracing::warn!(detail = detail.unwrap_or_default(), "{message}");
        let notification = Notification::local_error(message, detail, self.time.now());
        self.toasts.add_toast(notification);
    }
}

/// Drops a message identical to one forwarded less than `window` ago.
pub struct DedupReporter<R, T> {
    inner: R,
    time: T,
    window: Duration,
    recent: Mutex<HashMap<String, OffsetDateTime>>,
}

impl<R, T> DedupReporter<R, T>
where
    R: ErrorReporter,
    T: TimeProvider,
{
    pub fn new(inner: R, time: T, window: Duration) -> Self {
        Self {
            inner,
            time,
            window,
            recent: Mutex::new(HashMap::new()),
        }
    }
}

impl<R, T> ErrorReporter for DedupReporter<R, T>
where
    R: ErrorReporter,
    T: TimeProvider,
{
    fn report(&self, message: &str, detail: Option<&str>) {
        let now = self.time.now();
        {
            let mut recent = self.recent.lock().expect("recent reports lock");
            recent.retain(|_, at| now - *at < self.window);
            if recent.contains_key(message) {
                tracing::trace!(report = message, "duplicate report suppressed");
                return;
            }
            recent.insert(message.to_string(), now);
        }
        self.inner.report(message, detail);
    }
}
