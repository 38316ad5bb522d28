use crate::feed::NotificationFeed;
use crate::toast::ToastScheduler;

use std::sync::Arc;

pub struct AppState<A, T> {
    pub feed: Arc<NotificationFeed<A, T>>,
    pub toasts: ToastScheduler<T>,
}

impl<A, T: Clone> Clone for AppState<A, T> {
    fn clone(&self) -> Self {
        Self {
            feed: Arc::clone(&self.feed),
            toasts: self.toasts.clone(),
        }
    }
}
