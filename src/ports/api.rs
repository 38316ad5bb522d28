use crate::types::notification::{NotificationId, NotificationPage};

/// Backend notification endpoints. The feed only distinguishes success from failure.
pub trait NotificationApi: Clone + Send + Sync + 'static {
    type Error: std::fmt::Display + Send + Sync + 'static;
    type FetchFut<'a>: Future<Output = Result<NotificationPage, Self::Error>> + Send + 'a
    where
        Self: 'a;
    type AckFut<'a>: Future<Output = Result<(), Self::Error>> + Send + 'a
    where
        Self: 'a;

    fn fetch<'a>(&'a self, limit: usize) -> Self::FetchFut<'a>;
    fn mark_read<'a>(&'a self, id: &'a NotificationId) -> Self::AckFut<'a>;
    fn mark_all_read<'a>(&'a self) -> Self::AckFut<'a>;
}
