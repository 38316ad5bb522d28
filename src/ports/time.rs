use std::time::Duration;

use time::OffsetDateTime;

/// Clock and timer source for polling and toast lifetimes.
pub trait TimeProvider: Clone + Send + Sync + 'static {
    type Sleep<'a>: Future<Output = ()> + Send + 'a
    where
        Self: 'a;

    fn now(&self) -> OffsetDateTime;
    fn sleep<'a>(&'a self, duration: Duration) -> Self::Sleep<'a>;

    fn unix_millis(&self) -> i128 {
        self.now().unix_timestamp_nanos() / 1_000_000
    }
}
