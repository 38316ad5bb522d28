/// Sink for user- and developer-facing failure notices.
pub trait ErrorReporter: Send + Sync + 'static {
    fn report(&self, message: &str, detail: Option<&str>);
}
