pub mod api;
pub mod report;
pub mod time;

pub use self::api::NotificationApi;
pub use self::report::ErrorReporter;
pub use self::time::TimeProvider;
