use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_PAGE_LIMIT: usize = 20;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(30_000);
pub const MAX_VISIBLE: usize = 4;
pub const AUTO_DISMISS: Duration = Duration::from_millis(7_000);
pub const EXIT_ANIMATION: Duration = Duration::from_millis(300);
pub const DEFAULT_REPORT_WINDOW: Duration = Duration::from_secs(3);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen: SocketAddr,
    pub api: ApiConfig,
    pub feed: FeedConfig,
    pub toast: ToastConfig,
    pub report_window: Duration,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedConfig {
    pub limit: usize,
    pub poll_interval: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastConfig {
    pub max_visible: usize,
    pub auto_dismiss: Duration,
    pub exit_animation: Duration,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            max_visible: MAX_VISIBLE,
            auto_dismiss: AUTO_DISMISS,
            exit_animation: EXIT_ANIMATION,
        }
    }
}
