use alertfeed::config::{
    AUTO_DISMISS, ApiConfig, AppConfig, DEFAULT_PAGE_LIMIT, DEFAULT_POLL_INTERVAL,
    DEFAULT_REPORT_WINDOW, DEFAULT_REQUEST_TIMEOUT, EXIT_ANIMATION, FeedConfig, MAX_VISIBLE,
    ToastConfig,
};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::time::Duration;

pub(crate) enum RunOutcome {
    Serve(AppConfig),
    Check(AppConfig),
    Read(AppConfig, String),
    ReadAll(AppConfig),
    Exit(i32),
}

pub(crate) struct Invocation {
    pub(crate) log_level: String,
    pub(crate) outcome: RunOutcome,
}

pub(crate) fn run() -> Invocation {
    let cli = Cli::parse();
    let log_level = cli.log_level.clone();
    let outcome = match resolve_config(&cli) {
        Ok(config) => match cli.command {
            None | Some(Command::Serve) => RunOutcome::Serve(config),
            Some(Command::Check) => RunOutcome::Check(config),
            Some(Command::Read { id }) => RunOutcome::Read(config, id),
            Some(Command::ReadAll) => RunOutcome::ReadAll(config),
        },
        Err(err) => {
            eprintln!("error: {err}");
            RunOutcome::Exit(2)
        }
    };
    Invocation { log_level, outcome }
}

#[derive(Parser, Debug)]
#[command(
    name = "alertfeed",
    version,
    about = "Disclosure notification feed with timed toast alerts"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    /// Base URL of the dashboard backend, e.g. https://dash.example/api
    #[arg(long, env = "ALERTFEED_API_URL")]
    api_url: Option<String>,
    #[arg(long, env = "ALERTFEED_LISTEN", default_value = "127.0.0.1:3000")]
    listen: SocketAddr,
    #[arg(long, env = "ALERTFEED_LIMIT")]
    limit: Option<usize>,
    #[arg(long, env = "ALERTFEED_POLL_INTERVAL")]
    poll_interval: Option<String>,
    #[arg(long, env = "ALERTFEED_MAX_TOASTS")]
    max_toasts: Option<usize>,
    #[arg(long, env = "ALERTFEED_TOAST_TTL")]
    toast_ttl: Option<String>,
    #[arg(long, env = "ALERTFEED_EXIT_DELAY")]
    exit_delay: Option<String>,
    #[arg(long, env = "ALERTFEED_REPORT_WINDOW")]
    report_window: Option<String>,
    #[arg(long, env = "ALERTFEED_REQUEST_TIMEOUT")]
    request_timeout: Option<String>,
    #[arg(long, env = "ALERTFEED_LOG", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll the backend and serve the notification and toast API (default)
    Serve,
    /// Fetch one page and print it
    Check,
    /// Mark one notification as read
    Read { id: String },
    /// Mark every notification as read
    ReadAll,
}

fn resolve_config(cli: &Cli) -> Result<AppConfig, String> {
    let base_url = cli
        .api_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or("--api-url is required")?
        .to_string();

    let limit = cli.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    if limit == 0 {
        return Err("limit must be greater than 0".to_string());
    }
    let max_visible = cli.max_toasts.unwrap_or(MAX_VISIBLE);
    if max_visible == 0 {
        return Err("max toasts must be greater than 0".to_string());
    }

    Ok(AppConfig {
        listen: cli.listen,
        api: ApiConfig {
            base_url,
            request_timeout: duration_or(&cli.request_timeout, DEFAULT_REQUEST_TIMEOUT)?,
        },
        feed: FeedConfig {
            limit,
            poll_interval: duration_or(&cli.poll_interval, DEFAULT_POLL_INTERVAL)?,
        },
        toast: ToastConfig {
            max_visible,
            auto_dismiss: duration_or(&cli.toast_ttl, AUTO_DISMISS)?,
            exit_animation: duration_or(&cli.exit_delay, EXIT_ANIMATION)?,
        },
        report_window: duration_or(&cli.report_window, DEFAULT_REPORT_WINDOW)?,
    })
}

fn duration_or(raw: &Option<String>, default: Duration) -> Result<Duration, String> {
    match raw.as_deref() {
        Some(raw) => parse_duration(raw),
        None => Ok(default),
    }
}

fn parse_duration(raw: &str) -> Result<Duration, String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err("duration cannot be empty".to_string());
    }

    let split = value
        .find(|ch: char| ch.is_ascii_alphabetic())
        .unwrap_or(value.len());
    let (amount, unit) = value.split_at(split);

    let invalid = || format!("invalid duration '{value}'; expected <number>[ms|s|m|h]");
    let amount: u64 = amount.parse().map_err(|_| invalid())?;

    if amount == 0 {
        return Err("duration must be greater than 0".to_string());
    }

    let seconds_per_unit = match unit.to_ascii_lowercase().as_str() {
        "ms" => return Ok(Duration::from_millis(amount)),
        "" | "s" => 1,
        "m" => 60,
        "h" => 3600,
        _ => return Err(invalid()),
    };
    amount
        .checked_mul(seconds_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(invalid)
}
