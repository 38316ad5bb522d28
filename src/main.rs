mod cli;

use cli::RunOutcome;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let invocation = cli::run();
    init_tracing(&invocation.log_level);

    let code = match invocation.outcome {
        RunOutcome::Exit(code) => code,
        RunOutcome::Serve(config) => match alertfeed::serve(config).await {
            Ok(()) => 0,
            Err(err) => {
                tracing::error!(error = %err, "alertfeed stopped");
                1
            }
        },
        RunOutcome::Check(config) => match alertfeed::fetch_once(&config).await {
            Ok(page) => {
                println!("unread: {}", page.unread_count);
                for item in &page.notifications {
                    let id = item.id.as_ref().map(ToString::to_string).unwrap_or_default();
                    let marker = if item.is_read { " " } else { "*" };
                    println!(
                        "{marker} {id}\t{}\t{}",
                        item.grade.as_deref().unwrap_or("-"),
                        item.created_at.as_deref().unwrap_or("-"),
                    );
                }
                0
            }
            Err(err) => {
                eprintln!("failed to fetch notifications: {err}");
                1
            }
        },
        RunOutcome::Read(config, id) => match alertfeed::mark_read_once(&config, &id).await {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("failed to mark {id} as read: {err}");
                1
            }
        },
        RunOutcome::ReadAll(config) => match alertfeed::mark_all_read_once(&config).await {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("failed to mark notifications as read: {err}");
                1
            }
        },
    };
    std::process::exit(code);
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
