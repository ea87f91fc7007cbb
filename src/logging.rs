use std::fs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Sets up console logging plus a daily JSON log file under `logs/`.
pub fn init_logging() {
    // The rolling appender wants the directory to exist up front
    let _ = fs::create_dir_all("logs");

    let (log_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily("logs", "standings.log"));

    let filter =
        EnvFilter::from_default_env().add_directive("standings_scraper=info".parse().unwrap());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_writer(log_writer))
        .with(fmt::layer().with_writer(std::io::stdout))
        .init();

    // Leak the guard so the file writer keeps flushing for the life of the process
    std::mem::forget(guard);
}
