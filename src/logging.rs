use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn build_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose {
        "grow_tracker=debug,tower_http=debug,info"
    } else {
        "grow_tracker=info,warn"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Compact logs on stderr, used by one-shot commands and the HTTP server
pub fn init_stderr_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(build_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Append logs to a file so the dashboard's alternate screen stays clean
pub fn init_file_logger(path: &Path, verbose: bool) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(build_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .init();
    Ok(())
}
