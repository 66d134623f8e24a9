use std::{path::Path, sync::LazyLock};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    EnvFilter,
};

use super::dir::{logs_path, APPLICATION_NAME};

/// Rotated log files kept next to the current one.
const MAX_LOG_FILES: usize = 5;

/// Level used when neither `--log` nor `RUST_LOG` says otherwise.
const DEFAULT_LEVEL: LevelFilter = LevelFilter::DEBUG;

/// Sets up logging into daily rotated `liftlog.*` files in the logs directory of `app_dir`.
/// With `verbose` everything down to trace is logged and mirrored to stdout.
pub fn enable_logging(app_dir: &Path, verbose: bool) -> Result<()> {
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(MAX_LOG_FILES)
        .filename_prefix(APPLICATION_NAME)
        .build(logs_path(app_dir))?;

    let stdout = std::io::stdout.with_filter(move |_| verbose);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter_directive(
            verbose,
            std::env::var("RUST_LOG").ok(),
        )))
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(stdout.and(appender))
        .with_ansi(false)
        .pretty()
        .init();
    Ok(())
}

/// Only this crate's events are logged. `--log` wins over `RUST_LOG`.
fn filter_directive(verbose: bool, env_level: Option<String>) -> String {
    let level = if verbose {
        LevelFilter::TRACE.to_string()
    } else {
        env_level
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
    };
    format!("{}={level}", env!("CARGO_PKG_NAME").replace('-', "_"))
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .init()
});
