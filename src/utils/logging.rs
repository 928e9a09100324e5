use std::path::Path;
#[cfg(test)]
use std::sync::LazyLock;

use anyhow::Result;
use tracing::{level_filters::LevelFilter, Subscriber};
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    util::SubscriberInitExt,
};

pub const CLI_PREFIX: &str = "cli";

/// Logs always go into daily rotated files under `logs_path`. `show_std` additionally echoes
/// them to stderr, so that they don't mix with reports printed to stdout.
pub fn enable_logging(
    prefix: &str,
    logs_path: &Path,
    log_level: Option<LevelFilter>,
    show_std: bool,
) -> Result<()> {
    build_subscriber(prefix, logs_path, log_level, show_std)?.init();
    Ok(())
}

fn build_subscriber(
    prefix: &str,
    logs_path: &Path,
    log_level: Option<LevelFilter>,
    show_std: bool,
) -> Result<impl Subscriber + Send + Sync + 'static> {
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(5)
        .filename_prefix(prefix)
        .build(logs_path)?;

    let stderr = std::io::stderr.with_filter(move |_| show_std);

    let level = log_level
        .map(|v| v.to_string())
        .unwrap_or_else(|| std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()));

    Ok(tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(format!(
            "{}={level}",
            env!("CARGO_PKG_NAME").replace("-", "_"),
        )))
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(stderr.and(appender))
        .with_ansi(false)
        .pretty()
        .finish())
}

#[cfg(test)]
pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .try_init();
});

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;
    use tracing::{info, info_span, level_filters::LevelFilter};

    use super::build_subscriber;

    #[test]
    fn test_events_and_spans_reach_log_file() -> Result<()> {
        let dir = tempdir()?;
        let subscriber = build_subscriber("test", dir.path(), Some(LevelFilter::DEBUG), false)?;

        tracing::subscriber::with_default(subscriber, || {
            let _span = info_span!("init_month").entered();
            info!("Added month with 25 tracked days");
        });

        let mut written = String::new();
        for entry in std::fs::read_dir(dir.path())? {
            written.push_str(&std::fs::read_to_string(entry?.path())?);
        }
        assert!(written.contains("Added month with 25 tracked days"));
        assert!(written.contains("init_month"));
        assert!(!written.contains('\u{1b}'));
        Ok(())
    }
}
