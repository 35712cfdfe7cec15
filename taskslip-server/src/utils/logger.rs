//! Logging Infrastructure
//!
//! Structured logging for console and, optionally, daily rotating files:
//! - `app/` application logs, deleted after 14 days
//! - `jobs/` one line per print job (target `print_job`), never deleted

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, filter::filter_fn, fmt, prelude::*};

/// Target used by print job events
pub const JOB_TARGET: &str = "print_job";

/// Days an application log file is kept
pub const APP_LOG_RETENTION_DAYS: i64 = 14;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize the logging system (console only)
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}

/// Initialize the logging system with daily rotating logs
///
/// `RUST_LOG` wins over `level` when set. Job events reach the console
/// whatever the level.
///
/// # Examples
/// ```ignore
/// // Development setup (console only)
/// init_logger_with_file("debug", false, None)?;
///
/// // Production setup (console + file)
/// init_logger_with_file("info", true, Some("./logs"))?;
/// ```
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console = fmt::layer().with_target(true).with_line_number(true);
    if json_format {
        layers.push(
            console
                .json()
                .with_current_span(true)
                .with_filter(level_filter(level)?)
                .boxed(),
        );
    } else {
        layers.push(console.with_filter(level_filter(level)?).boxed());
    }

    if let Some(dir) = log_dir {
        let log_dir = Path::new(dir);
        let app_log_dir = log_dir.join("app");
        let jobs_log_dir = log_dir.join("jobs");
        fs::create_dir_all(&app_log_dir)?;
        fs::create_dir_all(&jobs_log_dir)?;

        let app_log = daily_appender(&app_log_dir, "app")?;
        layers.push(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(app_log))
                .with_filter(level_filter(level)?)
                .boxed(),
        );

        let jobs_log = daily_appender(&jobs_log_dir, "jobs")?;
        layers.push(
            fmt::layer()
                .json()
                .with_target(false)
                .with_writer(std::sync::Mutex::new(jobs_log))
                .with_filter(filter_fn(|meta| meta.target() == JOB_TARGET))
                .boxed(),
        );

        tokio::spawn(periodic_cleanup(log_dir.to_path_buf()));
    }

    tracing_subscriber::registry().with(layers).try_init()?;
    Ok(())
}

fn level_filter(level: &str) -> anyhow::Result<EnvFilter> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    Ok(filter.add_directive(format!("{}=info", JOB_TARGET).parse()?))
}

/// `<prefix>.YYYY-MM-DD.log`, rotated at midnight
fn daily_appender(dir: &Path, prefix: &str) -> anyhow::Result<RollingFileAppender> {
    Ok(RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(dir)?)
}

/// Clean up application log files older than [`APP_LOG_RETENTION_DAYS`]
///
/// Returns the number of files deleted. Job logs are left alone.
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<usize> {
    let cutoff = Local::now().date_naive() - chrono::Duration::days(APP_LOG_RETENTION_DAYS);

    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let mut deleted = 0;
    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        // app.YYYY-MM-DD.log
        if let Some(date_part) = name
            .strip_prefix("app.")
            .and_then(|d| d.strip_suffix(".log"))
            && let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            && date < cutoff
        {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
            deleted += 1;
        }
    }

    Ok(deleted)
}

/// Runs every hour
async fn periodic_cleanup(log_dir: PathBuf) {
    use tokio::time::{Duration, sleep};

    loop {
        sleep(Duration::from_secs(3600)).await;

        if let Err(e) = cleanup_old_logs(&log_dir) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::write(path, b"log line\n").unwrap();
    }

    #[test]
    fn test_cleanup_removes_only_expired_app_logs() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("app");
        let jobs = dir.path().join("jobs");
        fs::create_dir_all(&app).unwrap();
        fs::create_dir_all(&jobs).unwrap();

        let today = Local::now().date_naive();
        let recent = app.join(format!("app.{}.log", today.format("%Y-%m-%d")));
        let expired = app.join("app.2000-01-01.log");
        let unrelated = app.join("notes.txt");
        let job_log = jobs.join("jobs.2000-01-01.log");
        for path in [&recent, &expired, &unrelated, &job_log] {
            touch(path);
        }

        assert_eq!(cleanup_old_logs(dir.path()).unwrap(), 1);
        assert!(!expired.exists());
        assert!(recent.exists());
        assert!(unrelated.exists());
        assert!(job_log.exists());
    }

    #[test]
    fn test_cleanup_without_app_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cleanup_old_logs(dir.path()).unwrap(), 0);
    }
}
